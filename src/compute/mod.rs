//! The computation core: averaging periods, benefit increases, rounding,
//! age factors, the method set, and the orchestrator that ties them together

pub mod age;
pub mod cola;
pub mod methods;
pub mod orchestrator;
pub mod period;
pub mod rounding;

pub use cola::ColaEngine;
pub use methods::{
    ApplicabilityState, DisMfbCap, MethodContext, MethodKind, MethodResult,
};
pub use orchestrator::{ApportionedBenefit, Computation, Orchestrator};
pub use period::{ComputationPeriod, PeriodKind};
