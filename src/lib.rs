//! PIA Engine - Social Security primary insurance amount and maximum family
//! benefit computation with law-change policy overlays
//!
//! This library provides:
//! - The full set of statutory computation methods (wage-indexed, old-start,
//!   historical PIA tables, minimums, guarantees)
//! - Orchestration selecting the controlling PIA/MFB per worker record
//! - Cost-of-living increase propagation with the historical increase series
//! - A typed law-change overlay of ~40 policy levers
//! - Parallel batch runs over independent worker records

pub mod batch;
pub mod compute;
pub mod error;
pub mod lawchange;
pub mod params;
pub mod worker;

// Re-export commonly used types
pub use batch::BatchRunner;
pub use compute::{Computation, MethodKind, MethodResult, Orchestrator};
pub use error::{PiaError, Result};
pub use lawchange::{LawChangeId, LawChangeOverlay};
pub use params::Params;
pub use worker::{EarningsRecord, WorkerRecord};
