//! Worker records: the immutable per-claim input to the computation engine

mod record;
mod earnings;
mod family;
pub mod loader;

pub use record::{WorkerRecord, Sex, BenefitType, DisabilityPeriod, DateMy};
pub use earnings::EarningsRecord;
pub use family::{Beneficiary, BeneficiaryKind};
pub use loader::{load_workers, load_workers_from_reader};
