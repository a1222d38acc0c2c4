//! Batch runner for computing many worker records against one parameter set
//!
//! Pre-loads the statutory parameters and law-change overlay once, then runs
//! any number of records without re-reading files. Records are independent,
//! so whole-population runs go through a parallel iterator.

use rayon::prelude::*;

use crate::compute::{Computation, Orchestrator};
use crate::error::Result;
use crate::lawchange::LawChangeOverlay;
use crate::params::Params;
use crate::worker::WorkerRecord;

/// Pre-loaded batch runner
///
/// # Example
/// ```ignore
/// let runner = BatchRunner::present_law();
/// let outcomes = runner.run_all(&workers);
/// ```
#[derive(Debug, Clone)]
pub struct BatchRunner {
    params: Params,
    overlay: LawChangeOverlay,
}

impl BatchRunner {
    /// Present-law parameters, no law changes
    pub fn present_law() -> Self {
        Self {
            params: Params::present_law(),
            overlay: LawChangeOverlay::present_law(),
        }
    }

    /// Runner with an explicit overlay
    pub fn with_overlay(overlay: LawChangeOverlay) -> Self {
        Self {
            params: Params::present_law(),
            overlay,
        }
    }

    /// Runner with pre-built parameters and overlay
    pub fn new(params: Params, overlay: LawChangeOverlay) -> Self {
        Self { params, overlay }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn overlay(&self) -> &LawChangeOverlay {
        &self.overlay
    }

    /// Compute a single record
    pub fn run(&self, worker: &WorkerRecord) -> Result<Computation> {
        Orchestrator::new(&self.params, &self.overlay).compute(worker)
    }

    /// Compute a whole population in parallel. Each record's outcome is
    /// independent; a failed record is reported in place without aborting
    /// the rest of the run.
    pub fn run_all(&self, workers: &[WorkerRecord]) -> Vec<Result<Computation>> {
        workers.par_iter().map(|w| self.run(w)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::{BenefitType, DateMy, EarningsRecord, Sex};
    use chrono::NaiveDate;

    fn worker(id: u64, birth_year: i32) -> WorkerRecord {
        let elig = (birth_year + 62) as u16;
        let mut earnings = EarningsRecord::new(1951);
        for year in (birth_year + 22) as u16..elig {
            earnings.set(year, 10_000.0);
        }
        WorkerRecord {
            worker_id: id,
            birth_date: NaiveDate::from_ymd_opt(birth_year, 1, 5).unwrap(),
            sex: Sex::Female,
            benefit_type: BenefitType::OldAge,
            entitlement: DateMy::new(elig, 2),
            benefit_date: DateMy::new(elig, 2),
            death_date: None,
            disability_periods: vec![],
            earnings,
            totalized: false,
            noncovered_pension: 0.0,
            fully_insured: true,
            quarters_of_coverage: 40,
            child_care_years: vec![],
            widow_birth_date: None,
            widow_entitlement: None,
            family: vec![],
        }
    }

    #[test]
    fn test_run_all_preserves_order_and_isolates_failures() {
        let runner = BatchRunner::present_law();
        let mut bad = worker(2, 1925);
        bad.benefit_date = DateMy::new(1980, 1); // precedes entitlement
        let workers = vec![worker(1, 1925), bad, worker(3, 1930)];
        let outcomes = runner.run_all(&workers);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].is_err());
        assert!(outcomes[2].is_ok());
        assert_eq!(outcomes[0].as_ref().unwrap().worker_id, 1);
        assert_eq!(outcomes[2].as_ref().unwrap().worker_id, 3);
    }
}
