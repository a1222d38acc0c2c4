//! Re-indexed widow(er) guarantee: for a surviving spouse, the worker's
//! earnings index to the earlier of the worker's own eligibility year and
//! the year the widow(er) turns 60

use chrono::Datelike;
use log::debug;

use crate::compute::period::{ComputationPeriod, PeriodKind};
use crate::compute::rounding::dime_for;
use crate::error::Result;
use crate::lawchange::LawChangeId;
use crate::params::{pia_bend_points, pia_percentages};
use crate::worker::{BenefitType, DateMy};
use super::wage_indexed;
use super::{CpiYears, MethodContext, MethodKind, MethodResult};

pub fn is_applicable(ctx: &MethodContext) -> bool {
    ctx.worker.benefit_type == BenefitType::Survivor
        && ctx.worker.widow_birth_date.is_some()
        && ctx.widow_elig_year().map(|y| y > 1978).unwrap_or(false)
        && !ctx
            .overlay
            .is_effective(LawChangeId::NoReindexedWidow, ctx.elig_year(), ctx.ben_year())
}

pub fn compute(ctx: &MethodContext) -> Result<MethodResult> {
    let worker = ctx.worker;
    let ben_year = ctx.ben_year();
    let elig_year = match ctx.widow_elig_year() {
        Some(y) => y,
        None => panic!(
            "re-indexed widow computed without widow data for worker {}",
            worker.worker_id
        ),
    };
    let period = ComputationPeriod::compute(worker, ctx.overlay, PeriodKind::Standard);

    let aime = wage_indexed::compute_aime(ctx, elig_year, period.n);
    let bends = pia_bend_points(elig_year, &ctx.params.wages, ctx.overlay, ben_year);
    let pcts = pia_percentages(elig_year, ben_year, ctx.overlay);

    let band1 = aime.min(bends[0]);
    let band2 = (aime.min(bends[1]) - bends[0]).max(0.0);
    let band3 = (aime - bends[1]).max(0.0);
    let pia = dime_for(
        pcts[0] * band1 + pcts[1] * band2 + pcts[2] * band3,
        DateMy::new(elig_year, 1),
    );

    let cpi = CpiYears::new(
        elig_year - 1,
        elig_year,
        worker.entitlement.year.max(elig_year),
        ben_year.max(elig_year),
    );
    let mut result = MethodResult::new(MethodKind::ReindexedWidow, cpi);
    result.aime = Some(aime);

    // The guarantee controls the widow(er)'s own benefit only; the family
    // maximum stays with the worker's regular computation, so no MFB here
    let engine = ctx.cola_engine();
    result.pia_elig = vec![pia];
    result.pia_ent =
        engine.apply_colas_elig(&mut result.pia_elig, elig_year, worker.benefit_date, elig_year);
    result.mfb_elig = vec![pia];
    result.mfb_ent = result.pia_ent;

    debug!(
        "reindexed-widow worker={}: widow elig={} aime={:.0} pia={:.2}",
        worker.worker_id, elig_year, aime, result.pia_ent
    );
    Ok(result)
}

impl<'a> MethodContext<'a> {
    /// The widow(er)'s indexing eligibility year: the earlier of the
    /// worker's own eligibility year and the year the widow(er) turns 60
    pub fn widow_elig_year(&self) -> Option<u16> {
        self.worker.widow_birth_date.map(|birth| {
            let age_60 = birth.year() as u16 + 60;
            age_60.min(self.worker.eligibility_year())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lawchange::LawChangeOverlay;
    use crate::params::Params;
    use crate::worker::{EarningsRecord, Sex, WorkerRecord};
    use chrono::NaiveDate;

    fn survivor_record() -> WorkerRecord {
        let mut earnings = EarningsRecord::new(1951);
        for year in 1965..=1984 {
            earnings.set(year, 14_000.0);
        }
        WorkerRecord {
            worker_id: 80,
            birth_date: NaiveDate::from_ymd_opt(1930, 7, 1).unwrap(),
            sex: Sex::Male,
            benefit_type: BenefitType::Survivor,
            entitlement: DateMy::new(1988, 4),
            benefit_date: DateMy::new(1988, 4),
            death_date: Some(DateMy::new(1985, 2)),
            disability_periods: vec![],
            earnings,
            totalized: false,
            noncovered_pension: 0.0,
            fully_insured: true,
            quarters_of_coverage: 40,
            child_care_years: vec![],
            widow_birth_date: Some(NaiveDate::from_ymd_opt(1928, 3, 3).unwrap()),
            widow_entitlement: Some(DateMy::new(1988, 4)),
            family: vec![],
        }
    }

    #[test]
    fn test_widow_eligibility_year() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let worker = survivor_record();
        let ctx = MethodContext::new(&worker, &params, &overlay);
        // Worker eligibility: min(1992, death year 1985) = 1985.
        // Widow turns 60 in 1988, so the worker's year controls.
        assert_eq!(ctx.widow_elig_year(), Some(1985));
        assert!(is_applicable(&ctx));
    }

    #[test]
    fn test_compute_produces_pia_without_separate_mfb() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let worker = survivor_record();
        let ctx = MethodContext::new(&worker, &params, &overlay);
        let result = compute(&ctx).unwrap();
        assert!(result.pia_ent > 0.0);
        assert!((result.mfb_ent - result.pia_ent).abs() < 1e-9);
    }

    #[test]
    fn test_requires_widow_data() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let mut worker = survivor_record();
        worker.widow_birth_date = None;
        let ctx = MethodContext::new(&worker, &params, &overlay);
        assert!(!is_applicable(&ctx));
    }
}
