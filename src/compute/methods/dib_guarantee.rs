//! Disability insurance benefit guarantee: a later claim never pays less
//! than the PIA of a prior disability entitlement, carried forward with the
//! intervening benefit increases
//!
//! The PIA at cessation is rebuilt by running the computation that applied
//! to the prior period, with the benefit date frozen at cessation. The MFB
//! conversion depends on when the prior entitlement ended and how soon the
//! new one began.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::compute::rounding::dime_for;
use crate::error::Result;
use crate::lawchange::LawChangeId;
use crate::params::{mfb_bend_points, mfb_percentages};
use crate::worker::{BenefitType, DateMy, DisabilityPeriod, WorkerRecord};
use super::wage_indexed;
use super::{CpiYears, MethodContext, MethodKind, MethodResult};

/// Prior entitlements ending before this month carry a table-era MFB
const GUARANTEE_ERA_START: DateMy = DateMy { year: 1979, month: 1 };

/// First month of entitlement subject to the disability maximum
const DI_MAX_START: DateMy = DateMy { year: 1980, month: 7 };

/// Re-entitlement within this many months keeps the prior MFB unchanged
const GAP_MONTHS: i32 = 12;

/// How the prior entitlement's MFB converts at the new claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvertedMfbType {
    /// Cessation before January 1979: the table MFB carries forward
    Pre1979Carry,
    /// New entitlement within twelve months of cessation: MFB unchanged
    WithinGapCarry,
    /// Disability re-entitlement after the gap, before July 1980
    ReconvertedPre1980,
    /// Disability re-entitlement subject to the disability maximum
    DiMaximum,
    /// Old-age or survivor claim after the gap: MFB recomputed at the new
    /// eligibility year
    RecomputedOldAgeSurvivor,
}

/// Classify the conversion for a prior period ending at `cessation`
pub fn classify(
    cessation: DateMy,
    new_entitlement: DateMy,
    benefit_type: BenefitType,
) -> ConvertedMfbType {
    if cessation < GUARANTEE_ERA_START {
        ConvertedMfbType::Pre1979Carry
    } else if new_entitlement.months_since(cessation) <= GAP_MONTHS {
        ConvertedMfbType::WithinGapCarry
    } else if benefit_type == BenefitType::Disability {
        if new_entitlement < DI_MAX_START {
            ConvertedMfbType::ReconvertedPre1980
        } else {
            ConvertedMfbType::DiMaximum
        }
    } else {
        ConvertedMfbType::RecomputedOldAgeSurvivor
    }
}

/// The ceased period supporting the guarantee: the most recent one with a
/// cessation month
fn guarantee_period(worker: &WorkerRecord) -> Option<&DisabilityPeriod> {
    worker
        .disability_periods
        .iter()
        .filter(|p| p.cessation.is_some())
        .last()
}

pub fn is_applicable(ctx: &MethodContext) -> bool {
    guarantee_period(ctx.worker).is_some()
        && ctx.elig_year() > 1978
        && !ctx
            .overlay
            .is_effective(LawChangeId::NoDibGuarantee, ctx.elig_year(), ctx.ben_year())
}

pub fn compute(ctx: &MethodContext) -> Result<MethodResult> {
    let worker = ctx.worker;
    let elig_year = ctx.elig_year();
    let ben_year = ctx.ben_year();

    let prior = match guarantee_period(worker) {
        Some(p) => p,
        None => panic!(
            "disability guarantee computed without a ceased prior period for worker {}",
            worker.worker_id
        ),
    };
    // cessation presence is guaranteed by guarantee_period
    let cessation = prior.cessation.unwrap_or(prior.entitlement);

    // Rebuild the PIA as of cessation: a disability claim frozen at the
    // prior period
    let mut at_cessation = worker.clone();
    at_cessation.benefit_type = BenefitType::Disability;
    at_cessation.entitlement = prior.entitlement;
    at_cessation.benefit_date = cessation;
    at_cessation.disability_periods = vec![*prior];
    let prior_ctx = MethodContext::new(&at_cessation, ctx.params, ctx.overlay);
    let prior_result = wage_indexed::compute(&prior_ctx)?;

    let conversion = classify(cessation, worker.entitlement, worker.benefit_type);
    let pia = prior_result.pia_ent;
    let mfb = match conversion {
        ConvertedMfbType::Pre1979Carry
        | ConvertedMfbType::WithinGapCarry
        | ConvertedMfbType::ReconvertedPre1980
        | ConvertedMfbType::DiMaximum => prior_result.mfb_ent,
        ConvertedMfbType::RecomputedOldAgeSurvivor => {
            let bends = mfb_bend_points(elig_year, &ctx.params.wages, ctx.overlay, ben_year);
            let pcts = mfb_percentages(elig_year, ben_year, ctx.overlay);
            let band1 = pia.min(bends[0]);
            let band2 = (pia.min(bends[1]) - bends[0]).max(0.0);
            let band3 = (pia.min(bends[2]) - bends[1]).max(0.0);
            let band4 = (pia - bends[2]).max(0.0);
            dime_for(
                pcts[0] * band1 + pcts[1] * band2 + pcts[2] * band3 + pcts[3] * band4,
                worker.benefit_date,
            )
        }
    };

    let cpi = CpiYears::new(
        elig_year - 1,
        elig_year,
        worker.entitlement.year.max(elig_year),
        ben_year.max(elig_year),
    );
    let mut result = MethodResult::new(MethodKind::DisabilityGuarantee, cpi);
    result.aime = prior_result.aime;

    // Carry forward with the increases between cessation and the new claim.
    // The cessation-year increase already folded in when it was effective on
    // or before the cessation month.
    let engine = ctx.cola_engine();
    let mut first_increase = if crate::compute::cola::ColaEngine::effective_date(cessation.year)
        <= cessation
    {
        cessation.year + 1
    } else {
        cessation.year
    };
    first_increase = first_increase.max(crate::compute::cola::FIRST_AUTOMATIC_YEAR);
    result.pia_elig = vec![pia];
    result.pia_ent = engine.apply_colas_elig(
        &mut result.pia_elig,
        first_increase,
        worker.benefit_date,
        elig_year,
    );
    result.mfb_elig = vec![mfb];
    result.mfb_ent = engine.apply_colas_elig(
        &mut result.mfb_elig,
        first_increase,
        worker.benefit_date,
        elig_year,
    );

    debug!(
        "dib-guarantee worker={}: cessation={} conversion={:?} pia={:.2}",
        worker.worker_id, cessation, conversion, result.pia_ent
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lawchange::LawChangeOverlay;
    use crate::params::Params;
    use crate::worker::{EarningsRecord, Sex};
    use chrono::NaiveDate;

    fn worker_with_prior_di() -> WorkerRecord {
        let mut earnings = EarningsRecord::new(1951);
        for year in 1960..=1990 {
            earnings.set(year, 12_000.0);
        }
        let prior = DisabilityPeriod {
            onset: NaiveDate::from_ymd_opt(1984, 3, 10).unwrap(),
            waiting_period_start: DateMy::new(1984, 4),
            cessation: Some(DateMy::new(1987, 6)),
            entitlement: DateMy::new(1984, 9),
        };
        WorkerRecord {
            worker_id: 70,
            birth_date: NaiveDate::from_ymd_opt(1930, 2, 2).unwrap(),
            sex: Sex::Male,
            benefit_type: BenefitType::OldAge,
            entitlement: DateMy::new(1992, 3),
            benefit_date: DateMy::new(1992, 3),
            death_date: None,
            disability_periods: vec![prior],
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
    fn test_classification() {
        let d = |y, m| DateMy::new(y, m);
        assert_eq!(
            classify(d(1978, 6), d(1985, 1), BenefitType::OldAge),
            ConvertedMfbType::Pre1979Carry
        );
        assert_eq!(
            classify(d(1985, 1), d(1985, 10), BenefitType::Disability),
            ConvertedMfbType::WithinGapCarry
        );
        assert_eq!(
            classify(d(1979, 2), d(1980, 6), BenefitType::Disability),
            ConvertedMfbType::ReconvertedPre1980
        );
        assert_eq!(
            classify(d(1985, 1), d(1987, 1), BenefitType::Disability),
            ConvertedMfbType::DiMaximum
        );
        assert_eq!(
            classify(d(1987, 6), d(1992, 3), BenefitType::OldAge),
            ConvertedMfbType::RecomputedOldAgeSurvivor
        );
    }

    #[test]
    fn test_guarantee_carries_prior_pia() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let worker = worker_with_prior_di();
        let ctx = MethodContext::new(&worker, &params, &overlay);
        assert!(is_applicable(&ctx));
        let result = compute(&ctx).unwrap();
        // COLAs between 1987 and 1992 lift the carried PIA
        assert!(result.pia_ent > result.pia_elig[0]);
        assert!(result.mfb_ent >= result.pia_ent);
    }

    #[test]
    fn test_not_applicable_without_ceased_period() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let mut worker = worker_with_prior_di();
        worker.disability_periods[0].cessation = None;
        let ctx = MethodContext::new(&worker, &params, &overlay);
        assert!(!is_applicable(&ctx));
    }
}
