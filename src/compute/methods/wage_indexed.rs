//! Wage-indexed (AIME) method of the 1977 amendments, plus its non-freeze
//! and child-care-dropout variants
//!
//! Earnings are indexed to the second year before eligibility, the highest N
//! are averaged into the AIME, and the bend-point formula produces the PIA.
//! The windfall elimination provision and the law-change formula overrides
//! both act here.

use log::debug;

use crate::compute::period::{ComputationPeriod, PeriodKind};
use crate::compute::rounding::{dime_down, dime_for};
use crate::error::Result;
use crate::lawchange::{LawChangeId, LawChangeOverlay};
use crate::params::{mfb_bend_points, mfb_percentages, pia_bend_points, pia_percentages};
use crate::worker::{BenefitType, DateMy};
use super::{CpiYears, MethodContext, MethodKind, MethodResult};

/// First eligibility year the WEP can apply to
pub const WEP_FIRST_ELIG_YEAR: u16 = 1986;

/// Variant of the wage-indexed computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Variant {
    Standard,
    NonFreeze,
    ChildCare { extra: u32 },
}

pub fn is_applicable(ctx: &MethodContext) -> bool {
    ctx.elig_year() > 1978 && ctx.worker.earnings.last_year() >= 1951
}

pub fn is_applicable_non_freeze(ctx: &MethodContext) -> bool {
    ctx.worker.benefit_type == BenefitType::Disability
        && ctx.worker.prior_disability().is_some()
        && ctx.worker.eligibility_year_non_freeze() > 1978
}

pub fn is_applicable_child_care(ctx: &MethodContext) -> bool {
    is_applicable(ctx)
        && !ctx.worker.child_care_years.is_empty()
        && ctx
            .overlay
            .is_effective(LawChangeId::ChildCareDropout, ctx.elig_year(), ctx.ben_year())
}

pub fn compute(ctx: &MethodContext) -> Result<MethodResult> {
    compute_variant(ctx, Variant::Standard)
}

pub fn compute_non_freeze(ctx: &MethodContext) -> Result<MethodResult> {
    compute_variant(ctx, Variant::NonFreeze)
}

pub fn compute_child_care(ctx: &MethodContext) -> Result<MethodResult> {
    let extra = qualifying_child_care_years(ctx);
    compute_variant(ctx, Variant::ChildCare { extra })
}

/// Child-care years count only when earnings that year were below the
/// year-of-coverage threshold
fn qualifying_child_care_years(ctx: &MethodContext) -> u32 {
    ctx.worker
        .child_care_years
        .iter()
        .filter(|&&year| {
            ctx.worker.earnings.get(year)
                < crate::params::YocThresholds::threshold(&ctx.params.wages, year)
        })
        .count() as u32
}

pub(super) fn compute_variant(ctx: &MethodContext, variant: Variant) -> Result<MethodResult> {
    let worker = ctx.worker;
    let (kind, period_kind, elig_year) = match variant {
        Variant::Standard => (MethodKind::WageIndexed, PeriodKind::Standard, ctx.elig_year()),
        Variant::NonFreeze => (
            MethodKind::WageIndexedNonFreeze,
            PeriodKind::NonFreeze,
            worker.eligibility_year_non_freeze(),
        ),
        Variant::ChildCare { extra } => (
            MethodKind::ChildCareDropout,
            PeriodKind::ChildCare { extra },
            ctx.elig_year(),
        ),
    };
    let ben_year = ctx.ben_year();
    let period = ComputationPeriod::compute(worker, ctx.overlay, period_kind);

    let aime = compute_aime(ctx, elig_year, period.n);
    let bends = pia_bend_points(elig_year, &ctx.params.wages, ctx.overlay, ben_year);
    let pcts = pia_percentages(elig_year, ben_year, ctx.overlay);

    let raw_pia = formula_pia(aime, &bends, &pcts);
    // Initial PIA rounds to the dime under the rule in force at eligibility
    let mut pia = dime_for(raw_pia, DateMy::new(elig_year, 1));
    let mut wep_applied = false;

    if wep_applies(ctx, elig_year) {
        let yoc = ctx.years_of_coverage();
        let first_pct = wep_first_percentage(yoc, ctx.overlay, elig_year, ben_year);
        let wep_pcts = [first_pct, pcts[1], pcts[2]];
        let wep_pia = dime_for(formula_pia(aime, &bends, &wep_pcts), DateMy::new(elig_year, 1));
        // Guarantee: the reduction never exceeds half the noncovered
        // pension (the fraction is overridable)
        let guarantee = ctx
            .overlay
            .effective(LawChangeId::WepGuaranteeChange, elig_year, ben_year)
            .and_then(|e| e.amount())
            .map(|p| p / 100.0)
            .unwrap_or(0.5);
        let floor = pia - worker.noncovered_pension * guarantee;
        let capped = wep_pia.max(dime_down(floor));
        if capped < pia {
            pia = capped;
            wep_applied = true;
        }
        debug!(
            "wep worker={}: yoc={} first_pct={:.2} pia {:.2}",
            worker.worker_id, yoc, first_pct, pia
        );
    }

    // MFB formula applies to the PIA at eligibility
    let mfb_bends = mfb_bend_points(elig_year, &ctx.params.wages, ctx.overlay, ben_year);
    let mfb_pcts = mfb_percentages(elig_year, ben_year, ctx.overlay);
    let mfb = dime_for(formula_mfb(pia, &mfb_bends, &mfb_pcts), DateMy::new(elig_year, 1));

    let cpi = CpiYears::new(
        elig_year - 1,
        elig_year,
        worker.entitlement.year.max(elig_year),
        ben_year.max(elig_year),
    );
    let mut result = MethodResult::new(kind, cpi);
    result.aime = Some(aime);
    result.wep_applied = wep_applied;

    let engine = ctx.cola_engine();
    result.pia_elig = vec![pia];
    result.pia_ent =
        engine.apply_colas_elig(&mut result.pia_elig, elig_year, worker.benefit_date, elig_year);
    result.mfb_elig = vec![mfb];
    result.mfb_ent =
        engine.apply_colas_elig(&mut result.mfb_elig, elig_year, worker.benefit_date, elig_year);

    debug!(
        "{:?} worker={}: n={} aime={:.0} pia={:.2} mfb={:.2}",
        kind, worker.worker_id, period.n, aime, result.pia_ent, result.mfb_ent
    );
    Ok(result)
}

/// Index earnings to two years before eligibility, take the highest N, and
/// average to whole dollars per month
pub(super) fn compute_aime(ctx: &MethodContext, elig_year: u16, n: u32) -> f64 {
    let worker = ctx.worker;
    let index_year = elig_year - 2;
    let last_computation_year = worker
        .earnings
        .last_year()
        .min(worker.benefit_date.year);

    let mut indexed: Vec<f64> = (1951..=last_computation_year)
        .map(|year| worker.earnings.get(year) * ctx.params.wages.index_factor(year, index_year))
        .collect();
    indexed.sort_by(|a, b| b.total_cmp(a));

    let total: f64 = indexed.iter().take(n as usize).sum();
    (total / (n as f64 * 12.0)).floor()
}

/// Apply the three-band PIA formula
fn formula_pia(aime: f64, bends: &[f64; 2], pcts: &[f64; 3]) -> f64 {
    let band1 = aime.min(bends[0]);
    let band2 = (aime.min(bends[1]) - bends[0]).max(0.0);
    let band3 = (aime - bends[1]).max(0.0);
    pcts[0] * band1 + pcts[1] * band2 + pcts[2] * band3
}

/// Apply the four-band MFB formula to the PIA
fn formula_mfb(pia: f64, bends: &[f64; 3], pcts: &[f64; 4]) -> f64 {
    let band1 = pia.min(bends[0]);
    let band2 = (pia.min(bends[1]) - bends[0]).max(0.0);
    let band3 = (pia.min(bends[2]) - bends[1]).max(0.0);
    let band4 = (pia - bends[2]).max(0.0);
    pcts[0] * band1 + pcts[1] * band2 + pcts[2] * band3 + pcts[3] * band4
}

fn wep_applies(ctx: &MethodContext, elig_year: u16) -> bool {
    ctx.worker.noncovered_pension > 0.0
        && elig_year >= WEP_FIRST_ELIG_YEAR
        && !ctx
            .overlay
            .is_effective(LawChangeId::WepRepeal, elig_year, ctx.ben_year())
}

/// WEP first-band percentage: 40% with fewer than 21 years of coverage,
/// restored linearly to the full 90% through 30. The phase-in window is
/// overridable as a [low, high] year-of-coverage pair.
fn wep_first_percentage(yoc: u32, overlay: &LawChangeOverlay, elig_year: u16, ben_year: u16) -> f64 {
    let (low, high) = overlay
        .effective(LawChangeId::WepYearsPhaseIn, elig_year, ben_year)
        .map(|e| (e.amounts[0] as u32, e.amounts[1] as u32))
        .unwrap_or((20, 30));
    let step = 0.50 / (high - low) as f64;
    let pct = 0.40 + step * (yoc.saturating_sub(low) as f64);
    pct.min(0.90)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lawchange::{LawChangeEntry, LawChangeOverlay, PhaseType};
    use crate::params::Params;
    use crate::worker::{EarningsRecord, Sex, WorkerRecord};
    use chrono::NaiveDate;

    fn steady_worker() -> WorkerRecord {
        // Born 1917-01-15: age 62 in 1979, eligible 1979
        let mut earnings = EarningsRecord::new(1951);
        for year in 1951..=1978 {
            earnings.set(year, 6000.0_f64.min(3000.0 + 150.0 * (year - 1951) as f64));
        }
        WorkerRecord {
            worker_id: 10,
            birth_date: NaiveDate::from_ymd_opt(1917, 1, 15).unwrap(),
            sex: Sex::Male,
            benefit_type: BenefitType::OldAge,
            entitlement: DateMy::new(1979, 2),
            benefit_date: DateMy::new(1979, 2),
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
    fn test_formula_bands() {
        // AIME 500 with 1979 bend points: 0.9*180 + 0.32*320 = 264.40
        let pia = formula_pia(500.0, &[180.0, 1085.0], &[0.90, 0.32, 0.15]);
        assert!((pia - 264.4).abs() < 1e-9);
        // Above the second bend
        let pia_high = formula_pia(1200.0, &[180.0, 1085.0], &[0.90, 0.32, 0.15]);
        assert!((pia_high - (162.0 + 289.6 + 17.25)).abs() < 1e-9);
    }

    #[test]
    fn test_wep_percentage_phase_in() {
        let pl = LawChangeOverlay::present_law();
        assert_eq!(wep_first_percentage(18, &pl, 1990, 1990), 0.40);
        assert_eq!(wep_first_percentage(20, &pl, 1990, 1990), 0.40);
        assert!((wep_first_percentage(25, &pl, 1990, 1990) - 0.65).abs() < 1e-12);
        assert_eq!(wep_first_percentage(30, &pl, 1990, 1990), 0.90);
        assert_eq!(wep_first_percentage(35, &pl, 1990, 1990), 0.90);
    }

    #[test]
    fn test_wep_phase_in_window_override() {
        // Window moved to 15..=25: full restoration already at 25 years
        let entry = LawChangeEntry {
            indicator: 1,
            start_year: 1986,
            end_year: 2100,
            phase: PhaseType::ByEligYear,
            amounts: vec![15.0, 25.0],
            schedule: vec![],
        };
        let overlay = LawChangeOverlay::from_entries(
            1986,
            2100,
            vec![(LawChangeId::WepYearsPhaseIn, entry)],
        )
        .unwrap();
        assert_eq!(wep_first_percentage(15, &overlay, 1990, 1990), 0.40);
        assert!((wep_first_percentage(20, &overlay, 1990, 1990) - 0.65).abs() < 1e-12);
        assert_eq!(wep_first_percentage(25, &overlay, 1990, 1990), 0.90);
    }

    #[test]
    fn test_compute_1979_eligible() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let worker = steady_worker();
        let ctx = MethodContext::new(&worker, &params, &overlay);
        assert!(is_applicable(&ctx));
        let result = compute(&ctx).unwrap();
        assert!(result.pia_ent > 0.0);
        assert!(result.mfb_ent >= result.pia_ent);
        assert_eq!(result.cpi.elig, 1979);
        assert!(result.aime.unwrap() > 0.0);
        assert!(!result.wep_applied);
    }

    #[test]
    fn test_wep_reduces_but_respects_pension_guarantee() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let mut worker = steady_worker();
        // Shift eligibility to 1990 and add a small noncovered pension
        worker.birth_date = NaiveDate::from_ymd_opt(1928, 1, 15).unwrap();
        worker.entitlement = DateMy::new(1990, 2);
        worker.benefit_date = DateMy::new(1990, 2);
        worker.noncovered_pension = 10.0;
        let ctx = MethodContext::new(&worker, &params, &overlay);

        let with_wep = compute(&ctx).unwrap();
        let mut no_pension = worker.clone();
        no_pension.noncovered_pension = 0.0;
        let ctx2 = MethodContext::new(&no_pension, &params, &overlay);
        let without = compute(&ctx2).unwrap();

        // Reduction capped at half the $10 pension
        let seed_with = with_wep.pia_elig[0];
        let seed_without = without.pia_elig[0];
        assert!(seed_with < seed_without);
        assert!(seed_without - seed_with <= 5.0 + 1e-9);
        assert!(with_wep.wep_applied);
    }

    #[test]
    fn test_not_applicable_before_1979() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let mut worker = steady_worker();
        worker.birth_date = NaiveDate::from_ymd_opt(1910, 1, 15).unwrap(); // age 62 in 1972
        let ctx = MethodContext::new(&worker, &params, &overlay);
        assert!(!is_applicable(&ctx));
    }
}
