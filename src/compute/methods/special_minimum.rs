//! Special minimum PIA for long-service low earners: a flat dollar amount
//! per year of coverage beyond ten, up to thirty

use log::debug;

use crate::compute::cola::FIRST_AUTOMATIC_YEAR;
use crate::error::Result;
use crate::lawchange::LawChangeId;
use super::{CpiYears, MethodContext, MethodKind, MethodResult};

/// Years of coverage before any special-minimum credit accrues
const BASE_YEARS: u32 = 10;

/// Creditable years beyond the base
const MAX_EXCESS_YEARS: u32 = 20;

/// Dollars per excess year, 1979 level
const AMOUNT_1979: f64 = 11.50;

/// Dollars per excess year for benefit dates before 1979
const AMOUNT_1973: f64 = 8.50;

pub fn is_applicable(ctx: &MethodContext) -> bool {
    !ctx.worker.totalized
        && ctx.worker.benefit_date.year >= 1973
        && !ctx
            .overlay
            .is_effective(LawChangeId::NoSpecialMin, ctx.elig_year(), ctx.ben_year())
}

pub fn compute(ctx: &MethodContext) -> Result<MethodResult> {
    let worker = ctx.worker;
    let elig_year = ctx.elig_year();
    let ben_year = ctx.ben_year();

    let base_years = ctx
        .overlay
        .effective(LawChangeId::SpecialMinYocThreshold, elig_year, ben_year)
        .and_then(|e| e.amount())
        .map(|a| a as u32)
        .unwrap_or(BASE_YEARS);
    let max_excess = ctx
        .overlay
        .effective(LawChangeId::SpecialMinMaxYears, elig_year, ben_year)
        .and_then(|e| e.amount())
        .map(|a| (a as u32).saturating_sub(base_years))
        .unwrap_or(MAX_EXCESS_YEARS);
    let excess = ctx
        .years_of_coverage()
        .saturating_sub(base_years)
        .min(max_excess);

    let amount = ctx
        .overlay
        .effective(LawChangeId::SpecialMinAmount, elig_year, ben_year)
        .and_then(|e| e.amount())
        .unwrap_or(if ben_year >= 1979 { AMOUNT_1979 } else { AMOUNT_1973 });

    let pia = excess as f64 * amount;
    let mfb = pia * 1.5;

    let cpi = CpiYears::new(
        elig_year - 1,
        elig_year,
        worker.entitlement.year.max(elig_year),
        ben_year.max(elig_year),
    );
    let mut result = MethodResult::new(MethodKind::SpecialMinimum, cpi);

    let engine = ctx.cola_engine();
    result.pia_elig = vec![pia];
    result.pia_ent = engine.apply_colas_elig(
        &mut result.pia_elig,
        elig_year.max(FIRST_AUTOMATIC_YEAR),
        worker.benefit_date,
        elig_year,
    );
    result.mfb_elig = vec![mfb];
    result.mfb_ent = engine.apply_colas_elig(
        &mut result.mfb_elig,
        elig_year.max(FIRST_AUTOMATIC_YEAR),
        worker.benefit_date,
        elig_year,
    );

    debug!(
        "special-min worker={}: yoc={} excess={} pia={:.2}",
        worker.worker_id,
        ctx.years_of_coverage(),
        excess,
        result.pia_ent
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lawchange::{LawChangeEntry, LawChangeOverlay, PhaseType};
    use crate::params::Params;
    use crate::worker::{BenefitType, DateMy, EarningsRecord, Sex, WorkerRecord};
    use chrono::NaiveDate;

    fn long_service_worker() -> WorkerRecord {
        let mut earnings = EarningsRecord::new(1951);
        // Fifteen years above the coverage threshold
        for year in 1960..=1974 {
            earnings.set(year, 15_000.0);
        }
        WorkerRecord {
            worker_id: 40,
            birth_date: NaiveDate::from_ymd_opt(1917, 4, 2).unwrap(),
            sex: Sex::Female,
            benefit_type: BenefitType::OldAge,
            entitlement: DateMy::new(1979, 5),
            benefit_date: DateMy::new(1979, 5),
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
    fn test_five_excess_years() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let worker = long_service_worker();
        let ctx = MethodContext::new(&worker, &params, &overlay);
        assert!(is_applicable(&ctx));
        let result = compute(&ctx).unwrap();
        // 15 years of coverage: 5 excess years at $11.50
        assert!((result.pia_elig[0] - 57.50).abs() < 1e-9);
        assert!((result.mfb_elig[0] - 86.25).abs() < 1e-9);
    }

    #[test]
    fn test_amount_override() {
        let params = Params::present_law();
        let entry = LawChangeEntry {
            indicator: 1,
            start_year: 1979,
            end_year: 2100,
            phase: PhaseType::ByEligYear,
            amounts: vec![30.0],
            schedule: vec![],
        };
        let overlay =
            LawChangeOverlay::from_entries(1979, 2100, vec![(LawChangeId::SpecialMinAmount, entry)])
                .unwrap();
        let worker = long_service_worker();
        let ctx = MethodContext::new(&worker, &params, &overlay);
        let result = compute(&ctx).unwrap();
        // 5 excess years at the $30 override
        assert!((result.pia_elig[0] - 150.00).abs() < 1e-9);
    }

    #[test]
    fn test_totalized_excluded() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let mut worker = long_service_worker();
        worker.totalized = true;
        let ctx = MethodContext::new(&worker, &params, &overlay);
        assert!(!is_applicable(&ctx));
    }
}
