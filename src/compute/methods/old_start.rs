//! Old-start method: the 1939-act primary insurance benefit, converted to a
//! PIA and carried forward through the later acts
//!
//! Pre-1951 earnings arrive as a single lump sum, so they are imputed evenly
//! over 1937-1950 before averaging. The PIB formula and the conversion chart
//! live in `params::tables`.

use log::debug;

use crate::compute::period::{ComputationPeriod, PeriodKind};
use crate::compute::rounding::{dime_for, dime_up};
use crate::error::Result;
use crate::lawchange::LawChangeId;
use crate::params::tables::{
    PIB_BAND_FIRST, PIB_BAND_TOP, PIB_PCT_FIRST, PIB_PCT_SECOND,
};
use crate::params::{act_table_for, pib_to_pia, TableLookup};
use crate::worker::DateMy;
use super::{CpiYears, MethodContext, MethodKind, MethodResult};

/// Earnings creditable per imputed pre-1951 year
const PRE_1951_ANNUAL_MAX: f64 = 3000.0;

/// Earnings per increment year of the 1939-act formula
const INCREMENT_YEAR_EARNINGS: f64 = 1650.0;

/// Maximum increment years
const MAX_INCREMENT_YEARS: u32 = 14;

/// Last birth year automatically entitled to an old-start computation
const LAST_AUTOMATIC_BIRTH_YEAR: u16 = 1928;

/// Cumulative general benefit increases by the month they first applied.
/// The 1977 act restructured rather than raised, so the chain stops there.
const ERA_FACTORS: [(DateMy, f64); 7] = [
    (DateMy { year: 1954, month: 9 }, 1.13),
    (DateMy { year: 1959, month: 1 }, 1.07),
    (DateMy { year: 1965, month: 1 }, 1.07),
    (DateMy { year: 1968, month: 2 }, 1.13),
    (DateMy { year: 1970, month: 1 }, 1.15),
    (DateMy { year: 1971, month: 1 }, 1.10),
    (DateMy { year: 1972, month: 9 }, 1.20),
];

pub fn is_applicable(ctx: &MethodContext) -> bool {
    use chrono::Datelike;
    let worker = ctx.worker;
    let has_earnings = worker.earnings.total(1937, worker.benefit_date.year) > 0.0;
    (worker.pre_1951_total() > 0.0
        || (worker.birth_date.year() as u16 <= LAST_AUTOMATIC_BIRTH_YEAR && has_earnings))
        && !ctx
            .overlay
            .is_effective(LawChangeId::NoOldStart, ctx.elig_year(), ctx.ben_year())
}

pub fn compute(ctx: &MethodContext) -> Result<MethodResult> {
    let worker = ctx.worker;
    let elig_year = ctx.elig_year();
    let ben_year = ctx.ben_year();
    let period = ComputationPeriod::compute(worker, ctx.overlay, PeriodKind::OldStart);

    let amw = compute_amw(ctx, period.n);
    let mut pib = PIB_PCT_FIRST * amw.min(PIB_BAND_FIRST)
        + PIB_PCT_SECOND * (amw.min(PIB_BAND_TOP) - PIB_BAND_FIRST).max(0.0);
    let increments = increment_years(worker.pre_1951_total());
    pib *= 1.0 + 0.01 * increments as f64;

    // Convert to a 1952-chart PIA, then chain the general increases through
    // the month the first increase could apply
    let base_pia = pib_to_pia(pib);
    let factor_date = worker.benefit_date.min(DateMy::new(1979, 1));
    let mut pia = base_pia;
    for &(start, factor) in &ERA_FACTORS {
        if factor_date >= start {
            pia = dime_up(pia * factor);
        }
    }
    pia = dime_for(pia, worker.benefit_date);

    let table = act_table_for(factor_date);
    let mfb = mfb_for_pia(table, pia);

    let cpi = CpiYears::new(
        elig_year - 1,
        elig_year,
        worker.entitlement.year.max(elig_year),
        ben_year.max(elig_year),
    );
    let mut result = MethodResult::new(MethodKind::OldStart, cpi);
    result.table_number = Some(table.act.table_number());

    let engine = ctx.cola_engine();
    result.pia_elig = vec![pia];
    result.pia_ent =
        engine.apply_colas_elig(&mut result.pia_elig, elig_year, worker.benefit_date, elig_year);
    result.mfb_elig = vec![mfb];
    result.mfb_ent =
        engine.apply_colas_elig(&mut result.mfb_elig, elig_year, worker.benefit_date, elig_year);

    debug!(
        "old-start worker={}: amw={:.0} pib={:.2} incr={} pia={:.2}",
        worker.worker_id, amw, pib, increments, result.pia_ent
    );
    Ok(result)
}

/// Average monthly wage over the highest N years, with the pre-1951 lump sum
/// imputed evenly over 1937-1950
fn compute_amw(ctx: &MethodContext, n: u32) -> f64 {
    let worker = ctx.worker;
    let imputed = (worker.pre_1951_total() / 14.0).min(PRE_1951_ANNUAL_MAX);
    let last_year = worker.earnings.last_year().min(worker.benefit_date.year);

    let mut annual: Vec<f64> = (1937..=last_year)
        .map(|year| {
            if year <= 1950 {
                imputed
            } else {
                worker.earnings.get(year)
            }
        })
        .collect();
    annual.sort_by(|a, b| b.total_cmp(a));

    let total: f64 = annual.iter().take(n as usize).sum();
    (total / (n as f64 * 12.0)).floor()
}

/// Increment years: one percent of PIB per $1,650 of pre-1951 earnings,
/// at most fourteen
fn increment_years(pre_1951_total: f64) -> u32 {
    ((pre_1951_total / INCREMENT_YEAR_EARNINGS).floor() as u32).min(MAX_INCREMENT_YEARS)
}

/// The table MFB for a PIA: the first row whose PIA covers it, extended at
/// the top row's ratio above the chart
fn mfb_for_pia(table: &crate::params::ActTable, pia: f64) -> f64 {
    match table.lookup_by_pia(pia) {
        TableLookup::Found { mfb, .. } => mfb,
        TableLookup::AboveCeiling { top_pia, top_mfb, .. } => dime_up(pia * top_mfb / top_pia),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lawchange::LawChangeOverlay;
    use crate::params::Params;
    use crate::worker::{BenefitType, EarningsRecord, Sex, WorkerRecord};
    use chrono::NaiveDate;

    fn old_start_worker() -> WorkerRecord {
        let mut earnings = EarningsRecord::new(1937);
        earnings.set(1950, 14_000.0); // pre-1951 lump sum
        for year in 1951..=1964 {
            earnings.set(year, 2400.0);
        }
        WorkerRecord {
            worker_id: 20,
            birth_date: NaiveDate::from_ymd_opt(1903, 6, 10).unwrap(),
            sex: Sex::Female,
            benefit_type: BenefitType::OldAge,
            entitlement: DateMy::new(1965, 7),
            benefit_date: DateMy::new(1965, 7),
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
    fn test_increment_years() {
        assert_eq!(increment_years(0.0), 0);
        assert_eq!(increment_years(1649.0), 0);
        assert_eq!(increment_years(3300.0), 2);
        assert_eq!(increment_years(50_000.0), 14);
    }

    #[test]
    fn test_applicable_with_pre_1951_earnings() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let worker = old_start_worker();
        let ctx = MethodContext::new(&worker, &params, &overlay);
        assert!(is_applicable(&ctx));
    }

    #[test]
    fn test_compute_pre_1979_entitlement() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let worker = old_start_worker();
        let ctx = MethodContext::new(&worker, &params, &overlay);
        let result = compute(&ctx).unwrap();
        // Pre-1979 eligibility: no automatic increases fold in
        assert_eq!(result.pia_elig.len(), 1);
        assert!((result.pia_ent - result.pia_elig[0]).abs() < 1e-9);
        assert!(result.mfb_ent >= result.pia_ent);
        assert_eq!(result.table_number, Some(4)); // 1965 act
    }

    #[test]
    fn test_era_factors_monotone_in_date() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let early = old_start_worker();
        let mut late = old_start_worker();
        late.entitlement = DateMy::new(1973, 1);
        late.benefit_date = DateMy::new(1973, 1);
        let r1 = compute(&MethodContext::new(&early, &params, &overlay)).unwrap();
        let r2 = compute(&MethodContext::new(&late, &params, &overlay)).unwrap();
        assert!(r2.pia_ent > r1.pia_ent);
    }
}
