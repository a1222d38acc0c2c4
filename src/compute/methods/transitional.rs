//! Transitional guarantee of the 1977 amendments: workers reaching 62 in
//! 1979-1983 may use the 1977-act table on earnings through 1978, so the
//! formula switch cannot cut their benefit

use chrono::Datelike;
use log::debug;

use crate::compute::period::{ComputationPeriod, PeriodKind};
use crate::compute::rounding::dime_up;
use crate::error::Result;
use crate::lawchange::LawChangeId;
use crate::params::tables::{act_table_for, TableLookup};
use crate::worker::{BenefitType, DateMy};
use super::{CpiYears, MethodContext, MethodKind, MethodResult};

/// Last creditable earnings year under the guarantee
const LAST_EARNINGS_YEAR: u16 = 1978;

const FIRST_ELIG_YEAR: u16 = 1979;
const LAST_ELIG_YEAR: u16 = 1983;

pub fn is_applicable(ctx: &MethodContext) -> bool {
    let worker = ctx.worker;
    let elig = ctx.elig_year();
    let age_62_year = worker.birth_date.year() as u16 + 62;
    worker.benefit_type == BenefitType::OldAge
        && (FIRST_ELIG_YEAR..=LAST_ELIG_YEAR).contains(&age_62_year)
        && !worker.totalized
        && worker.earnings.total(1951, LAST_EARNINGS_YEAR) > 0.0
        && !ctx
            .overlay
            .is_effective(LawChangeId::NoTransitional, elig, ctx.ben_year())
}

pub fn compute(ctx: &MethodContext) -> Result<MethodResult> {
    let worker = ctx.worker;
    let elig_year = ctx.elig_year();
    let ben_year = ctx.ben_year();
    let period = ComputationPeriod::compute(worker, ctx.overlay, PeriodKind::Standard);

    // Average over the usual N, but with no earnings after 1978
    let mut annual: Vec<f64> = (1951..=LAST_EARNINGS_YEAR)
        .map(|year| worker.earnings.get(year))
        .collect();
    annual.sort_by(|a, b| b.total_cmp(a));
    let total: f64 = annual.iter().take(period.n as usize).sum();
    let ame = (total / (period.n as f64 * 12.0)).floor();

    // The December 1978 table, frozen: no later act replaces it here
    let table = act_table_for(DateMy::new(1979, 1));
    let (pia, mfb) = match table.lookup(ame) {
        TableLookup::Found { pia, mfb } => (pia, mfb),
        TableLookup::AboveCeiling { top_ame, top_pia, top_mfb } => (
            dime_up(ame * top_pia / top_ame),
            dime_up(ame * top_mfb / top_ame),
        ),
    };

    let cpi = CpiYears::new(
        elig_year - 1,
        elig_year,
        worker.entitlement.year.max(elig_year),
        ben_year.max(elig_year),
    );
    let mut result = MethodResult::new(MethodKind::TransitionalGuarantee, cpi);
    result.table_number = Some(table.act.table_number());

    let engine = ctx.cola_engine();
    result.pia_elig = vec![pia];
    result.pia_ent =
        engine.apply_colas_elig(&mut result.pia_elig, elig_year, worker.benefit_date, elig_year);
    result.mfb_elig = vec![mfb];
    result.mfb_ent =
        engine.apply_colas_elig(&mut result.mfb_elig, elig_year, worker.benefit_date, elig_year);

    debug!(
        "transitional worker={}: n={} ame={:.0} pia={:.2}",
        worker.worker_id, period.n, ame, result.pia_ent
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lawchange::LawChangeOverlay;
    use crate::params::Params;
    use crate::worker::{EarningsRecord, Sex, WorkerRecord};
    use chrono::NaiveDate;

    fn guarantee_worker(birth_year: i32) -> WorkerRecord {
        let elig = (birth_year + 62) as u16;
        let mut earnings = EarningsRecord::new(1951);
        for year in 1955..=1978 {
            earnings.set(year, 5000.0);
        }
        // Earnings after 1978 must not count under the guarantee
        earnings.set(elig, 20_000.0);
        WorkerRecord {
            worker_id: 60,
            birth_date: NaiveDate::from_ymd_opt(birth_year, 5, 5).unwrap(),
            sex: Sex::Female,
            benefit_type: BenefitType::OldAge,
            entitlement: DateMy::new(elig, 6),
            benefit_date: DateMy::new(elig, 6),
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
    fn test_cohort_window() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        for (birth, expected) in [(1916, false), (1917, true), (1921, true), (1922, false)] {
            let worker = guarantee_worker(birth);
            let ctx = MethodContext::new(&worker, &params, &overlay);
            assert_eq!(is_applicable(&ctx), expected, "birth year {}", birth);
        }
    }

    #[test]
    fn test_post_1978_earnings_ignored() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let with_late = guarantee_worker(1918);
        let mut without = guarantee_worker(1918);
        without.earnings.set(1980, 0.0);
        let r1 = compute(&MethodContext::new(&with_late, &params, &overlay)).unwrap();
        let r2 = compute(&MethodContext::new(&without, &params, &overlay)).unwrap();
        assert!((r1.pia_elig[0] - r2.pia_elig[0]).abs() < 1e-9);
    }

    #[test]
    fn test_uses_last_table() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let worker = guarantee_worker(1918);
        let result = compute(&MethodContext::new(&worker, &params, &overlay)).unwrap();
        assert_eq!(result.table_number, Some(9)); // 1977 act
    }
}
