//! PIA-table method for pre-1979 eligibility: a non-indexed average monthly
//! wage looked up in the statutory table of the act in force

use log::debug;

use crate::compute::cola::FIRST_AUTOMATIC_YEAR;
use crate::compute::period::{ComputationPeriod, PeriodKind};
use crate::compute::rounding::dime_up;
use crate::error::Result;
use crate::lawchange::LawChangeId;
use crate::params::{act_table_for, TableLookup};
use super::{CpiYears, MethodContext, MethodKind, MethodResult};

pub fn is_applicable(ctx: &MethodContext) -> bool {
    ctx.elig_year() < 1979
        && ctx.worker.earnings.last_year() >= 1951
        && !ctx
            .overlay
            .is_effective(LawChangeId::NoPiaTable, ctx.elig_year(), ctx.ben_year())
}

pub fn compute(ctx: &MethodContext) -> Result<MethodResult> {
    let worker = ctx.worker;
    let elig_year = ctx.elig_year();
    let ben_year = ctx.ben_year();
    let period = ComputationPeriod::compute(worker, ctx.overlay, PeriodKind::Standard);

    let ame = compute_ame(ctx, period.n);
    // Tables froze with the 1977 act; later benefit dates use the last table
    // plus automatic increases
    let table_date = worker.benefit_date.min(crate::worker::DateMy::new(1979, 1));
    let table = act_table_for(table_date);
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
    let mut result = MethodResult::new(MethodKind::PiaTable, cpi);
    result.table_number = Some(table.act.table_number());

    // Automatic increases start with 1979 regardless of the (earlier)
    // eligibility year
    let engine = ctx.cola_engine();
    result.pia_elig = vec![pia];
    result.pia_ent = engine.apply_colas_elig(
        &mut result.pia_elig,
        FIRST_AUTOMATIC_YEAR,
        worker.benefit_date,
        elig_year,
    );
    result.mfb_elig = vec![mfb];
    result.mfb_ent = engine.apply_colas_elig(
        &mut result.mfb_elig,
        FIRST_AUTOMATIC_YEAR,
        worker.benefit_date,
        elig_year,
    );

    debug!(
        "pia-table worker={}: n={} ame={:.0} table={} pia={:.2}",
        worker.worker_id,
        period.n,
        ame,
        table.act.table_number(),
        result.pia_ent
    );
    Ok(result)
}

/// Non-indexed average monthly earnings over the highest N years after 1950
fn compute_ame(ctx: &MethodContext, n: u32) -> f64 {
    let worker = ctx.worker;
    let last_year = worker.earnings.last_year().min(worker.benefit_date.year);

    let mut annual: Vec<f64> = (1951..=last_year)
        .map(|year| worker.earnings.get(year))
        .collect();
    annual.sort_by(|a, b| b.total_cmp(a));

    let total: f64 = annual.iter().take(n as usize).sum();
    (total / (n as f64 * 12.0)).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lawchange::LawChangeOverlay;
    use crate::params::Params;
    use crate::worker::{BenefitType, DateMy, EarningsRecord, Sex, WorkerRecord};
    use chrono::NaiveDate;

    fn table_worker(benefit: DateMy) -> WorkerRecord {
        let mut earnings = EarningsRecord::new(1951);
        for year in 1951..benefit.year {
            earnings.set(year, 3600.0);
        }
        WorkerRecord {
            worker_id: 30,
            birth_date: NaiveDate::from_ymd_opt((benefit.year - 65) as i32, 3, 1).unwrap(),
            sex: Sex::Male,
            benefit_type: BenefitType::OldAge,
            entitlement: benefit,
            benefit_date: benefit,
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
    fn test_applicable_only_pre_1979_eligibility() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let w1970 = table_worker(DateMy::new(1970, 5));
        assert!(is_applicable(&MethodContext::new(&w1970, &params, &overlay)));
        let w1985 = table_worker(DateMy::new(1985, 5));
        assert!(!is_applicable(&MethodContext::new(&w1985, &params, &overlay)));
    }

    #[test]
    fn test_lookup_within_table() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        let worker = table_worker(DateMy::new(1970, 5));
        let result = compute(&MethodContext::new(&worker, &params, &overlay)).unwrap();
        assert!(result.pia_ent > 0.0);
        assert!(result.mfb_ent >= result.pia_ent);
        assert_eq!(result.table_number, Some(6)); // 1969 act
        // No automatic increases before 1975
        assert_eq!(result.pia_elig.len(), 1);
    }

    #[test]
    fn test_late_benefit_date_gets_automatic_increases() {
        let params = Params::present_law();
        let overlay = LawChangeOverlay::present_law();
        // Eligible 1977, claims in 1981: two increase years fold in
        let mut worker = table_worker(DateMy::new(1981, 3));
        worker.birth_date = NaiveDate::from_ymd_opt(1915, 3, 1).unwrap();
        let result = compute(&MethodContext::new(&worker, &params, &overlay)).unwrap();
        assert!(result.pia_elig.len() > 1);
        assert!(result.pia_ent > result.pia_elig[0]);
    }
}
