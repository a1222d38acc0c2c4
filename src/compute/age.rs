//! Retirement-age schedule and actuarial reduction / delayed retirement
//! credit factors

use chrono::Datelike;

use crate::lawchange::{LawChangeId, LawChangeOverlay};
use crate::worker::{DateMy, WorkerRecord};

/// Full retirement age in months above age 65 for a birth year, present law:
/// 65 through 1937, stepping by 2 months per year to 66 (1943-1954), then by
/// 2 months per year to 67 for 1960 and later
pub fn full_retirement_age_months(birth_year: u16, overlay: &LawChangeOverlay, elig_year: u16, ben_year: u16) -> u32 {
    if let Some(entry) = overlay.effective(LawChangeId::RetirementAgeSchedule, elig_year, ben_year) {
        // Schedule rows: (birth year, FRA in months over 65)
        if let Some(values) = entry.schedule_for(birth_year) {
            if let Some(&months) = values.first() {
                return 65 * 12 + months as u32;
            }
        }
    }
    let over_65: u32 = match birth_year {
        0..=1937 => 0,
        1938..=1942 => 2 * (birth_year - 1937) as u32,
        1943..=1954 => 12,
        1955..=1959 => 12 + 2 * (birth_year - 1954) as u32,
        _ => 24,
    };
    65 * 12 + over_65
}

/// Months between the worker's entitlement and full retirement age
/// (negative if entitled after FRA)
pub fn months_to_fra(worker: &WorkerRecord, overlay: &LawChangeOverlay) -> i32 {
    let fra_months = full_retirement_age_months(
        worker.birth_date.year() as u16,
        overlay,
        worker.eligibility_year(),
        worker.benefit_date.year,
    );
    let fra_date = add_months(
        DateMy::new(worker.birth_date.year() as u16, worker.birth_date.month() as u8),
        fra_months,
    );
    fra_date.months_since(worker.entitlement)
}

pub fn add_months(date: DateMy, months: u32) -> DateMy {
    let total = date.year as u32 * 12 + (date.month as u32 - 1) + months;
    DateMy::new((total / 12) as u16, (total % 12 + 1) as u8)
}

/// Old-age reduction factor for entitlement `months_early` before FRA:
/// 5/9 of 1% per month for the first 36 months, 5/12 of 1% beyond. The
/// monthly percentages are overridable as a [first 36, beyond] pair.
pub fn old_age_reduction(
    months_early: u32,
    overlay: &LawChangeOverlay,
    elig_year: u16,
    ben_year: u16,
) -> f64 {
    let (first_rate, later_rate) = overlay
        .effective(LawChangeId::ReductionFactors, elig_year, ben_year)
        .map(|e| (e.amounts[0] / 100.0, e.amounts[1] / 100.0))
        .unwrap_or((5.0 / 900.0, 5.0 / 1200.0));
    let first = months_early.min(36) as f64;
    let rest = months_early.saturating_sub(36) as f64;
    1.0 - first * first_rate - rest * later_rate
}

/// Widow(er) reduction: linear from 100% at FRA down to 71.5% at age 60
pub fn widow_reduction(months_early: u32, months_fra_to_60: u32) -> f64 {
    if months_fra_to_60 == 0 {
        return 1.0;
    }
    let frac = (months_early.min(months_fra_to_60)) as f64 / months_fra_to_60 as f64;
    1.0 - 0.285 * frac
}

/// Delayed retirement credit per month of delay past FRA, by birth cohort
/// (annual rate of 3% for pre-1925 cohorts stepping to 8% for 1943+)
pub fn drc_monthly_rate(birth_year: u16, overlay: &LawChangeOverlay, elig_year: u16, ben_year: u16) -> f64 {
    if let Some(entry) = overlay.effective(LawChangeId::DrcSchedule, elig_year, ben_year) {
        if let Some(pct) = entry.amount() {
            return pct / 100.0 / 12.0;
        }
    }
    let annual = match birth_year {
        0..=1924 => 0.03,
        1925..=1926 => 0.035,
        1927..=1928 => 0.04,
        1929..=1930 => 0.045,
        1931..=1932 => 0.05,
        1933..=1934 => 0.055,
        1935..=1936 => 0.06,
        1937..=1938 => 0.065,
        1939..=1940 => 0.07,
        1941..=1942 => 0.075,
        _ => 0.08,
    };
    annual / 12.0
}
