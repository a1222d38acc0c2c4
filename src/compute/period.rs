//! Computation period: elapsed years, dropout years, and the countable-years
//! count N for a claim

use chrono::Datelike;
use log::debug;

use crate::lawchange::{LawChangeId, LawChangeOverlay};
use crate::worker::{BenefitType, DateMy, WorkerRecord};

/// Dropout years allowed since the 1954 amendments
const FULL_DROPOUT: u32 = 5;

/// First month of entitlement for which the 5-year dropout applies
const DROPOUT_1954_START: DateMy = DateMy { year: 1954, month: 9 };

/// Disability waiting periods beginning after this month use the 1-for-5
/// dropout rule of the 1980 amendments
const ONE_FOR_FIVE_START: DateMy = DateMy { year: 1980, month: 6 };

/// Maximum extra dropout years for child care
const CHILD_CARE_MAX_EXTRA: u32 = 3;

/// How the period is being computed, which shifts the base year and dropout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    /// Standard new-start period from 1950
    Standard,
    /// Old-start period from 1936
    OldStart,
    /// Disability period using the non-freeze eligibility year
    NonFreeze,
    /// Standard period enlarged by child-care dropout years
    ChildCare { extra: u32 },
}

/// The derived averaging period for a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputationPeriod {
    pub base_year: u16,
    pub n_elapsed: u32,
    pub n_drop: u32,
    /// Elapsed years excluded because they fall wholly within a period of
    /// disability (the freeze)
    pub di_years: u32,
    /// Countable computation years
    pub n: u32,
}

impl ComputationPeriod {
    /// Derive the period for a claim
    pub fn compute(
        worker: &WorkerRecord,
        overlay: &LawChangeOverlay,
        kind: PeriodKind,
    ) -> ComputationPeriod {
        let elig_year = match kind {
            PeriodKind::NonFreeze => worker.eligibility_year_non_freeze(),
            _ => worker.eligibility_year(),
        };
        let ben_year = worker.benefit_date.year;
        let birth_year = worker.birth_date.year() as u16;

        let base_year = match kind {
            PeriodKind::OldStart => 1936,
            _ => 1950,
        };

        // First elapsed year: later of the base year and the age-21 year
        let first_elapsed = (birth_year + 21).max(base_year);

        // Last elapsed year: year before eligibility, capped at the death
        // year - 1 for survivors
        let mut last_elapsed = elig_year.saturating_sub(1);
        if worker.benefit_type == BenefitType::Survivor {
            if let Some(death) = worker.death_date {
                last_elapsed = last_elapsed.min(death.year.saturating_sub(1));
            }
        }
        // Historical rule: old-start elapsed years run through 1960 at the
        // latest, whatever the eligibility year
        if kind == PeriodKind::OldStart {
            last_elapsed = last_elapsed.min(1960);
        }

        let gross_elapsed = last_elapsed.saturating_sub(first_elapsed) as u32;

        // Freeze: elapsed years wholly within a disability period are
        // excluded (skipped for the non-freeze variant)
        let di_years = if kind == PeriodKind::NonFreeze {
            0
        } else {
            count_frozen_years(worker, first_elapsed, last_elapsed)
        };
        let n_elapsed = gross_elapsed.saturating_sub(di_years).max(2);

        // Dropout count
        let mut n_drop = if worker.entitlement < DROPOUT_1954_START {
            0
        } else {
            FULL_DROPOUT
        };
        if uses_one_for_five(worker) {
            n_drop = (n_elapsed / 5).min(FULL_DROPOUT);
        }
        if let PeriodKind::ChildCare { extra } = kind {
            let extra = extra.min(child_care_cap(overlay, elig_year, ben_year));
            n_drop += extra;
            // Combined disability-claim dropout never exceeds 5
            if worker.benefit_type == BenefitType::Disability {
                n_drop = n_drop.min(FULL_DROPOUT);
            }
            n_drop = n_drop.min(n_elapsed.saturating_sub(2));
        }
        if overlay.is_effective(LawChangeId::AllElapsedYears, elig_year, ben_year) {
            n_drop = 0;
        } else if let Some(entry) =
            overlay.effective(LawChangeId::DropoutReduction, elig_year, ben_year)
        {
            if let Some(count) = entry.amount() {
                n_drop = n_drop.min(count as u32);
            }
        }

        let mut n = n_elapsed.saturating_sub(n_drop);

        // A fixed-length averaging period replaces the elapsed-minus-dropout
        // count outright
        if let Some(entry) =
            overlay.effective(LawChangeId::AimeComputationYears, elig_year, ben_year)
        {
            if let Some(count) = entry.amount() {
                n = count as u32;
            }
        }

        // Pre-1958 old-age claims override N outright
        if worker.benefit_type == BenefitType::OldAge && elig_year < 1958 && elig_year > 1953 {
            n = (elig_year - 1953) as u32;
        }

        // Countable years never drop below 2
        let n = n.max(2);

        let period = ComputationPeriod { base_year, n_elapsed, n_drop, di_years, n };
        debug!(
            "period worker={} kind={:?}: elapsed {}..{} -> {:?}",
            worker.worker_id, kind, first_elapsed, last_elapsed, period
        );
        debug_assert!(period.n >= 2);
        period
    }
}

/// Whether the claim's dropout uses the 1-for-5 rule: a disability claim
/// whose waiting period began after June 1980
fn uses_one_for_five(worker: &WorkerRecord) -> bool {
    worker.benefit_type == BenefitType::Disability
        && worker
            .current_disability()
            .map(|p| p.waiting_period_start > ONE_FOR_FIVE_START)
            .unwrap_or(false)
}

fn child_care_cap(overlay: &LawChangeOverlay, elig_year: u16, ben_year: u16) -> u32 {
    overlay
        .effective(LawChangeId::ChildCareMaxYears, elig_year, ben_year)
        .and_then(|e| e.amount())
        .map(|a| a as u32)
        .unwrap_or(CHILD_CARE_MAX_EXTRA)
}

/// Count calendar years in [first, last] lying wholly inside a disability
/// period (onset in or before January, cessation in or after December)
fn count_frozen_years(worker: &WorkerRecord, first: u16, last: u16) -> u32 {
    let mut count = 0;
    for year in first..=last {
        for period in &worker.disability_periods {
            let onset_covers = period.onset.year() < year as i32
                || (period.onset.year() == year as i32 && period.onset.month() == 1);
            let cessation_covers = match period.cessation {
                None => true,
                Some(c) => c.year > year || (c.year == year && c.month == 12),
            };
            if onset_covers && cessation_covers {
                count += 1;
                break;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::{DisabilityPeriod, EarningsRecord, Sex};
    use chrono::NaiveDate;

    fn worker(birth_year: i32, benefit_type: BenefitType, entitlement: DateMy) -> WorkerRecord {
        WorkerRecord {
            worker_id: 1,
            birth_date: NaiveDate::from_ymd_opt(birth_year, 3, 2).unwrap(),
            sex: Sex::Male,
            benefit_type,
            entitlement,
            benefit_date: entitlement,
            death_date: None,
            disability_periods: vec![],
            earnings: EarningsRecord::new(1951),
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

    fn pl() -> LawChangeOverlay {
        LawChangeOverlay::present_law()
    }

    #[test]
    fn test_standard_old_age_period() {
        // Born 1918: age 21 in 1939 -> base 1950; elig 1980, elapsed 1950..1979 = 29
        let w = worker(1918, BenefitType::OldAge, DateMy::new(1980, 1));
        let p = ComputationPeriod::compute(&w, &pl(), PeriodKind::Standard);
        assert_eq!(p.base_year, 1950);
        assert_eq!(p.n_elapsed, 29);
        assert_eq!(p.n_drop, 5);
        assert_eq!(p.n, 24);
        assert_eq!(p.n, p.n_elapsed - p.n_drop);
    }

    #[test]
    fn test_n_clamped_to_two() {
        // Born 1960, disabled at 25 (elig 1985): elapsed 1981..1984 = 3
        let mut w = worker(1960, BenefitType::Disability, DateMy::new(1986, 1));
        w.disability_periods = vec![DisabilityPeriod {
            onset: NaiveDate::from_ymd_opt(1985, 6, 1).unwrap(),
            waiting_period_start: DateMy::new(1985, 7),
            cessation: None,
            entitlement: DateMy::new(1986, 1),
        }];
        let p = ComputationPeriod::compute(&w, &pl(), PeriodKind::Standard);
        assert!(p.n >= 2);
        // 1-for-5: elapsed 3 -> 0 dropout
        assert_eq!(p.n_drop, 0);
        assert_eq!(p.n, 3);
    }

    #[test]
    fn test_one_for_five_caps_at_five() {
        // Born 1930, onset 1988 at 58: elapsed 1951..1987 = 36 -> 36/5 = 7 -> 5
        let mut w = worker(1930, BenefitType::Disability, DateMy::new(1988, 12));
        w.disability_periods = vec![DisabilityPeriod {
            onset: NaiveDate::from_ymd_opt(1988, 2, 1).unwrap(),
            waiting_period_start: DateMy::new(1988, 3),
            cessation: None,
            entitlement: DateMy::new(1988, 12),
        }];
        let p = ComputationPeriod::compute(&w, &pl(), PeriodKind::Standard);
        assert_eq!(p.n_drop, 5);
    }

    #[test]
    fn test_pre_1958_old_age_override() {
        // Born 1894: age 62 in 1956 -> n = 1956 - 1953 = 3
        let w = worker(1894, BenefitType::OldAge, DateMy::new(1956, 6));
        let p = ComputationPeriod::compute(&w, &pl(), PeriodKind::Standard);
        assert_eq!(p.n, 3);

        // The earliest cohorts would give n = 1 or 2; the floor of 2 holds
        let w = worker(1892, BenefitType::OldAge, DateMy::new(1954, 10));
        let p = ComputationPeriod::compute(&w, &pl(), PeriodKind::Standard);
        assert_eq!(p.n, 2);
        let w = worker(1893, BenefitType::OldAge, DateMy::new(1955, 6));
        let p = ComputationPeriod::compute(&w, &pl(), PeriodKind::Standard);
        assert_eq!(p.n, 2);
    }

    #[test]
    fn test_old_start_elapsed_capped_at_1960() {
        let w = worker(1918, BenefitType::OldAge, DateMy::new(1980, 1));
        let old_start = ComputationPeriod::compute(&w, &pl(), PeriodKind::OldStart);
        // Age 21 in 1939 through 1960
        assert_eq!(old_start.n_elapsed, 21);
        let standard = ComputationPeriod::compute(&w, &pl(), PeriodKind::Standard);
        assert!(standard.n_elapsed > old_start.n_elapsed);
    }

    #[test]
    fn test_survivor_capped_at_death_year() {
        let mut w = worker(1930, BenefitType::Survivor, DateMy::new(1975, 6));
        w.death_date = Some(DateMy::new(1975, 5));
        let p = ComputationPeriod::compute(&w, &pl(), PeriodKind::Standard);
        // Elapsed 1951..1974 = 23
        assert_eq!(p.n_elapsed, 23);
    }

    #[test]
    fn test_frozen_years_excluded() {
        let mut w = worker(1920, BenefitType::OldAge, DateMy::new(1982, 1));
        w.disability_periods = vec![DisabilityPeriod {
            onset: NaiveDate::from_ymd_opt(1960, 1, 1).unwrap(),
            waiting_period_start: DateMy::new(1960, 2),
            cessation: Some(DateMy::new(1965, 12)),
            entitlement: DateMy::new(1960, 7),
        }];
        let standard = ComputationPeriod::compute(&w, &pl(), PeriodKind::Standard);
        assert_eq!(standard.di_years, 6); // 1960..=1965
        let plain = worker(1920, BenefitType::OldAge, DateMy::new(1982, 1));
        let no_freeze = ComputationPeriod::compute(&plain, &pl(), PeriodKind::Standard);
        assert_eq!(no_freeze.n_elapsed - standard.n_elapsed, 6);
    }

    #[test]
    fn test_all_elapsed_years_law_change() {
        use crate::lawchange::{LawChangeEntry, PhaseType};
        let mut overlay = pl();
        overlay
            .insert(
                LawChangeId::AllElapsedYears,
                LawChangeEntry {
                    indicator: 1,
                    start_year: 1970,
                    end_year: 2050,
                    phase: PhaseType::ByEligYear,
                    amounts: vec![],
                    schedule: vec![],
                },
            )
            .unwrap();
        let w = worker(1918, BenefitType::OldAge, DateMy::new(1980, 1));
        let p = ComputationPeriod::compute(&w, &overlay, PeriodKind::Standard);
        assert_eq!(p.n_drop, 0);
        assert_eq!(p.n, p.n_elapsed);
    }

    #[test]
    fn test_fixed_computation_years_law_change() {
        use crate::lawchange::{LawChangeEntry, PhaseType};
        let mut overlay = pl();
        overlay
            .insert(
                LawChangeId::AimeComputationYears,
                LawChangeEntry {
                    indicator: 1,
                    start_year: 1970,
                    end_year: 2050,
                    phase: PhaseType::ByEligYear,
                    amounts: vec![40.0],
                    schedule: vec![],
                },
            )
            .unwrap();
        let w = worker(1918, BenefitType::OldAge, DateMy::new(1980, 1));
        assert_eq!(ComputationPeriod::compute(&w, &pl(), PeriodKind::Standard).n, 24);
        assert_eq!(ComputationPeriod::compute(&w, &overlay, PeriodKind::Standard).n, 40);
    }
}
