//! Worker record data structures matching the claim input format

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PiaError, Result};
use super::earnings::EarningsRecord;
use super::family::Beneficiary;

/// First year for which covered earnings exist
pub const FIRST_EARNINGS_YEAR: u16 = 1937;

/// Sex of the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// Type of benefit being claimed on this record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenefitType {
    /// Old-age (retirement) benefit on the worker's own record
    OldAge,
    /// Disability insurance benefit
    Disability,
    /// Survivor benefit on a deceased worker's record
    Survivor,
}

/// A month-and-year date, the granularity at which entitlement and benefit
/// dates are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateMy {
    pub year: u16,
    /// 1-12
    pub month: u8,
}

impl DateMy {
    pub fn new(year: u16, month: u8) -> Self {
        debug_assert!((1..=12).contains(&month), "month out of range: {}", month);
        Self { year, month }
    }

    /// Months elapsed from `earlier` to `self` (negative if self is earlier)
    pub fn months_since(&self, earlier: DateMy) -> i32 {
        (self.year as i32 - earlier.year as i32) * 12 + (self.month as i32 - earlier.month as i32)
    }
}

impl std::fmt::Display for DateMy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// One period of disability: onset through cessation, with the waiting-period
/// start that controls the 1-for-5 dropout rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DisabilityPeriod {
    pub onset: NaiveDate,
    /// First month of the 5-month waiting period
    pub waiting_period_start: DateMy,
    /// Month disability ceased; None if still in force
    pub cessation: Option<DateMy>,
    /// First month of entitlement to DI benefits for this period
    pub entitlement: DateMy,
}

/// A worker's claim record: everything the engine needs to compute the PIA
/// and MFB for one claim. Immutable for the duration of a calculation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Unique worker identifier
    pub worker_id: u64,

    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub benefit_type: BenefitType,

    /// First month of entitlement for this claim
    pub entitlement: DateMy,

    /// Month the benefit is payable for (entitlement <= benefit_date)
    pub benefit_date: DateMy,

    /// Month of death, required for survivor claims
    pub death_date: Option<DateMy>,

    /// Disability periods, most recent last; at most two
    pub disability_periods: Vec<DisabilityPeriod>,

    /// Annual covered earnings, already limited to applicable wage bases
    pub earnings: EarningsRecord,

    /// Whether the claim uses totalized (combined US/foreign) coverage
    pub totalized: bool,

    /// Monthly pension from noncovered employment (0.0 = none); triggers WEP
    pub noncovered_pension: f64,

    /// Insured-status flags, pre-computed by the insured-status collaborator
    pub fully_insured: bool,
    pub quarters_of_coverage: u32,

    /// Years with an eligible child in care and earnings below the dropout
    /// threshold, for the child-care dropout method
    #[serde(default)]
    pub child_care_years: Vec<u16>,

    /// Widow(er)'s own birth date and entitlement, for reindexed-widow claims
    #[serde(default)]
    pub widow_birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub widow_entitlement: Option<DateMy>,

    /// Family members entitled on this record, for MFB apportionment
    #[serde(default)]
    pub family: Vec<Beneficiary>,
}

impl WorkerRecord {
    /// Year the worker attains a given age
    pub fn year_attains_age(&self, age: u16) -> u16 {
        self.birth_date.year() as u16 + age
    }

    /// Month-year the worker attains a given age
    pub fn date_attains_age(&self, age: u16) -> DateMy {
        DateMy::new(self.year_attains_age(age), self.birth_date.month() as u8)
    }

    /// Eligibility year for the claim, honoring the disability freeze: the
    /// earliest disability onset year for DI claims, the age-62 year for
    /// old-age, and the earlier of death and age 62 for survivors
    pub fn eligibility_year(&self) -> u16 {
        match self.benefit_type {
            BenefitType::OldAge => self.year_attains_age(62),
            BenefitType::Disability => self
                .disability_periods
                .first()
                .map(|p| p.onset.year() as u16)
                .unwrap_or_else(|| self.year_attains_age(62)),
            BenefitType::Survivor => {
                let age62 = self.year_attains_age(62);
                match self.death_date {
                    Some(d) => age62.min(d.year),
                    None => age62,
                }
            }
        }
    }

    /// Eligibility year ignoring any prior disability freeze: the onset year
    /// of the current (most recent) disability period
    pub fn eligibility_year_non_freeze(&self) -> u16 {
        self.disability_periods
            .last()
            .map(|p| p.onset.year() as u16)
            .unwrap_or_else(|| self.eligibility_year())
    }

    /// Most recent disability period, if any
    pub fn current_disability(&self) -> Option<&DisabilityPeriod> {
        self.disability_periods.last()
    }

    /// A disability period prior to the one supporting the current claim
    pub fn prior_disability(&self) -> Option<&DisabilityPeriod> {
        if self.disability_periods.len() >= 2 {
            self.disability_periods.first()
        } else {
            None
        }
    }

    /// Total covered earnings before 1951, used by the old-start methods
    pub fn pre_1951_total(&self) -> f64 {
        (FIRST_EARNINGS_YEAR..1951).map(|y| self.earnings.get(y)).sum()
    }

    /// Whether the worker has any covered earnings before 1951
    pub fn has_pre_1951_earnings(&self) -> bool {
        self.pre_1951_total() > 0.0
    }

    /// Validate the record before any method runs. Every check reports the
    /// offending field and the bound it violated.
    pub fn validate(&self) -> Result<()> {
        let err = |field: &'static str, value: String, constraint: &'static str| {
            Err(PiaError::InvalidInput {
                worker_id: self.worker_id,
                field,
                value,
                constraint,
            })
        };

        let birth_year = self.birth_date.year();
        if !(1850..=2100).contains(&birth_year) {
            return err("birth_date", self.birth_date.to_string(), "year must be in 1850..=2100");
        }
        if self.entitlement.year < FIRST_EARNINGS_YEAR || self.entitlement.year > 2100 {
            return err("entitlement", self.entitlement.to_string(), "year must be in 1937..=2100");
        }
        if self.benefit_date < self.entitlement {
            return err("benefit_date", self.benefit_date.to_string(), "must not precede entitlement");
        }
        if (self.entitlement.year as i32) < birth_year {
            return err("entitlement", self.entitlement.to_string(), "precedes birth date");
        }
        if self.benefit_type == BenefitType::Survivor && self.death_date.is_none() {
            return err("death_date", "None".to_string(), "required for survivor claims");
        }
        if self.benefit_type == BenefitType::Disability && self.disability_periods.is_empty() {
            return err(
                "disability_periods",
                "[]".to_string(),
                "at least one period required for disability claims",
            );
        }
        if self.disability_periods.len() > 2 {
            return err(
                "disability_periods",
                self.disability_periods.len().to_string(),
                "at most two periods supported",
            );
        }
        for pair in self.disability_periods.windows(2) {
            if pair[1].onset <= pair[0].onset {
                return err(
                    "disability_periods",
                    format!("{} <= {}", pair[1].onset, pair[0].onset),
                    "periods must be in onset order",
                );
            }
        }
        for period in &self.disability_periods {
            let onset_my = DateMy::new(period.onset.year() as u16, period.onset.month() as u8);
            if period.entitlement < onset_my {
                return err(
                    "disability_periods",
                    period.entitlement.to_string(),
                    "entitlement precedes onset",
                );
            }
        }
        self.earnings.validate(self.worker_id)?;
        if self.noncovered_pension < 0.0 {
            return err(
                "noncovered_pension",
                self.noncovered_pension.to_string(),
                "must be non-negative",
            );
        }
        Ok(())
    }
}
