//! Year-indexed annual earnings series

use serde::{Deserialize, Serialize};

use crate::error::{PiaError, Result};
use super::record::FIRST_EARNINGS_YEAR;

/// A worker's annualized covered-earnings history. Amounts are stored by
/// calendar year and have already been limited to the applicable wage bases
/// by the upstream earnings collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsRecord {
    first_year: u16,
    amounts: Vec<f64>,
}

impl EarningsRecord {
    /// Create an empty record starting at `first_year` (1937 at the earliest)
    pub fn new(first_year: u16) -> Self {
        Self {
            first_year: first_year.max(FIRST_EARNINGS_YEAR),
            amounts: Vec::new(),
        }
    }

    /// Build from a slice of (year, amount) pairs
    pub fn from_pairs(pairs: &[(u16, f64)]) -> Self {
        let first = pairs
            .iter()
            .map(|&(y, _)| y)
            .min()
            .unwrap_or(FIRST_EARNINGS_YEAR);
        let mut rec = Self::new(first);
        for &(year, amount) in pairs {
            rec.set(year, amount);
        }
        rec
    }

    pub fn first_year(&self) -> u16 {
        self.first_year
    }

    /// Last year with a stored amount (first_year - 1 if empty)
    pub fn last_year(&self) -> u16 {
        if self.amounts.is_empty() {
            self.first_year - 1
        } else {
            self.first_year + self.amounts.len() as u16 - 1
        }
    }

    /// Earnings for a year; 0.0 outside the stored window
    pub fn get(&self, year: u16) -> f64 {
        if year < self.first_year {
            return 0.0;
        }
        self.amounts
            .get((year - self.first_year) as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Set earnings for a year, growing the window as needed
    pub fn set(&mut self, year: u16, amount: f64) {
        if year < self.first_year {
            // Extend backwards
            let shift = (self.first_year - year) as usize;
            let mut new_amounts = vec![0.0; shift];
            new_amounts.append(&mut self.amounts);
            self.amounts = new_amounts;
            self.first_year = year;
        }
        let idx = (year - self.first_year) as usize;
        if idx >= self.amounts.len() {
            self.amounts.resize(idx + 1, 0.0);
        }
        self.amounts[idx] = amount;
    }

    /// Iterate (year, amount) over the stored window
    pub fn iter(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.amounts
            .iter()
            .enumerate()
            .map(move |(i, &amt)| (self.first_year + i as u16, amt))
    }

    /// Sum of earnings over an inclusive year range
    pub fn total(&self, from: u16, through: u16) -> f64 {
        (from..=through).map(|y| self.get(y)).sum()
    }

    pub(crate) fn validate(&self, worker_id: u64) -> Result<()> {
        if self.first_year < FIRST_EARNINGS_YEAR {
            return Err(PiaError::InvalidInput {
                worker_id,
                field: "earnings.first_year",
                value: self.first_year.to_string(),
                constraint: "earnings cannot precede 1937",
            });
        }
        for (year, amount) in self.iter() {
            if amount < 0.0 || !amount.is_finite() {
                return Err(PiaError::InvalidInput {
                    worker_id,
                    field: "earnings",
                    value: format!("{} in {}", amount, year),
                    constraint: "amounts must be finite and non-negative",
                });
            }
        }
        Ok(())
    }
}
