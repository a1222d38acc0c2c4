//! Cost-of-living propagation from an eligibility year to a benefit date
//!
//! Increases are an ordered fold: each year's increased amount is written
//! back into the series and the next year's increase compounds on it.
//! Applying years out of order would change the dime roundings, so the fold
//! order is part of the contract.

use log::debug;

use crate::lawchange::{LawChangeId, LawChangeOverlay};
use crate::params::{CatchupColas, ColaSeries};
use crate::params::colas::{
    CORRECTED_INCREASE_YEAR, CORRECTION_BENEFIT_MONTH, CORRECTION_BENEFIT_YEAR,
};
use crate::worker::DateMy;
use super::age::add_months;
use super::rounding::dime_for;

/// No automatic increases apply for eligibility before 1979 under the
/// wage-indexed law; earlier methods take increase-inclusive table values
pub const FIRST_AUTOMATIC_YEAR: u16 = 1979;

/// Increases were effective for June before 1983 and for December after
pub const DECEMBER_EFFECTIVE_FIRST_YEAR: u16 = 1983;

/// COLA propagation engine
#[derive(Debug, Clone, Copy)]
pub struct ColaEngine<'a> {
    pub colas: &'a ColaSeries,
    pub catchup: &'a CatchupColas,
    pub overlay: &'a LawChangeOverlay,
}

impl<'a> ColaEngine<'a> {
    pub fn new(
        colas: &'a ColaSeries,
        catchup: &'a CatchupColas,
        overlay: &'a LawChangeOverlay,
    ) -> Self {
        Self { colas, catchup, overlay }
    }

    /// Month a given year's increase first affects benefits
    pub fn effective_date(year: u16) -> DateMy {
        if year >= DECEMBER_EFFECTIVE_FIRST_YEAR {
            DateMy::new(year, 12)
        } else {
            DateMy::new(year, 6)
        }
    }

    /// Apply benefit increases to `series` in strictly increasing year order.
    ///
    /// `series[0]` is the seed amount; one entry is appended per applied
    /// increase year, starting with `first_year`. Returns the final amount.
    /// For `first_year` before 1979 the series is untouched and the seed is
    /// returned unchanged.
    pub fn apply_colas_elig(
        &self,
        series: &mut Vec<f64>,
        first_year: u16,
        benefit_date: DateMy,
        catchup_year: u16,
    ) -> f64 {
        assert!(!series.is_empty(), "series must carry a seed amount");
        let seed = series[0];
        if first_year < FIRST_AUTOMATIC_YEAR {
            return seed;
        }

        let mut amount = seed;
        for year in first_year..=benefit_date.year {
            let effective = self.delayed_effective_date(year, first_year);
            if effective > benefit_date {
                break;
            }
            let pct = self.increase_percent(year, first_year, benefit_date);
            if pct != 0.0 {
                amount = dime_for(amount * (1.0 + pct / 100.0), effective);
            }
            let extra = self.catchup.extra_increase(catchup_year, year);
            if extra != 0.0 {
                amount = dime_for(amount * (1.0 + extra / 100.0), effective);
            }
            series.push(amount);
            debug!("cola {}: {:.2}% -> {:.2}", year, pct, amount);
        }
        amount
    }

    /// Effective month of a year's increase, shifted by any law-change delay
    fn delayed_effective_date(&self, year: u16, elig_year: u16) -> DateMy {
        let base = Self::effective_date(year);
        match self
            .overlay
            .effective(LawChangeId::ColaDelay, elig_year, year)
            .and_then(|e| e.amount())
        {
            Some(months) if months > 0.0 => add_months(base, months as u32),
            _ => base,
        }
    }

    /// The increase percentage for one year, after the announced-value
    /// correction and any law-change adjustment
    fn increase_percent(&self, year: u16, elig_year: u16, benefit_date: DateMy) -> f64 {
        let mut pct = self.colas.increase(year);

        // PL 106-554: the corrected increase applies to later benefit dates
        if year == CORRECTED_INCREASE_YEAR
            && benefit_date >= DateMy::new(CORRECTION_BENEFIT_YEAR, CORRECTION_BENEFIT_MONTH)
        {
            pct += 0.1;
        }

        if let Some(entry) = self.overlay.effective(LawChangeId::ColaFraction, elig_year, year) {
            if let Some(frac) = entry.amount() {
                pct *= frac / 100.0;
            }
        }
        if let Some(entry) = self.overlay.effective(LawChangeId::ColaCap, elig_year, year) {
            if let Some(cap) = entry.amount() {
                pct = pct.min(cap);
            }
        }
        if let Some(entry) = self.overlay.effective(LawChangeId::ColaOneTime, elig_year, year) {
            if year == entry.start_year {
                pct += entry.amount().unwrap_or(0.0);
            }
        }
        pct
    }
}
