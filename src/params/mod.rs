//! Year-indexed statutory parameters: average wages, wage bases, benefit
//! increases, bend points, and the historical act tables
//!
//! Everything here is loaded once per process and treated as immutable.
//! Lookups are pure per (year, overlay) pair and safe to memoize.

mod wage;
pub mod colas;
mod bendpoints;
pub mod tables;

use crate::lawchange::{LawChangeEntry, LawChangeId, LawChangeOverlay};

pub use wage::{WageSeries, YocThresholds};
pub use colas::{ColaSeries, CatchupColas};
pub use bendpoints::{pia_bend_points, pia_percentages, mfb_bend_points, mfb_percentages};
pub use tables::{ActTable, TableLookup, act_table_for, pib_to_pia};

/// Container for all statutory parameters used by a calculation run
#[derive(Debug, Clone)]
pub struct Params {
    pub wages: WageSeries,
    pub colas: ColaSeries,
    pub catchup: CatchupColas,
}

impl Params {
    /// Present-law parameters with the embedded historical series
    pub fn present_law() -> Self {
        Self {
            wages: WageSeries::historical(),
            colas: ColaSeries::historical(),
            catchup: CatchupColas::empty(),
        }
    }

    /// Apply overlay entries that reshape whole parameter series rather
    /// than individual claim values: the ultimate AWI growth rate, projected
    /// wage-base growth, and the catch-up increase table
    pub fn with_overlay(mut self, overlay: &LawChangeOverlay) -> Self {
        fn active(overlay: &LawChangeOverlay, id: LawChangeId) -> Option<&LawChangeEntry> {
            overlay.entry(id).filter(|e| e.indicator > 0)
        }
        if let Some(rate) =
            active(overlay, LawChangeId::UltimateAwiGrowth).and_then(|e| e.amount())
        {
            self.wages = self.wages.with_ultimate_growth(rate / 100.0);
        }
        if let Some(rate) = active(overlay, LawChangeId::WageBaseGrowth).and_then(|e| e.amount()) {
            self.wages = self.wages.with_base_growth(rate / 100.0);
        }
        if let Some(entry) = active(overlay, LawChangeId::CatchupColas) {
            // Schedule rows key the catch-up eligibility year; values hold
            // the extra percentages for consecutive years from the entry's
            // start year
            let mut triples = Vec::new();
            for row in &entry.schedule {
                for (i, &pct) in row.values.iter().enumerate() {
                    triples.push((row.year, entry.start_year + i as u16, pct));
                }
            }
            self.catchup = CatchupColas::from_triples(&triples);
        }
        self
    }
}
