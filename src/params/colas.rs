//! Benefit-increase (COLA) history and catch-up increase tables

use std::collections::BTreeMap;

/// First year of automatic benefit increases
const COLA_FIRST_YEAR: u16 = 1975;

/// Annual benefit increases, percent, 1975 onward. The 1999 entry is the
/// as-announced 2.4; the PL 106-554 correction to 2.5 is applied by the COLA
/// engine based on the benefit date.
const COLAS: [f64; 51] = [
    // 1975-1979
    8.0, 6.4, 5.9, 6.5, 9.9,
    // 1980-1989
    14.3, 11.2, 7.4, 3.5, 3.5, 3.1, 1.3, 4.2, 4.0, 4.7,
    // 1990-1999
    5.4, 3.7, 3.0, 2.6, 2.8, 2.6, 2.9, 2.1, 1.3, 2.4,
    // 2000-2009
    3.5, 2.6, 1.4, 2.1, 2.7, 4.1, 3.3, 2.3, 5.8, 0.0,
    // 2010-2019
    0.0, 3.6, 1.7, 1.5, 1.7, 0.0, 0.3, 2.0, 2.8, 1.6,
    // 2020-2025
    1.3, 5.9, 8.7, 3.2, 2.5, 2.8,
];

/// The increase year whose announced value was corrected upward by 0.1
/// percentage point (PL 106-554)
pub const CORRECTED_INCREASE_YEAR: u16 = 1999;

/// Correction applies to benefits payable August 2001 or later
pub const CORRECTION_BENEFIT_YEAR: u16 = 2001;
pub const CORRECTION_BENEFIT_MONTH: u8 = 8;

/// Historical benefit-increase series
#[derive(Debug, Clone)]
pub struct ColaSeries {
    first_year: u16,
    increases: Vec<f64>,
}

impl ColaSeries {
    pub fn historical() -> Self {
        Self {
            first_year: COLA_FIRST_YEAR,
            increases: COLAS.to_vec(),
        }
    }

    /// Last year with an announced increase
    pub fn last_year(&self) -> u16 {
        self.first_year + self.increases.len() as u16 - 1
    }

    /// Announced increase for a year, percent. Years outside the series
    /// return 0 (no automatic increase before 1975; future years unknown).
    pub fn increase(&self, year: u16) -> f64 {
        if year < self.first_year {
            return 0.0;
        }
        self.increases
            .get((year - self.first_year) as usize)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Catch-up benefit increases: extra percentages applied in specific years,
/// keyed by the catch-up eligibility year that selects the applicable table.
/// Present law carries no catch-up increases; an overlay may supply them.
#[derive(Debug, Clone, Default)]
pub struct CatchupColas {
    /// catch-up eligibility year -> (increase year -> extra percent)
    tables: BTreeMap<u16, BTreeMap<u16, f64>>,
}

impl CatchupColas {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from (catchup_elig_year, increase_year, percent) triples
    pub fn from_triples(triples: &[(u16, u16, f64)]) -> Self {
        let mut tables: BTreeMap<u16, BTreeMap<u16, f64>> = BTreeMap::new();
        for &(elig, year, pct) in triples {
            tables.entry(elig).or_default().insert(year, pct);
        }
        Self { tables }
    }

    /// Extra increase for `year` under the table selected by `catchup_year`
    pub fn extra_increase(&self, catchup_year: u16, year: u16) -> f64 {
        self.tables
            .get(&catchup_year)
            .and_then(|t| t.get(&year))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_increases() {
        let c = ColaSeries::historical();
        assert_eq!(c.increase(1975), 8.0);
        assert_eq!(c.increase(1980), 14.3);
        assert_eq!(c.increase(1999), 2.4); // pre-correction value
        assert_eq!(c.increase(2009), 0.0);
        assert_eq!(c.increase(2022), 8.7);
    }

    #[test]
    fn test_outside_series_is_zero() {
        let c = ColaSeries::historical();
        assert_eq!(c.increase(1974), 0.0);
        assert_eq!(c.increase(c.last_year() + 1), 0.0);
    }

    #[test]
    fn test_catchup_lookup() {
        let catchup = CatchupColas::from_triples(&[
            (2030, 2032, 1.0),
            (2030, 2033, 1.0),
            (2031, 2033, 0.5),
        ]);
        assert_eq!(catchup.extra_increase(2030, 2032), 1.0);
        assert_eq!(catchup.extra_increase(2031, 2033), 0.5);
        assert_eq!(catchup.extra_increase(2031, 2032), 0.0);
        assert_eq!(catchup.extra_increase(2029, 2032), 0.0);
    }
}
