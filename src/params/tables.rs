//! Historical act PIA/MFB conversion tables, 1952 through 1977 amendments
//!
//! These tables encode statute text and are embedded as literal data; the
//! engine only looks them up. Each row is (AME upper bound, PIA, MFB); an AME
//! above the last row's bound is extended by the caller using the benefit
//! formula of the act as amended (COLA-table extension).

use crate::worker::DateMy;

/// 1939-act primary insurance benefit formula constants, used by old-start
pub const PIB_PCT_FIRST: f64 = 0.40;
pub const PIB_BAND_FIRST: f64 = 50.0;
pub const PIB_PCT_SECOND: f64 = 0.10;
pub const PIB_BAND_TOP: f64 = 250.0;

/// Amendment acts with their own PIA/MFB tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Act {
    A1952,
    A1954,
    A1958,
    A1965,
    A1967,
    A1969,
    A1971,
    A1972,
    A1977,
}

impl Act {
    /// Table number reported in per-method results
    pub fn table_number(&self) -> u8 {
        match self {
            Act::A1952 => 1,
            Act::A1954 => 2,
            Act::A1958 => 3,
            Act::A1965 => 4,
            Act::A1967 => 5,
            Act::A1969 => 6,
            Act::A1971 => 7,
            Act::A1972 => 8,
            Act::A1977 => 9,
        }
    }
}

/// One act's conversion table
#[derive(Debug)]
pub struct ActTable {
    pub act: Act,
    /// (AME upper bound, PIA, MFB) in ascending AME order
    rows: &'static [(f64, f64, f64)],
}

/// Result of a table lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableLookup {
    /// AME fell within the table
    Found { pia: f64, mfb: f64 },
    /// AME exceeded the table ceiling; the top row is returned for extension
    AboveCeiling { top_ame: f64, top_pia: f64, top_mfb: f64 },
}

impl ActTable {
    /// Minimum PIA of the act (first row)
    pub fn minimum_pia(&self) -> f64 {
        self.rows[0].1
    }

    /// Table ceiling AME
    pub fn ceiling(&self) -> f64 {
        self.rows[self.rows.len() - 1].0
    }

    /// Look up the PIA/MFB for a rounded AME
    pub fn lookup(&self, ame: f64) -> TableLookup {
        for &(ame_max, pia, mfb) in self.rows {
            if ame <= ame_max {
                return TableLookup::Found { pia, mfb };
            }
        }
        let &(top_ame, top_pia, top_mfb) = self.rows.last().unwrap();
        TableLookup::AboveCeiling { top_ame, top_pia, top_mfb }
    }

    /// Look up by PIA instead of AME, for amounts converted from a PIB
    pub fn lookup_by_pia(&self, pia: f64) -> TableLookup {
        for &(_, row_pia, mfb) in self.rows {
            if pia <= row_pia {
                return TableLookup::Found { pia: row_pia, mfb };
            }
        }
        let &(top_ame, top_pia, top_mfb) = self.rows.last().unwrap();
        TableLookup::AboveCeiling { top_ame, top_pia, top_mfb }
    }
}

// Statutory tables, condensed to interval rows. Values within a row's AME
// interval pay the row's amounts.

static TABLE_1952: ActTable = ActTable {
    act: Act::A1952,
    rows: &[
        (54.0, 25.00, 37.50),
        (60.0, 28.40, 42.60),
        (80.0, 33.50, 50.30),
        (100.0, 39.10, 58.70),
        (120.0, 44.60, 66.90),
        (140.0, 50.10, 75.20),
        (160.0, 55.60, 83.40),
        (180.0, 61.10, 91.70),
        (200.0, 66.60, 99.90),
        (220.0, 70.90, 106.40),
        (240.0, 74.20, 111.30),
        (260.0, 77.60, 116.40),
        (280.0, 81.00, 121.50),
        (300.0, 85.00, 168.75),
    ],
};

static TABLE_1954: ActTable = ActTable {
    act: Act::A1954,
    rows: &[
        (54.0, 30.00, 45.00),
        (84.0, 35.60, 53.40),
        (110.0, 42.80, 64.20),
        (140.0, 50.70, 76.10),
        (170.0, 58.50, 87.80),
        (200.0, 66.40, 99.60),
        (230.0, 74.20, 120.00),
        (260.0, 81.40, 146.50),
        (290.0, 87.70, 168.00),
        (320.0, 92.80, 185.60),
        (350.0, 98.50, 200.00),
    ],
};

static TABLE_1958: ActTable = ActTable {
    act: Act::A1958,
    rows: &[
        (54.0, 33.00, 53.00),
        (84.0, 39.20, 58.80),
        (110.0, 47.10, 70.70),
        (140.0, 55.80, 83.70),
        (170.0, 64.40, 96.60),
        (200.0, 73.10, 120.00),
        (230.0, 81.60, 146.90),
        (260.0, 89.50, 179.00),
        (290.0, 96.50, 193.00),
        (320.0, 102.10, 204.20),
        (350.0, 108.30, 216.60),
        (400.0, 127.00, 254.00),
    ],
};

static TABLE_1965: ActTable = ActTable {
    act: Act::A1965,
    rows: &[
        (67.0, 44.00, 66.00),
        (100.0, 52.70, 79.10),
        (140.0, 63.90, 95.90),
        (180.0, 74.80, 112.20),
        (220.0, 85.60, 136.80),
        (260.0, 96.20, 172.00),
        (300.0, 106.30, 212.60),
        (340.0, 115.80, 231.60),
        (380.0, 124.60, 249.20),
        (420.0, 132.70, 265.40),
        (460.0, 140.60, 281.20),
        (500.0, 148.40, 296.80),
        (550.0, 168.00, 368.00),
    ],
};

static TABLE_1967: ActTable = ActTable {
    act: Act::A1967,
    rows: &[
        (74.0, 55.00, 82.50),
        (110.0, 64.90, 97.40),
        (150.0, 77.10, 115.70),
        (190.0, 89.00, 133.50),
        (230.0, 100.80, 161.30),
        (270.0, 112.40, 202.40),
        (310.0, 123.80, 247.60),
        (350.0, 134.70, 269.40),
        (390.0, 145.20, 290.40),
        (430.0, 155.20, 310.40),
        (470.0, 164.90, 329.80),
        (520.0, 176.60, 353.20),
        (580.0, 196.00, 392.00),
        (650.0, 218.00, 434.80),
    ],
};

static TABLE_1969: ActTable = ActTable {
    act: Act::A1969,
    rows: &[
        (74.0, 64.00, 96.00),
        (110.0, 74.60, 111.90),
        (150.0, 88.70, 133.10),
        (190.0, 102.40, 153.60),
        (230.0, 115.90, 185.50),
        (270.0, 129.30, 232.80),
        (310.0, 142.40, 284.80),
        (350.0, 154.90, 309.80),
        (390.0, 167.00, 334.00),
        (430.0, 178.50, 357.00),
        (470.0, 189.60, 379.20),
        (520.0, 203.10, 406.20),
        (580.0, 225.40, 450.80),
        (650.0, 250.70, 500.00),
    ],
};

static TABLE_1971: ActTable = ActTable {
    act: Act::A1971,
    rows: &[
        (74.0, 70.40, 105.60),
        (110.0, 82.10, 123.20),
        (150.0, 97.60, 146.40),
        (190.0, 112.60, 168.90),
        (230.0, 127.50, 204.00),
        (270.0, 142.20, 256.00),
        (310.0, 156.60, 313.20),
        (350.0, 170.40, 340.80),
        (390.0, 183.70, 367.40),
        (430.0, 196.40, 392.80),
        (470.0, 208.60, 417.20),
        (520.0, 223.40, 446.80),
        (580.0, 247.90, 495.80),
        (650.0, 275.80, 551.60),
        (750.0, 295.40, 590.80),
    ],
};

static TABLE_1972: ActTable = ActTable {
    act: Act::A1972,
    rows: &[
        (76.0, 84.50, 126.80),
        (110.0, 98.50, 147.80),
        (150.0, 117.10, 175.70),
        (190.0, 135.10, 202.70),
        (230.0, 153.00, 244.80),
        (270.0, 170.60, 307.10),
        (310.0, 187.90, 375.80),
        (350.0, 204.50, 409.00),
        (390.0, 220.40, 440.80),
        (430.0, 235.70, 471.40),
        (470.0, 250.30, 500.60),
        (520.0, 268.10, 536.20),
        (580.0, 297.50, 595.00),
        (650.0, 331.00, 662.00),
        (750.0, 354.50, 709.00),
        (850.0, 378.50, 741.80),
        (1000.0, 404.50, 707.90),
    ],
};

// December 1978 table: the 1972-act table carried forward through the
// automatic increases of 1975-1978. Used by the pre-1979 table method for
// entitlements in 1979 and later, and by the transitional guarantee.
static TABLE_1977: ActTable = ActTable {
    act: Act::A1977,
    rows: &[
        (76.0, 121.80, 182.70),
        (110.0, 141.90, 212.90),
        (150.0, 168.70, 253.10),
        (190.0, 194.70, 292.10),
        (230.0, 220.40, 352.70),
        (270.0, 245.80, 442.40),
        (310.0, 270.70, 541.40),
        (350.0, 294.60, 589.20),
        (390.0, 317.50, 635.00),
        (430.0, 339.60, 679.20),
        (470.0, 360.60, 721.20),
        (520.0, 386.30, 772.60),
        (580.0, 428.60, 857.20),
        (650.0, 476.90, 953.80),
        (750.0, 510.70, 1021.40),
        (850.0, 545.30, 1068.70),
        (950.0, 572.00, 1101.00),
        (1075.0, 597.20, 1096.30),
    ],
};

/// Literal era boundaries: the first benefit month each act's table controls
const ERA_STARTS: [(u16, u8, &Act); 9] = [
    (1952, 9, &Act::A1952),
    (1954, 9, &Act::A1954),
    (1959, 1, &Act::A1958),
    (1965, 1, &Act::A1965),
    (1968, 2, &Act::A1967),
    (1970, 1, &Act::A1969),
    (1971, 1, &Act::A1971),
    (1972, 9, &Act::A1972),
    (1979, 1, &Act::A1977),
];

/// The act table controlling a benefit date. Dates before September 1952 get
/// the 1952 table (the engine never computes table-method benefits earlier).
pub fn act_table_for(benefit_date: DateMy) -> &'static ActTable {
    let mut selected = &TABLE_1952;
    for &(year, month, act) in &ERA_STARTS {
        if benefit_date >= DateMy::new(year, month) {
            selected = table_of(*act);
        } else {
            break;
        }
    }
    selected
}

fn table_of(act: Act) -> &'static ActTable {
    match act {
        Act::A1952 => &TABLE_1952,
        Act::A1954 => &TABLE_1954,
        Act::A1958 => &TABLE_1958,
        Act::A1965 => &TABLE_1965,
        Act::A1967 => &TABLE_1967,
        Act::A1969 => &TABLE_1969,
        Act::A1971 => &TABLE_1971,
        Act::A1972 => &TABLE_1972,
        Act::A1977 => &TABLE_1977,
    }
}

/// Conversion chart from a 1939-act primary insurance benefit to a PIA,
/// per the 1958 amendments conversion table
static PIB_CONVERSION: [(f64, f64); 12] = [
    (16.20, 33.00),
    (17.00, 34.60),
    (18.00, 36.60),
    (19.00, 38.60),
    (20.00, 40.70),
    (22.00, 44.80),
    (24.00, 48.90),
    (26.00, 53.00),
    (30.00, 61.20),
    (35.00, 71.50),
    (40.00, 81.70),
    (45.60, 93.70),
];

/// Convert an old-start PIB to a PIA via the conversion chart. PIBs above the
/// chart convert at the top row's ratio.
pub fn pib_to_pia(pib: f64) -> f64 {
    for &(pib_max, pia) in &PIB_CONVERSION {
        if pib <= pib_max {
            return pia;
        }
    }
    let &(top_pib, top_pia) = PIB_CONVERSION.last().unwrap();
    (pib * top_pia / top_pib * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_era_selection() {
        assert_eq!(act_table_for(DateMy::new(1953, 6)).act, Act::A1952);
        assert_eq!(act_table_for(DateMy::new(1954, 8)).act, Act::A1952);
        assert_eq!(act_table_for(DateMy::new(1954, 9)).act, Act::A1954);
        assert_eq!(act_table_for(DateMy::new(1960, 1)).act, Act::A1958);
        assert_eq!(act_table_for(DateMy::new(1971, 6)).act, Act::A1971);
        assert_eq!(act_table_for(DateMy::new(1978, 12)).act, Act::A1972);
        assert_eq!(act_table_for(DateMy::new(1979, 1)).act, Act::A1977);
        assert_eq!(act_table_for(DateMy::new(1990, 1)).act, Act::A1977);
    }

    #[test]
    fn test_lookup_within_and_above() {
        let table = table_of(Act::A1958);
        match table.lookup(100.0) {
            TableLookup::Found { pia, mfb } => {
                assert_eq!(pia, 47.10);
                assert_eq!(mfb, 70.70);
            }
            other => panic!("unexpected: {:?}", other),
        }
        match table.lookup(1000.0) {
            TableLookup::AboveCeiling { top_ame, top_pia, .. } => {
                assert_eq!(top_ame, 400.0);
                assert_eq!(top_pia, 127.00);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_tables_are_monotonic() {
        for act in [
            Act::A1952, Act::A1954, Act::A1958, Act::A1965, Act::A1967,
            Act::A1969, Act::A1971, Act::A1972, Act::A1977,
        ] {
            let table = table_of(act);
            let mut prev_ame = 0.0;
            let mut prev_pia = 0.0;
            for &(ame_max, pia, _mfb) in table.rows {
                assert!(ame_max > prev_ame, "{:?} AME bounds not increasing", act);
                assert!(pia >= prev_pia, "{:?} PIA not monotone", act);
                prev_ame = ame_max;
                prev_pia = pia;
            }
        }
    }

    #[test]
    fn test_minimum_pias() {
        assert_eq!(table_of(Act::A1952).minimum_pia(), 25.00);
        assert_eq!(table_of(Act::A1958).minimum_pia(), 33.00);
        assert_eq!(table_of(Act::A1977).minimum_pia(), 121.80);
    }

    #[test]
    fn test_pib_conversion() {
        assert_eq!(pib_to_pia(15.0), 33.00); // below the chart: chart minimum
        assert_eq!(pib_to_pia(25.0), 53.00);
        // Above the chart: top-row ratio
        let converted = pib_to_pia(50.0);
        assert!(converted > 93.70);
    }
}
