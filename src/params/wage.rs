//! National average wage index, wage bases, and year-of-coverage thresholds

/// First year of the embedded AWI series
const AWI_FIRST_YEAR: u16 = 1951;

/// National average wage index, 1951 onward. Values through the last
/// announced year are statutory data; later years are projected.
const AWI: [f64; 74] = [
    // 1951-1959
    2799.16, 2973.32, 3139.44, 3155.64, 3301.44, 3532.36, 3641.72, 3673.80, 3855.80,
    // 1960-1969
    4007.12, 4086.76, 4291.40, 4396.64, 4576.32, 4658.72, 4938.36, 5213.44, 5571.76, 5893.76,
    // 1970-1979
    6186.24, 6497.08, 7133.80, 7580.16, 8030.76, 8630.92, 9226.48, 9779.44, 10556.03, 11479.46,
    // 1980-1989
    12513.46, 13773.10, 14531.34, 15239.24, 16135.07, 16822.51, 17321.82, 18426.51, 19334.04,
    20099.55,
    // 1990-1999
    21027.98, 21811.60, 22935.42, 23132.67, 23753.53, 24705.66, 25913.90, 27426.00, 28861.44,
    30469.84,
    // 2000-2009
    32154.82, 32921.92, 33252.09, 34064.95, 35648.55, 36952.94, 38651.41, 40405.48, 41334.97,
    40711.61,
    // 2010-2019
    41673.83, 42979.61, 44321.67, 44888.16, 46481.52, 48098.63, 48642.15, 50321.89, 52145.80,
    54099.99,
    // 2020-2024
    55628.60, 60575.07, 63795.13, 66621.80, 69602.09,
];

/// Ultimate annual AWI growth rate used to project past the embedded series
const ULTIMATE_AWI_GROWTH: f64 = 0.035;

/// OASDI contribution-and-benefit bases by (first year, amount); each row
/// holds through the year before the next row
const WAGE_BASES: [(u16, f64); 54] = [
    (1937, 3000.0), (1951, 3600.0), (1955, 4200.0), (1959, 4800.0), (1966, 6600.0),
    (1968, 7800.0), (1972, 9000.0), (1973, 10800.0), (1974, 13200.0), (1975, 14100.0),
    (1976, 15300.0), (1977, 16500.0), (1978, 17700.0), (1979, 22900.0), (1980, 25900.0),
    (1981, 29700.0), (1982, 32400.0), (1983, 35700.0), (1984, 37800.0), (1985, 39600.0),
    (1986, 42000.0), (1987, 43800.0), (1988, 45000.0), (1989, 48000.0), (1990, 51300.0),
    (1991, 53400.0), (1992, 55500.0), (1993, 57600.0), (1994, 60600.0), (1995, 61200.0),
    (1996, 62700.0), (1997, 65400.0), (1998, 68400.0), (1999, 72600.0), (2000, 76200.0),
    (2001, 80400.0), (2002, 84900.0), (2003, 87000.0), (2004, 87900.0), (2005, 90000.0),
    (2006, 94200.0), (2007, 97500.0), (2008, 102000.0), (2009, 106800.0), (2012, 110100.0),
    (2013, 113700.0), (2014, 117000.0), (2015, 118500.0), (2017, 127200.0), (2018, 128400.0),
    (2019, 132900.0), (2020, 137700.0), (2021, 142800.0), (2022, 147000.0),
];

/// Later wage bases, continued (kept separate only to stay within array
/// literal readability)
const WAGE_BASES_RECENT: [(u16, f64); 4] =
    [(2023, 160200.0), (2024, 168600.0), (2025, 176100.0), (2026, 184500.0)];

/// Old-law (1977-act) wage bases, used only for year-of-coverage thresholds
const OLD_LAW_BASES: [(u16, f64); 48] = [
    (1979, 18900.0), (1980, 20400.0), (1981, 22200.0), (1982, 24300.0), (1983, 26700.0),
    (1984, 28200.0), (1985, 29700.0), (1986, 31500.0), (1987, 32700.0), (1988, 33600.0),
    (1989, 35700.0), (1990, 38100.0), (1991, 39600.0), (1992, 41400.0), (1993, 42900.0),
    (1994, 45000.0), (1995, 45300.0), (1996, 46500.0), (1997, 48600.0), (1998, 50700.0),
    (1999, 53700.0), (2000, 56700.0), (2001, 59700.0), (2002, 63000.0), (2003, 64500.0),
    (2004, 65100.0), (2005, 66900.0), (2006, 69900.0), (2007, 72600.0), (2008, 75900.0),
    (2009, 79200.0), (2012, 81900.0), (2013, 84300.0), (2014, 87000.0), (2015, 88200.0),
    (2017, 94500.0), (2018, 95400.0), (2019, 98700.0), (2020, 102300.0), (2021, 106200.0),
    (2022, 109200.0), (2023, 118800.0), (2024, 125100.0), (2025, 130800.0), (2026, 137100.0),
    (2027, 141900.0), (2028, 146700.0), (2029, 151800.0),
];

/// Average-wage and wage-base series with projection past the last known year
#[derive(Debug, Clone)]
pub struct WageSeries {
    awi_first_year: u16,
    awi: Vec<f64>,
    ultimate_growth: f64,
    /// Annual growth applied to wage bases past the embedded rows, when set
    base_growth: Option<f64>,
}

impl WageSeries {
    /// The embedded historical series
    pub fn historical() -> Self {
        Self {
            awi_first_year: AWI_FIRST_YEAR,
            awi: AWI.to_vec(),
            ultimate_growth: ULTIMATE_AWI_GROWTH,
            base_growth: None,
        }
    }

    /// Override the ultimate growth rate (law-change UltimateAwiGrowth)
    pub fn with_ultimate_growth(mut self, rate: f64) -> Self {
        self.ultimate_growth = rate;
        self
    }

    /// Project wage bases past the embedded rows at an annual growth rate
    /// (law-change WageBaseGrowth)
    pub fn with_base_growth(mut self, rate: f64) -> Self {
        self.base_growth = Some(rate);
        self
    }

    /// Last year with announced (non-projected) AWI
    pub fn last_known_year(&self) -> u16 {
        self.awi_first_year + self.awi.len() as u16 - 1
    }

    /// Average wage index for a year. Years before 1951 return the 1951
    /// value (pre-1951 earnings are never wage-indexed); years past the
    /// embedded series grow at the ultimate rate.
    pub fn awi(&self, year: u16) -> f64 {
        if year < self.awi_first_year {
            return self.awi[0];
        }
        let idx = (year - self.awi_first_year) as usize;
        if idx < self.awi.len() {
            return self.awi[idx];
        }
        let extra_years = (year - self.last_known_year()) as i32;
        self.awi[self.awi.len() - 1] * (1.0 + self.ultimate_growth).powi(extra_years)
    }

    /// Wage-indexing factor bringing earnings of `year` up to `index_year`
    pub fn index_factor(&self, year: u16, index_year: u16) -> f64 {
        if year >= index_year {
            1.0
        } else {
            self.awi(index_year) / self.awi(year)
        }
    }

    /// OASDI wage base for a year
    pub fn wage_base(&self, year: u16) -> f64 {
        let last = WAGE_BASES_RECENT[WAGE_BASES_RECENT.len() - 1].0;
        self.grown_base(year, last, step_lookup(year.min(last), &WAGE_BASES, &WAGE_BASES_RECENT))
    }

    /// Old-law wage base for a year (pre-1979 it equals the regular base)
    pub fn old_law_base(&self, year: u16) -> f64 {
        if year < 1979 {
            self.wage_base(year)
        } else {
            let last = OLD_LAW_BASES[OLD_LAW_BASES.len() - 1].0;
            self.grown_base(year, last, step_lookup(year.min(last), &OLD_LAW_BASES, &[]))
        }
    }

    fn grown_base(&self, year: u16, last_embedded: u16, base: f64) -> f64 {
        match self.base_growth {
            Some(rate) if year > last_embedded => {
                base * (1.0 + rate).powi((year - last_embedded) as i32)
            }
            _ => base,
        }
    }
}

fn step_lookup(year: u16, table: &[(u16, f64)], cont: &[(u16, f64)]) -> f64 {
    let mut value = table[0].1;
    for &(from, amount) in table.iter().chain(cont.iter()) {
        if year >= from {
            value = amount;
        } else {
            break;
        }
    }
    value
}

/// Earnings thresholds for crediting a year of coverage, used by the
/// special-minimum and WEP computations
#[derive(Debug, Clone, Copy)]
pub struct YocThresholds;

impl YocThresholds {
    /// Threshold for crediting one year of coverage in `year`:
    /// 25% of the wage base through 1978, 25% of the old-law base 1979-1990,
    /// 15% of the old-law base thereafter
    pub fn threshold(wages: &WageSeries, year: u16) -> f64 {
        if year < 1979 {
            0.25 * wages.wage_base(year)
        } else if year <= 1990 {
            0.25 * wages.old_law_base(year)
        } else {
            0.15 * wages.old_law_base(year)
        }
    }

    /// Years of coverage credited for total pre-1951 earnings: one year per
    /// $900, at most 14
    pub fn pre_1951_years(total_pre_1951: f64) -> u32 {
        ((total_pre_1951 / 900.0).floor() as u32).min(14)
    }
}
