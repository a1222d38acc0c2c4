//! Law-change overlay: independent policy proposals layered over present law
//!
//! A fixed, closed set of named entries. Each entry is off (indicator 0) or
//! selects a variant of the change (indicator > 0) over a year range. Entries
//! are loaded once per run and are read-only during calculation; methods and
//! the COLA engine consult them through typed accessors, never by downcasting.

pub mod loader;

pub use loader::{load_overlay, parse_overlay};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PiaError, Result};

/// Maximum steps allowed in a declining-percentage schedule
pub const MAX_DECLINE_STEPS: usize = 10;

/// The closed set of law-change entries. Position is fixed; absence of an
/// entry (or indicator 0) means present law for that item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LawChangeId {
    // PIA formula
    BendPointSchedule,
    FormulaPercentages,
    DecliningPercentages,
    NewStartFormula,
    MinimumPia,
    MaximumPia,
    // MFB formula
    MfbBendPoints,
    MfbPercentages,
    MfbFixedRatio,
    // COLA behavior
    ColaCap,
    ColaFraction,
    ColaOneTime,
    CatchupColas,
    ColaDelay,
    // Special minimum
    SpecialMinAmount,
    SpecialMinMaxYears,
    SpecialMinYocThreshold,
    // Method disablement
    NoOldStart,
    NoPiaTable,
    NoSpecialMin,
    NoTransitional,
    NoReindexedWidow,
    NoFrozenMin,
    NoDibGuarantee,
    // Dropout / averaging period
    ChildCareDropout,
    ChildCareMaxYears,
    DropoutReduction,
    AllElapsedYears,
    AimeComputationYears,
    // WEP
    WepRepeal,
    WepYearsPhaseIn,
    WepGuaranteeChange,
    // DI maximum
    DiMaxRepeal,
    DiMaxPercents,
    // Ages and factors
    RetirementAgeSchedule,
    ReductionFactors,
    DrcSchedule,
    // Indexing bases
    WageBaseGrowth,
    PriceIndexing,
    UltimateAwiGrowth,
}

impl LawChangeId {
    /// Every entry in fixed order
    pub const ALL: [LawChangeId; 40] = [
        LawChangeId::BendPointSchedule,
        LawChangeId::FormulaPercentages,
        LawChangeId::DecliningPercentages,
        LawChangeId::NewStartFormula,
        LawChangeId::MinimumPia,
        LawChangeId::MaximumPia,
        LawChangeId::MfbBendPoints,
        LawChangeId::MfbPercentages,
        LawChangeId::MfbFixedRatio,
        LawChangeId::ColaCap,
        LawChangeId::ColaFraction,
        LawChangeId::ColaOneTime,
        LawChangeId::CatchupColas,
        LawChangeId::ColaDelay,
        LawChangeId::SpecialMinAmount,
        LawChangeId::SpecialMinMaxYears,
        LawChangeId::SpecialMinYocThreshold,
        LawChangeId::NoOldStart,
        LawChangeId::NoPiaTable,
        LawChangeId::NoSpecialMin,
        LawChangeId::NoTransitional,
        LawChangeId::NoReindexedWidow,
        LawChangeId::NoFrozenMin,
        LawChangeId::NoDibGuarantee,
        LawChangeId::ChildCareDropout,
        LawChangeId::ChildCareMaxYears,
        LawChangeId::DropoutReduction,
        LawChangeId::AllElapsedYears,
        LawChangeId::AimeComputationYears,
        LawChangeId::WepRepeal,
        LawChangeId::WepYearsPhaseIn,
        LawChangeId::WepGuaranteeChange,
        LawChangeId::DiMaxRepeal,
        LawChangeId::DiMaxPercents,
        LawChangeId::RetirementAgeSchedule,
        LawChangeId::ReductionFactors,
        LawChangeId::DrcSchedule,
        LawChangeId::WageBaseGrowth,
        LawChangeId::PriceIndexing,
        LawChangeId::UltimateAwiGrowth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LawChangeId::BendPointSchedule => "BendPointSchedule",
            LawChangeId::FormulaPercentages => "FormulaPercentages",
            LawChangeId::DecliningPercentages => "DecliningPercentages",
            LawChangeId::NewStartFormula => "NewStartFormula",
            LawChangeId::MinimumPia => "MinimumPia",
            LawChangeId::MaximumPia => "MaximumPia",
            LawChangeId::MfbBendPoints => "MfbBendPoints",
            LawChangeId::MfbPercentages => "MfbPercentages",
            LawChangeId::MfbFixedRatio => "MfbFixedRatio",
            LawChangeId::ColaCap => "ColaCap",
            LawChangeId::ColaFraction => "ColaFraction",
            LawChangeId::ColaOneTime => "ColaOneTime",
            LawChangeId::CatchupColas => "CatchupColas",
            LawChangeId::ColaDelay => "ColaDelay",
            LawChangeId::SpecialMinAmount => "SpecialMinAmount",
            LawChangeId::SpecialMinMaxYears => "SpecialMinMaxYears",
            LawChangeId::SpecialMinYocThreshold => "SpecialMinYocThreshold",
            LawChangeId::NoOldStart => "NoOldStart",
            LawChangeId::NoPiaTable => "NoPiaTable",
            LawChangeId::NoSpecialMin => "NoSpecialMin",
            LawChangeId::NoTransitional => "NoTransitional",
            LawChangeId::NoReindexedWidow => "NoReindexedWidow",
            LawChangeId::NoFrozenMin => "NoFrozenMin",
            LawChangeId::NoDibGuarantee => "NoDibGuarantee",
            LawChangeId::ChildCareDropout => "ChildCareDropout",
            LawChangeId::ChildCareMaxYears => "ChildCareMaxYears",
            LawChangeId::DropoutReduction => "DropoutReduction",
            LawChangeId::AllElapsedYears => "AllElapsedYears",
            LawChangeId::AimeComputationYears => "AimeComputationYears",
            LawChangeId::WepRepeal => "WepRepeal",
            LawChangeId::WepYearsPhaseIn => "WepYearsPhaseIn",
            LawChangeId::WepGuaranteeChange => "WepGuaranteeChange",
            LawChangeId::DiMaxRepeal => "DiMaxRepeal",
            LawChangeId::DiMaxPercents => "DiMaxPercents",
            LawChangeId::RetirementAgeSchedule => "RetirementAgeSchedule",
            LawChangeId::ReductionFactors => "ReductionFactors",
            LawChangeId::DrcSchedule => "DrcSchedule",
            LawChangeId::WageBaseGrowth => "WageBaseGrowth",
            LawChangeId::PriceIndexing => "PriceIndexing",
            LawChangeId::UltimateAwiGrowth => "UltimateAwiGrowth",
        }
    }
}

/// Whether an entry's year range is tested against the eligibility year or
/// the benefit year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseType {
    /// Applies to workers newly eligible within the range
    ByEligYear,
    /// Applies to all benefits payable within the range
    Immediate,
}

impl Default for PhaseType {
    fn default() -> Self {
        PhaseType::ByEligYear
    }
}

/// Per-year values for schedule-type entries (bend points, percentages)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearValues {
    pub year: u16,
    pub values: Vec<f64>,
}

/// One law-change entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LawChangeEntry {
    /// 0 = off (present law); > 0 selects a variant of this change
    pub indicator: u32,
    pub start_year: u16,
    pub end_year: u16,
    #[serde(default)]
    pub phase: PhaseType,
    /// Scalar parameters, meaning depends on the entry
    #[serde(default)]
    pub amounts: Vec<f64>,
    /// Year-keyed schedules, meaning depends on the entry
    #[serde(default)]
    pub schedule: Vec<YearValues>,
}

impl LawChangeEntry {
    /// Effective for the given claim years?
    pub fn is_effective(&self, elig_year: u16, ben_year: u16) -> bool {
        if self.indicator == 0 {
            return false;
        }
        let year = match self.phase {
            PhaseType::ByEligYear => elig_year,
            PhaseType::Immediate => ben_year,
        };
        (self.start_year..=self.end_year).contains(&year)
    }

    /// First scalar parameter, if present
    pub fn amount(&self) -> Option<f64> {
        self.amounts.first().copied()
    }

    /// Schedule values for a given year (latest schedule year not after it)
    pub fn schedule_for(&self, year: u16) -> Option<&[f64]> {
        self.schedule
            .iter()
            .filter(|yv| yv.year <= year)
            .max_by_key(|yv| yv.year)
            .map(|yv| yv.values.as_slice())
    }
}

/// The full overlay: a read-only, typed map over the closed entry set, plus
/// the overall proposal span (replacing process-wide start/end-year statics)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LawChangeOverlay {
    /// First and last year any entry may take effect
    pub span_start: u16,
    pub span_end: u16,
    entries: BTreeMap<LawChangeId, LawChangeEntry>,
}

impl LawChangeOverlay {
    /// Present law: no entries active
    pub fn present_law() -> Self {
        Self::default()
    }

    /// Build an overlay from explicit entries, validating each
    pub fn from_entries(
        span_start: u16,
        span_end: u16,
        entries: Vec<(LawChangeId, LawChangeEntry)>,
    ) -> Result<Self> {
        let mut overlay = Self {
            span_start,
            span_end,
            entries: BTreeMap::new(),
        };
        for (id, entry) in entries {
            overlay.insert(id, entry)?;
        }
        Ok(overlay)
    }

    /// Insert one entry, enforcing its parameter invariants up front
    pub fn insert(&mut self, id: LawChangeId, entry: LawChangeEntry) -> Result<()> {
        validate_entry(id, &entry)?;
        self.entries.insert(id, entry);
        Ok(())
    }

    /// The entry for an id, whether or not it is in effect
    pub fn entry(&self, id: LawChangeId) -> Option<&LawChangeEntry> {
        self.entries.get(&id)
    }

    /// Indicator > 0 and the phase-selected year falls in the entry's range
    pub fn is_effective(&self, id: LawChangeId, elig_year: u16, ben_year: u16) -> bool {
        self.entries
            .get(&id)
            .map(|e| e.is_effective(elig_year, ben_year))
            .unwrap_or(false)
    }

    /// The entry, but only when it is in effect for the claim years
    pub fn effective(&self, id: LawChangeId, elig_year: u16, ben_year: u16) -> Option<&LawChangeEntry> {
        self.entries
            .get(&id)
            .filter(|e| e.is_effective(elig_year, ben_year))
    }

    /// Number of active entries (indicator > 0)
    pub fn active_count(&self) -> usize {
        self.entries.values().filter(|e| e.indicator > 0).count()
    }

    /// Whether any active entry reshapes the parameter series themselves
    /// (resolved once per run, not per claim)
    pub fn reshapes_params(&self) -> bool {
        [
            LawChangeId::UltimateAwiGrowth,
            LawChangeId::WageBaseGrowth,
            LawChangeId::CatchupColas,
        ]
        .iter()
        .any(|id| self.entries.get(id).map(|e| e.indicator > 0).unwrap_or(false))
    }
}

/// Entry-specific parameter validation. Fails at load time, never
/// mid-calculation.
fn validate_entry(id: LawChangeId, entry: &LawChangeEntry) -> Result<()> {
    let config = |reason: String| PiaError::Config { entry: id.name(), reason };

    if entry.indicator == 0 {
        return Ok(());
    }
    if entry.end_year < entry.start_year {
        return Err(config(format!(
            "end year {} precedes start year {}",
            entry.end_year, entry.start_year
        )));
    }

    match id {
        LawChangeId::DecliningPercentages => {
            if entry.schedule.is_empty() {
                return Err(config("declining-percentage schedule has no data lines".into()));
            }
            if entry.schedule.len() > MAX_DECLINE_STEPS {
                return Err(config(format!(
                    "{} steps exceeds historical maximum of {}",
                    entry.schedule.len(),
                    MAX_DECLINE_STEPS
                )));
            }
            for yv in &entry.schedule {
                if yv.values.len() != 3 {
                    return Err(config(format!(
                        "year {} has {} percentages, expected 3",
                        yv.year,
                        yv.values.len()
                    )));
                }
            }
        }
        LawChangeId::BendPointSchedule | LawChangeId::MfbBendPoints => {
            // indicator 1-3 derive from growth rates; indicator 4 replaces
            // the schedule outright and must supply it
            if entry.indicator == 4 && entry.schedule.is_empty() {
                return Err(config("ad-hoc bend point schedule requires data lines".into()));
            }
            if entry.indicator <= 3 && entry.amount().is_none() {
                return Err(config("growth-rate bend point change requires a rate".into()));
            }
        }
        LawChangeId::FormulaPercentages | LawChangeId::MfbPercentages => {
            let expected = if id == LawChangeId::FormulaPercentages { 3 } else { 4 };
            if entry.amounts.len() != expected {
                return Err(config(format!(
                    "expected {} percentages, got {}",
                    expected,
                    entry.amounts.len()
                )));
            }
        }
        LawChangeId::ColaCap | LawChangeId::ColaFraction => {
            match entry.amount() {
                None => return Err(config("requires a percentage parameter".into())),
                Some(p) if !(0.0..=100.0).contains(&p) => {
                    return Err(config(format!("percentage {} out of range 0..=100", p)))
                }
                _ => {}
            }
        }
        LawChangeId::SpecialMinAmount => {
            if entry.amount().map(|a| a <= 0.0).unwrap_or(true) {
                return Err(config("per-year amount must be positive".into()));
            }
        }
        LawChangeId::SpecialMinMaxYears | LawChangeId::ChildCareMaxYears => {
            if entry.amount().map(|a| a < 0.0 || a.fract() != 0.0).unwrap_or(true) {
                return Err(config("year count must be a non-negative integer".into()));
            }
        }
        LawChangeId::CatchupColas => {
            if entry.schedule.is_empty() {
                return Err(config("catch-up increase table requires data lines".into()));
            }
        }
        LawChangeId::DiMaxPercents => {
            if entry.amounts.len() != 2 {
                return Err(config(format!(
                    "expected [aime percent, pia percent], got {} values",
                    entry.amounts.len()
                )));
            }
        }
        LawChangeId::MinimumPia | LawChangeId::MaximumPia => {
            if entry.amount().map(|a| a <= 0.0).unwrap_or(true) {
                return Err(config("requires a positive dollar amount".into()));
            }
        }
        LawChangeId::MfbFixedRatio => {
            if entry.amount().map(|r| r < 100.0).unwrap_or(true) {
                return Err(config("ratio must be at least 100 percent of the PIA".into()));
            }
        }
        LawChangeId::ColaDelay => {
            if entry.amount().map(|m| m < 0.0 || m.fract() != 0.0).unwrap_or(true) {
                return Err(config("delay must be a non-negative number of months".into()));
            }
        }
        LawChangeId::AimeComputationYears => {
            if entry.amount().map(|n| n < 2.0 || n.fract() != 0.0).unwrap_or(true) {
                return Err(config("computation years must be an integer of at least 2".into()));
            }
        }
        LawChangeId::WepYearsPhaseIn => {
            match entry.amounts.as_slice() {
                [low, high] if *low >= 0.0 && high > low => {}
                _ => {
                    return Err(config(
                        "expected an increasing [low, high] years-of-coverage pair".into(),
                    ))
                }
            }
        }
        LawChangeId::WepGuaranteeChange => {
            match entry.amount() {
                Some(p) if (0.0..=100.0).contains(&p) => {}
                _ => return Err(config("pension fraction must be a percent in 0..=100".into())),
            }
        }
        LawChangeId::ReductionFactors => {
            if entry.amounts.len() != 2 || entry.amounts.iter().any(|&r| r <= 0.0) {
                return Err(config(
                    "expected two positive monthly percentages [first 36, beyond]".into(),
                ));
            }
        }
        LawChangeId::UltimateAwiGrowth | LawChangeId::WageBaseGrowth => {
            if entry.amount().is_none() {
                return Err(config("requires an annual growth percentage".into()));
            }
        }
        LawChangeId::NewStartFormula | LawChangeId::PriceIndexing => {
            // The embedded series do not carry the data these need (a CPI
            // history predating 1975, alternative start-formula tables)
            return Err(config("no supported variant; set indicator 0".into()));
        }
        _ => {}
    }
    Ok(())
}
