//! Benefit computation methods
//!
//! Each method is a pure pair of functions over an immutable context: an
//! applicability predicate and a calculation producing a `MethodResult`.
//! The closed `MethodKind` enumeration replaces the original's virtual
//! dispatch; the orchestrator matches over it exhaustively.

mod old_start;
mod pia_table;
mod wage_indexed;
mod special_minimum;
mod frozen_minimum;
mod transitional;
mod dib_guarantee;
mod reindexed_widow;

pub use dib_guarantee::ConvertedMfbType;
pub use wage_indexed::WEP_FIRST_ELIG_YEAR;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lawchange::LawChangeOverlay;
use crate::params::{Params, YocThresholds};
use crate::worker::WorkerRecord;
use super::cola::ColaEngine;

/// The closed set of computation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    OldStart,
    PiaTable,
    WageIndexed,
    WageIndexedNonFreeze,
    SpecialMinimum,
    FrozenMinimum,
    TransitionalGuarantee,
    ChildCareDropout,
    DisabilityGuarantee,
    ReindexedWidow,
}

impl MethodKind {
    /// Every method, in evaluation order. On PIA ties the earlier entry wins.
    pub const ALL: [MethodKind; 10] = [
        MethodKind::WageIndexed,
        MethodKind::WageIndexedNonFreeze,
        MethodKind::PiaTable,
        MethodKind::OldStart,
        MethodKind::SpecialMinimum,
        MethodKind::FrozenMinimum,
        MethodKind::TransitionalGuarantee,
        MethodKind::ChildCareDropout,
        MethodKind::DisabilityGuarantee,
        MethodKind::ReindexedWidow,
    ];

    /// One-character code identifying the controlling method (pifc)
    pub fn code(&self) -> char {
        match self {
            MethodKind::OldStart => 'O',
            MethodKind::PiaTable => 'T',
            MethodKind::WageIndexed => 'W',
            MethodKind::WageIndexedNonFreeze => 'N',
            MethodKind::SpecialMinimum => 'S',
            MethodKind::FrozenMinimum => 'F',
            MethodKind::TransitionalGuarantee => 'G',
            MethodKind::ChildCareDropout => 'C',
            MethodKind::DisabilityGuarantee => 'D',
            MethodKind::ReindexedWidow => 'R',
        }
    }

    /// Pure applicability predicate over the worker and overlay
    pub fn is_applicable(&self, ctx: &MethodContext) -> bool {
        match self {
            MethodKind::OldStart => old_start::is_applicable(ctx),
            MethodKind::PiaTable => pia_table::is_applicable(ctx),
            MethodKind::WageIndexed => wage_indexed::is_applicable(ctx),
            MethodKind::WageIndexedNonFreeze => wage_indexed::is_applicable_non_freeze(ctx),
            MethodKind::SpecialMinimum => special_minimum::is_applicable(ctx),
            MethodKind::FrozenMinimum => frozen_minimum::is_applicable(ctx),
            MethodKind::TransitionalGuarantee => transitional::is_applicable(ctx),
            MethodKind::ChildCareDropout => wage_indexed::is_applicable_child_care(ctx),
            MethodKind::DisabilityGuarantee => dib_guarantee::is_applicable(ctx),
            MethodKind::ReindexedWidow => reindexed_widow::is_applicable(ctx),
        }
    }

    /// Run the method's calculation. Calling this when `is_applicable` is
    /// false is a programming error and panics.
    pub fn compute(&self, ctx: &MethodContext) -> Result<MethodResult> {
        assert!(
            self.is_applicable(ctx),
            "{:?} computed while inapplicable for worker {}",
            self,
            ctx.worker.worker_id
        );
        match self {
            MethodKind::OldStart => old_start::compute(ctx),
            MethodKind::PiaTable => pia_table::compute(ctx),
            MethodKind::WageIndexed => wage_indexed::compute(ctx),
            MethodKind::WageIndexedNonFreeze => wage_indexed::compute_non_freeze(ctx),
            MethodKind::SpecialMinimum => special_minimum::compute(ctx),
            MethodKind::FrozenMinimum => frozen_minimum::compute(ctx),
            MethodKind::TransitionalGuarantee => transitional::compute(ctx),
            MethodKind::ChildCareDropout => wage_indexed::compute_child_care(ctx),
            MethodKind::DisabilityGuarantee => dib_guarantee::compute(ctx),
            MethodKind::ReindexedWidow => reindexed_widow::compute(ctx),
        }
    }
}

/// Per-method terminal state, assigned by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicabilityState {
    NotApplicable,
    Applicable,
    /// This method's PIA controls the benefit
    HighPia,
    /// A losing method whose PIA still feeds the payable benefit (delayed
    /// retirement credit cannot apply to a special-minimum PIA)
    SupportPia,
}

/// CPI year markers for a method's series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpiYears {
    pub first: u16,
    pub elig: u16,
    pub ent: u16,
    pub ben: u16,
}

impl CpiYears {
    /// Construct, enforcing `first < elig <= ent <= ben`
    pub fn new(first: u16, elig: u16, ent: u16, ben: u16) -> Self {
        assert!(
            first < elig && elig <= ent && ent <= ben,
            "cpi year markers out of order: {} {} {} {}",
            first,
            elig,
            ent,
            ben
        );
        Self { first, elig, ent, ben }
    }
}

/// Marker for which bound produced a disability-maximum MFB cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisMfbCap {
    /// Floor: 100% of the PIA
    Pia100,
    /// 85% of the AIME controlled
    Aime85,
    /// Ceiling: 150% of the PIA
    Pia150,
}

/// The output of one method's calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodResult {
    pub kind: MethodKind,
    pub state: ApplicabilityState,
    /// PIA by increase year, seed first (index 0 = value at `cpi.first`)
    pub pia_elig: Vec<f64>,
    /// PIA at entitlement, after COLAs and rounding
    pub pia_ent: f64,
    /// MFB by increase year
    pub mfb_elig: Vec<f64>,
    /// MFB at entitlement
    pub mfb_ent: f64,
    /// Historical act table used, if any
    pub table_number: Option<u8>,
    pub cpi: CpiYears,
    /// AIME, for methods that compute one (drives the DI maximum)
    pub aime: Option<f64>,
    /// Set when the DI maximum capped this method's MFB
    pub dis_mfb_cap: Option<DisMfbCap>,
    /// Set when the windfall elimination provision reduced the PIA
    pub wep_applied: bool,
}

impl MethodResult {
    pub fn new(kind: MethodKind, cpi: CpiYears) -> Self {
        Self {
            kind,
            state: ApplicabilityState::Applicable,
            pia_elig: Vec::new(),
            pia_ent: 0.0,
            mfb_elig: Vec::new(),
            mfb_ent: 0.0,
            table_number: None,
            cpi,
            aime: None,
            dis_mfb_cap: None,
            wep_applied: false,
        }
    }
}

/// Immutable inputs shared by every method
#[derive(Debug, Clone, Copy)]
pub struct MethodContext<'a> {
    pub worker: &'a WorkerRecord,
    pub params: &'a Params,
    pub overlay: &'a LawChangeOverlay,
}

impl<'a> MethodContext<'a> {
    pub fn new(worker: &'a WorkerRecord, params: &'a Params, overlay: &'a LawChangeOverlay) -> Self {
        Self { worker, params, overlay }
    }

    pub fn elig_year(&self) -> u16 {
        self.worker.eligibility_year()
    }

    pub fn ben_year(&self) -> u16 {
        self.worker.benefit_date.year
    }

    pub fn cola_engine(&self) -> ColaEngine<'a> {
        ColaEngine::new(&self.params.colas, &self.params.catchup, self.overlay)
    }

    /// Years of coverage over the whole earnings record: pre-1951 years by
    /// the $900 rule plus post-1950 years meeting the coverage threshold
    pub fn years_of_coverage(&self) -> u32 {
        let pre = YocThresholds::pre_1951_years(self.worker.pre_1951_total());
        let post = self
            .worker
            .earnings
            .iter()
            .filter(|&(year, amount)| {
                year >= 1951 && amount >= YocThresholds::threshold(&self.params.wages, year)
            })
            .count() as u32;
        pre + post
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_codes_unique() {
        let mut codes: Vec<char> = MethodKind::ALL.iter().map(|m| m.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), MethodKind::ALL.len());
    }

    #[test]
    fn test_cpi_years_valid() {
        let cpi = CpiYears::new(1978, 1979, 1980, 1982);
        assert_eq!(cpi.elig, 1979);
    }

    #[test]
    #[should_panic(expected = "cpi year markers out of order")]
    fn test_cpi_years_reject_disorder() {
        CpiYears::new(1980, 1979, 1980, 1982);
    }
}
