//! Family beneficiaries entitled on a worker's record
//!
//! Only what MFB apportionment needs: who is entitled and the fraction of the
//! PIA their unapportioned benefit represents.

use serde::{Deserialize, Serialize};

/// Relationship of an auxiliary or survivor beneficiary to the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeneficiaryKind {
    /// Spouse of a living worker (aged or with child in care)
    Spouse,
    /// Child of a living (old-age or disabled) worker
    ChildLife,
    /// Surviving child
    ChildSurvivor,
    /// Widow(er) at or above full retirement age
    AgedWidow,
    /// Widow(er) caring for an entitled child
    MotherFather,
    /// Dependent parent of a deceased worker
    Parent,
}

impl BeneficiaryKind {
    /// Statutory full-benefit fraction of the PIA before apportionment
    pub fn benefit_factor(&self) -> f64 {
        match self {
            BeneficiaryKind::Spouse | BeneficiaryKind::ChildLife => 0.5,
            BeneficiaryKind::ChildSurvivor
            | BeneficiaryKind::MotherFather
            | BeneficiaryKind::Parent => 0.75,
            BeneficiaryKind::AgedWidow => 1.0,
        }
    }
}

/// One family member entitled on the worker's record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiary {
    pub kind: BeneficiaryKind,
    /// Override of the statutory factor, for pre-reduced auxiliaries
    #[serde(default)]
    pub factor_override: Option<f64>,
}

impl Beneficiary {
    pub fn new(kind: BeneficiaryKind) -> Self {
        Self { kind, factor_override: None }
    }

    /// Effective fraction of the PIA for this beneficiary
    pub fn factor(&self) -> f64 {
        self.factor_override.unwrap_or_else(|| self.kind.benefit_factor())
    }
}
