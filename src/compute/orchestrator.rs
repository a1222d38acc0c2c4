//! Method orchestration: runs every applicable computation method over one
//! worker record, selects the controlling PIA and MFB, applies age factors,
//! and apportions the family maximum
//!
//! Each method's state walks `NotApplicable -> Applicable -> {HighPia |
//! SupportPia}`. Exactly one method ends in `HighPia`; `SupportPia` may
//! coexist when a delayed retirement credit cannot attach to the winning
//! special-minimum PIA.

use std::borrow::Cow;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::compute::age::{
    add_months, drc_monthly_rate, months_to_fra, old_age_reduction, widow_reduction,
    full_retirement_age_months,
};
use crate::compute::rounding::{dime_down, dollar_down};
use crate::error::{PiaError, Result};
use crate::lawchange::{LawChangeId, LawChangeOverlay};
use crate::params::Params;
use crate::worker::{BenefitType, DateMy, WorkerRecord};
use super::methods::{
    ApplicabilityState, DisMfbCap, MethodContext, MethodKind, MethodResult,
};

/// First disability onset year the DI maximum can reach
const DI_MAX_FIRST_ONSET_YEAR: u16 = 1979;

/// First entitlement month subject to the DI maximum
const DI_MAX_FIRST_ENTITLEMENT: DateMy = DateMy { year: 1980, month: 7 };

/// Present-law DI maximum percentages: AIME share and PIA ceiling share
const DI_MAX_AIME_PCT: f64 = 0.85;
const DI_MAX_PIA_PCT: f64 = 1.50;

/// One family member's benefit before and after apportionment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApportionedBenefit {
    pub factor: f64,
    /// The beneficiary's full benefit, unapportioned
    pub full: f64,
    /// Payable after the family maximum is shared out
    pub payable: f64,
}

/// The complete outcome for one worker record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Computation {
    pub worker_id: u64,
    /// Every method in evaluation order with its terminal state; methods
    /// that never applied carry empty series
    pub results: Vec<MethodResult>,
    pub high_pia: f64,
    pub high_mfb: f64,
    /// The method whose PIA controls
    pub high_method: MethodKind,
    /// One-character method code for reports
    pub pifc: char,
    /// The worker's own payable benefit after age factors and rounding
    pub benefit: f64,
    /// Age reduction or delayed-credit factor applied to the benefit
    pub age_factor: f64,
    pub family: Vec<ApportionedBenefit>,
}

impl Computation {
    /// The result for a given method kind
    pub fn result(&self, kind: MethodKind) -> Option<&MethodResult> {
        self.results.iter().find(|r| r.kind == kind)
    }
}

/// Orchestrates one record end to end
pub struct Orchestrator<'a> {
    params: Cow<'a, Params>,
    overlay: &'a LawChangeOverlay,
}

impl<'a> Orchestrator<'a> {
    /// Series-reshaping overlay entries (AWI growth, wage-base growth,
    /// catch-up table) are resolved into the parameters here, once
    pub fn new(params: &'a Params, overlay: &'a LawChangeOverlay) -> Self {
        let params = if overlay.reshapes_params() {
            Cow::Owned(params.clone().with_overlay(overlay))
        } else {
            Cow::Borrowed(params)
        };
        Self { params, overlay }
    }

    /// Run the full computation for one worker
    pub fn compute(&self, worker: &WorkerRecord) -> Result<Computation> {
        worker.validate()?;
        let ctx = MethodContext::new(worker, self.params.as_ref(), self.overlay);

        // Run every applicable method
        let mut results: Vec<MethodResult> = Vec::with_capacity(MethodKind::ALL.len());
        for kind in MethodKind::ALL {
            if kind.is_applicable(&ctx) {
                let result = kind
                    .compute(&ctx)
                    .map_err(|e| e.for_worker(worker.worker_id))?;
                results.push(result);
            }
        }
        if results.is_empty() {
            return Err(PiaError::NoMethodApplicable {
                worker_id: worker.worker_id,
            });
        }

        self.apply_pia_bounds(worker, &mut results);
        if self.di_maximum_applies(worker) {
            self.apply_di_maximum(worker, &mut results);
        }

        // Controlling PIA: numerically largest entitlement PIA, earliest in
        // evaluation order on ties
        let mut high_idx = 0;
        for (i, result) in results.iter().enumerate() {
            if result.pia_ent > results[high_idx].pia_ent {
                high_idx = i;
            }
        }
        results[high_idx].state = ApplicabilityState::HighPia;
        let high_method = results[high_idx].kind;
        let high_pia = results[high_idx].pia_ent;

        // The widow(er) guarantee has no family maximum of its own
        let high_mfb = if high_method == MethodKind::ReindexedWidow {
            results
                .iter()
                .find(|r| r.kind == MethodKind::WageIndexed)
                .map(|r| r.mfb_ent)
                .unwrap_or(results[high_idx].mfb_ent)
        } else {
            results[high_idx].mfb_ent
        };

        let (benefit, age_factor) = self.age_adjusted_benefit(worker, &mut results, high_idx);

        let family = self.apportion(worker, high_pia, high_mfb);

        debug!(
            "worker={}: high={:?} pia={:.2} mfb={:.2} benefit={:.2}",
            worker.worker_id, high_method, high_pia, high_mfb, benefit
        );
        Ok(Computation {
            worker_id: worker.worker_id,
            high_pia,
            high_mfb,
            high_method,
            pifc: high_method.code(),
            benefit,
            age_factor,
            family,
            results,
        })
    }

    fn di_maximum_applies(&self, worker: &WorkerRecord) -> bool {
        use chrono::Datelike;
        if worker.benefit_type != BenefitType::Disability {
            return false;
        }
        let onset_year = match worker.current_disability() {
            Some(p) => p.onset.year() as u16,
            None => return false,
        };
        onset_year >= DI_MAX_FIRST_ONSET_YEAR
            && worker.entitlement >= DI_MAX_FIRST_ENTITLEMENT
            && !self.overlay.is_effective(
                LawChangeId::DiMaxRepeal,
                worker.eligibility_year(),
                worker.benefit_date.year,
            )
    }

    /// Law-change PIA floor/ceiling and fixed-ratio MFB, applied uniformly
    /// to every method's entitlement amounts before the high-PIA selection
    fn apply_pia_bounds(&self, worker: &WorkerRecord, results: &mut [MethodResult]) {
        let elig_year = worker.eligibility_year();
        let ben_year = worker.benefit_date.year;
        let floor = self
            .overlay
            .effective(LawChangeId::MinimumPia, elig_year, ben_year)
            .and_then(|e| e.amount());
        let ceiling = self
            .overlay
            .effective(LawChangeId::MaximumPia, elig_year, ben_year)
            .and_then(|e| e.amount());
        let mfb_ratio = self
            .overlay
            .effective(LawChangeId::MfbFixedRatio, elig_year, ben_year)
            .and_then(|e| e.amount());
        if floor.is_none() && ceiling.is_none() && mfb_ratio.is_none() {
            return;
        }
        for result in results.iter_mut() {
            if let Some(f) = floor {
                result.pia_ent = result.pia_ent.max(f);
            }
            if let Some(c) = ceiling {
                result.pia_ent = result.pia_ent.min(c);
            }
            if let Some(pct) = mfb_ratio {
                result.mfb_ent = dime_down(result.pia_ent * pct / 100.0);
            }
            // The maximum never falls below the PIA itself
            result.mfb_ent = result.mfb_ent.max(result.pia_ent);
        }
    }

    /// Cap each AIME-bearing method's MFB at `clamp(aime_pct x AIME, PIA,
    /// pia_pct x PIA)`, then propagate the tightest cap to the remaining
    /// methods
    fn apply_di_maximum(&self, worker: &WorkerRecord, results: &mut [MethodResult]) {
        let (aime_pct, pia_pct) = self
            .overlay
            .effective(
                LawChangeId::DiMaxPercents,
                worker.eligibility_year(),
                worker.benefit_date.year,
            )
            .map(|e| (e.amounts[0] / 100.0, e.amounts[1] / 100.0))
            .unwrap_or((DI_MAX_AIME_PCT, DI_MAX_PIA_PCT));

        let mut tightest: Option<(f64, DisMfbCap)> = None;
        for result in results.iter_mut() {
            let aime = match result.aime {
                Some(a) => a,
                None => continue,
            };
            let pia = result.pia_ent;
            let raw = (aime_pct * aime).clamp(pia, pia_pct * pia);
            let cap = dime_down(raw);
            let cap_type = if aime_pct * aime <= pia {
                DisMfbCap::Pia100
            } else if aime_pct * aime >= pia_pct * pia {
                DisMfbCap::Pia150
            } else {
                DisMfbCap::Aime85
            };
            result.dis_mfb_cap = Some(cap_type);
            if cap < result.mfb_ent {
                result.mfb_ent = cap;
            }
            if tightest.map(|(t, _)| cap < t).unwrap_or(true) {
                tightest = Some((cap, cap_type));
            }
        }

        if let Some((cap, cap_type)) = tightest {
            for result in results.iter_mut() {
                if result.aime.is_none() && cap < result.mfb_ent {
                    result.mfb_ent = cap;
                    result.dis_mfb_cap = Some(cap_type);
                }
            }
        }
    }

    /// Apply the actuarial reduction or delayed retirement credit to the
    /// winning PIA. A credit cannot attach to a special-minimum PIA; when
    /// delay would pay more through the best ordinary PIA, that method is
    /// kept as a support PIA and drives the payable benefit.
    fn age_adjusted_benefit(
        &self,
        worker: &WorkerRecord,
        results: &mut [MethodResult],
        high_idx: usize,
    ) -> (f64, f64) {
        let high_pia = results[high_idx].pia_ent;
        match worker.benefit_type {
            BenefitType::Disability => (dollar_down(high_pia), 1.0),
            BenefitType::OldAge => {
                let to_fra = months_to_fra(worker, self.overlay);
                if to_fra > 0 {
                    let factor = old_age_reduction(
                        to_fra as u32,
                        self.overlay,
                        worker.eligibility_year(),
                        worker.benefit_date.year,
                    );
                    (dollar_down(dime_down(high_pia * factor)), factor)
                } else if to_fra < 0 {
                    let months_late = (-to_fra) as u32;
                    let rate = drc_monthly_rate(
                        chrono::Datelike::year(&worker.birth_date) as u16,
                        self.overlay,
                        worker.eligibility_year(),
                        worker.benefit_date.year,
                    );
                    let factor = 1.0 + rate * months_late as f64;
                    if results[high_idx].kind == MethodKind::SpecialMinimum {
                        // Credit the best ordinary PIA instead, if better
                        let support = results
                            .iter()
                            .enumerate()
                            .filter(|(_, r)| r.kind != MethodKind::SpecialMinimum)
                            .max_by(|(_, a), (_, b)| {
                                a.pia_ent
                                    .partial_cmp(&b.pia_ent)
                                    .unwrap_or(std::cmp::Ordering::Equal)
                            })
                            .map(|(i, r)| (i, r.pia_ent));
                        if let Some((i, support_pia)) = support {
                            if support_pia * factor > high_pia {
                                results[i].state = ApplicabilityState::SupportPia;
                                return (
                                    dollar_down(dime_down(support_pia * factor)),
                                    factor,
                                );
                            }
                        }
                        (dollar_down(high_pia), 1.0)
                    } else {
                        (dollar_down(dime_down(high_pia * factor)), factor)
                    }
                } else {
                    (dollar_down(high_pia), 1.0)
                }
            }
            BenefitType::Survivor => {
                let factor = self.widow_factor(worker);
                (dollar_down(dime_down(high_pia * factor)), factor)
            }
        }
    }

    /// Reduction for a widow(er) entitled before their own full retirement
    /// age, floored at 71.5 percent at age 60
    fn widow_factor(&self, worker: &WorkerRecord) -> f64 {
        use chrono::Datelike;
        let (birth, entitlement) = match (worker.widow_birth_date, worker.widow_entitlement) {
            (Some(b), Some(e)) => (b, e),
            _ => return 1.0,
        };
        let fra_months = full_retirement_age_months(
            birth.year() as u16,
            self.overlay,
            worker.eligibility_year(),
            worker.benefit_date.year,
        );
        let birth_my = DateMy::new(birth.year() as u16, birth.month() as u8);
        let fra_date = add_months(birth_my, fra_months);
        let age_60 = add_months(birth_my, 60 * 12);
        let months_fra_to_60 = fra_date.months_since(age_60).max(0) as u32;
        let months_early = fra_date.months_since(entitlement).clamp(0, months_fra_to_60 as i32);
        widow_reduction(months_early as u32, months_fra_to_60)
    }

    /// Share `high_mfb - high_pia` across the family pro rata by benefit
    /// factor. No one's payable amount ever exceeds their unapportioned full
    /// benefit, and the family total never exceeds the maximum.
    fn apportion(
        &self,
        worker: &WorkerRecord,
        high_pia: f64,
        high_mfb: f64,
    ) -> Vec<ApportionedBenefit> {
        if worker.family.is_empty() {
            return Vec::new();
        }
        // The pool is measured from the unreduced PIA: the worker's own
        // age reduction or credit never changes what the family can draw
        let pool = (high_mfb - high_pia).max(0.0);
        let total_factor: f64 = worker.family.iter().map(|b| b.factor()).sum();

        worker
            .family
            .iter()
            .map(|b| {
                let full = dime_down(high_pia * b.factor());
                let share = if total_factor > 0.0 {
                    dime_down(pool * b.factor() / total_factor)
                } else {
                    0.0
                };
                let payable = dollar_down(share.min(full));
                ApportionedBenefit {
                    factor: b.factor(),
                    full,
                    payable,
                }
            })
            .collect()
    }
}
