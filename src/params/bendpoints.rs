//! PIA and MFB formula bend points and percentages
//!
//! Present law projects the 1979 bend points by average-wage growth with a
//! two-year lag. A law-change overlay can substitute fraction-of-wage-growth,
//! CPI-rate, or ad-hoc growth, or replace the schedule outright. All lookups
//! are pure per (year, overlay) pair.

use crate::lawchange::{LawChangeId, LawChangeOverlay};
use super::wage::WageSeries;

/// 1979 PIA formula bend points
const PIA_BEND_1979: [f64; 2] = [180.0, 1085.0];

/// 1979 MFB formula bend points
const MFB_BEND_1979: [f64; 3] = [230.0, 332.0, 433.0];

/// Present-law PIA formula percentages
const PIA_PCT: [f64; 3] = [0.90, 0.32, 0.15];

/// Present-law MFB formula percentages
const MFB_PCT: [f64; 4] = [1.50, 2.72, 1.34, 1.75];

/// Base year of the wage-indexed formulas
const FORMULA_BASE_YEAR: u16 = 1979;

/// PIA bend points for an eligibility year
pub fn pia_bend_points(
    elig_year: u16,
    wages: &WageSeries,
    overlay: &LawChangeOverlay,
    ben_year: u16,
) -> [f64; 2] {
    let mut out = [0.0; 2];
    project(
        &PIA_BEND_1979,
        &mut out,
        elig_year,
        wages,
        overlay.effective(LawChangeId::BendPointSchedule, elig_year, ben_year),
    );
    out
}

/// MFB bend points for an eligibility year
pub fn mfb_bend_points(
    elig_year: u16,
    wages: &WageSeries,
    overlay: &LawChangeOverlay,
    ben_year: u16,
) -> [f64; 3] {
    let mut out = [0.0; 3];
    project(
        &MFB_BEND_1979,
        &mut out,
        elig_year,
        wages,
        overlay.effective(LawChangeId::MfbBendPoints, elig_year, ben_year),
    );
    out
}

/// PIA formula percentages for an eligibility year, honoring percentage
/// overrides and declining-percentage schedules
pub fn pia_percentages(elig_year: u16, ben_year: u16, overlay: &LawChangeOverlay) -> [f64; 3] {
    if let Some(entry) = overlay.effective(LawChangeId::DecliningPercentages, elig_year, ben_year) {
        if let Some(values) = entry.schedule_for(elig_year) {
            // Validated at load time: exactly 3 values per schedule year
            return [values[0] / 100.0, values[1] / 100.0, values[2] / 100.0];
        }
    }
    if let Some(entry) = overlay.effective(LawChangeId::FormulaPercentages, elig_year, ben_year) {
        let a = &entry.amounts;
        return [a[0] / 100.0, a[1] / 100.0, a[2] / 100.0];
    }
    PIA_PCT
}

/// MFB formula percentages for an eligibility year
pub fn mfb_percentages(elig_year: u16, ben_year: u16, overlay: &LawChangeOverlay) -> [f64; 4] {
    if let Some(entry) = overlay.effective(LawChangeId::MfbPercentages, elig_year, ben_year) {
        let a = &entry.amounts;
        return [a[0] / 100.0, a[1] / 100.0, a[2] / 100.0, a[3] / 100.0];
    }
    MFB_PCT
}

/// Project base-year bend points to `elig_year`, branching on the overlay:
/// indicator 1 = fraction of wage growth, 2 = CPI rate, 3 = ad-hoc rate,
/// 4 = fully replaced schedule. Bend points round to the nearest dollar.
fn project(
    base: &[f64],
    out: &mut [f64],
    elig_year: u16,
    wages: &WageSeries,
    entry: Option<&crate::lawchange::LawChangeEntry>,
) {
    debug_assert_eq!(base.len(), out.len());

    if let Some(entry) = entry {
        if entry.indicator == 4 {
            if let Some(values) = entry.schedule_for(elig_year) {
                for (o, &v) in out.iter_mut().zip(values.iter()) {
                    *o = v;
                }
                return;
            }
        }
    }

    // Present-law projection through the overlay start year (if any), then
    // the alternative growth from there
    let alt_start = entry.map(|e| e.start_year.max(FORMULA_BASE_YEAR));
    let present_law_through = alt_start.unwrap_or(elig_year).min(elig_year);

    for (o, &b) in out.iter_mut().zip(base.iter()) {
        let mut value = b * wages.awi(present_law_through - 2) / wages.awi(FORMULA_BASE_YEAR - 2);
        if let (Some(entry), Some(start)) = (entry, alt_start) {
            for year in (start + 1)..=elig_year {
                let growth = match entry.indicator {
                    1 => {
                        let frac = entry.amount().unwrap_or(1.0);
                        frac * (wages.awi(year - 2) / wages.awi(year - 3) - 1.0)
                    }
                    2 | 3 => entry.amount().unwrap_or(0.0) / 100.0,
                    _ => wages.awi(year - 2) / wages.awi(year - 3) - 1.0,
                };
                value *= 1.0 + growth;
            }
        }
        *o = value.round();
    }
}
