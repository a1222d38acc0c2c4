//! Frozen minimum PIA of the 1977 amendments: a flat $122 floor for the
//! 1979-1981 eligibility cohorts, with increases from eligibility

use crate::error::Result;
use crate::lawchange::LawChangeId;
use super::{CpiYears, MethodContext, MethodKind, MethodResult};

const FROZEN_MIN_PIA: f64 = 122.00;
const FROZEN_MIN_MFB: f64 = 183.00;

const FIRST_ELIG_YEAR: u16 = 1979;
const LAST_ELIG_YEAR: u16 = 1981;

pub fn is_applicable(ctx: &MethodContext) -> bool {
    let elig = ctx.elig_year();
    (FIRST_ELIG_YEAR..=LAST_ELIG_YEAR).contains(&elig)
        && !ctx.worker.totalized
        && !ctx
            .overlay
            .is_effective(LawChangeId::NoFrozenMin, elig, ctx.ben_year())
}

pub fn compute(ctx: &MethodContext) -> Result<MethodResult> {
    let worker = ctx.worker;
    let elig_year = ctx.elig_year();
    let ben_year = ctx.ben_year();

    let cpi = CpiYears::new(
        elig_year - 1,
        elig_year,
        worker.entitlement.year.max(elig_year),
        ben_year.max(elig_year),
    );
    let mut result = MethodResult::new(MethodKind::FrozenMinimum, cpi);

    let engine = ctx.cola_engine();
    result.pia_elig = vec![FROZEN_MIN_PIA];
    result.pia_ent =
        engine.apply_colas_elig(&mut result.pia_elig, elig_year, worker.benefit_date, elig_year);
    result.mfb_elig = vec![FROZEN_MIN_MFB];
    result.mfb_ent =
        engine.apply_colas_elig(&mut result.mfb_elig, elig_year, worker.benefit_date, elig_year);

    Ok(result)
}
