//! PIA Engine CLI
//!
//! Runs one built-in demonstration record and prints the per-method
//! breakdown

use chrono::NaiveDate;
use pia_engine::compute::ApplicabilityState;
use pia_engine::worker::{BenefitType, DateMy, EarningsRecord, Sex, WorkerRecord};
use pia_engine::BatchRunner;

fn main() {
    env_logger::init();

    println!("PIA Engine v0.1.0");
    println!("=================\n");

    // Demonstration record: steady earner, retires at 62 in January 1980
    let mut earnings = EarningsRecord::new(1951);
    for year in 1951..=1979 {
        let amount = 3000.0 + 250.0 * (year - 1951) as f64;
        earnings.set(year, amount.min(10_000.0));
    }
    let worker = WorkerRecord {
        worker_id: 1,
        birth_date: NaiveDate::from_ymd_opt(1918, 1, 10).expect("valid date"),
        sex: Sex::Male,
        benefit_type: BenefitType::OldAge,
        entitlement: DateMy::new(1980, 1),
        benefit_date: DateMy::new(1980, 1),
        death_date: None,
        disability_periods: vec![],
        earnings,
        totalized: false,
        noncovered_pension: 0.0,
        fully_insured: true,
        quarters_of_coverage: 40,
        child_care_years: vec![],
        widow_birth_date: None,
        widow_entitlement: None,
        family: vec![],
    };

    println!("Worker: {}", worker.worker_id);
    println!("  Born: {}", worker.birth_date);
    println!("  Claim: {:?} entitled {}", worker.benefit_type, worker.entitlement);
    println!("  Eligibility year: {}", worker.eligibility_year());
    println!();

    let runner = BatchRunner::present_law();
    match runner.run(&worker) {
        Ok(comp) => {
            println!("Per-method results:");
            for result in &comp.results {
                let marker = match result.state {
                    ApplicabilityState::HighPia => " <- HIGH PIA",
                    ApplicabilityState::SupportPia => " (support)",
                    _ => "",
                };
                println!(
                    "  {:<22} pia ${:>8.2}  mfb ${:>8.2}{}",
                    format!("{:?}", result.kind),
                    result.pia_ent,
                    result.mfb_ent,
                    marker
                );
            }
            println!();
            println!("Controlling method: {:?} ({})", comp.high_method, comp.pifc);
            println!("High PIA: ${:.2}", comp.high_pia);
            println!("High MFB: ${:.2}", comp.high_mfb);
            println!(
                "Payable benefit: ${:.2} (age factor {:.4})",
                comp.benefit, comp.age_factor
            );
        }
        Err(e) => {
            eprintln!("computation failed: {}", e);
            std::process::exit(1);
        }
    }
}
