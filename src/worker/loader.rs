//! Load worker records from a batch CSV file
//!
//! One row per worker; earnings are a pipe-separated run of annual amounts
//! starting at `FirstEarningsYear`. Dates are ISO (`YYYY-MM-DD`), month-year
//! fields are `YYYY-MM`.

use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;

use crate::error::{PiaError, Result};
use super::{BenefitType, DateMy, EarningsRecord, Sex, WorkerRecord};

/// Raw CSV row matching the batch input columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "WorkerId")]
    worker_id: u64,
    #[serde(rename = "BirthDate")]
    birth_date: String,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "BenefitType")]
    benefit_type: String,
    #[serde(rename = "Entitlement")]
    entitlement: String,
    #[serde(rename = "BenefitDate")]
    benefit_date: String,
    #[serde(rename = "DeathDate")]
    death_date: String,
    #[serde(rename = "Totalized")]
    totalized: u8,
    #[serde(rename = "NoncoveredPension")]
    noncovered_pension: f64,
    #[serde(rename = "FullyInsured")]
    fully_insured: u8,
    #[serde(rename = "QuartersOfCoverage")]
    quarters_of_coverage: u32,
    #[serde(rename = "FirstEarningsYear")]
    first_earnings_year: u16,
    #[serde(rename = "Earnings")]
    earnings: String,
}

fn parse_my(worker_id: u64, field: &'static str, s: &str) -> Result<DateMy> {
    let bad = || PiaError::InvalidInput {
        worker_id,
        field,
        value: s.to_string(),
        constraint: "expected YYYY-MM",
    };
    let (y, m) = s.split_once('-').ok_or_else(bad)?;
    let year: u16 = y.parse().map_err(|_| bad())?;
    let month: u8 = m.parse().map_err(|_| bad())?;
    if !(1..=12).contains(&month) {
        return Err(bad());
    }
    Ok(DateMy::new(year, month))
}

impl CsvRow {
    fn into_record(self) -> Result<WorkerRecord> {
        let worker_id = self.worker_id;
        let invalid = |field: &'static str, value: String, constraint: &'static str| {
            PiaError::InvalidInput { worker_id, field, value, constraint }
        };

        let birth_date = NaiveDate::parse_from_str(&self.birth_date, "%Y-%m-%d")
            .map_err(|_| invalid("birth_date", self.birth_date.clone(), "expected YYYY-MM-DD"))?;

        let sex = match self.sex.as_str() {
            "M" | "Male" => Sex::Male,
            "F" | "Female" => Sex::Female,
            other => return Err(invalid("sex", other.to_string(), "expected M or F")),
        };

        let benefit_type = match self.benefit_type.as_str() {
            "OldAge" => BenefitType::OldAge,
            "Disability" => BenefitType::Disability,
            "Survivor" => BenefitType::Survivor,
            other => {
                return Err(invalid(
                    "benefit_type",
                    other.to_string(),
                    "expected OldAge, Disability, or Survivor",
                ))
            }
        };

        let entitlement = parse_my(worker_id, "entitlement", &self.entitlement)?;
        let benefit_date = parse_my(worker_id, "benefit_date", &self.benefit_date)?;
        let death_date = if self.death_date.is_empty() {
            None
        } else {
            Some(parse_my(worker_id, "death_date", &self.death_date)?)
        };

        let mut earnings = EarningsRecord::new(self.first_earnings_year);
        for (i, part) in self.earnings.split('|').enumerate() {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let amount: f64 = part.parse().map_err(|_| {
                invalid("earnings", part.to_string(), "expected numeric amount")
            })?;
            earnings.set(self.first_earnings_year + i as u16, amount);
        }

        let record = WorkerRecord {
            worker_id,
            birth_date,
            sex,
            benefit_type,
            entitlement,
            benefit_date,
            death_date,
            disability_periods: vec![],
            earnings,
            totalized: self.totalized != 0,
            noncovered_pension: self.noncovered_pension,
            fully_insured: self.fully_insured != 0,
            quarters_of_coverage: self.quarters_of_coverage,
            child_care_years: vec![],
            widow_birth_date: None,
            widow_entitlement: None,
            family: vec![],
        };
        record.validate()?;
        Ok(record)
    }
}

/// Load all worker records from a CSV file, validating each
pub fn load_workers<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<WorkerRecord>> {
    let mut reader = Reader::from_path(path)?;
    let mut workers = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        workers.push(row.into_record()?);
    }
    Ok(workers)
}

/// Load worker records from any reader (string buffer, network stream)
pub fn load_workers_from_reader<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<WorkerRecord>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut workers = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        workers.push(row.into_record()?);
    }
    Ok(workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
WorkerId,BirthDate,Sex,BenefitType,Entitlement,BenefitDate,DeathDate,Totalized,NoncoveredPension,FullyInsured,QuartersOfCoverage,FirstEarningsYear,Earnings
1,1918-03-02,M,OldAge,1980-01,1980-01,,0,0.0,1,40,1951,3600|3600|3600|4200|4200
2,1930-07-15,F,Survivor,1992-06,1992-06,1992-05,0,0.0,1,32,1951,3600|3600
";

    #[test]
    fn test_load_from_reader() {
        let workers = load_workers_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(workers.len(), 2);

        let w1 = &workers[0];
        assert_eq!(w1.worker_id, 1);
        assert_eq!(w1.sex, Sex::Male);
        assert_eq!(w1.earnings.get(1954), 4200.0);
        assert_eq!(w1.earnings.get(1956), 0.0);

        let w2 = &workers[1];
        assert_eq!(w2.benefit_type, BenefitType::Survivor);
        assert_eq!(w2.death_date, Some(DateMy::new(1992, 5)));
    }

    #[test]
    fn test_bad_month_rejected() {
        let bad = SAMPLE.replace("1980-01,1980-01", "1980-13,1980-13");
        assert!(load_workers_from_reader(bad.as_bytes()).is_err());
    }
}
