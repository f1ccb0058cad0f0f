use anyhow::{bail, Context};
use chrono::NaiveDate;

use crate::models::{DegreeLevel, ScholarshipRecord};

pub fn catalogue() -> anyhow::Result<Vec<ScholarshipRecord>> {
    let entries = vec![
        (
            "LPDP Beasiswa Pendidikan Indonesia",
            DegreeLevel::MasterPhd,
            "Worldwide",
            (2024, 3, 1),
            (2024, 4, 30),
            "https://lpdp.kemenkeu.go.id",
            "Full funding for master's and doctoral study at top universities worldwide",
        ),
        (
            "Chevening UK Scholarship",
            DegreeLevel::Master,
            "UK",
            (2024, 8, 1),
            (2024, 11, 7),
            "https://www.chevening.org",
            "UK government award for a one-year master's degree",
        ),
        (
            "Australia Awards Scholarship",
            DegreeLevel::MasterPhd,
            "Australia",
            (2024, 2, 1),
            (2024, 4, 30),
            "https://www.australiaawardsindonesia.org",
            "Australian government award for Indonesian citizens",
        ),
        (
            "Fulbright PhD Scholarship",
            DegreeLevel::Phd,
            "USA",
            (2024, 2, 1),
            (2024, 5, 31),
            "https://www.aminef.or.id",
            "Doctoral study at universities in the United States",
        ),
        (
            "DAAD Scholarship",
            DegreeLevel::MasterPhd,
            "Germany",
            (2024, 8, 1),
            (2024, 11, 15),
            "https://www.daad.de",
            "German government scholarship",
        ),
        (
            "Erasmus Mundus Joint Masters",
            DegreeLevel::Master,
            "Europe",
            (2024, 10, 1),
            (2025, 1, 15),
            "https://www.eacea.ec.europa.eu",
            "Master's study across several European universities",
        ),
        (
            "New Zealand ASEAN Scholars Awards",
            DegreeLevel::Phd,
            "New Zealand",
            (2024, 7, 1),
            (2024, 10, 1),
            "https://www.nzaseanscholars.org",
            "Doctoral study in New Zealand for ASEAN citizens",
        ),
        (
            "Monbukagakusho MEXT Scholarship",
            DegreeLevel::MasterPhd,
            "Japan",
            (2024, 4, 1),
            (2024, 6, 15),
            "https://www.id.emb-japan.go.jp",
            "Japanese government scholarship",
        ),
        (
            "Korean Government Scholarship (KGSP)",
            DegreeLevel::MasterPhd,
            "South Korea",
            (2024, 2, 15),
            (2024, 3, 31),
            "https://www.studyinkorea.go.kr",
            "South Korean government scholarship",
        ),
        (
            "Chinese Government Scholarship",
            DegreeLevel::MasterPhd,
            "China",
            (2024, 1, 1),
            (2024, 4, 30),
            "https://www.campuschina.org",
            "Chinese government scholarship",
        ),
    ];

    let mut records = Vec::with_capacity(entries.len());
    for (name, degree_level, country, opens, closes, url, description) in entries {
        let record = ScholarshipRecord {
            name: name.to_string(),
            degree_level,
            country: country.to_string(),
            opens_on: ymd(opens).with_context(|| format!("invalid opening date for {name}"))?,
            closes_on: ymd(closes).with_context(|| format!("invalid closing date for {name}"))?,
            url: url.to_string(),
            description: description.to_string(),
        };
        validate_record(&record)?;
        records.push(record);
    }

    Ok(records)
}

fn ymd((year, month, day): (i32, u32, u32)) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).context("invalid date")
}

pub fn validate_record(record: &ScholarshipRecord) -> anyhow::Result<()> {
    if record.name.trim().is_empty() {
        bail!("scholarship record has an empty name");
    }
    if record.closes_on < record.opens_on {
        bail!(
            "{} closes on {} before it opens on {}",
            record.name,
            record.closes_on,
            record.opens_on
        );
    }
    Ok(())
}
