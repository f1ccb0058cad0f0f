use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalogue::validate_record;
use crate::models::{DegreeLevel, EnrichedRecord, ScholarshipRecord, Status, SummaryStats};

#[derive(Debug, Serialize, Deserialize)]
struct EnrichedRow {
    name: String,
    degree_level: DegreeLevel,
    country: String,
    opens_on: NaiveDate,
    closes_on: NaiveDate,
    url: String,
    description: String,
    status: Status,
    status_label: String,
    days_remaining: i64,
}

impl From<&EnrichedRecord> for EnrichedRow {
    fn from(enriched: &EnrichedRecord) -> Self {
        let record = &enriched.record;
        Self {
            name: record.name.clone(),
            degree_level: record.degree_level,
            country: record.country.clone(),
            opens_on: record.opens_on,
            closes_on: record.closes_on,
            url: record.url.clone(),
            description: record.description.clone(),
            status: enriched.status,
            status_label: enriched.status_label(),
            days_remaining: enriched.days_remaining,
        }
    }
}

impl From<EnrichedRow> for EnrichedRecord {
    fn from(row: EnrichedRow) -> Self {
        Self {
            record: ScholarshipRecord {
                name: row.name,
                degree_level: row.degree_level,
                country: row.country,
                opens_on: row.opens_on,
                closes_on: row.closes_on,
                url: row.url,
                description: row.description,
            },
            status: row.status,
            days_remaining: row.days_remaining,
        }
    }
}

pub fn catalogue_csv(records: &[ScholarshipRecord]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer.into_inner().context("flush catalogue csv")
}

pub fn enriched_csv(records: &[EnrichedRecord]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(EnrichedRow::from(record))?;
    }
    writer.into_inner().context("flush enriched csv")
}

pub fn summary_json(stats: &SummaryStats) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(stats)?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn read_catalogue(path: &Path) -> anyhow::Result<Vec<ScholarshipRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open catalogue {}", path.display()))?;
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<ScholarshipRecord>().enumerate() {
        // header is line 1
        let line = index + 2;
        let record =
            result.with_context(|| format!("parse line {line} of {}", path.display()))?;
        validate_record(&record)
            .with_context(|| format!("reject line {line} of {}", path.display()))?;
        records.push(record);
    }

    Ok(records)
}

/// `Ok(None)` when the file has not been produced yet.
pub fn read_enriched(path: &Path) -> anyhow::Result<Option<Vec<EnrichedRecord>>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open enriched table {}", path.display()))?;
    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<EnrichedRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("parse line {line} of {}", path.display()))?;
        let record = EnrichedRecord::from(row);
        validate_record(&record.record)
            .with_context(|| format!("reject line {line} of {}", path.display()))?;
        records.push(record);
    }
    Ok(Some(records))
}

pub fn read_summary(path: &Path) -> anyhow::Result<Option<SummaryStats>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let stats = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(stats))
}

/// Replaces `dest` through a hidden sibling so readers never see a partial file.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file_name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("output");
    let tmp_path = parent.join(format!(".{file_name}.tmp"));
    fs::write(&tmp_path, bytes).with_context(|| format!("write {}", tmp_path.display()))?;
    if let Err(err) = fs::rename(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("publish {}", dest.display()));
    }
    Ok(())
}
