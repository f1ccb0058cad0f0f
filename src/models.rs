use std::fmt;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum DegreeLevel {
    #[value(name = "Master", alias = "master")]
    Master,
    #[serde(rename = "PhD")]
    #[value(name = "PhD", alias = "phd")]
    Phd,
    #[serde(rename = "Master/PhD")]
    #[value(name = "Master/PhD", alias = "master-phd")]
    MasterPhd,
}

impl DegreeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DegreeLevel::Master => "Master",
            DegreeLevel::Phd => "PhD",
            DegreeLevel::MasterPhd => "Master/PhD",
        }
    }
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarshipRecord {
    pub name: String,
    pub degree_level: DegreeLevel,
    pub country: String,
    pub opens_on: NaiveDate,
    pub closes_on: NaiveDate,
    pub url: String,
    pub description: String,
}

/// Lifecycle bucket of a record relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    UpcomingOpen,
    CurrentlyOpen,
    Closed,
}

impl Status {
    /// Human-readable label with the day count embedded.
    pub fn label(self, days_remaining: i64) -> String {
        let unit = if days_remaining == 1 { "day" } else { "days" };
        match self {
            Status::UpcomingOpen => format!("Opens in {days_remaining} {unit}"),
            Status::CurrentlyOpen => format!("Open, {days_remaining} {unit} left"),
            Status::Closed => "Closed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub record: ScholarshipRecord,
    pub status: Status,
    pub days_remaining: i64,
}

impl EnrichedRecord {
    pub fn status_label(&self) -> String {
        self.status.label(self.days_remaining)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total: usize,
    pub currently_open: usize,
    pub upcoming_open: usize,
    pub closed: usize,
    pub last_update: DateTime<Utc>,
}

/// The single "now" of one enrichment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub today: NaiveDate,
    pub computed_at: DateTime<Utc>,
}

impl Clock {
    pub fn system() -> Self {
        Self {
            today: Local::now().date_naive(),
            computed_at: Utc::now(),
        }
    }

    /// Keeps the wall-clock stamp but pins the calendar day.
    pub fn frozen_on(today: NaiveDate) -> Self {
        Self {
            today,
            computed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_embed_day_counts() {
        assert_eq!(Status::UpcomingOpen.label(5), "Opens in 5 days");
        assert_eq!(Status::CurrentlyOpen.label(1), "Open, 1 day left");
        assert_eq!(Status::Closed.label(0), "Closed");
    }

    #[test]
    fn degree_levels_use_catalogue_spelling() {
        assert_eq!(DegreeLevel::MasterPhd.to_string(), "Master/PhD");
        let parsed: DegreeLevel = serde_json::from_str("\"PhD\"").unwrap();
        assert_eq!(parsed, DegreeLevel::Phd);
    }

    #[test]
    fn cli_accepts_the_displayed_degree_spelling() {
        use clap::ValueEnum;

        assert_eq!(
            DegreeLevel::from_str("Master/PhD", false).unwrap(),
            DegreeLevel::MasterPhd
        );
        assert_eq!(DegreeLevel::from_str("PhD", false).unwrap(), DegreeLevel::Phd);
        assert_eq!(
            DegreeLevel::from_str("master-phd", false).unwrap(),
            DegreeLevel::MasterPhd
        );
    }
}
