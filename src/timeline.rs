use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{EnrichedRecord, ScholarshipRecord, Status, SummaryStats};

/// Places a record in its lifecycle bucket for `today`. Both boundary dates
/// count as open; `Closed` always reports zero days.
pub fn classify(record: &ScholarshipRecord, today: NaiveDate) -> (Status, i64) {
    if today < record.opens_on {
        (Status::UpcomingOpen, (record.opens_on - today).num_days())
    } else if today <= record.closes_on {
        (Status::CurrentlyOpen, (record.closes_on - today).num_days())
    } else {
        (Status::Closed, 0)
    }
}

pub fn enrich(records: &[ScholarshipRecord], today: NaiveDate) -> Vec<EnrichedRecord> {
    records
        .iter()
        .map(|record| {
            let (status, days_remaining) = classify(record, today);
            EnrichedRecord {
                record: record.clone(),
                status,
                days_remaining,
            }
        })
        .collect()
}

pub fn summarize(records: &[EnrichedRecord], computed_at: DateTime<Utc>) -> SummaryStats {
    let count = |status: Status| records.iter().filter(|r| r.status == status).count();

    SummaryStats {
        total: records.len(),
        currently_open: count(Status::CurrentlyOpen),
        upcoming_open: count(Status::UpcomingOpen),
        closed: count(Status::Closed),
        last_update: computed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DegreeLevel;
    use chrono::{Duration, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()
    }

    fn window(name: &str, opens_offset: i64, closes_offset: i64) -> ScholarshipRecord {
        ScholarshipRecord {
            name: name.to_string(),
            degree_level: DegreeLevel::Master,
            country: "UK".to_string(),
            opens_on: today() + Duration::days(opens_offset),
            closes_on: today() + Duration::days(closes_offset),
            url: "https://www.chevening.org".to_string(),
            description: "One-year master's".to_string(),
        }
    }

    #[test]
    fn opening_today_counts_as_open() {
        let (status, days) = classify(&window("a", 0, 10), today());
        assert_eq!(status, Status::CurrentlyOpen);
        assert_eq!(days, 10);
    }

    #[test]
    fn future_window_reports_days_until_open() {
        let (status, days) = classify(&window("a", 5, 20), today());
        assert_eq!(status, Status::UpcomingOpen);
        assert_eq!(days, 5);
    }

    #[test]
    fn closed_yesterday_reports_zero_days() {
        let (status, days) = classify(&window("a", -30, -1), today());
        assert_eq!(status, Status::Closed);
        assert_eq!(days, 0);
    }

    #[test]
    fn closing_today_is_still_open() {
        let (status, days) = classify(&window("a", -30, 0), today());
        assert_eq!(status, Status::CurrentlyOpen);
        assert_eq!(days, 0);
    }

    #[test]
    fn every_day_around_a_window_gets_exactly_one_bucket() {
        let record = window("a", 0, 3);
        let buckets: Vec<Status> = (-2..=5)
            .map(|offset| classify(&record, today() + Duration::days(offset)).0)
            .collect();
        assert_eq!(
            buckets,
            vec![
                Status::UpcomingOpen,
                Status::UpcomingOpen,
                Status::CurrentlyOpen,
                Status::CurrentlyOpen,
                Status::CurrentlyOpen,
                Status::CurrentlyOpen,
                Status::Closed,
                Status::Closed,
            ]
        );
    }

    #[test]
    fn summary_counts_add_up_to_total() {
        let records = vec![
            window("open", -1, 4),
            window("soon", 3, 9),
            window("later", 30, 60),
            window("gone", -40, -10),
        ];
        let computed_at = Utc.with_ymd_and_hms(2024, 9, 15, 8, 0, 0).unwrap();
        let enriched = enrich(&records, today());
        let stats = summarize(&enriched, computed_at);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.currently_open, 1);
        assert_eq!(stats.upcoming_open, 2);
        assert_eq!(stats.closed, 1);
        assert_eq!(
            stats.currently_open + stats.upcoming_open + stats.closed,
            stats.total
        );
        assert_eq!(stats.last_update, computed_at);
        assert!(enriched
            .iter()
            .filter(|r| r.status == Status::Closed)
            .all(|r| r.days_remaining == 0));
    }
}
