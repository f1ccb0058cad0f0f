use std::fmt::Write;

use chrono::NaiveDate;

use crate::config::DataPaths;
use crate::models::{DegreeLevel, EnrichedRecord, Status, SummaryStats};
use crate::store;

const CHART_WIDTH: i64 = 48;
const NAME_WIDTH: usize = 36;

/// Empty lists and `None` mean "no restriction" for that dimension.
#[derive(Debug, Clone, Default)]
pub struct DashboardFilter {
    pub degrees: Vec<DegreeLevel>,
    pub countries: Vec<String>,
    pub status: Option<Status>,
}

impl DashboardFilter {
    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        let degree_ok =
            self.degrees.is_empty() || self.degrees.contains(&record.record.degree_level);
        let country_ok = self.countries.is_empty()
            || self
                .countries
                .iter()
                .any(|country| country.trim().eq_ignore_ascii_case(&record.record.country));
        let status_ok = self.status.map_or(true, |status| status == record.status);

        degree_ok && country_ok && status_ok
    }

    pub fn apply<'a>(&self, records: &'a [EnrichedRecord]) -> Vec<&'a EnrichedRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

/// Records in one bucket, soonest deadline or opening first.
pub fn by_days_remaining<'a>(
    records: &[&'a EnrichedRecord],
    status: Status,
) -> Vec<&'a EnrichedRecord> {
    let mut selected: Vec<&EnrichedRecord> = records
        .iter()
        .copied()
        .filter(|record| record.status == status)
        .collect();
    selected.sort_by(|a, b| {
        a.days_remaining
            .cmp(&b.days_remaining)
            .then_with(|| a.record.name.cmp(&b.record.name))
    });
    selected
}

pub fn placeholder() -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Scholarship Timeline Dashboard");
    let _ = writeln!(output);
    let _ = writeln!(output, "Waiting for pipeline data. No enriched table found yet.");
    let _ = writeln!(output);
    let _ = writeln!(output, "To populate the dashboard:");
    let _ = writeln!(output, "1. Run `scholarship-timeline run` (or `produce` then `enrich`)");
    let _ = writeln!(output, "2. Re-open this dashboard once the pipeline has finished");
    output
}

/// Reads the pipeline outputs and renders them, or the placeholder when the
/// enriched table has not been produced yet.
pub fn load(
    paths: &DataPaths,
    filter: &DashboardFilter,
    today: NaiveDate,
) -> anyhow::Result<String> {
    let Some(records) = store::read_enriched(&paths.enriched())? else {
        tracing::warn!(
            path = %paths.enriched().display(),
            "enriched table not found, showing placeholder"
        );
        return Ok(placeholder());
    };
    let summary = store::read_summary(&paths.summary())?;
    Ok(render(&records, summary.as_ref(), filter, today))
}

pub fn render(
    records: &[EnrichedRecord],
    summary: Option<&SummaryStats>,
    filter: &DashboardFilter,
    today: NaiveDate,
) -> String {
    let filtered = filter.apply(records);
    let open = by_days_remaining(&filtered, Status::CurrentlyOpen);
    let upcoming = by_days_remaining(&filtered, Status::UpcomingOpen);
    let closed = filtered
        .iter()
        .filter(|record| record.status == Status::Closed)
        .count();

    let mut output = String::new();
    let _ = writeln!(output, "# Scholarship Timeline Dashboard");
    let _ = writeln!(output, "Master & PhD scholarship windows as of {today}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Total: {}", filtered.len());
    let _ = writeln!(output, "- Open now: {}", open.len());
    let _ = writeln!(output, "- Opening soon: {}", upcoming.len());
    let _ = writeln!(output, "- Closed: {closed}");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Timeline");
    if filtered.is_empty() {
        let _ = writeln!(output, "No scholarships match the current filters.");
    } else {
        output.push_str(&timeline_chart(&filtered, today));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Open Now");
    if open.is_empty() {
        let _ = writeln!(output, "No scholarships are open right now.");
    } else {
        for record in open {
            let _ = writeln!(
                output,
                "- {} ({}, {}): closes {}, {} left",
                record.record.name,
                record.record.degree_level,
                record.record.country,
                display_date(record.record.closes_on),
                days(record.days_remaining)
            );
            let _ = writeln!(output, "  {}", record.record.description);
            let _ = writeln!(output, "  {}", record.record.url);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Opening Soon");
    if upcoming.is_empty() {
        let _ = writeln!(output, "No scholarships are opening soon.");
    } else {
        for record in upcoming {
            let _ = writeln!(
                output,
                "- {} ({}, {}): opens {} in {}, closes {}",
                record.record.name,
                record.record.degree_level,
                record.record.country,
                display_date(record.record.opens_on),
                days(record.days_remaining),
                display_date(record.record.closes_on)
            );
            let _ = writeln!(output, "  {}", record.record.description);
            let _ = writeln!(output, "  {}", record.record.url);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## All Scholarships");
    if filtered.is_empty() {
        let _ = writeln!(output, "No scholarships match the current filters.");
    } else {
        let _ = writeln!(output, "| Name | Degree | Country | Opens | Closes | Status |");
        let _ = writeln!(output, "| --- | --- | --- | --- | --- | --- |");
        for record in &filtered {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} |",
                record.record.name,
                record.record.degree_level,
                record.record.country,
                display_date(record.record.opens_on),
                display_date(record.record.closes_on),
                record.status_label()
            );
        }
    }

    if let Some(summary) = summary {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "Last updated: {}",
            summary.last_update.format("%d %B %Y, %H:%M UTC")
        );
    }

    output
}

fn timeline_chart(records: &[&EnrichedRecord], today: NaiveDate) -> String {
    // both ends of every window stay inside the axis, even inverted ones
    let dates = || {
        records
            .iter()
            .flat_map(|record| [record.record.opens_on, record.record.closes_on])
    };
    let start = dates().min().unwrap_or(today).min(today);
    let end = dates().max().unwrap_or(today).max(today);
    let span = (end - start).num_days().max(1);
    let column = |date: NaiveDate| ((date - start).num_days() * (CHART_WIDTH - 1) / span) as usize;
    let today_column = column(today);

    let mut output = String::new();
    let _ = writeln!(output, "```");
    let _ = writeln!(
        output,
        "{:<width$} {}{}",
        "",
        " ".repeat(today_column),
        "v today",
        width = NAME_WIDTH
    );

    for record in records {
        let mut bar = vec![' '; CHART_WIDTH as usize];
        let glyph = glyph(record.status);
        let (first, last) = (column(record.record.opens_on), column(record.record.closes_on));
        if first <= last {
            for cell in &mut bar[first..=last] {
                *cell = glyph;
            }
        }
        bar[today_column] = '|';
        let _ = writeln!(
            output,
            "{:<width$} {}",
            clip(&record.record.name, NAME_WIDTH),
            bar.into_iter().collect::<String>(),
            width = NAME_WIDTH
        );
    }

    let _ = writeln!(
        output,
        "{:<width$} {} .. {}",
        "",
        start,
        end,
        width = NAME_WIDTH
    );
    let _ = writeln!(output, "```");
    let _ = writeln!(output, "Legend: # open, ~ opening soon, - closed, | today");
    output
}

fn glyph(status: Status) -> char {
    match status {
        Status::CurrentlyOpen => '#',
        Status::UpcomingOpen => '~',
        Status::Closed => '-',
    }
}

fn clip(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut clipped: String = name.chars().take(width - 3).collect();
    clipped.push_str("...");
    clipped
}

fn display_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

fn days(count: i64) -> String {
    if count == 1 {
        "1 day".to_string()
    } else {
        format!("{count} days")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScholarshipRecord;
    use chrono::{Duration, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 20).unwrap()
    }

    fn enriched(
        name: &str,
        degree_level: DegreeLevel,
        country: &str,
        status: Status,
        days_remaining: i64,
    ) -> EnrichedRecord {
        EnrichedRecord {
            record: ScholarshipRecord {
                name: name.to_string(),
                degree_level,
                country: country.to_string(),
                opens_on: today() - Duration::days(30),
                closes_on: today() + Duration::days(30),
                url: format!("https://example.org/{}", name.to_lowercase()),
                description: format!("{name} programme"),
            },
            status,
            days_remaining,
        }
    }

    fn sample() -> Vec<EnrichedRecord> {
        vec![
            enriched("Chevening", DegreeLevel::Master, "UK", Status::CurrentlyOpen, 18),
            enriched("DAAD", DegreeLevel::MasterPhd, "Germany", Status::CurrentlyOpen, 4),
            enriched("Fulbright", DegreeLevel::Phd, "USA", Status::UpcomingOpen, 20),
            enriched("MEXT", DegreeLevel::MasterPhd, "Japan", Status::UpcomingOpen, 7),
            enriched("KGSP", DegreeLevel::MasterPhd, "South Korea", Status::Closed, 0),
        ]
    }

    #[test]
    fn filters_combine_with_and() {
        let records = sample();
        let filter = DashboardFilter {
            degrees: vec![DegreeLevel::MasterPhd],
            countries: vec!["germany".to_string(), "Japan".to_string()],
            status: Some(Status::UpcomingOpen),
        };

        let names: Vec<&str> = filter
            .apply(&records)
            .iter()
            .map(|r| r.record.name.as_str())
            .collect();
        assert_eq!(names, vec!["MEXT"]);
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let records = sample();
        assert_eq!(DashboardFilter::default().apply(&records).len(), records.len());
    }

    #[test]
    fn lists_sort_by_days_remaining() {
        let records = sample();
        let all: Vec<&EnrichedRecord> = records.iter().collect();

        let open: Vec<i64> = by_days_remaining(&all, Status::CurrentlyOpen)
            .iter()
            .map(|r| r.days_remaining)
            .collect();
        let upcoming: Vec<&str> = by_days_remaining(&all, Status::UpcomingOpen)
            .iter()
            .map(|r| r.record.name.as_str())
            .collect();

        assert_eq!(open, vec![4, 18]);
        assert_eq!(upcoming, vec!["MEXT", "Fulbright"]);
    }

    #[test]
    fn render_lists_open_before_later_deadline() {
        let records = sample();
        let summary = SummaryStats {
            total: 5,
            currently_open: 2,
            upcoming_open: 2,
            closed: 1,
            last_update: Utc.with_ymd_and_hms(2024, 10, 20, 6, 30, 0).unwrap(),
        };

        let output = render(&records, Some(&summary), &DashboardFilter::default(), today());

        assert!(output.contains("- Open now: 2"));
        assert!(output.contains("- Closed: 1"));
        let daad = output.find("- DAAD").unwrap();
        let chevening = output.find("- Chevening").unwrap();
        assert!(daad < chevening);
        assert!(output.contains("| KGSP | Master/PhD | South Korea |"));
        assert!(output.contains("Last updated: 20 October 2024, 06:30 UTC"));
    }

    #[test]
    fn chart_marks_today_on_every_bar() {
        let records = sample();
        let refs: Vec<&EnrichedRecord> = records.iter().collect();
        let chart = timeline_chart(&refs, today());

        let bars: Vec<&str> = chart
            .lines()
            .filter(|line| line.starts_with("Chevening") || line.starts_with("KGSP"))
            .collect();
        assert_eq!(bars.len(), 2);
        assert!(bars.iter().all(|line| line.contains('|')));
        assert!(bars[0].contains('#'));
        assert!(bars[1].contains('-'));
    }

    #[test]
    fn long_names_are_clipped() {
        let clipped = clip("New Zealand ASEAN Scholars Awards for Doctoral Study", 20);
        assert_eq!(clipped.chars().count(), 20);
        assert!(clipped.ends_with("..."));
    }

    #[test]
    fn missing_summary_drops_the_footer() {
        let records = sample();
        let output = render(&records, None, &DashboardFilter::default(), today());

        assert!(output.contains("## All Scholarships"));
        assert!(!output.contains("Last updated"));
    }

    #[test]
    fn inverted_window_does_not_break_the_chart() {
        let mut record = enriched("Fulbright", DegreeLevel::Phd, "USA", Status::Closed, 0);
        record.record.opens_on = today() + Duration::days(20);
        record.record.closes_on = today() - Duration::days(200);
        let chart = timeline_chart(&[&record], today());

        let bar = chart
            .lines()
            .find(|line| line.starts_with("Fulbright"))
            .unwrap();
        assert!(bar.contains('|'));
        assert!(!bar.contains('-'));
    }

    #[test]
    fn load_without_pipeline_output_shows_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());

        let output = load(&paths, &DashboardFilter::default(), today()).unwrap();

        assert_eq!(output, placeholder());
    }

    #[test]
    fn load_renders_enriched_table_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        let records = sample();
        let summary = SummaryStats {
            total: 5,
            currently_open: 2,
            upcoming_open: 2,
            closed: 1,
            last_update: Utc.with_ymd_and_hms(2024, 10, 20, 6, 30, 0).unwrap(),
        };
        store::write_atomic(&paths.enriched(), &store::enriched_csv(&records).unwrap()).unwrap();
        store::write_atomic(&paths.summary(), &store::summary_json(&summary).unwrap()).unwrap();

        let filter = DashboardFilter {
            status: Some(Status::CurrentlyOpen),
            ..DashboardFilter::default()
        };
        let output = load(&paths, &filter, today()).unwrap();

        assert!(output.contains("- Total: 2"));
        assert!(output.contains("Last updated: 20 October 2024, 06:30 UTC"));
    }

    #[test]
    fn placeholder_mentions_pipeline() {
        assert!(placeholder().contains("Waiting for pipeline"));
    }
}
