use crate::errors::StoreError;
use crate::models::HabitRecord;
use crate::storage::HabitStore;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Every stored record, ascending by timestamp.
///
/// ISO-8601 timestamps in the same zone sort chronologically as plain strings,
/// so the comparison is lexicographic. Ties fall back to the id so that the
/// view is stable across calls. Recomputed from the store on every call.
pub async fn get_all_sorted(store: &dyn HabitStore) -> Result<Vec<HabitRecord>, StoreError> {
    let mut records = Vec::new();
    store.iterate(&mut |value, _key| records.push(value.clone())).await?;
    sort_records(&mut records);
    Ok(records)
}

pub fn sort_records(records: &mut [HabitRecord]) {
    records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
}

#[derive(Debug, PartialEq, Eq)]
pub struct DayGroup<'a> {
    pub date: &'a str,
    pub records: Vec<&'a HabitRecord>,
}

/// Groups an already sorted slice by calendar date, preserving order.
pub fn group_by_day(sorted: &[HabitRecord]) -> Vec<DayGroup<'_>> {
    let mut groups: Vec<DayGroup<'_>> = Vec::new();
    for record in sorted {
        match groups.last_mut() {
            Some(group) if group.date == record.date_key() => group.records.push(record),
            _ => groups.push(DayGroup {
                date: record.date_key(),
                records: vec![record],
            }),
        }
    }
    groups
}

/// Renders the sorted records as one boxed date header per day followed by a
/// bullet per entry, with times shown in `tz`.
pub fn export_markdown<Tz>(sorted: &[HabitRecord], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut markdown = String::new();
    for group in group_by_day(sorted) {
        let border = format!("+{}+\n", "-".repeat(group.date.chars().count() + 2));
        markdown.push_str(&border);
        markdown.push_str(&format!("| {} |\n", group.date));
        markdown.push_str(&border);
        for record in group.records {
            let time = match parse_timestamp(&record.timestamp, tz) {
                Some(at) => at.format("%H:%M").to_string().replace(':', "u"),
                None => record.timestamp.clone(),
            };
            markdown.push_str(&format!("- {}: {}\n", time, record.description));
        }
    }
    markdown
}

/// Dutch locale date-time, e.g. `1-1-2024, 09:00:00`.
pub fn format_table_timestamp<Tz>(timestamp: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match parse_timestamp(timestamp, tz) {
        Some(at) => at.format("%-d-%-m-%Y, %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

fn parse_timestamp<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|at| at.with_timezone(tz))
}
