use std::cmp::Ordering;

use chrono::Month;

/// Calendar key parsed from a `MON-YY` label such as `JAN-24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn parse(label: &str) -> Option<Self> {
        let (mon, year) = label.trim().split_once('-')?;
        let month = mon.trim().parse::<Month>().ok()?.number_from_month();
        let year = year.trim().parse::<i32>().ok()?;
        let year = if year < 100 { 2000 + year } else { year };
        Some(Self { year, month })
    }
}

/// Chronological ordering of month labels. Labels that do not parse sort
/// before every valid month and fall back to text order among themselves.
pub fn compare_month_labels(a: &str, b: &str) -> Ordering {
    match (MonthKey::parse(a), MonthKey::parse(b)) {
        (Some(left), Some(right)) => left.cmp(&right).then_with(|| a.cmp(b)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

pub fn sort_months(labels: &mut [String]) {
    labels.sort_by(|a, b| compare_month_labels(a, b));
}
