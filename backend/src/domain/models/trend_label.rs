//! Human-relative labels for trend chart buckets.
use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendLabel {
    Today,
    Yesterday,
    /// Any other date, labelled by its own weekday
    Weekday(Weekday),
    /// Placeholder bucket when there is no dated sale at all
    NoSales,
}

impl TrendLabel {
    /// Label for `date` relative to the reference calendar date.
    ///
    /// Dates after the reference day fall through to their weekday.
    pub fn for_date(date: NaiveDate, reference: NaiveDate) -> Self {
        match (reference - date).num_days() {
            0 => TrendLabel::Today,
            1 => TrendLabel::Yesterday,
            _ => TrendLabel::Weekday(date.weekday()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Today => "Today",
            TrendLabel::Yesterday => "Yesterday",
            TrendLabel::NoSales => "No Sales",
            TrendLabel::Weekday(day) => match day {
                Weekday::Sun => "Sun",
                Weekday::Mon => "Mon",
                Weekday::Tue => "Tue",
                Weekday::Wed => "Wed",
                Weekday::Thu => "Thu",
                Weekday::Fri => "Fri",
                Weekday::Sat => "Sat",
            },
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
