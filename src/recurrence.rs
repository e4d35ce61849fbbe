use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How an event template repeats over the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    /// A one-off template; never expanded by the occurrence engine.
    None,
    Daily,
    /// Fires on the weekday of the anchor date.
    Weekly,
    /// Monday through Friday.
    Weekdays,
    /// Fires on an explicit set of weekdays.
    Custom,
}

impl RecurrenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceKind::None => "none",
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Weekdays => "weekdays",
            RecurrenceKind::Custom => "custom",
        }
    }
}

impl FromStr for RecurrenceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(RecurrenceKind::None),
            "daily" => Ok(RecurrenceKind::Daily),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "weekdays" => Ok(RecurrenceKind::Weekdays),
            "custom" => Ok(RecurrenceKind::Custom),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RecurrenceValidationError {
    EmptyCustomWeekdays,
    WindowEndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for RecurrenceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceValidationError::EmptyCustomWeekdays => {
                write!(f, "custom recurrence requires at least one weekday")
            }
            RecurrenceValidationError::WindowEndBeforeStart { start, end } => write!(
                f,
                "recurrence window end {end} is before its start {start}"
            ),
        }
    }
}

impl std::error::Error for RecurrenceValidationError {}

/// The repetition rule embedded in an event template. Read-only to the
/// materializer; mutated only by template edits and activation toggling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    pub kind: RecurrenceKind,
    /// The date the pattern is defined relative to; picks the weekday for
    /// `Weekly`.
    pub anchor_date: NaiveDate,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub custom_weekdays: HashSet<Weekday>,
    /// Inclusive window in which the pattern is considered active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl RecurrencePattern {
    pub fn once(anchor_date: NaiveDate) -> Self {
        Self::with_kind(RecurrenceKind::None, anchor_date)
    }

    pub fn daily(anchor_date: NaiveDate) -> Self {
        Self::with_kind(RecurrenceKind::Daily, anchor_date)
    }

    pub fn weekly(anchor_date: NaiveDate) -> Self {
        Self::with_kind(RecurrenceKind::Weekly, anchor_date)
    }

    pub fn weekdays(anchor_date: NaiveDate) -> Self {
        Self::with_kind(RecurrenceKind::Weekdays, anchor_date)
    }

    pub fn custom<I>(anchor_date: NaiveDate, weekdays: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        let mut pattern = Self::with_kind(RecurrenceKind::Custom, anchor_date);
        pattern.custom_weekdays = weekdays.into_iter().collect();
        pattern
    }

    fn with_kind(kind: RecurrenceKind, anchor_date: NaiveDate) -> Self {
        Self {
            kind,
            anchor_date,
            custom_weekdays: HashSet::new(),
            start_date: None,
            end_date: None,
            is_active: true,
        }
    }

    pub fn with_window(mut self, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        self.start_date = Some(start);
        self.end_date = end;
        self
    }

    /// Structural checks, run when a template is defined or edited.
    pub fn validate(&self) -> Result<(), RecurrenceValidationError> {
        if self.kind == RecurrenceKind::Custom && self.custom_weekdays.is_empty() {
            return Err(RecurrenceValidationError::EmptyCustomWeekdays);
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(RecurrenceValidationError::WindowEndBeforeStart { start, end });
            }
        }
        Ok(())
    }

    /// Whether the pattern fires on a given date.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        match self.kind {
            RecurrenceKind::None => false,
            RecurrenceKind::Daily => true,
            RecurrenceKind::Weekly => date.weekday() == self.anchor_date.weekday(),
            RecurrenceKind::Weekdays => {
                !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            }
            RecurrenceKind::Custom => self.custom_weekdays.contains(&date.weekday()),
        }
    }

    /// First firing date in `from ..= from + horizon_days`, scanning day by
    /// day. The horizon bounds the scan: daily and custom patterns without an
    /// end date would otherwise be unbounded.
    pub fn next_occurrence(&self, from: NaiveDate, horizon_days: u32) -> Option<NaiveDate> {
        (0..=i64::from(horizon_days))
            .map(|offset| from + Duration::days(offset))
            .find(|date| self.occurs_on(*date))
    }
}

/// Weekday from the store-facing 0=Sunday..6=Saturday numbering.
pub fn weekday_from_sunday_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Inverse of [`weekday_from_sunday_index`].
pub fn sunday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}
