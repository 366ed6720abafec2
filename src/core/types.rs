use crate::errors::{Error, Result};
use crate::extensions::enums::valid_csv;
use crate::extensions::string::ToDashSeparators;
use chrono::{Datelike, Local, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter as EnumIterDerive, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    AsRefStr,
    EnumIterDerive,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Draft,
    Published,
    CheckedIn,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const RESET: &'static str = crate::csi!("0m");

    pub fn try_from(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| {
            Error::Parse(format!(
                "Unsupported appointment status: '{}'. Valid statuses: {}",
                s.trim(),
                valid_csv::<AppointmentStatus>()
            ))
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Draft => "Draft",
            AppointmentStatus::Published => "Published",
            AppointmentStatus::CheckedIn => "Checked In",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    /// Foreground ANSI color used when painting this status in the terminal.
    pub fn ansi_fg(self) -> &'static str {
        match self {
            AppointmentStatus::Draft => crate::csi!("37m"),
            AppointmentStatus::Published => crate::csi!("34m"),
            AppointmentStatus::CheckedIn => crate::csi!("33m"),
            AppointmentStatus::Completed => crate::csi!("32m"),
            AppointmentStatus::Cancelled => crate::csi!("31m"),
        }
    }

    pub fn paint<S: AsRef<str>>(self, s: S) -> String {
        format!("{}{}{}", self.ansi_fg(), s.as_ref(), Self::RESET)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumString,
    Display,
    AsRefStr,
    EnumIterDerive,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrencePattern {
    pub fn try_from(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| {
            Error::Parse(format!(
                "Invalid recurrence pattern: '{}'. Valid patterns: {}",
                s.trim(),
                valid_csv::<RecurrencePattern>()
            ))
        })
    }
}

/// Weekday as stored on schedules: 0 = Sunday ... 6 = Saturday.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display, AsRefStr, EnumIterDerive,
)]
#[strum(ascii_case_insensitive)]
pub enum DayOfWeek {
    #[strum(serialize = "sunday", serialize = "sun", to_string = "Sunday")]
    Sun,
    #[strum(serialize = "monday", serialize = "mon", to_string = "Monday")]
    Mon,
    #[strum(serialize = "tuesday", serialize = "tue", to_string = "Tuesday")]
    Tue,
    #[strum(serialize = "wednesday", serialize = "wed", to_string = "Wednesday")]
    Wed,
    #[strum(serialize = "thursday", serialize = "thu", to_string = "Thursday")]
    Thu,
    #[strum(serialize = "friday", serialize = "fri", to_string = "Friday")]
    Fri,
    #[strum(serialize = "saturday", serialize = "sat", to_string = "Saturday")]
    Sat,
}

impl DayOfWeek {
    pub fn try_from(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| {
            Error::Parse(format!(
                "Invalid day of the week: '{}'. Valid days: {}",
                s.trim(),
                valid_csv::<DayOfWeek>()
            ))
        })
    }

    pub fn index(self) -> u8 {
        match self {
            DayOfWeek::Sun => 0,
            DayOfWeek::Mon => 1,
            DayOfWeek::Tue => 2,
            DayOfWeek::Wed => 3,
            DayOfWeek::Thu => 4,
            DayOfWeek::Fri => 5,
            DayOfWeek::Sat => 6,
        }
    }

    pub fn from_index(idx: u8) -> Result<Self> {
        DayOfWeek::iter()
            .find(|d| d.index() == idx)
            .ok_or_else(|| Error::Parse(format!("Day of week index {idx} is outside 0-6.")))
    }

    pub fn to_weekday(self) -> Weekday {
        match self {
            DayOfWeek::Sun => Weekday::Sun,
            DayOfWeek::Mon => Weekday::Mon,
            DayOfWeek::Tue => Weekday::Tue,
            DayOfWeek::Wed => Weekday::Wed,
            DayOfWeek::Thu => Weekday::Thu,
            DayOfWeek::Fri => Weekday::Fri,
            DayOfWeek::Sat => Weekday::Sat,
        }
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<<S as Serializer>::Ok, <S as Serializer>::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DayOfWeek, <D as Deserializer<'de>>::Error> {
        let s = String::deserialize(deserializer)?;
        DayOfWeek::try_from(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Date(pub NaiveDate);

#[derive(Copy, Clone, Debug, EnumIterDerive, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum DateFormat {
    #[strum(serialize = "%Y-%m-%d", to_string = "%Y-%m-%d")]
    YmdDash,
    #[strum(serialize = "%m-%d-%Y", to_string = "%m-%d-%Y")]
    MdYDash,
    #[strum(serialize = "%m-%d", to_string = "%m-%d")]
    MdDash,
}

#[derive(Debug, Clone)]
struct DateParseSpec {
    input: String,
    date_format: DateFormat,
}

impl DateFormat {
    fn build_parse_spec(self, input: &str) -> DateParseSpec {
        match self {
            DateFormat::YmdDash | DateFormat::MdYDash => DateParseSpec {
                input: input.to_owned(),
                date_format: self,
            },
            DateFormat::MdDash => DateParseSpec {
                input: format!("{}-{input}", Local::now().date_naive().year()),
                date_format: DateFormat::YmdDash,
            },
        }
    }
}

impl Date {
    pub fn usage() -> String {
        let today = Local::now().date_naive();
        let formats = DateFormat::iter()
            .map(|df| today.format(df.as_ref()).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Supported formats: {}", formats)
    }

    /// Accepts `/` or `-` separators; month-day input assumes the current year.
    pub fn try_from_str(input: &str) -> Result<Self> {
        let input = input.to_dash_separators();

        for f in DateFormat::iter() {
            let spec = f.build_parse_spec(&input);
            if let Ok(date) = NaiveDate::parse_from_str(&spec.input, spec.date_format.as_ref()) {
                return Ok(Date(date));
            }
        }

        Err(Error::Parse(format!(
            "Invalid date format: '{}'. {}",
            input,
            Self::usage()
        )))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Time-of-day window, e.g. a worker's shift on a schedule day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Copy, Clone, Debug, EnumIterDerive, AsRefStr, EnumString)]
pub enum TimeFormat {
    #[strum(serialize = "%H:%M")]
    Hm24,
    #[strum(serialize = "%-I:%M%p")]
    HmMeridian,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(Error::Parse(format!(
                "Start time '{}' must be earlier than end time '{}'.",
                start.format(TimeFormat::Hm24.as_ref()),
                end.format(TimeFormat::Hm24.as_ref())
            )));
        }
        Ok(TimeRange { start, end })
    }

    /// Parses `"08:00-17:00"` or `"8:00AM-5:00PM"`.
    pub fn try_from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (start, end) = s.split_once('-').ok_or_else(|| {
            Error::Parse(format!(
                "Invalid time range format: '{}'. Expected format: '<start>-<end>'.",
                s
            ))
        })?;
        Self::new(Self::parse_token(start)?, Self::parse_token(end)?)
    }

    fn parse_token(raw: &str) -> Result<NaiveTime> {
        let token = raw.trim().to_ascii_uppercase();
        TimeFormat::iter()
            .find_map(|f| NaiveTime::parse_from_str(&token, f.as_ref()).ok())
            .ok_or_else(|| {
                Error::Parse(format!(
                    "Invalid time format: '{}'. Use HH:MM or H:MMAM.",
                    raw.trim()
                ))
            })
    }

    pub fn hours(&self) -> f64 {
        (self.end - self.start).num_minutes() as f64 / 60.0
    }

    /// True when the window intersects `[from, to)` hours of the day.
    pub fn overlaps_hours(&self, from: u32, to: u32) -> bool {
        let start_h = self.start.hour() as f64 + self.start.minute() as f64 / 60.0;
        let end_h = self.end.hour() as f64 + self.end.minute() as f64 / 60.0;
        start_h < to as f64 && end_h > from as f64
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(TimeFormat::Hm24.as_ref()),
            self.end.format(TimeFormat::Hm24.as_ref())
        )
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<<S as Serializer>::Ok, <S as Serializer>::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeRange {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<TimeRange, <D as Deserializer<'de>>::Error> {
        let s = String::deserialize(deserializer)?;
        TimeRange::try_from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIterDerive)]
#[strum(ascii_case_insensitive)]
pub enum BoolFormat {
    #[strum(serialize = "true", serialize = "True", to_string = "True")]
    TextTrue,

    #[strum(serialize = "false", serialize = "False", to_string = "False")]
    TextFalse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bool(pub bool);

impl Bool {
    pub fn try_from_str(s: &str) -> Result<Self> {
        match BoolFormat::from_str(s.trim()) {
            Ok(fmt) => Ok(Bool(matches!(fmt, BoolFormat::TextTrue))),
            Err(_) => Err(Error::Parse(format!(
                "Invalid string value for boolean: '{}'. Valid values: {}",
                s,
                valid_csv::<BoolFormat>()
            ))),
        }
    }
}

impl fmt::Display for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.0 { "True" } else { "False" })
    }
}

impl Serialize for Bool {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<<S as Serializer>::Ok, <S as Serializer>::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Bool {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Bool, <D as Deserializer<'de>>::Error> {
        let b = String::deserialize(deserializer)?;
        Bool::try_from_str(&b).map_err(serde::de::Error::custom)
    }
}

/// Advisory coverage of a worker's schedule; sorts available first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Partial,
    Unavailable,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIterDerive, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityPeriod {
    Morning,
    Afternoon,
    Evening,
}

impl AvailabilityPeriod {
    /// Hour window `[from, to)` covered by the period.
    pub fn hours(self) -> (u32, u32) {
        match self {
            AvailabilityPeriod::Morning => (0, 12),
            AvailabilityPeriod::Afternoon => (12, 17),
            AvailabilityPeriod::Evening => (17, 24),
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            AvailabilityPeriod::Morning => "🌅",
            AvailabilityPeriod::Afternoon => "☀️",
            AvailabilityPeriod::Evening => "🌙",
        }
    }
}

/// Which instances of a series a save or delete touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIterDerive)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum EditScope {
    ThisOccurrence,
    ThisAndFuture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIterDerive)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum ViewKind {
    Day,
    Week,
    TimeGrid,
    Kanban,
    Orders,
}

impl ViewKind {
    pub fn try_from(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| {
            Error::Parse(format!(
                "Unknown view: '{}'. Valid views: {}",
                s.trim(),
                valid_csv::<ViewKind>()
            ))
        })
    }
}
