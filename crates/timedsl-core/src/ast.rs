//! Typed syntax tree for the time-expression grammar
//!
//! The tree is "raw" in the sense that no semantic rules have been applied
//! yet: a parsed expression may still carry out-of-range values, a non-time
//! unit next to a time value, or two fragments claiming the same schedule
//! dimension. The analyzer owns those rules.
//!
//! Every node that a semantic error can point at carries a byte-offset
//! [`Span`] into the source text; the analyzer converts those to 1-based
//! line/column positions when it builds an error.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source → Parser → Expression tree
//!                        ↓
//!                Semantic Analyzer
//!                        ↓
//!       Normalized ScheduleUnit list (7 entries)
//!                        ↓
//!                 Field Generator
//!                        ↓
//!      "minute hour day-of-month month day-of-week"
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// SOURCE SPANS
// =============================================================================

/// Byte-offset range into the original source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

// =============================================================================
// CORE TREE TYPES
// =============================================================================

/// A complete parsed expression: one or more schedule fragments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub fragments: Vec<Fragment>,
}

/// One self-contained fraction of the input, describing a single schedule
/// dimension (e.g. `at 09:00`, `every 5 minutes`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fragment {
    Exact(ExactFragment),
    Interval(IntervalFragment),
}

/// An exact (non-periodic) fragment, one variant per grammar alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExactFragment {
    /// `"at" Value`
    Time(ExactTime),
    /// `"on" WeekdayList`
    DayOfWeek(ExactDayOfWeek),
    /// `"on" ["days"|"day"] NumericList`
    DayOfMonth(ExactDayOfMonth),
    /// `"in" MonthList`
    Month(ExactMonth),
    /// `"in" NumericList`
    Year(ExactYear),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactTime {
    pub value: TimeValue,
}

/// The value part of an exact time fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimeValue {
    /// `hours 9, 17`
    UnitAndValues {
        unit: UnitKeyword,
        values: NumberList,
    },
    /// `9, 17 hours`
    ValuesAndUnit {
        values: NumberList,
        unit: UnitKeyword,
    },
    /// `HH:MM[:SS]`
    Clock(ClockTime),
}

/// A clock literal, each component exactly two digits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: Number,
    pub minute: Number,
    pub second: Option<Number>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactDayOfWeek {
    pub values: Vec<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactDayOfMonth {
    pub values: NumberList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactMonth {
    pub values: Vec<MonthName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactYear {
    pub values: NumberList,
}

/// `("every"|"each") [numeric] Unit ["starting" StartClause]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalFragment {
    pub step: Option<Number>,
    pub unit: UnitKeyword,
    pub start: Option<StartClause>,
}

/// The `"starting" …` suffix anchoring the first occurrence of an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StartClause {
    /// `"at" numeric`
    Time(Number),
    /// `"on" weekday`
    Weekday { day: Weekday, span: Span },
    /// `"on" ["day"] numeric`
    DayOfMonth(Number),
    /// `"in" numeric`
    Year(Number),
    /// `"in" month-name`
    Month { month: MonthName, span: Span },
}

// =============================================================================
// TERMINALS
// =============================================================================

/// A numeric literal (ordinal suffix already stripped)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Number {
    pub value: i64,
    pub span: Span,
}

/// A comma/"and"-separated list of numeric literals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberList {
    pub items: Vec<Number>,
    pub span: Span,
}

/// A time-unit keyword as written in the source (long or short form)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitKeyword {
    pub unit: TimeUnit,
    pub span: Span,
}

/// The six unit keywords of the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl TimeUnit {
    /// Resolve a unit keyword, long or short form, case-insensitively.
    /// Months have no short form (`m` is minutes).
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "seconds" | "second" | "s" => Some(TimeUnit::Second),
            "minutes" | "minute" | "m" => Some(TimeUnit::Minute),
            "hours" | "hour" | "h" => Some(TimeUnit::Hour),
            "days" | "day" | "d" => Some(TimeUnit::Day),
            "months" | "month" => Some(TimeUnit::Month),
            "years" | "year" | "y" => Some(TimeUnit::Year),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }
}

/// Canonical weekday, resolved from a full name or three-letter abbreviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "monday" | "mon" => Some(Weekday::Monday),
            "tuesday" | "tue" => Some(Weekday::Tuesday),
            "wednesday" | "wed" => Some(Weekday::Wednesday),
            "thursday" | "thu" => Some(Weekday::Thursday),
            "friday" | "fri" => Some(Weekday::Friday),
            "saturday" | "sat" => Some(Weekday::Saturday),
            "sunday" | "sun" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Cron day-of-week number: sunday=0 … saturday=6
    pub fn cron_number(self) -> i64 {
        match self {
            Weekday::Sunday => 0,
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }
}

/// Canonical month, resolved from a full name or three-letter abbreviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthName {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthName {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "january" | "jan" => Some(MonthName::January),
            "february" | "feb" => Some(MonthName::February),
            "march" | "mar" => Some(MonthName::March),
            "april" | "apr" => Some(MonthName::April),
            "may" => Some(MonthName::May),
            "june" | "jun" => Some(MonthName::June),
            "july" | "jul" => Some(MonthName::July),
            "august" | "aug" => Some(MonthName::August),
            "september" | "sep" => Some(MonthName::September),
            "october" | "oct" => Some(MonthName::October),
            "november" | "nov" => Some(MonthName::November),
            "december" | "dec" => Some(MonthName::December),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MonthName::January => "january",
            MonthName::February => "february",
            MonthName::March => "march",
            MonthName::April => "april",
            MonthName::May => "may",
            MonthName::June => "june",
            MonthName::July => "july",
            MonthName::August => "august",
            MonthName::September => "september",
            MonthName::October => "october",
            MonthName::November => "november",
            MonthName::December => "december",
        }
    }

    /// Cron month number: january=1 … december=12
    pub fn ordinal(self) -> i64 {
        match self {
            MonthName::January => 1,
            MonthName::February => 2,
            MonthName::March => 3,
            MonthName::April => 4,
            MonthName::May => 5,
            MonthName::June => 6,
            MonthName::July => 7,
            MonthName::August => 8,
            MonthName::September => 9,
            MonthName::October => 10,
            MonthName::November => 11,
            MonthName::December => 12,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_keyword_forms() {
        assert_eq!(TimeUnit::from_keyword("seconds"), Some(TimeUnit::Second));
        assert_eq!(TimeUnit::from_keyword("s"), Some(TimeUnit::Second));
        assert_eq!(TimeUnit::from_keyword("Minute"), Some(TimeUnit::Minute));
        assert_eq!(TimeUnit::from_keyword("HOURS"), Some(TimeUnit::Hour));
        assert_eq!(TimeUnit::from_keyword("y"), Some(TimeUnit::Year));
        // months deliberately have no short form
        assert_eq!(TimeUnit::from_keyword("m"), Some(TimeUnit::Minute));
        assert_eq!(TimeUnit::from_keyword("min"), None);
    }

    #[test]
    fn test_weekday_abbreviations() {
        assert_eq!(Weekday::from_keyword("wed"), Some(Weekday::Wednesday));
        assert_eq!(Weekday::from_keyword("Sunday"), Some(Weekday::Sunday));
        assert_eq!(Weekday::from_keyword("weds"), None);
    }

    #[test]
    fn test_weekday_cron_numbers() {
        assert_eq!(Weekday::Sunday.cron_number(), 0);
        assert_eq!(Weekday::Monday.cron_number(), 1);
        assert_eq!(Weekday::Saturday.cron_number(), 6);
    }

    #[test]
    fn test_month_ordinals() {
        assert_eq!(MonthName::from_keyword("jan"), Some(MonthName::January));
        assert_eq!(MonthName::from_keyword("December"), Some(MonthName::December));
        assert_eq!(MonthName::January.ordinal(), 1);
        assert_eq!(MonthName::December.ordinal(), 12);
    }
}
