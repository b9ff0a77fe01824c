//! Normalized schedule model
//!
//! The analyzer lowers a parsed expression into exactly seven
//! [`ScheduleUnit`] records, one per [`ScheduleField`]. The generator treats
//! that list as immutable input. Nothing in this module survives past a
//! single translation call.

use serde::{Deserialize, Serialize};

use crate::ast::{MonthName, Weekday};

/// The seven canonical schedule dimensions, declared in canonical order.
///
/// The day axis is split structurally: `DayOfMonth` and `DayOfWeek` are
/// distinct fields here, but both answer to the unit name "day" for
/// ambiguity detection (see [`ScheduleField::unit_name`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ScheduleField {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

impl ScheduleField {
    /// All fields in canonical order: second, minute, hour, day-of-month,
    /// month, day-of-week, year.
    pub const CANONICAL_ORDER: [ScheduleField; 7] = [
        ScheduleField::Second,
        ScheduleField::Minute,
        ScheduleField::Hour,
        ScheduleField::DayOfMonth,
        ScheduleField::Month,
        ScheduleField::DayOfWeek,
        ScheduleField::Year,
    ];

    /// The unit name used for duplicate detection. Both day axes collapse
    /// to "day": specifying a day-of-week and a day-of-month in the same
    /// expression is ambiguous.
    pub fn unit_name(self) -> &'static str {
        match self {
            ScheduleField::Second => "second",
            ScheduleField::Minute => "minute",
            ScheduleField::Hour => "hour",
            ScheduleField::DayOfMonth | ScheduleField::DayOfWeek => "day",
            ScheduleField::Month => "month",
            ScheduleField::Year => "year",
        }
    }

    /// Whether the field appears in the rendered 5-field cron string.
    /// Second and year are computed but dropped from the output.
    pub fn is_rendered(self) -> bool {
        !matches!(self, ScheduleField::Second | ScheduleField::Year)
    }
}

/// One normalized record per schedule dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleUnit {
    pub field: ScheduleField,
    pub spec: FieldSpec,
}

impl ScheduleUnit {
    pub fn unspecified(field: ScheduleField) -> Self {
        Self {
            field,
            spec: FieldSpec::Unspecified,
        }
    }
}

/// What the expression said about a schedule dimension.
///
/// A record carries values or an interval, never both; `Unspecified` marks a
/// dimension the input left unconstrained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldSpec {
    Unspecified,
    Values(Vec<FieldValue>),
    Interval { step: i64, from: IntervalStart },
}

/// A resolved literal: plain number, or a canonical name for the month and
/// day-of-week axes (numeric mapping happens in the generator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValue {
    Number(i64),
    Month(MonthName),
    Weekday(Weekday),
}

/// Anchor of a periodic recurrence; a month start keeps its name until the
/// generator maps it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntervalStart {
    Number(i64),
    Month(MonthName),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_matches_enum_order() {
        let mut sorted = ScheduleField::CANONICAL_ORDER;
        sorted.sort();
        assert_eq!(sorted, ScheduleField::CANONICAL_ORDER);
    }

    #[test]
    fn test_day_axes_share_a_unit_name() {
        assert_eq!(ScheduleField::DayOfMonth.unit_name(), "day");
        assert_eq!(ScheduleField::DayOfWeek.unit_name(), "day");
        assert_eq!(ScheduleField::Minute.unit_name(), "minute");
    }

    #[test]
    fn test_second_and_year_are_not_rendered() {
        let rendered: Vec<ScheduleField> = ScheduleField::CANONICAL_ORDER
            .into_iter()
            .filter(|f| f.is_rendered())
            .collect();
        assert_eq!(
            rendered,
            vec![
                ScheduleField::Minute,
                ScheduleField::Hour,
                ScheduleField::DayOfMonth,
                ScheduleField::Month,
                ScheduleField::DayOfWeek,
            ]
        );
    }
}
