//! Semantic analyzer: expression tree → normalized schedule
//!
//! Lowers each fragment into candidate [`ScheduleUnit`] records, validating
//! value ranges and start-clause kinds as the candidates are built, then
//! applies the expression-level rules: duplicate detection, defaulting of
//! absent dimensions, and the canonical sort.
//!
//! Analysis is strictly fail-fast. The first violated rule aborts the whole
//! translation; errors are never aggregated.

use thiserror::Error;
use tracing::debug;

use crate::ast::{
    ClockTime, ExactFragment, Expression, Fragment, IntervalFragment, MonthName, NumberList,
    Span, StartClause, TimeUnit, TimeValue, UnitKeyword,
};
use crate::diagnostics::SourceSpan;
use crate::schedule::{FieldSpec, FieldValue, IntervalStart, ScheduleField, ScheduleUnit};

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Validation error: the text matches the grammar but violates a semantic
/// constraint. Position-carrying variants point at the offending source text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Ambiguous specifications found for unit(s): [{}]", .units.join(", "))]
    AmbiguousUnits { units: Vec<String> },

    #[error("{span}: Expected a time unit (seconds, minutes, hours).")]
    ExpectedTimeUnit { span: SourceSpan },

    #[error("{span}: Invalid time value(s) {}", join_values(.values))]
    InvalidTimeValues { values: Vec<i64>, span: SourceSpan },

    #[error("{span}: Invalid hour {value}. Only values between 0 and 23 are supported.")]
    InvalidHour { value: i64, span: SourceSpan },

    #[error("{span}: Invalid minute {value}. Only values between 0 and 59 are supported.")]
    InvalidMinute { value: i64, span: SourceSpan },

    #[error("{span}: Invalid second {value}. Only values between 0 and 59 are supported.")]
    InvalidSecond { value: i64, span: SourceSpan },

    #[error("{span}: Invalid day(s) of month {}", join_values(.values))]
    InvalidDaysOfMonth { values: Vec<i64>, span: SourceSpan },

    #[error(
        "{span}: Invalid year(s) {}. Only years between 1970 and 2099 are supported.",
        join_values(.values)
    )]
    InvalidYears { values: Vec<i64>, span: SourceSpan },

    #[error("{span}: Invalid time value {value}. Only values between 0 and 59 are supported.")]
    InvalidStartTime { value: i64, span: SourceSpan },

    #[error("{span}: Invalid day of month {value}. Only values between 1 and 31 are supported.")]
    InvalidStartDayOfMonth { value: i64, span: SourceSpan },

    #[error("{span}: Invalid year {value}. Only years between 1970 and 2099 are supported.")]
    InvalidStartYear { value: i64, span: SourceSpan },

    #[error("{span}: Expected {expected} for the starting point")]
    StartClauseMismatch {
        expected: &'static str,
        span: SourceSpan,
    },
}

fn join_values(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// ANALYSIS
// =============================================================================

/// Analyze a parsed expression into the normalized 7-record schedule.
///
/// `source` is the text the expression was parsed from; it is only used to
/// convert byte-offset spans into line/column positions for errors.
pub fn analyze(source: &str, expression: &Expression) -> Result<Vec<ScheduleUnit>, ValidationError> {
    let mut units: Vec<ScheduleUnit> = Vec::new();
    for fragment in &expression.fragments {
        match fragment {
            Fragment::Exact(exact) => lower_exact(source, exact, &mut units)?,
            Fragment::Interval(interval) => units.push(lower_interval(source, interval)?),
        }
    }

    check_duplicates(&units)?;

    for field in ScheduleField::CANONICAL_ORDER {
        if !units.iter().any(|u| u.field == field) {
            units.push(ScheduleUnit::unspecified(field));
        }
    }
    units.sort_by_key(|u| u.field);

    debug!(units = units.len(), "analyzed expression");
    Ok(units)
}

// =============================================================================
// FRAGMENT LOWERING
// =============================================================================

fn lower_exact(
    source: &str,
    exact: &ExactFragment,
    units: &mut Vec<ScheduleUnit>,
) -> Result<(), ValidationError> {
    match exact {
        ExactFragment::Time(time) => match &time.value {
            TimeValue::UnitAndValues { unit, values }
            | TimeValue::ValuesAndUnit { values, unit } => {
                units.push(lower_explicit_time(source, unit, values)?);
            }
            TimeValue::Clock(clock) => lower_clock(source, clock, units)?,
        },
        ExactFragment::DayOfWeek(dow) => {
            units.push(ScheduleUnit {
                field: ScheduleField::DayOfWeek,
                spec: FieldSpec::Values(dow.values.iter().map(|d| FieldValue::Weekday(*d)).collect()),
            });
        }
        ExactFragment::DayOfMonth(dom) => {
            let invalid = out_of_range(&dom.values, 1, 31);
            if !invalid.is_empty() {
                return Err(ValidationError::InvalidDaysOfMonth {
                    values: invalid,
                    span: span_of(source, dom.values.span),
                });
            }
            units.push(ScheduleUnit {
                field: ScheduleField::DayOfMonth,
                spec: number_values(&dom.values),
            });
        }
        ExactFragment::Month(month) => {
            units.push(ScheduleUnit {
                field: ScheduleField::Month,
                spec: FieldSpec::Values(
                    month.values.iter().map(|m| FieldValue::Month(*m)).collect(),
                ),
            });
        }
        ExactFragment::Year(year) => {
            let invalid = out_of_range(&year.values, 1970, 2099);
            if !invalid.is_empty() {
                return Err(ValidationError::InvalidYears {
                    values: invalid,
                    span: span_of(source, year.values.span),
                });
            }
            units.push(ScheduleUnit {
                field: ScheduleField::Year,
                spec: number_values(&year.values),
            });
        }
    }
    Ok(())
}

/// `NumericList Unit` / `Unit NumericList`: the unit must be a time unit,
/// and the values must fit its range.
fn lower_explicit_time(
    source: &str,
    unit: &UnitKeyword,
    values: &NumberList,
) -> Result<ScheduleUnit, ValidationError> {
    let field = match unit.unit {
        TimeUnit::Second => ScheduleField::Second,
        TimeUnit::Minute => ScheduleField::Minute,
        TimeUnit::Hour => ScheduleField::Hour,
        TimeUnit::Day | TimeUnit::Month | TimeUnit::Year => {
            return Err(ValidationError::ExpectedTimeUnit {
                span: span_of(source, unit.span),
            });
        }
    };

    let max = if field == ScheduleField::Hour { 23 } else { 59 };
    let invalid = out_of_range(values, 0, max);
    if !invalid.is_empty() {
        return Err(ValidationError::InvalidTimeValues {
            values: invalid,
            span: span_of(source, values.span),
        });
    }

    Ok(ScheduleUnit {
        field,
        spec: number_values(values),
    })
}

/// An `HH:MM[:SS]` literal specifies hour, minute and second in one step.
/// An omitted seconds component still claims the second dimension, as 0.
fn lower_clock(
    source: &str,
    clock: &ClockTime,
    units: &mut Vec<ScheduleUnit>,
) -> Result<(), ValidationError> {
    if !(0..=23).contains(&clock.hour.value) {
        return Err(ValidationError::InvalidHour {
            value: clock.hour.value,
            span: span_of(source, clock.hour.span),
        });
    }
    if !(0..=59).contains(&clock.minute.value) {
        return Err(ValidationError::InvalidMinute {
            value: clock.minute.value,
            span: span_of(source, clock.minute.span),
        });
    }
    if let Some(second) = clock.second {
        if !(0..=59).contains(&second.value) {
            return Err(ValidationError::InvalidSecond {
                value: second.value,
                span: span_of(source, second.span),
            });
        }
    }

    units.push(ScheduleUnit {
        field: ScheduleField::Hour,
        spec: FieldSpec::Values(vec![FieldValue::Number(clock.hour.value)]),
    });
    units.push(ScheduleUnit {
        field: ScheduleField::Minute,
        spec: FieldSpec::Values(vec![FieldValue::Number(clock.minute.value)]),
    });
    units.push(ScheduleUnit {
        field: ScheduleField::Second,
        spec: FieldSpec::Values(vec![FieldValue::Number(
            clock.second.map(|n| n.value).unwrap_or(0),
        )]),
    });
    Ok(())
}

fn lower_interval(
    source: &str,
    interval: &IntervalFragment,
) -> Result<ScheduleUnit, ValidationError> {
    // A literal 0 step collapses to the default of 1.
    let step = interval
        .step
        .map(|n| n.value)
        .filter(|v| *v != 0)
        .unwrap_or(1);

    let start = interval
        .start
        .as_ref()
        .map(|clause| lower_start(source, clause))
        .transpose()?;

    let (field, from) = match interval.unit.unit {
        TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour => {
            let field = match interval.unit.unit {
                TimeUnit::Second => ScheduleField::Second,
                TimeUnit::Minute => ScheduleField::Minute,
                _ => ScheduleField::Hour,
            };
            let from = match start {
                None => IntervalStart::Number(0),
                Some(LoweredStart {
                    value: StartValue::Time(v),
                    ..
                }) => IntervalStart::Number(v),
                Some(other) => {
                    return Err(ValidationError::StartClauseMismatch {
                        expected: "a time value",
                        span: other.span,
                    });
                }
            };
            (field, from)
        }
        TimeUnit::Day => {
            let from = match start {
                None => IntervalStart::Number(0),
                Some(LoweredStart {
                    value: StartValue::DayOfMonth(v),
                    ..
                }) => IntervalStart::Number(v),
                Some(other) => {
                    return Err(ValidationError::StartClauseMismatch {
                        expected: "a day of month",
                        span: other.span,
                    });
                }
            };
            (ScheduleField::DayOfMonth, from)
        }
        TimeUnit::Month => {
            let from = match start {
                None => IntervalStart::Number(0),
                Some(LoweredStart {
                    value: StartValue::Month(m),
                    ..
                }) => IntervalStart::Month(m),
                Some(other) => {
                    return Err(ValidationError::StartClauseMismatch {
                        expected: "a month",
                        span: other.span,
                    });
                }
            };
            (ScheduleField::Month, from)
        }
        TimeUnit::Year => {
            let from = match start {
                None => IntervalStart::Number(0),
                Some(LoweredStart {
                    value: StartValue::Year(v),
                    ..
                }) => IntervalStart::Number(v),
                Some(other) => {
                    return Err(ValidationError::StartClauseMismatch {
                        expected: "a year",
                        span: other.span,
                    });
                }
            };
            (ScheduleField::Year, from)
        }
    };

    Ok(ScheduleUnit {
        field,
        spec: FieldSpec::Interval { step, from },
    })
}

/// A start clause lowered on its own terms: its value is range-checked by
/// its declared kind before the enclosing interval checks that the kind
/// matches the unit.
struct LoweredStart {
    value: StartValue,
    span: SourceSpan,
}

enum StartValue {
    Time(i64),
    Weekday,
    DayOfMonth(i64),
    Year(i64),
    Month(MonthName),
}

fn lower_start(source: &str, clause: &StartClause) -> Result<LoweredStart, ValidationError> {
    match clause {
        StartClause::Time(n) => {
            if !(0..=59).contains(&n.value) {
                return Err(ValidationError::InvalidStartTime {
                    value: n.value,
                    span: span_of(source, n.span),
                });
            }
            Ok(LoweredStart {
                value: StartValue::Time(n.value),
                span: span_of(source, n.span),
            })
        }
        StartClause::Weekday { span, .. } => Ok(LoweredStart {
            value: StartValue::Weekday,
            span: span_of(source, *span),
        }),
        StartClause::DayOfMonth(n) => {
            if !(1..=31).contains(&n.value) {
                return Err(ValidationError::InvalidStartDayOfMonth {
                    value: n.value,
                    span: span_of(source, n.span),
                });
            }
            Ok(LoweredStart {
                value: StartValue::DayOfMonth(n.value),
                span: span_of(source, n.span),
            })
        }
        StartClause::Year(n) => {
            if !(1970..=2099).contains(&n.value) {
                return Err(ValidationError::InvalidStartYear {
                    value: n.value,
                    span: span_of(source, n.span),
                });
            }
            Ok(LoweredStart {
                value: StartValue::Year(n.value),
                span: span_of(source, n.span),
            })
        }
        StartClause::Month { month, span } => Ok(LoweredStart {
            value: StartValue::Month(*month),
            span: span_of(source, *span),
        }),
    }
}

// =============================================================================
// EXPRESSION-LEVEL RULES
// =============================================================================

/// Two fragments claiming the same unit name are ambiguous. The day-of-week
/// and day-of-month axes both answer to "day".
fn check_duplicates(units: &[ScheduleUnit]) -> Result<(), ValidationError> {
    let mut seen: Vec<&str> = Vec::new();
    let mut duplicated: Vec<String> = Vec::new();
    for unit in units {
        let name = unit.field.unit_name();
        if seen.contains(&name) {
            if !duplicated.iter().any(|d| d == name) {
                duplicated.push(name.to_string());
            }
        } else {
            seen.push(name);
        }
    }

    if duplicated.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::AmbiguousUnits { units: duplicated })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn span_of(source: &str, span: Span) -> SourceSpan {
    SourceSpan::from_byte_offset(source, span.start, span.end)
}

fn out_of_range(values: &NumberList, min: i64, max: i64) -> Vec<i64> {
    values
        .items
        .iter()
        .map(|n| n.value)
        .filter(|v| !(min..=max).contains(v))
        .collect()
}

fn number_values(values: &NumberList) -> FieldSpec {
    FieldSpec::Values(
        values
            .items
            .iter()
            .map(|n| FieldValue::Number(n.value))
            .collect(),
    )
}

// =============================================================================
// TESTS
// =============================================================================
