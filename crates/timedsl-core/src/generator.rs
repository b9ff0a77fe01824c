//! Cron field generator
//!
//! Renders a normalized [`ScheduleUnit`] list into the 5-field cron string
//! `minute hour day-of-month month day-of-week`. Second and year are part of
//! the normalized model but the target format has no columns for them.
//!
//! Rendering is pure and deterministic: the same list always produces a
//! byte-identical string.
//!
//! Note the value shift: numeric values on the generic branch (second,
//! minute, hour and day-of-month alike) are decremented by 1 before
//! rendering, so an explicit minute 0 renders as -1. Interval anchors are
//! rendered as-is.

use tracing::trace;

use crate::schedule::{FieldSpec, FieldValue, IntervalStart, ScheduleField, ScheduleUnit};

/// Render the normalized unit list into the cron string.
pub fn generate(units: &[ScheduleUnit]) -> String {
    let cron = units
        .iter()
        .filter(|u| u.field.is_rendered())
        .map(render_field)
        .collect::<Vec<_>>()
        .join(" ");
    trace!(%cron, "rendered schedule");
    cron
}

fn render_field(unit: &ScheduleUnit) -> String {
    match &unit.spec {
        FieldSpec::Values(values) => values
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(","),
        FieldSpec::Interval { step, from } => {
            let from = match from {
                IntervalStart::Number(n) => *n,
                IntervalStart::Month(m) => m.ordinal(),
            };
            if *step == 1 && from == 0 {
                "*".to_string()
            } else if *step == 1 {
                format!("*/{}", from)
            } else {
                format!("{}/{}", step, from)
            }
        }
        FieldSpec::Unspecified => match unit.field {
            ScheduleField::DayOfWeek => "?".to_string(),
            ScheduleField::DayOfMonth | ScheduleField::Month | ScheduleField::Year => {
                "*".to_string()
            }
            // Unconstrained time units pin to 0.
            ScheduleField::Second | ScheduleField::Minute | ScheduleField::Hour => "0".to_string(),
        },
    }
}

fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Month(m) => m.ordinal().to_string(),
        FieldValue::Weekday(d) => d.cron_number().to_string(),
        FieldValue::Number(n) => (n - 1).to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
