//! End-to-end tests for the text → cron translation pipeline
//!
//! Exercises the full Parser → Analyzer → Generator chain through the public
//! API, the way the editing surface calls it: one UTF-8 string in, one cron
//! string or one structured error out.

use pretty_assertions::assert_eq;
use timedsl_core::{
    normalize, translate, FieldSpec, ScheduleField, SyntaxError, TranslateError, ValidationError,
};

fn translate_ok(input: &str) -> String {
    match translate(input) {
        Ok(cron) => cron,
        Err(e) => panic!("expected '{}' to translate, got: {}", input, e),
    }
}

fn validation_error(input: &str) -> ValidationError {
    match translate(input) {
        Err(TranslateError::Validation(e)) => e,
        Err(TranslateError::Syntax(e)) => {
            panic!("expected validation error for '{}', got syntax error: {}", input, e)
        }
        Ok(cron) => panic!("expected '{}' to fail, got '{}'", input, cron),
    }
}

fn syntax_error(input: &str) -> SyntaxError {
    match translate(input) {
        Err(TranslateError::Syntax(e)) => e,
        Err(TranslateError::Validation(e)) => {
            panic!("expected syntax error for '{}', got validation error: {}", input, e)
        }
        Ok(cron) => panic!("expected '{}' to fail, got '{}'", input, cron),
    }
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn test_exact_month_list() {
    assert_eq!(translate_ok("in january,march"), "0 0 * 1,3 ?");
}

#[test]
fn test_exact_weekday_list() {
    assert_eq!(translate_ok("on monday,friday"), "0 0 * * 1,5");
}

#[test]
fn test_minute_interval() {
    assert_eq!(translate_ok("every 5 minutes"), "5/0 0 * * ?");
}

#[test]
fn test_clock_time_applies_the_value_shift() {
    // Hour 9 renders as 8, minute 30 as 29.
    assert_eq!(translate_ok("at 09:30"), "29 8 * * ?");
}

#[test]
fn test_day_of_month_out_of_range_fails() {
    let err = validation_error("on day 40");
    match err {
        ValidationError::InvalidDaysOfMonth { values, .. } => assert_eq!(values, vec![40]),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_interval_start_out_of_range_fails() {
    let err = validation_error("every minute starting at 99");
    match err {
        ValidationError::InvalidStartTime { value, span } => {
            assert_eq!(value, 99);
            assert_eq!((span.start_line, span.start_col), (1, 26));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

// =============================================================================
// Translation coverage
// =============================================================================

#[test]
fn test_bare_minute_interval_renders_wildcard() {
    assert_eq!(translate_ok("every minute"), "* 0 * * ?");
}

#[test]
fn test_hour_interval() {
    assert_eq!(translate_ok("every hour"), "0 * * * ?");
}

#[test]
fn test_interval_with_anchor_only() {
    assert_eq!(translate_ok("every minute starting at 30"), "*/30 0 * * ?");
}

#[test]
fn test_interval_with_step_and_anchor() {
    assert_eq!(
        translate_ok("every 5 minutes starting at 10"),
        "5/10 0 * * ?"
    );
}

#[test]
fn test_day_interval() {
    assert_eq!(translate_ok("every 2 days"), "0 0 2/0 * ?");
}

#[test]
fn test_day_interval_with_anchor() {
    assert_eq!(
        translate_ok("every 2 days starting on day 10"),
        "0 0 2/10 * ?"
    );
}

#[test]
fn test_month_interval_with_named_anchor() {
    assert_eq!(
        translate_ok("every 3 months starting in march"),
        "0 0 * 3/3 ?"
    );
}

#[test]
fn test_second_interval_is_computed_but_dropped() {
    assert_eq!(translate_ok("every 10 seconds"), "0 0 * * ?");
}

#[test]
fn test_year_values_are_computed_but_dropped() {
    assert_eq!(translate_ok("in 2024"), "0 0 * * ?");
}

#[test]
fn test_clock_time_with_seconds() {
    assert_eq!(translate_ok("at 09:30:15"), "29 8 * * ?");
}

#[test]
fn test_explicit_unit_before_values() {
    assert_eq!(translate_ok("at hours 9 and 17"), "0 8,16 * * ?");
}

#[test]
fn test_explicit_unit_after_values() {
    assert_eq!(translate_ok("at 9, 17 hours"), "0 8,16 * * ?");
}

#[test]
fn test_minute_zero_renders_negative_after_shift() {
    assert_eq!(translate_ok("at 00:00"), "-1 -1 * * ?");
}

#[test]
fn test_combined_weekday_and_time() {
    assert_eq!(translate_ok("on monday, friday at 09:00"), "-1 8 * * 1,5");
}

#[test]
fn test_combined_day_of_month_and_month() {
    assert_eq!(translate_ok("on day 1, 15 in june"), "0 0 0,14 6 ?");
}

#[test]
fn test_keywords_are_case_insensitive() {
    assert_eq!(translate_ok("EVERY 5 Minutes"), "5/0 0 * * ?");
    assert_eq!(translate_ok("On MONDAY"), "0 0 * * 1");
}

#[test]
fn test_ordinal_suffixes_are_stripped() {
    assert_eq!(translate_ok("on day 1st, 2nd, 3rd, 21st"), "0 0 0,1,2,20 * ?");
}

#[test]
fn test_translation_is_deterministic() {
    let input = "every 5 minutes starting at 10 on monday";
    assert_eq!(translate_ok(input), translate_ok(input));
}

// =============================================================================
// Normalization properties
// =============================================================================

#[test]
fn test_partial_expressions_normalize_to_seven_records() {
    for input in ["at 09:30", "on monday", "in 2024", "every 5 minutes"] {
        let units = normalize(input).unwrap();
        let fields: Vec<ScheduleField> = units.iter().map(|u| u.field).collect();
        assert_eq!(fields, ScheduleField::CANONICAL_ORDER.to_vec(), "for '{}'", input);
    }
}

#[test]
fn test_bare_markers_for_unconstrained_fields() {
    let units = normalize("every 5 minutes").unwrap();
    let unspecified = units
        .iter()
        .filter(|u| u.spec == FieldSpec::Unspecified)
        .count();
    assert_eq!(unspecified, 6);
}

// =============================================================================
// Failure modes
// =============================================================================

#[test]
fn test_duplicate_dimension_is_rejected() {
    let err = validation_error("on monday every day");
    assert_eq!(
        err,
        ValidationError::AmbiguousUnits {
            units: vec!["day".to_string()]
        }
    );
}

#[test]
fn test_no_partial_output_on_late_error() {
    // The month fragment alone would render fine; the trailing bad year
    // must fail the whole translation.
    assert!(translate("in january in 1800").is_err());
}

#[test]
fn test_boundary_values_are_accepted() {
    assert_eq!(translate_ok("at 23:59"), "58 22 * * ?");
    assert_eq!(translate_ok("on day 31"), "0 0 30 * ?");
    assert_eq!(translate_ok("on day 1"), "0 0 0 * ?");
    assert!(translate("in 1970").is_ok());
    assert!(translate("in 2099").is_ok());
}

#[test]
fn test_syntax_error_carries_position() {
    let err = syntax_error("every minute\nnonsense");
    assert_eq!((err.line, err.column), (2, 1));
}

#[test]
fn test_non_time_unit_with_time_value_is_rejected() {
    let err = validation_error("at 5 days");
    assert!(matches!(err, ValidationError::ExpectedTimeUnit { .. }));
}

#[test]
fn test_error_display_is_human_readable() {
    let err = validation_error("on day 40");
    assert_eq!(
        err.to_string(),
        "Line 1, col 8: Invalid day(s) of month 40"
    );
}
