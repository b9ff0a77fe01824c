//! timedsl-core: natural-language time expressions compiled to cron schedules
//!
//! This crate contains the pure translation logic with NO UI dependencies:
//! - Typed syntax tree for the expression grammar (ast)
//! - Nom-based recursive descent parser (parser)
//! - Normalized schedule model (schedule)
//! - Semantic analyzer producing the canonical 7-record schedule (analyzer)
//! - Cron field generator (generator)
//! - Source-span diagnostics for error reporting (diagnostics)
//!
//! The editing surface (CLI, REPL, editor plugin) lives outside this crate;
//! it calls [`translate`] once per input change and renders either the cron
//! string or the error.
//!
//! Every translation is a single synchronous, side-effect-free call chain.
//! There is no shared state between calls, so any number of translations may
//! run concurrently.
//!
//! ## Example
//!
//! ```
//! use timedsl_core::translate;
//!
//! assert_eq!(translate("every 5 minutes").unwrap(), "5/0 0 * * ?");
//! assert_eq!(translate("on monday, friday").unwrap(), "0 0 * * 1,5");
//! assert!(translate("on day 40").is_err());
//! ```

use thiserror::Error;
use tracing::debug;

pub mod analyzer;
pub mod ast;
pub mod diagnostics;
pub mod generator;
pub mod parser;
pub mod schedule;

// Re-export commonly used types
pub use analyzer::{analyze, ValidationError};
pub use ast::{Expression, Fragment, MonthName, TimeUnit, Weekday};
pub use diagnostics::SourceSpan;
pub use generator::generate;
pub use parser::{parse_expression, SyntaxError};
pub use schedule::{FieldSpec, FieldValue, IntervalStart, ScheduleField, ScheduleUnit};

/// Error surfaced by [`translate`]: whichever stage first detects a problem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TranslateError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Translate a time expression into the 5-field cron string
/// `minute hour day-of-month month day-of-week`.
///
/// No partial output is ever produced: the call either returns the full cron
/// string or the first error the pipeline detects.
pub fn translate(input: &str) -> Result<String, TranslateError> {
    let expression = parse_expression(input)?;
    debug!(fragments = expression.fragments.len(), "parsed expression");

    let schedule = analyze(input, &expression)?;
    let cron = generator::generate(&schedule);
    debug!(%cron, "translated expression");
    Ok(cron)
}

/// Parse and analyze without rendering: the normalized 7-record schedule.
///
/// Useful for tooling that wants to inspect what each dimension resolved to.
pub fn normalize(input: &str) -> Result<Vec<ScheduleUnit>, TranslateError> {
    let expression = parse_expression(input)?;
    Ok(analyze(input, &expression)?)
}
