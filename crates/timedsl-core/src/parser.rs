//! Nom-based parser for the time-expression grammar
//!
//! Produces the raw [`Expression`] tree; no semantic rules are applied here.
//! Keywords, unit names, weekday and month names match case-insensitively,
//! and whitespace between tokens is free.
//!
//! Grammar sketch:
//!
//! ```text
//! Expression       = Fragment+
//! Fragment         = ExactFragment | IntervalFragment
//! ExactFragment    = "at" TimeValue
//!                  | "on" (WeekdayList | ["days"|"day"] NumericList)
//!                  | "in" (MonthList | NumericList)
//! IntervalFragment = ("every"|"each") numeric? unit ("starting" StartClause)?
//! StartClause      = "at" numeric | "on" weekday | "on" "day"? numeric
//!                  | "in" numeric | "in" month
//! ```
//!
//! Spans are tracked relative to the original input with
//! `original_input.len() - input.len()` arithmetic so that later passes can
//! point errors at the offending text.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while_m_n},
    character::complete::{alpha1, char, digit1, multispace0},
    combinator::{all_consuming, cut, map, opt},
    error::{context, ContextError, ErrorKind, ParseError as NomParseError, VerboseError,
        VerboseErrorKind},
    multi::{many0, many1},
    IResult,
};
use thiserror::Error;

use crate::ast::*;
use crate::diagnostics::byte_to_line_col;

// ============================================================================
// Public API
// ============================================================================

/// Syntax error: the text does not match the grammar at some position.
/// Line and column are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Line {line}, col {column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// Parse a complete time expression from source text.
///
/// Trailing unmatched input is a syntax error; the whole text must be
/// consumed.
pub fn parse_expression(input: &str) -> Result<Expression, SyntaxError> {
    match all_consuming(|i| expression::<VerboseError<&str>>(i, input))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(syntax_error(input, e)),
        Err(nom::Err::Incomplete(_)) => Err(SyntaxError {
            message: "incomplete input".to_string(),
            line: 1,
            column: 1,
        }),
    }
}

/// Build a structured error out of nom's verbose error trace: position of
/// the deepest failure, message from the innermost context label.
fn syntax_error(input: &str, err: VerboseError<&str>) -> SyntaxError {
    let offset = err
        .errors
        .iter()
        .map(|(rest, _)| input.len() - rest.len())
        .max()
        .unwrap_or(0);
    let (line, column) = byte_to_line_col(input, offset);

    let message = err
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(ctx) => Some(format!("expected {}", ctx)),
            VerboseErrorKind::Nom(ErrorKind::Eof) => Some("unexpected trailing input".to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "does not match the time expression grammar".to_string());

    SyntaxError {
        message,
        line,
        column,
    }
}

// ============================================================================
// Expression / Fragments
// ============================================================================

fn expression<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, Expression, E> {
    let (input, fragments) = many1(|i| fragment(i, original_input))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, Expression { fragments }))
}

fn fragment<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, Fragment, E> {
    let (input, _) = multispace0(input)?;
    context(
        "schedule fragment",
        alt((
            map(|i| exact_fragment(i, original_input), Fragment::Exact),
            map(|i| interval_fragment(i, original_input), Fragment::Interval),
        )),
    )(input)
}

fn exact_fragment<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, ExactFragment, E> {
    alt((
        |i| exact_time(i, original_input),
        |i| exact_on(i, original_input),
        |i| exact_in(i, original_input),
    ))(input)
}

/// `"at" TimeValue` — no other fragment starts with "at", so the keyword
/// commits the parse.
fn exact_time<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, ExactFragment, E> {
    let (input, _) = tag_no_case("at")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = cut(context("time value", |i| exact_value(i, original_input)))(input)?;
    Ok((input, ExactFragment::Time(ExactTime { value })))
}

fn exact_value<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, TimeValue, E> {
    alt((
        |i| unit_and_values(i, original_input),
        |i| values_and_unit(i, original_input),
        |i| clock_time(i, original_input),
    ))(input)
}

fn unit_and_values<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, TimeValue, E> {
    let (input, unit) = unit_keyword(input, original_input)?;
    let (input, _) = multispace0(input)?;
    let (input, values) = numeric_values(input, original_input)?;
    Ok((input, TimeValue::UnitAndValues { unit, values }))
}

fn values_and_unit<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, TimeValue, E> {
    let (input, values) = numeric_values(input, original_input)?;
    let (input, _) = multispace0(input)?;
    let (input, unit) = unit_keyword(input, original_input)?;
    Ok((input, TimeValue::ValuesAndUnit { values, unit }))
}

/// `HH:MM[:SS]`, each component exactly two digits, no interior whitespace
fn clock_time<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, TimeValue, E> {
    let start = original_input.len() - input.len();
    let (input, hour) = double_digit(input, original_input)?;
    let (input, _) = char(':')(input)?;
    let (input, minute) = double_digit(input, original_input)?;
    let (input, second) = opt(|i| {
        let (i, _) = char(':')(i)?;
        double_digit(i, original_input)
    })(input)?;
    let end = original_input.len() - input.len();

    Ok((
        input,
        TimeValue::Clock(ClockTime {
            hour,
            minute,
            second,
            span: Span::new(start, end),
        }),
    ))
}

/// `"on" …` — weekday list, or day-of-month numbers with an optional
/// "day"/"days" keyword. Weekdays are tried first.
fn exact_on<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, ExactFragment, E> {
    let (input, _) = tag_no_case("on")(input)?;
    let (input, _) = multispace0(input)?;
    cut(context(
        "day of week or day of month",
        alt((
            map(|i| weekday_values(i, original_input), |values| {
                ExactFragment::DayOfWeek(ExactDayOfWeek { values })
            }),
            |i| day_of_month_values(i, original_input),
        )),
    ))(input)
}

fn day_of_month_values<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, ExactFragment, E> {
    let (input, _) = opt(alt((tag_no_case("days"), tag_no_case("day"))))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, values) = numeric_values(input, original_input)?;
    Ok((input, ExactFragment::DayOfMonth(ExactDayOfMonth { values })))
}

/// `"in" …` — month names, or a numeric year list. Months are tried first.
fn exact_in<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, ExactFragment, E> {
    let (input, _) = tag_no_case("in")(input)?;
    let (input, _) = multispace0(input)?;
    cut(context(
        "month or year",
        alt((
            map(|i| month_values(i, original_input), |values| {
                ExactFragment::Month(ExactMonth { values })
            }),
            map(|i| numeric_values(i, original_input), |values| {
                ExactFragment::Year(ExactYear { values })
            }),
        )),
    ))(input)
}

// ============================================================================
// Interval Fragments
// ============================================================================

fn interval_fragment<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, IntervalFragment, E> {
    let (input, _) = alt((tag_no_case("every"), tag_no_case("each")))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, step) = opt(|i| numeric_value(i, original_input))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, unit) = cut(context("time unit", |i| unit_keyword(i, original_input)))(input)?;
    let (input, start) = opt(|i| starting_clause(i, original_input))(input)?;

    Ok((input, IntervalFragment { step, unit, start }))
}

fn starting_clause<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, StartClause, E> {
    let (input, _) = multispace0(input)?;
    let (input, _) = tag_no_case("starting")(input)?;
    let (input, _) = multispace0(input)?;
    cut(context(
        "starting clause",
        alt((
            |i| start_time(i, original_input),
            |i| start_weekday(i, original_input),
            |i| start_day_of_month(i, original_input),
            |i| start_year(i, original_input),
            |i| start_month(i, original_input),
        )),
    ))(input)
}

fn start_time<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, StartClause, E> {
    let (input, _) = tag_no_case("at")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, n) = numeric_value(input, original_input)?;
    Ok((input, StartClause::Time(n)))
}

fn start_weekday<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, StartClause, E> {
    let (input, _) = tag_no_case("on")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, (day, span)) = weekday_value(input, original_input)?;
    Ok((input, StartClause::Weekday { day, span }))
}

fn start_day_of_month<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, StartClause, E> {
    let (input, _) = tag_no_case("on")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = opt(tag_no_case("day"))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, n) = numeric_value(input, original_input)?;
    Ok((input, StartClause::DayOfMonth(n)))
}

fn start_year<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, StartClause, E> {
    let (input, _) = tag_no_case("in")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, n) = numeric_value(input, original_input)?;
    Ok((input, StartClause::Year(n)))
}

fn start_month<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, StartClause, E> {
    let (input, _) = tag_no_case("in")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, (month, span)) = month_value(input, original_input)?;
    Ok((input, StartClause::Month { month, span }))
}

// ============================================================================
// Value Lists
// ============================================================================

/// `","` or the word `"and"`, with free whitespace before it
fn list_separator<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, (), E> {
    let (input, _) = multispace0(input)?;
    let (input, _) = alt((tag(","), tag_no_case("and")))(input)?;
    Ok((input, ()))
}

fn numeric_values<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, NumberList, E> {
    let start = original_input.len() - input.len();
    let (input, first) = numeric_value(input, original_input)?;
    let (input, rest) = many0(|i| {
        let (i, _) = list_separator(i)?;
        let (i, _) = multispace0(i)?;
        numeric_value(i, original_input)
    })(input)?;

    let mut items = vec![first];
    items.extend(rest);
    let end = original_input.len() - input.len();

    Ok((
        input,
        NumberList {
            items,
            span: Span::new(start, end),
        },
    ))
}

fn weekday_values<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, Vec<Weekday>, E> {
    let (input, (first, _)) = weekday_value(input, original_input)?;
    let (input, rest) = many0(|i| {
        let (i, _) = list_separator(i)?;
        let (i, _) = multispace0(i)?;
        weekday_value(i, original_input).map(|(rest, (day, _))| (rest, day))
    })(input)?;

    let mut items = vec![first];
    items.extend(rest);
    Ok((input, items))
}

fn month_values<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, Vec<MonthName>, E> {
    let (input, (first, _)) = month_value(input, original_input)?;
    let (input, rest) = many0(|i| {
        let (i, _) = list_separator(i)?;
        let (i, _) = multispace0(i)?;
        month_value(i, original_input).map(|(rest, (month, _))| (rest, month))
    })(input)?;

    let mut items = vec![first];
    items.extend(rest);
    Ok((input, items))
}

// ============================================================================
// Terminals
// ============================================================================

/// Digits with an optional ordinal suffix (`1st`, `2nd`, `3rd`, `15th`);
/// the suffix is stripped
fn numeric_value<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, Number, E> {
    let start = original_input.len() - input.len();
    let (rest, digits) = digit1(input)?;
    let (rest, _) = opt(alt((
        tag_no_case("st"),
        tag_no_case("nd"),
        tag_no_case("rd"),
        tag_no_case("th"),
    )))(rest)?;
    let end = original_input.len() - rest.len();

    let value: i64 = digits
        .parse()
        .map_err(|_| nom::Err::Error(E::from_error_kind(input, ErrorKind::Digit)))?;

    Ok((
        rest,
        Number {
            value,
            span: Span::new(start, end),
        },
    ))
}

/// Exactly two digits
fn double_digit<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, Number, E> {
    let start = original_input.len() - input.len();
    let (rest, digits) = take_while_m_n(2, 2, |c: char| c.is_ascii_digit())(input)?;
    let end = original_input.len() - rest.len();

    let value: i64 = digits
        .parse()
        .map_err(|_| nom::Err::Error(E::from_error_kind(input, ErrorKind::Digit)))?;

    Ok((
        rest,
        Number {
            value,
            span: Span::new(start, end),
        },
    ))
}

fn unit_keyword<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, UnitKeyword, E> {
    let start = original_input.len() - input.len();
    let (rest, word) = alpha1(input)?;
    match TimeUnit::from_keyword(word) {
        Some(unit) => Ok((
            rest,
            UnitKeyword {
                unit,
                span: Span::new(start, original_input.len() - rest.len()),
            },
        )),
        None => Err(nom::Err::Error(E::from_error_kind(input, ErrorKind::Tag))),
    }
}

fn weekday_value<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, (Weekday, Span), E> {
    let start = original_input.len() - input.len();
    let (rest, word) = alpha1(input)?;
    match Weekday::from_keyword(word) {
        Some(day) => Ok((rest, (day, Span::new(start, original_input.len() - rest.len())))),
        None => Err(nom::Err::Error(E::from_error_kind(input, ErrorKind::Tag))),
    }
}

fn month_value<'a, E: NomParseError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, (MonthName, Span), E> {
    let start = original_input.len() - input.len();
    let (rest, word) = alpha1(input)?;
    match MonthName::from_keyword(word) {
        Some(month) => Ok((
            rest,
            (month, Span::new(start, original_input.len() - rest.len())),
        )),
        None => Err(nom::Err::Error(E::from_error_kind(input, ErrorKind::Tag))),
    }
}

// ============================================================================
// Tests
// ============================================================================
