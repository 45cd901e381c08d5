//! Text grammar for query goals and rule definitions.
//!
//! Goals look like `developed_by(What, "halo")`: a lower-case predicate name
//! followed by comma-separated arguments. An argument starting with an
//! upper-case letter or `_` is a variable; everything else (lower-case
//! atoms, quoted strings, numeric literals) is a constant. Quoted strings
//! may contain spaces and are case-normalized like every other constant.
//! Rules add `:-` and a comma-separated body: `quality(X, Y) :- stars(Y, X)`.
//! A trailing period is accepted on both forms.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::store::{Goal, Rule};
use crate::term::Term;

type RawGoal = (String, Vec<Term>);

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn ident_tail(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn atom_text(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(|c| c.is_ascii_lowercase()), ident_tail))(input)
}

fn variable_text(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_uppercase() || c == '_'),
        ident_tail,
    ))(input)
}

fn number_text(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)
}

fn quoted_text(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_while(|c: char| c != '"'), char('"'))(input)
}

fn term(input: &str) -> IResult<&str, Term> {
    alt((
        map(quoted_text, Term::constant),
        map(map_res(number_text, str::parse::<f64>), Term::number),
        map(variable_text, Term::variable),
        map(atom_text, Term::constant),
    ))(input)
}

fn goal_pattern(input: &str) -> IResult<&str, RawGoal> {
    pair(
        map(atom_text, ToOwned::to_owned),
        delimited(
            char('('),
            separated_list1(char(','), ws(term)),
            char(')'),
        ),
    )(input)
}

fn rule_parts(input: &str) -> IResult<&str, (RawGoal, Vec<RawGoal>)> {
    separated_pair(
        goal_pattern,
        ws(tag(":-")),
        separated_list1(char(','), ws(goal_pattern)),
    )(input)
}

/// Wraps a top-level pattern with surrounding whitespace and an optional
/// trailing period.
fn clause_text<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    all_consuming(terminated(
        preceded(multispace0, inner),
        tuple((multispace0, opt(char('.')), multispace0)),
    ))
}

/// Parses query text into a [`Goal`].
///
/// # Errors
///
/// [`Error::MalformedQuery`] when the text does not match the goal grammar.
pub fn goal(text: &str) -> Result<Goal> {
    let (_, (predicate, args)) = clause_text(goal_pattern)(text)
        .map_err(|_| Error::MalformedQuery(text.trim().to_owned()))?;
    Goal::new(predicate, args).map_err(|_| Error::MalformedQuery(text.trim().to_owned()))
}

/// Parses rule text of the form `head(args) :- goal(args), ...`.
///
/// # Errors
///
/// [`Error::MalformedClause`] when the text does not match the rule grammar
/// or the rule fails structural validation (see [`Rule::new`]).
pub fn rule(text: &str) -> Result<Rule> {
    let (_, (raw_head, raw_body)) = clause_text(rule_parts)(text)
        .map_err(|_| Error::MalformedClause(text.trim().to_owned()))?;
    let head = Goal::new(raw_head.0, raw_head.1)?;
    let body = raw_body
        .into_iter()
        .map(|(predicate, args)| Goal::new(predicate, args))
        .collect::<Result<Vec<_>>>()?;
    Rule::new(head, body)
}
