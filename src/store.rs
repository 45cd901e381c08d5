//! Facts, rules and the clause store that owns them.

use std::fmt;

use indexmap::IndexMap;
use log::debug;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::term::Term;

/// Argument list of a clause or goal. Catalog predicates are almost always
/// binary, so the arguments live inline.
pub type ArgList = SmallVec<[Term; 2]>;

/// A predicate pattern: the shape shared by queries, rule heads and rule
/// body sub-goals. Arguments may be constants or variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    predicate: String,
    args: ArgList,
}

impl Goal {
    /// Builds a goal, validating it structurally: the predicate name must be
    /// non-empty and there must be at least one argument. Argument kinds are
    /// fixed by the [`Term`] constructors, so no text can be smuggled in as
    /// an accidental variable.
    pub fn new(predicate: impl Into<String>, args: impl IntoIterator<Item = Term>) -> Result<Self> {
        let predicate = predicate.into();
        if predicate.is_empty() {
            return Err(Error::MalformedClause("empty predicate name".to_owned()));
        }
        let args: ArgList = args.into_iter().collect();
        if args.is_empty() {
            return Err(Error::MalformedClause(format!(
                "goal `{predicate}` has no arguments"
            )));
        }
        Ok(Self { predicate, args })
    }

    /// The predicate name.
    #[must_use]
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// Number of arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// The argument list.
    #[must_use]
    pub fn args(&self) -> &[Term] {
        &self.args
    }

    /// Variable names in first-appearance order, without duplicates.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for arg in &self.args {
            if let Term::Variable(name) = arg {
                if !seen.contains(&name.as_str()) {
                    seen.push(name.as_str());
                }
            }
        }
        seen
    }

    /// The `name/arity` signature key this goal resolves against.
    pub(crate) fn signature(&self) -> String {
        format!("{}/{}", self.predicate, self.args.len())
    }

    pub(crate) fn with_args(&self, args: ArgList) -> Self {
        Self {
            predicate: self.predicate.clone(),
            args,
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.predicate)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// A ground clause: all arguments are constants. Created once at
/// knowledge-base build time and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    predicate: String,
    args: ArgList,
}

impl Fact {
    /// Builds a fact, rejecting variables among the arguments.
    pub fn new(predicate: impl Into<String>, args: impl IntoIterator<Item = Term>) -> Result<Self> {
        let goal = Goal::new(predicate, args)?;
        if let Some(variable) = goal.args.iter().find(|arg| arg.is_variable()) {
            return Err(Error::MalformedClause(format!(
                "fact `{}` contains variable `{variable}`",
                goal.predicate
            )));
        }
        Ok(Self {
            predicate: goal.predicate,
            args: goal.args,
        })
    }

    /// The predicate name.
    #[must_use]
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// The argument list (all constants).
    #[must_use]
    pub fn args(&self) -> &[Term] {
        &self.args
    }

    fn signature(&self) -> String {
        format!("{}/{}", self.predicate, self.args.len())
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.predicate)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// A Horn clause `head :- body`: the head holds when every body sub-goal
/// holds, left to right. Body order affects evaluation order, not
/// correctness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    head: Goal,
    body: Vec<Goal>,
}

impl Rule {
    /// Builds a rule, validating that the body is non-empty and that every
    /// head variable occurs somewhere in the body. A head variable missing
    /// from the body could never be bound to a ground answer.
    pub fn new(head: Goal, body: Vec<Goal>) -> Result<Self> {
        if body.is_empty() {
            return Err(Error::MalformedClause(format!(
                "rule `{head}` has an empty body"
            )));
        }
        for name in head.variables() {
            let in_body = body.iter().any(|goal| goal.variables().contains(&name));
            if !in_body {
                return Err(Error::MalformedClause(format!(
                    "head variable `{name}` of rule `{head}` never occurs in the body"
                )));
            }
        }
        Ok(Self { head, body })
    }

    /// The rule head.
    #[must_use]
    pub fn head(&self) -> &Goal {
        &self.head
    }

    /// The body conjunction, in evaluation order.
    #[must_use]
    pub fn body(&self) -> &[Goal] {
        &self.body
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :- ", self.head)?;
        for (i, goal) in self.body.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{goal}")?;
        }
        Ok(())
    }
}

/// Either kind of stored clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// A ground fact.
    Fact(Fact),
    /// A derived rule.
    Rule(Rule),
}

/// Holds facts and rules, indexed by `predicate/arity` signature.
///
/// Clauses for one signature keep their assertion order: first asserted is
/// first tried during resolution, which is what makes result ordering stable
/// and reproducible. The store is purely additive; nothing is removed or
/// mutated once asserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseStore {
    clauses: IndexMap<String, Vec<Clause>>,
    fact_count: usize,
    rule_count: usize,
}

impl ClauseStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a ground fact to the sequence for its signature.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedClause`] if `args` contains a variable or the
    /// clause is structurally invalid. The store is unchanged on error.
    pub fn assert_fact(
        &mut self,
        predicate: &str,
        args: impl IntoIterator<Item = Term>,
    ) -> Result<()> {
        let fact = Fact::new(predicate, args)?;
        debug!("assert fact {fact}");
        self.clauses
            .entry(fact.signature())
            .or_default()
            .push(Clause::Fact(fact));
        self.fact_count += 1;
        Ok(())
    }

    /// Appends a rule built from a head pattern and body conjunction.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedClause`] on a degenerate head or body (see
    /// [`Rule::new`]). The store is unchanged on error.
    pub fn assert_rule(&mut self, head: Goal, body: Vec<Goal>) -> Result<()> {
        let rule = Rule::new(head, body)?;
        debug!("assert rule {rule}");
        self.clauses
            .entry(rule.head.signature())
            .or_default()
            .push(Clause::Rule(rule));
        self.rule_count += 1;
        Ok(())
    }

    /// Parses rule text of the form `head(args) :- goal(args), ...` and
    /// asserts it.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedClause`] on parse or validation failure; the store
    /// is unchanged on error.
    pub fn assert_rule_text(&mut self, text: &str) -> Result<()> {
        let rule = crate::parse::rule(text)?;
        debug!("assert rule {rule}");
        self.clauses
            .entry(rule.head.signature())
            .or_default()
            .push(Clause::Rule(rule));
        self.rule_count += 1;
        Ok(())
    }

    /// All clauses for a signature, in assertion order. An unknown signature
    /// yields an empty slice: a normal, possibly-empty search space rather
    /// than an error.
    #[must_use]
    pub fn lookup(&self, predicate: &str, arity: usize) -> &[Clause] {
        self.clauses
            .get(&format!("{predicate}/{arity}"))
            .map_or(&[], Vec::as_slice)
    }

    /// Number of asserted facts.
    #[must_use]
    pub fn fact_count(&self) -> usize {
        self.fact_count
    }

    /// Number of asserted rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    /// Whether the store holds no clauses at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fact_count == 0 && self.rule_count == 0
    }
}
