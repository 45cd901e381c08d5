//! The query façade: text in, ordered result rows out.

use indexmap::IndexMap;
use log::debug;

use crate::error::{Error, Result};
use crate::parse;
use crate::solve::{Solutions, Solver, DEFAULT_DEPTH_BUDGET};
use crate::store::{ClauseStore, Goal};
use crate::unify::Bindings;

/// One solution, rendered for the caller: a mapping from each variable
/// requested in the query to its fully dereferenced value as text, in
/// first-appearance order. A query without variables produces empty rows
/// whose presence alone answers "is this fact derivable".
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Row {
    #[cfg_attr(feature = "serde", serde(flatten))]
    bindings: IndexMap<String, String>,
}

impl Row {
    /// The value bound to a requested variable.
    ///
    /// # Errors
    ///
    /// [`Error::UnboundVariable`] if `variable` never appeared in the query
    /// goal; asking for it is a contract violation, not a failed lookup.
    pub fn get(&self, variable: &str) -> Result<&str> {
        self.bindings
            .get(variable)
            .map(String::as_str)
            .ok_or_else(|| Error::UnboundVariable(variable.to_owned()))
    }

    /// The requested variable names, in first-appearance order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Whether the query had no variables to bind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Owns a populated clause store and answers textual queries against it.
///
/// The store is treated as read-only once the engine is built; every query
/// gets its own private binding environment and renaming counter, so results
/// are reproducible run over run.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    store: ClauseStore,
    depth_budget: usize,
}

impl QueryEngine {
    /// Wraps a populated store with the default depth budget.
    #[must_use]
    pub fn new(store: ClauseStore) -> Self {
        Self {
            store,
            depth_budget: DEFAULT_DEPTH_BUDGET,
        }
    }

    /// Overrides the resolution depth budget.
    #[must_use]
    pub fn with_depth_budget(mut self, depth_budget: usize) -> Self {
        self.depth_budget = depth_budget;
        self
    }

    /// The underlying clause store.
    #[must_use]
    pub fn store(&self) -> &ClauseStore {
        &self.store
    }

    /// Starts lazy resolution of a structurally built goal.
    #[must_use]
    pub fn solve(&self, goal: &Goal) -> Solutions<'_> {
        Solver::with_depth_budget(&self.store, self.depth_budget).solve(goal)
    }

    /// Parses query text and returns the lazy row sequence.
    ///
    /// Unknown predicates yield an empty sequence, not an error.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedQuery`] if the text does not parse; resolution is
    /// not attempted in that case.
    pub fn rows(&self, text: &str) -> Result<Rows<'_>> {
        let goal = parse::goal(text)?;
        debug!("query {goal}");
        let variables = goal
            .variables()
            .into_iter()
            .map(ToOwned::to_owned)
            .collect();
        Ok(Rows {
            solutions: self.solve(&goal),
            variables,
        })
    }

    /// Runs a query to exhaustion, collecting every row in resolution order.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedQuery`] on unparseable text and
    /// [`Error::DepthExceeded`] if the budget runs out mid-search.
    pub fn run_query(&self, text: &str) -> Result<Vec<Row>> {
        self.rows(text)?.collect()
    }

    /// Pulls only the first solution, leaving the rest of the search
    /// unexplored.
    ///
    /// # Errors
    ///
    /// Same as [`QueryEngine::run_query`].
    pub fn first(&self, text: &str) -> Result<Option<Row>> {
        self.rows(text)?.next().transpose()
    }
}

/// Lazy iterator of result rows for one query.
#[derive(Debug)]
#[must_use = "rows are lazy and do nothing unless iterated"]
pub struct Rows<'a> {
    solutions: Solutions<'a>,
    variables: Vec<String>,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.solutions.next()? {
            Ok(env) => Some(Ok(render(&self.variables, &env))),
            Err(err) => Some(Err(err)),
        }
    }
}

fn render(variables: &[String], env: &Bindings) -> Row {
    let bindings = variables
        .iter()
        .map(|name| {
            let value = env
                .get(name)
                .map_or_else(|| name.clone(), |term| term.to_string());
            (name.clone(), value)
        })
        .collect();
    Row { bindings }
}
