//! # Ludolog
//!
//! A deductive knowledge-base and query engine for game catalogs.
//!
//! Ground facts (`developer(halo, bungie)`) and derived Horn rules
//! (`developed_by(X, Y) :- developer(Y, X)`) live in a [`ClauseStore`];
//! queries with unbound variables are answered by depth-first backtracking
//! resolution, yielding every consistent binding as a lazy ordered
//! sequence.
//!
//! ## Features
//!
//! - Facts and rules indexed by `predicate/arity` signature, tried in
//!   assertion order
//! - Unification with variable dereferencing and numeric-aware constants
//! - A lazy resolver with a configurable depth budget
//! - A textual query grammar and row-oriented façade
//! - Catalog ingestion with derived star ratings, plus a tf-idf content
//!   recommender
//!
//! ## Example
//!
//! ```rust
//! use ludolog::{ClauseStore, QueryEngine, Term};
//!
//! let mut store = ClauseStore::new();
//! store.assert_fact(
//!     "developer",
//!     vec![Term::constant("halo"), Term::constant("bungie")],
//! )?;
//! store.assert_rule_text("developed_by(X, Y) :- developer(Y, X)")?;
//!
//! let engine = QueryEngine::new(store);
//! let rows = engine.run_query("developed_by(What, halo)")?;
//! assert_eq!(rows[0].get("What")?, "bungie");
//! # Ok::<(), ludolog::Error>(())
//! ```

pub mod catalog;
pub mod error;
pub mod parse;
pub mod query;
pub mod similar;
pub mod solve;
pub mod store;
pub mod term;
pub mod unify;

pub use catalog::GameRecord;
pub use error::{Error, Result};
pub use query::{QueryEngine, Row, Rows};
pub use similar::{Recommendation, Recommender};
pub use solve::{Solutions, Solver, DEFAULT_DEPTH_BUDGET};
pub use store::{Clause, ClauseStore, Fact, Goal, Rule};
pub use term::Term;
pub use unify::{unify, unify_args, Bindings};
