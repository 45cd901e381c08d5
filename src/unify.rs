//! Unification of terms and argument lists.

use indexmap::IndexMap;

use crate::term::Term;

/// A binding environment: the substitution built incrementally during one
/// resolution attempt.
///
/// Each search branch owns its private copy; sibling branches never share
/// one. The environment is idempotent (resolving a resolved term is a no-op)
/// and acyclic (a variable never maps, directly or transitively, to itself).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    map: IndexMap<String, Term>,
}

impl Bindings {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no variable is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Follows a term through the binding chain until it reaches a constant
    /// or an unbound variable.
    #[must_use]
    pub fn resolve(&self, term: &Term) -> Term {
        let mut current = term;
        while let Term::Variable(name) = current {
            match self.map.get(name) {
                Some(next) => current = next,
                None => break,
            }
        }
        current.clone()
    }

    /// The fully dereferenced value of a variable, if it is bound.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Term> {
        let bound = self.map.get(name)?;
        Some(self.resolve(bound))
    }

    /// Binds a variable. Only ever called on unbound variables, so chains
    /// stay acyclic; binding a variable to itself is a bug.
    fn bind(&mut self, name: &str, value: Term) {
        debug_assert!(
            !matches!(&value, Term::Variable(other) if other == name),
            "attempted to bind `{name}` to itself"
        );
        self.map.insert(name.to_owned(), value);
    }
}

/// Unifies two terms under `env`, extending it in place on success.
///
/// Both sides are dereferenced first. An unbound variable binds to the other
/// side (for two distinct unbound variables, the second binds to the first).
/// Constants match per [`Term::constant_matches`]: numerically when both
/// parse as numbers, textually otherwise.
pub fn unify(a: &Term, b: &Term, env: &mut Bindings) -> bool {
    let a = env.resolve(a);
    let b = env.resolve(b);
    match (&a, &b) {
        (Term::Variable(first), Term::Variable(second)) => {
            if first != second {
                env.bind(second, Term::Variable(first.clone()));
            }
            true
        }
        (Term::Variable(name), Term::Constant(_)) => {
            env.bind(name, b.clone());
            true
        }
        (Term::Constant(_), Term::Variable(name)) => {
            env.bind(name, a.clone());
            true
        }
        (Term::Constant(_), Term::Constant(_)) => a.constant_matches(&b),
    }
}

/// Unifies two argument lists position by position over a copy of `env`.
///
/// Short-circuits on the first mismatch; partial bindings from a failed
/// attempt never leak into the caller's environment.
#[must_use]
pub fn unify_args(a: &[Term], b: &[Term], env: &Bindings) -> Option<Bindings> {
    if a.len() != b.len() {
        return None;
    }
    let mut attempt = env.clone();
    for (x, y) in a.iter().zip(b) {
        if !unify(x, y, &mut attempt) {
            return None;
        }
    }
    Some(attempt)
}
