//! Depth-first backtracking resolution over the clause store.

use log::trace;

use crate::error::{Error, Result};
use crate::store::{ArgList, Clause, ClauseStore, Goal, Rule};
use crate::term::Term;
use crate::unify::{unify_args, Bindings};

/// Default bound on rule expansions along one search branch. The catalog's
/// derived rules each need a single expansion, so this leaves generous
/// headroom while still catching rules that never bottom out.
pub const DEFAULT_DEPTH_BUDGET: usize = 64;

/// Resolves goals against a read-only clause store.
#[derive(Debug, Clone, Copy)]
pub struct Solver<'a> {
    store: &'a ClauseStore,
    depth_budget: usize,
}

impl<'a> Solver<'a> {
    /// Creates a solver with the default depth budget.
    #[must_use]
    pub fn new(store: &'a ClauseStore) -> Self {
        Self {
            store,
            depth_budget: DEFAULT_DEPTH_BUDGET,
        }
    }

    /// Creates a solver with an explicit depth budget.
    #[must_use]
    pub fn with_depth_budget(store: &'a ClauseStore, depth_budget: usize) -> Self {
        Self {
            store,
            depth_budget,
        }
    }

    /// Starts resolution of `goal`, returning the lazy solution sequence.
    ///
    /// Nothing is searched until the iterator is pulled; dropping it
    /// releases all retained search state. The sequence yields one binding
    /// environment per solution, in clause-assertion order, and a single
    /// [`Error::DepthExceeded`] if the budget runs out, after which it is
    /// exhausted.
    #[must_use]
    pub fn solve(&self, goal: &Goal) -> Solutions<'a> {
        Solutions {
            store: self.store,
            depth_budget: self.depth_budget,
            rename_seq: 0,
            stack: vec![Frame {
                goals: vec![goal.clone()],
                env: Bindings::new(),
                next_clause: 0,
                depth: 0,
            }],
        }
    }
}

/// One node of the search: a remaining conjunction, the environment built so
/// far, a cursor over the clauses still to try for the first goal, and the
/// number of rule expansions taken to get here.
#[derive(Debug, Clone)]
struct Frame {
    goals: Vec<Goal>,
    env: Bindings,
    next_clause: usize,
    depth: usize,
}

/// Lazy sequence of solutions for one query.
///
/// The search is an explicit stack machine rather than recursion: the top
/// frame is advanced one clause per step, successful matches push a child
/// frame for the remaining conjunction, and exhausted frames pop to resume
/// the parent's next alternative. Failure of a later sub-goal therefore
/// backtracks into earlier sub-goals' remaining alternatives before a clause
/// is abandoned.
#[derive(Debug)]
#[must_use = "solutions are lazy and do nothing unless iterated"]
pub struct Solutions<'a> {
    store: &'a ClauseStore,
    depth_budget: usize,
    rename_seq: u64,
    stack: Vec<Frame>,
}

impl Iterator for Solutions<'_> {
    type Item = Result<Bindings>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                return None;
            };

            if frame.goals.is_empty() {
                // every sub-goal satisfied: this branch is a solution
                let env = frame.env.clone();
                self.stack.pop();
                trace!("solution with {} bindings", env.len());
                return Some(Ok(env));
            }

            let clause_idx = frame.next_clause;
            frame.next_clause += 1;
            let goal = frame.goals[0].clone();
            let rest = frame.goals[1..].to_vec();
            let env = frame.env.clone();
            let depth = frame.depth;

            let clauses = self.store.lookup(goal.predicate(), goal.arity());
            if clause_idx >= clauses.len() {
                self.stack.pop();
                continue;
            }

            match &clauses[clause_idx] {
                Clause::Fact(fact) => {
                    if let Some(child_env) = unify_args(goal.args(), fact.args(), &env) {
                        self.stack.push(Frame {
                            goals: rest,
                            env: child_env,
                            next_clause: 0,
                            depth,
                        });
                    }
                }
                Clause::Rule(rule) => {
                    if depth + 1 > self.depth_budget {
                        self.stack.clear();
                        return Some(Err(Error::DepthExceeded(self.depth_budget)));
                    }
                    let (head, body) = freshen(rule, &mut self.rename_seq);
                    if let Some(child_env) = unify_args(goal.args(), head.args(), &env) {
                        trace!("expand {goal} via rule {rule} at depth {depth}");
                        let mut goals = body;
                        goals.extend(rest);
                        self.stack.push(Frame {
                            goals,
                            env: child_env,
                            next_clause: 0,
                            depth: depth + 1,
                        });
                    }
                }
            }
        }
    }
}

/// Renames every rule variable to a name private to this expansion, so that
/// re-entering a rule (recursively or across sibling sub-goals) never
/// aliases variables between unrelated attempts. `#` cannot occur in a
/// parsed variable name, so fresh names never collide with query variables.
fn freshen(rule: &Rule, rename_seq: &mut u64) -> (Goal, Vec<Goal>) {
    *rename_seq += 1;
    let tag = *rename_seq;
    let rename = |goal: &Goal| {
        let args: ArgList = goal
            .args()
            .iter()
            .map(|term| match term {
                Term::Variable(name) => Term::Variable(format!("{name}#{tag}")),
                constant @ Term::Constant(_) => constant.clone(),
            })
            .collect();
        goal.with_args(args)
    };
    (rename(rule.head()), rule.body().iter().map(rename).collect())
}
