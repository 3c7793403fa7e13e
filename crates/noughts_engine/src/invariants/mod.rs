//! First-class invariants for games.
//!
//! Invariants are logical properties that must hold for every reachable
//! [`Game`](crate::Game). The engine asserts them after each accepted move in
//! debug builds, the server re-checks snapshots it loads, and tests drive
//! them over every legal game.

mod history_consistent;
mod monotonic_board;
mod outcome_consistent;

pub use history_consistent::HistoryConsistentInvariant;
pub use monotonic_board::MonotonicBoardInvariant;
pub use outcome_consistent::OutcomeConsistentInvariant;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{description}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of [`Invariant`]s.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns every violation, not just the first.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

type Check<S> = (fn(&S) -> bool, &'static str);

fn collect<S>(checks: &[Check<S>], state: &S) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<_> = checks
        .iter()
        .filter(|(holds, _)| !holds(state))
        .map(|(_, description)| InvariantViolation::new(*description))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let checks: [Check<S>; 2] = [
            (I1::holds, I1::description()),
            (I2::holds, I2::description()),
        ];
        collect(&checks, state)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let checks: [Check<S>; 3] = [
            (I1::holds, I1::description()),
            (I2::holds, I2::description()),
            (I3::holds, I3::description()),
        ];
        collect(&checks, state)
    }
}

/// Every game invariant as one composable set.
pub type GameInvariants = (
    MonotonicBoardInvariant,
    HistoryConsistentInvariant,
    OutcomeConsistentInvariant,
);
