//! The engine state machine shared by both engines.
//!
//! ```text
//! Idle --set_up--> Running --step...--> Finished
//!   ^                                      |
//!   +------------- reset / edit -----------+
//! ```

/// Where an engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    /// No algorithm has been set up since the last reset or edit.
    #[default]
    Idle,
    /// An algorithm is set up and `step` advances it.
    Running,
    /// The search is over; `step` does nothing until the next set-up.
    Finished(Termination),
}

impl SearchState {
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Finished(_))
    }

    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The frontier ran dry.
    FrontierExhausted,
    /// A* or GBFS popped the goal.
    GoalReached,
    /// Bellman-Ford's verification pass found nothing left to relax.
    Converged,
    /// Bellman-Ford's verification pass could still relax an edge into
    /// `vertex`.
    NegativeCycle { vertex: usize },
}

/// What a single `step` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<N> {
    /// Nothing is set up.
    Idle,
    /// `node` was popped and its neighbours examined.
    Expanded(N),
    /// `node` was popped with an outdated key and dropped unexpanded.
    Stale(N),
    /// Bellman-Ford examined the edge `from -> to`.
    Relaxed { from: N, to: N, improved: bool },
    /// Bellman-Ford moved its cursor to the next vertex or round.
    Advanced,
    /// The search is finished, either by this call or earlier.
    Finished(Termination),
}
