/// Crawl lifecycle definitions
///
/// A crawl starts `Idle`, moves to `Running` on its first pull, and ends in
/// exactly one terminal state. Terminal states never change again.
use serde::Serialize;
use std::fmt;

/// Represents the current state of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlState {
    // ===== Active States =====
    /// Crawl has been created but nothing has been fetched yet
    Idle,

    /// Crawl is pulling URLs from the frontier
    Running,

    // ===== Terminal States =====
    /// The frontier ran dry
    Completed,

    /// The page budget was reached
    BudgetExhausted,

    /// The crawl stopped early (consumer went away or an internal fault)
    Aborted,
}

impl CrawlState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::BudgetExhausted | Self::Aborted)
    }

    /// Returns true if the crawl ended on its own rather than being cut short
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed | Self::BudgetExhausted)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    ///
    /// | From | Allowed targets |
    /// |------|-----------------|
    /// | Idle | Running, Aborted |
    /// | Running | Completed, BudgetExhausted, Aborted |
    /// | terminal | none |
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        match self {
            Self::Idle => matches!(next, Self::Running | Self::Aborted),
            Self::Running => next.is_terminal(),
            _ => false,
        }
    }

    /// Short machine-readable name, also used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::BudgetExhausted => "budget_exhausted",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
