//! Typed control-lookup results.
//!
//! Every "find this control" operation returns a `Lookup` instead of
//! raising; callers pattern-match on Found / NotFound / Error.

/// Handle to a located page control (surface-native element reference).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control(pub String);

/// Outcome of a bounded control lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Control located within the timeout.
    Found(Control),
    /// Timeout elapsed without a match.
    NotFound,
    /// Transport failure while looking.
    Error(String),
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}
