//! Request sequencing.
//!
//! Every discovery fetch is tagged with a [`RequestSeq`]. The tracker remembers
//! the latest one it issued; a response is rendered only when its sequence is
//! still current. Anything else arrived late and is dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic tag attached to a discovery fetch and echoed by its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestSeq(pub u64);

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues sequence numbers and decides which response is allowed through.
///
/// # Example
///
/// ```rust
/// use listagain::query::RequestTracker;
///
/// let mut tracker = RequestTracker::default();
/// let first = tracker.issue();
/// let second = tracker.issue();
///
/// assert!(!tracker.is_current(first));
/// assert!(tracker.is_current(second));
///
/// tracker.abandon();
/// assert!(!tracker.is_current(second));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    next: u64,
    current: Option<RequestSeq>,
}

impl RequestTracker {
    /// Issues a new sequence number, superseding whatever was in flight.
    pub fn issue(&mut self) -> RequestSeq {
        self.next = self.next.wrapping_add(1);
        let seq = RequestSeq(self.next);
        self.current = Some(seq);
        seq
    }

    /// Whether `seq` is the most recently issued, still-wanted request.
    #[must_use]
    pub fn is_current(&self, seq: RequestSeq) -> bool {
        self.current == Some(seq)
    }

    /// Forgets the in-flight request; its response will be ignored.
    ///
    /// Returns the abandoned sequence, if any.
    pub fn abandon(&mut self) -> Option<RequestSeq> {
        self.current.take()
    }

    /// Marks `seq` as answered so a duplicate response is also dropped.
    ///
    /// Returns `false` when `seq` was not current.
    pub fn complete(&mut self, seq: RequestSeq) -> bool {
        if self.is_current(seq) {
            self.current = None;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<RequestSeq> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_increase() {
        let mut tracker = RequestTracker::default();
        let a = tracker.issue();
        let b = tracker.issue();
        assert!(b > a);
        assert_eq!(tracker.current(), Some(b));
    }

    #[test]
    fn completed_sequence_is_not_accepted_twice() {
        let mut tracker = RequestTracker::default();
        let seq = tracker.issue();
        assert!(tracker.complete(seq));
        assert!(!tracker.complete(seq));
        assert!(!tracker.is_current(seq));
    }

    #[test]
    fn abandon_drops_in_flight() {
        let mut tracker = RequestTracker::default();
        assert_eq!(tracker.abandon(), None);
        let seq = tracker.issue();
        assert_eq!(tracker.abandon(), Some(seq));
        assert!(!tracker.is_current(seq));
        let next = tracker.issue();
        assert_ne!(next, seq);
    }
}
