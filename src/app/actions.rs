//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler never touches the store, the session file or the outside
//! world. It returns a `Vec<Action>` describing what should happen next, and
//! the binary executes those actions in order.
//!
//! # Example
//!
//! ```rust
//! use listagain::app::Action;
//! use listagain::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::load_categories())];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the application.
    CloseFocus,

    /// Posts a message to the background worker thread.
    ///
    /// Every store read or write goes through here so the event loop never
    /// blocks on I/O.
    PostToWorker(WorkerMessage),

    /// Hand a URL to the user (contact links open outside the client).
    OpenUrl(String),

    /// Forget the persisted session.
    ClearSession,
}
