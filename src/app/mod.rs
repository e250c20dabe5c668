//! Application layer coordinating state, events, and actions.
//!
//! Sits between the runtime (main.rs) and the domain/storage/worker layers.
//! Data flows one way:
//!
//! ```text
//! Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                       ↑                                  ↓
//!                       └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`filters`]: Discovery filter state and its setters
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Input and view mode types
//! - [`state`]: Central state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use listagain::app::{handle_event, AppState, Event};
//!
//! let mut state = AppState::default();
//! let (_, actions) = handle_event(&mut state, &Event::Start)?;
//! assert_eq!(actions.len(), 2);
//! # Ok::<(), listagain::MarketError>(())
//! ```

pub mod actions;
pub mod filters;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use filters::{CategoryFilter, ConditionFilter, FilterState, SortKey};
pub use handler::{handle_event, Event};
pub use modes::{InputMode, SearchFocus, ViewMode};
pub use state::{AppState, Discovery, DiscoverySettings, Remote};
