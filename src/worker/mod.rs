//! Background worker for store operations.
//!
//! All store I/O runs on a dedicated thread so the event loop never blocks on
//! it. Messages cross the boundary with their trace context attached.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Store-backed message processing
//! - `runtime`: Thread and channel plumbing

pub mod handler;
pub mod messages;
pub mod runtime;

pub use handler::MarketWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
pub use runtime::WorkerHandle;
