//! OpenTelemetry tracing with file-based export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → FileSpanExporter → JSON lines
//! ```
//!
//! Spans land in `<data_dir>/listagain-otlp.json` as one OTLP JSON document
//! per line. The file rotates at 10 MB and three backups are kept.
//!
//! Level resolution: `RUST_LOG`, then the `trace_level` config key, then
//! `info`.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `tracer`: provider and file exporter
//! - `span_formatter`: OTLP JSON rendering
//! - `file_writer`: rotating line writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, SERVICE_NAME, TRACE_FILE};
