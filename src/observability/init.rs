//! Subscriber setup.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::tracer;
use crate::domain::Result;
use crate::Config;

/// Service and instrumentation scope name on every exported span.
pub const SERVICE_NAME: &str = "listagain";

/// Trace file name inside the data directory.
pub const TRACE_FILE: &str = "listagain-otlp.json";

/// Installs the global subscriber: an `EnvFilter` at `config.trace_level`
/// (default `info`; `RUST_LOG` wins when set) feeding an OpenTelemetry layer
/// that exports to `<data_dir>/listagain-otlp.json`.
///
/// Only the first call in a process installs anything; later calls are
/// no-ops.
///
/// # Errors
///
/// Returns [`MarketError::Io`](crate::MarketError::Io) if the data directory
/// cannot be created.
///
/// # Example
///
/// ```rust,no_run
/// use listagain::observability::init_tracing;
/// use listagain::Config;
///
/// init_tracing(&Config::default())?;
/// tracing::info!("tracing is active");
/// # Ok::<(), listagain::MarketError>(())
/// ```
pub fn init_tracing(config: &Config) -> Result<()> {
    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.trace_level.as_deref().unwrap_or("info")));

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(data_dir.join(TRACE_FILE), resource, SERVICE_NAME);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();

    Ok(())
}
