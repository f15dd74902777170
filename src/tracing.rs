use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

use crate::setting::LogConfig;

/// Bunyan JSON subscriber named after `config.name`. `RUST_LOG` wins over
/// `config.env_filter` when set.
pub fn get_subscriber<Sink>(config: &LogConfig, sink: Sink) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.env_filter));
    Registry::default()
        .with(filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(config.name.clone(), sink))
}

/// Installs the heatmap subscriber as the global default and routes `log` records into it.
pub fn init_subscriber(config: &LogConfig) -> crate::Result<()> {
    LogTracer::init().map_err(crate::Error::as_unknown_error)?;
    set_global_default(get_subscriber(config, std::io::stdout))
        .map_err(crate::Error::as_unknown_error)
}
