use anyhow::Result;
use std::io;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Initialize logging on stderr so stdout stays clean for command output.
/// `RUST_LOG` overrides the verbosity-derived default.
///
/// # Errors
///
/// Returns an error if a filter directive is invalid or a global subscriber is
/// already installed
pub fn init(verbosity_level: Option<Level>, json: bool) -> Result<()> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("hyper_util=error".parse()?)
        .add_directive("reqwest=warn".parse()?);

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_target(false);
        let subscriber = Registry::default().with(fmt_layer).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_target(false);
        let subscriber = Registry::default().with(fmt_layer).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
