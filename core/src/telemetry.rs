use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Used when `RUST_LOG` is unset or unparsable: info for this crate and the
/// `bootstrap` binary, the runtime's own crates stay quiet.
pub const DEFAULT_LOG_FILTER: &str = "greeter_core=info,bootstrap=info";

/// Installs the global subscriber. Logs go to stderr so that stdout carries
/// nothing but the response in local mode.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        // CloudWatch adds its own timestamps
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}
