use std::env::{self, VarError};
use std::io::Write;
use std::sync::Arc;

use anyhow::Context as _;
use greeter_core::config::{GreeterConfig, GreetingDefaults, load_config};
use greeter_core::errors::{ConfigError, Result as GreeterResult};
use greeter_core::greeting::{GreetingEvent, GreetingResponse, greet};
use greeter_core::telemetry::init_tracing;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::info;

/// Points local mode at a JSON event file.
const EVENT_PATH_ENV_VAR: &str = "GREETER_EVENT_PATH";

const SAMPLE_EVENT: &str = r#"{"first_name": "victor", "last_name": "ponce"}"#;

/// The host's invocation context is accepted and dropped.
pub async fn function_handler(
    event: LambdaEvent<GreetingEvent>,
    defaults: &GreetingDefaults,
) -> Result<GreetingResponse, Error> {
    let (payload, _context) = event.into_parts();
    Ok(greet(&payload, defaults))
}

fn load_validated_config() -> anyhow::Result<GreeterConfig> {
    let config = load_config(None).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn event_path_from(value: std::result::Result<String, VarError>) -> GreeterResult<Option<String>> {
    match value {
        Ok(path) => Ok(Some(path)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::LoadFailed {
            location: EVENT_PATH_ENV_VAR.to_string(),
            error: Box::new(e),
        }
        .into()),
    }
}

/// Reads the event from `path`, or falls back to the sample event.
fn read_local_event(path: Option<&str>) -> GreeterResult<GreetingEvent> {
    match path {
        Some(path) => {
            info!("Reading event from {}", path);
            let raw = std::fs::read_to_string(path)?;
            GreetingEvent::from_json(&raw)
        }
        None => GreetingEvent::from_json(SAMPLE_EVENT),
    }
}

/// Writes the response as JSON to `out`, the only thing local mode prints.
fn run_local<W: Write>(
    event: &GreetingEvent,
    defaults: &GreetingDefaults,
    out: &mut W,
) -> GreeterResult<()> {
    let response = greet(event, defaults);
    serde_json::to_writer_pretty(&mut *out, &response)?;
    writeln!(out)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = load_validated_config()?;
    let defaults = Arc::new(config.greeting);

    if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("Running in AWS Lambda environment");
        lambda_runtime::run(service_fn(move |event: LambdaEvent<GreetingEvent>| {
            let defaults = Arc::clone(&defaults);
            async move { function_handler(event, &defaults).await }
        }))
        .await
    } else {
        info!("Running in local development mode");

        let path = event_path_from(env::var(EVENT_PATH_ENV_VAR))?;
        let event = read_local_event(path.as_deref())?;
        run_local(&event, &defaults, &mut std::io::stdout().lock())?;

        info!("Local invocation completed successfully");
        Ok(())
    }
}
