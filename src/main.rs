//! prfetch CLI entrypoint: fetch pull request information as JSON.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prfetch::config::Operation;
use prfetch::{FetchError, HttpTransport, PrFetchConfig, PullRequestClient};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(?error, "prfetch failed");
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), FetchError> {
    let config = load_config()?;

    let operation = config.operation()?;
    let (owner, repository) = config.require_repository()?;
    let transport = HttpTransport::new(config.transport_config()?)?;
    let client = PullRequestClient::new(transport).with_page_size(config.page_size)?;

    match operation {
        Operation::ByReference(reference) => {
            let pull_requests = client
                .find_by_reference_name(&owner, &repository, &reference)
                .await?;
            write_json(&pull_requests)
        }
        Operation::ByNumber(number) => {
            let pull_request = client.find_by_number(&owner, &repository, number).await?;
            write_json(&pull_request)
        }
        Operation::Commits(number) => {
            let commits = client
                .find_commits(&owner, &repository, number)?
                .collect_all()
                .await?;
            write_json(&commits)
        }
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`FetchError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PrFetchConfig, FetchError> {
    PrFetchConfig::load().map_err(|error| FetchError::Configuration {
        message: error.to_string(),
    })
}

fn write_json(value: &impl Serialize) -> Result<(), FetchError> {
    let rendered = serde_json::to_string_pretty(value)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").map_err(|error| FetchError::Io {
        message: error.to_string(),
    })
}
