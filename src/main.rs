// Entrypoint for the CLI application.
// - Keeps `main` small: read configuration, then hand the raw arguments and
//   a console reporter to `app::run`.
// - Returns `anyhow::Result` so fatal errors (bad configuration, missing
//   .gitignore, unreachable API) print their context chain and exit 1.

use std::process::ExitCode;

use repo_uploader::{app, config::Config, ui::ConsoleReporter};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    // API base URL and remote layout come from the environment, see
    // `config::Config::from_env`.
    let config = Config::from_env()?;

    let mut reporter = ConsoleReporter::new();
    let outcome = app::run(std::env::args(), &config, &mut reporter)?;
    Ok(outcome.exit_code())
}

/// Diagnostics go to stderr and are filtered by `RUST_LOG`; notices meant
/// for the user are printed by the reporter regardless of the level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
