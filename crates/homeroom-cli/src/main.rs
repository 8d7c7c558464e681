use std::process::ExitCode;

use homeroom_cli::logging::init_tracing;
use homeroom_cli::{cli, dispatch, LogFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli::command().get_matches();

    let format = matches
        .get_one::<LogFormat>("log-format")
        .copied()
        .unwrap_or_default();
    init_tracing(format, matches.get_count("verbose"));

    let mut stdout = std::io::stdout().lock();
    match dispatch(&matches, &mut stdout).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
