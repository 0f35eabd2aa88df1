use anyhow::Result;
use time_clock::cli::run_cli;
use tracing::error;

fn main() -> Result<()> {
    run_cli().inspect_err(|e| {
        error!("Error running the clock {e:?}");
    })?;
    Ok(())
}
