use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use clap::Parser;
use tokio::task::LocalSet;
use tracing::{info, level_filters::LevelFilter};

use crate::{
    shell::{run_shell, ShellOptions},
    timeclock::timer::DEFAULT_TICK_PERIOD,
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, create_dir},
        logging::{enable_logging, LOG_PREFIX},
        runtime::single_thread_runtime,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Time Clock", version, long_about = None)]
#[command(about = "Clock in, clock out, and see how long you've been at it", long_about = None)]
pub struct Args {
    #[arg(long, help = "Enable trace logging")]
    log: bool,
    #[arg(long = "log-console", help = "Mirror logs to stderr")]
    log_console: bool,
    #[arg(long = "log-filter", help = "Log level. Overrides --log and RUST_LOG")]
    log_filter: Option<LevelFilter>,
    #[arg(
        long,
        help = "Directory for logs. By default tries to use $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        help = "Directory with the window icon. Defaults to assets next to the executable"
    )]
    assets: Option<PathBuf>,
    /// This option is for debugging purposes only.
    #[arg(long = "tick-seconds", hide = true, default_value_t = DEFAULT_TICK_PERIOD.as_secs())]
    tick_seconds: u64,
}

impl Args {
    fn log_level(&self) -> Option<LevelFilter> {
        self.log_filter.or(self.log.then_some(LevelFilter::TRACE))
    }

    fn tick_period(&self) -> Result<Duration> {
        if self.tick_seconds == 0 {
            return Err(anyhow!("--tick-seconds must be at least 1"));
        }
        Ok(Duration::from_secs(self.tick_seconds))
    }
}

pub fn run_cli() -> Result<()> {
    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let app_dir = args
        .dir
        .clone()
        .map_or_else(create_application_default_path, create_dir)?;
    enable_logging(LOG_PREFIX, &app_dir, args.log_level(), args.log_console)?;

    let options = ShellOptions {
        tick_period: args.tick_period()?,
        assets_dir: args.assets,
    };
    info!(period = ?options.tick_period, "Starting the clock");

    let runtime = single_thread_runtime()?;
    let result = runtime
        .block_on(LocalSet::new().run_until(run_shell(options, Arc::new(DefaultClock))));
    // Stdin is read on a blocking thread that won't notice the shutdown on its own.
    runtime.shutdown_background();
    result
}
