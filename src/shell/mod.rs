//! Terminal front end for the clock. It plays the part of a window: it shows the elapsed label and
//! the toggle button, and turns lines typed on stdin into button presses.
//!
//! Everything here runs on the same [tokio::task::LocalSet] as the controller and its timer, so
//! [TerminalShell] uses plain [RefCell]s.

pub mod icon;
pub mod shutdown;

use std::{
    cell::RefCell,
    io::{self, Write},
    path::PathBuf,
    pin::pin,
    rc::Rc,
    sync::Arc,
    time::Duration,
};

use ansi_term::{Colour, Style};
use anyhow::Result;
use icon::{title_sequence, try_load_icon, Icon, WINDOW_TITLE};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::{wrappers::LinesStream, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    timeclock::controller::{ClockController, DisplaySurface},
    utils::clock::Clock,
};

pub const ELAPSED_HEADER: &str = "Total Time, in Minutes:";

const HELP: &str = "Enter or \"t\" toggles the clock, \"s\" shows the status, \"q\" quits.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Toggle,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    /// An empty line counts as pressing the button.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" | "t" | "toggle" => Self::Toggle,
            "s" | "status" => Self::Status,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Current text of the two labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellView {
    pub button: String,
    pub elapsed: String,
}

pub fn render_view(view: &ShellView) -> String {
    format!(
        "{} {}   [ {} ]",
        Style::new().dimmed().paint(ELAPSED_HEADER),
        Style::new().bold().paint(view.elapsed.as_str()),
        Colour::Cyan.bold().paint(view.button.as_str()),
    )
}

pub struct TerminalShell {
    view: RefCell<ShellView>,
    out: RefCell<Box<dyn Write>>,
}

impl TerminalShell {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self {
            view: RefCell::new(ShellView::default()),
            out: RefCell::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn view(&self) -> ShellView {
        self.view.borrow().clone()
    }

    /// Prints both labels. Skipped until the elapsed label has been set for the first time.
    pub fn redraw(&self) {
        let line = {
            let view = self.view.borrow();
            if view.elapsed.is_empty() {
                return;
            }
            render_view(&view)
        };
        self.write_line(&line);
    }

    pub fn message(&self, text: &str) {
        self.write_line(&Colour::Yellow.paint(text).to_string());
    }

    /// Sets the terminal title. The icon has nowhere to go in a terminal, so it is only
    /// acknowledged.
    pub fn decorate(&self, title: &str, icon: Option<&Icon>) {
        self.write_raw(&title_sequence(title));
        if let Some(icon) = icon {
            debug!(path = ?icon.path, bytes = icon.size, "Using window icon");
        }
    }

    fn write_line(&self, line: &str) {
        self.write_raw(&format!("{line}\n"));
    }

    fn write_raw(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!("Failed to write to terminal {e:?}");
        }
    }
}

impl DisplaySurface for TerminalShell {
    fn set_button_label(&self, label: &str) {
        self.view.borrow_mut().button = label.to_string();
        self.redraw();
    }

    fn set_elapsed_label(&self, label: &str) {
        self.view.borrow_mut().elapsed = label.to_string();
        self.redraw();
    }
}

pub struct ShellOptions {
    pub tick_period: Duration,
    pub assets_dir: Option<PathBuf>,
}

/// Opens the clock on the terminal and runs until the user quits, stdin closes, or Ctrl-C.
///
/// # Panics
///
/// Must run inside a [tokio::task::LocalSet].
pub async fn run_shell(options: ShellOptions, clock: Arc<dyn Clock>) -> Result<()> {
    let shell = Rc::new(TerminalShell::stdout());
    let icon = try_load_icon(options.assets_dir.as_deref());
    shell.decorate(WINDOW_TITLE, icon.as_ref());
    shell.message(HELP);

    let mut controller = ClockController::new(shell.clone(), clock, options.tick_period);

    let shutdown_token = CancellationToken::new();
    tokio::task::spawn_local(shutdown::detect_shutdown(shutdown_token.clone()));

    let input = pin!(LinesStream::new(BufReader::new(tokio::io::stdin()).lines()));
    let result = drive(&mut controller, &shell, input, &shutdown_token).await;
    shutdown_token.cancel();

    info!(
        total = controller.elapsed_minutes(),
        elapsed = %controller.elapsed_display(),
        "Closing the clock"
    );
    result
}

/// Event loop of the shell. Commands are handled one by one between timer ticks.
pub async fn drive<S>(
    controller: &mut ClockController,
    shell: &TerminalShell,
    mut input: S,
    shutdown: &CancellationToken,
) -> Result<()>
where
    S: Stream<Item = io::Result<String>> + Unpin,
{
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            line = input.next() => line,
        };

        let Some(line) = line else {
            debug!("Input closed");
            return Ok(());
        };

        let line = match line {
            Ok(line) => line,
            // The bad line is already consumed, so the next read picks up after it.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("Skipping unreadable input {e:?}");
                shell.message(&format!("Couldn't read that line. {HELP}"));
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match ShellCommand::parse(&line) {
            ShellCommand::Toggle => {
                controller.toggle();
            }
            ShellCommand::Status => shell.redraw(),
            ShellCommand::Help => shell.message(HELP),
            ShellCommand::Quit => return Ok(()),
            ShellCommand::Unknown(command) => {
                warn!(%command, "Unknown command");
                shell.message(&format!("Unknown command {command:?}. {HELP}"));
            }
        }
    }
}
