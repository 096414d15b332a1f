//! # mempress-bin
//!
//! Command-line front end for mempress:
//!
//! ```sh
//! cargo run --release --bin=mempress -- commit_touch 512
//! ```
//!
//! The process pauses before and after the allocation so that external tools can take
//! snapshots of the resulting memory state. `--no-pause` skips both prompts.
//!
//! ## External Crates
//!
//! - `log` with `env_logger`: logging, filtered through `RUST_LOG` (default `info`).
//! - `indicatif`: progress bars for long-running strategies, bridged with the logger.
//! - `clap`: argument parsing.

use std::io::{self, BufRead, Write};

use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

pub fn init_logging_with_progress() -> anyhow::Result<MultiProgress> {
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).build();
    let progress = MultiProgress::new();
    LogWrapper::new(progress.clone(), logger).try_init()?;
    Ok(progress)
}

/// Prints `prompt` and blocks until a line (or end of input) arrives on `input`.
pub fn pause(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<()> {
    writeln!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
