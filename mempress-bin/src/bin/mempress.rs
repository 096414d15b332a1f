use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::info;
use mempress::driver::{self, UsageError};
use mempress::config::{READ_TARGET, SECTION_NAME};
use mempress::{PressureConfig, StrategyRegistry};
use mempress_bin::{init_logging_with_progress, pause};

const AMOUNT_HELP: &str = "\
  strategy -- reserve, commit, commit_touch, unusable,
              shareable, shareable_touch, pool, nppool
  amount   -- megabytes to allocate for all strategies except
              pool and nppool; number of kernel objects to
              allocate for pool and nppool

  nppool is bounded by /proc/sys/fs/aio-max-nr: the kernel charges
  about twice the requested count against it, so with the default
  of 65536 counts above roughly 32000 fail without leaking anything.";

/// CLI arguments for the `mempress` binary.
#[derive(Debug, Parser)]
#[clap(name = "mempress", version, about, after_help = AMOUNT_HELP)]
struct CliArgs {
    /// The allocation strategy to use.
    strategy: String,
    /// Megabytes, or kernel objects for `pool` and `nppool`.
    amount: u64,
    /// Do not wait for ENTER before and after allocating.
    #[clap(long = "no-pause")]
    no_pause: bool,
    /// Name of the shared-memory object used by `shareable` and `shareable_touch`.
    #[clap(long = "section-name", default_value = SECTION_NAME)]
    section_name: String,
    /// File the `nppool` reads are issued against.
    #[clap(long = "read-target", default_value = READ_TARGET)]
    read_target: PathBuf,
}

fn usage_error(e: &UsageError) -> ExitCode {
    eprintln!("error: {}\n", e);
    eprintln!("{}\n\n{}", CliArgs::command().render_usage(), AMOUNT_HELP);
    ExitCode::from(1)
}

fn main() -> anyhow::Result<ExitCode> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            e.print()?;
            return Ok(ExitCode::from(1));
        }
    };

    let progress = init_logging_with_progress()?;
    info!("CLI args: {:?}", args);

    let config = PressureConfig {
        section_name: args.section_name,
        read_target: args.read_target,
        progress: Some(progress),
    };
    let registry = StrategyRegistry::new(&config);
    let invocation = match driver::resolve(&registry, &args.strategy, args.amount) {
        Ok(invocation) => invocation,
        Err(e) => return Ok(usage_error(&e)),
    };

    let mut stdin = io::stdin().lock();
    if !args.no_pause {
        pause("Press ENTER to start", &mut stdin, &mut io::stdout())?;
    }

    let outcome = invocation.run();
    driver::report(&outcome, &mut io::stdout(), &mut io::stderr())?;

    if !args.no_pause {
        pause("Press ENTER to exit", &mut stdin, &mut io::stdout())?;
    }
    Ok(ExitCode::SUCCESS)
}
