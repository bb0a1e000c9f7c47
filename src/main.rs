use std::io::Write as _;

use anyhow::Result;
use clap::Parser;

use framework_installer::error::CANCELLED_MESSAGE;
use framework_installer::{cli, commands, logging};

/// Exit status used when the run is interrupted with Ctrl-C.
const INTERRUPTED_EXIT_CODE: i32 = 130;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let _ = ctrlc::set_handler(|| {
        let _ = writeln!(std::io::stderr(), "\n{CANCELLED_MESSAGE}");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    });

    match args.command {
        cli::Command::Install(opts) => {
            logging::init_subscriber(args.verbose, "install");
            let log = logging::Logger::new("install");
            commands::install::run(&args.global, &opts, &log)
        }
        cli::Command::List => {
            logging::init_subscriber(args.verbose, "list");
            let log = logging::Logger::new("list");
            commands::list::run(&args.global, &log)
        }
        cli::Command::Completions { shell } => {
            commands::completions::run(shell);
            Ok(())
        }
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
