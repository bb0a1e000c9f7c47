use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Top-level CLI entry point for the framework installer.
#[derive(Parser, Debug)]
#[command(
    name = "framework-install",
    about = "Install framework components into a project without clobbering local changes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the framework template root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Destination project directory (defaults to the current directory)
    #[arg(long, global = true)]
    pub dest: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install or update framework components
    Install(InstallOpts),
    /// List available components
    List,
    /// Generate a shell completion script
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Components to install (`all` or none selects every component)
    pub components: Vec<String>,

    /// Overwrite every conflicting file without asking
    #[arg(short, long, conflicts_with = "no_clobber")]
    pub yes: bool,

    /// Keep every conflicting file without asking
    #[arg(long)]
    pub no_clobber: bool,

    /// Program used to show differences between files
    #[arg(long, value_name = "PROG", default_value = "diff")]
    pub diff_program: String,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn install_opts(cli: Cli) -> InstallOpts {
        match cli.command {
            Command::Install(opts) => opts,
            other => panic!("expected install, got {other:?}"),
        }
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_without_components() {
        let opts = install_opts(Cli::parse_from(["framework-install", "install"]));
        assert!(opts.components.is_empty());
        assert!(!opts.yes);
        assert_eq!(opts.diff_program, "diff");
    }

    #[test]
    fn parse_install_components_in_order() {
        let opts = install_opts(Cli::parse_from([
            "framework-install",
            "install",
            "hooks",
            "agents",
        ]));
        assert_eq!(opts.components, vec!["hooks", "agents"]);
    }

    #[test]
    fn parse_install_dry_run_short() {
        let cli = Cli::parse_from(["framework-install", "-d", "install"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "framework-install",
            "install",
            "--root",
            "/tmp/template",
            "--dest",
            "/tmp/project",
            "--dry-run",
        ]);
        assert_eq!(cli.global.root, Some(PathBuf::from("/tmp/template")));
        assert_eq!(cli.global.dest, Some(PathBuf::from("/tmp/project")));
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_yes_and_diff_program() {
        let opts = install_opts(Cli::parse_from([
            "framework-install",
            "install",
            "-y",
            "--diff-program",
            "colordiff",
        ]));
        assert!(opts.yes);
        assert_eq!(opts.diff_program, "colordiff");
    }

    #[test]
    fn yes_conflicts_with_no_clobber() {
        let result = Cli::try_parse_from(["framework-install", "install", "--yes", "--no-clobber"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_list() {
        let cli = Cli::parse_from(["framework-install", "list"]);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["framework-install", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Command::Completions { shell: Shell::Bash }
        ));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["framework-install", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["framework-install", "-v", "list"]);
        assert!(cli.verbose);
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["framework-install"]).is_err());
    }
}
