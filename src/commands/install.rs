//! Command: install or update components in the destination project.
use anyhow::{Context as _, Result};

use super::{resolve_dest, resolve_root, version};
use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::ComponentRegistry;
use crate::install::Installer;
use crate::logging::Logger;
use crate::merge::{
    Choice, ConflictResolver, DiffTool, FixedPrompt, ResolutionPolicy, TerminalPrompt,
};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the roots cannot be resolved, the component registry
/// is invalid, the operator cancels, or any component fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Logger) -> Result<()> {
    let root = resolve_root(global)?;
    let dest = resolve_dest(global)?;

    log.info(&format!("framework-install {}", version::current()));

    log.stage("Loading components");
    let registry = ComponentRegistry::for_source_root(&root)
        .with_context(|| format!("loading components from {}", root.display()))?;
    log.info(&format!("source: {}", root.display()));
    log.info(&format!("destination: {}", dest.display()));
    log.debug(&format!("{} components registered", registry.components().len()));

    let diff = DiffTool::new(opts.diff_program.as_str());
    if !diff.is_available() {
        log.warn(&format!(
            "'{}' not found on PATH; conflicts will be shown without a diff",
            diff.program()
        ));
    }

    let mut resolver = build_resolver(opts);
    let report = Installer::new(&registry, &root, &dest, &diff)
        .dry_run(global.dry_run)
        .install(&opts.components, &mut resolver, log)?;

    log.debug(&format!("totals: {}", report.merged.describe()));
    log.print_summary();

    let failed = log.failure_count();
    if failed > 0 {
        anyhow::bail!("{failed} component(s) failed");
    }
    Ok(())
}

/// Pick the conflict strategy requested on the command line.
fn build_resolver(opts: &InstallOpts) -> ConflictResolver {
    if opts.yes {
        ConflictResolver::with_policy(
            ResolutionPolicy::OverrideAll,
            Box::new(TerminalPrompt::stdio()),
        )
    } else if opts.no_clobber {
        ConflictResolver::new(Box::new(FixedPrompt(Choice::No)))
    } else {
        ConflictResolver::new(Box::new(TerminalPrompt::stdio()))
    }
}
