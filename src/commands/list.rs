//! Command: list registered components and their source paths.
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context as _, Result};

use super::resolve_root;
use crate::cli::GlobalOpts;
use crate::config::ComponentRegistry;
use crate::logging::Logger;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the root cannot be resolved or the registry is invalid.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let root = resolve_root(global)?;
    let registry = ComponentRegistry::for_source_root(&root)
        .with_context(|| format!("loading components from {}", root.display()))?;
    log.debug(&format!("source: {}", root.display()));
    print!("{}", render(&registry, &root));
    Ok(())
}

/// One line per component followed by its paths, marking those absent
/// from `root`.
fn render(registry: &ComponentRegistry, root: &Path) -> String {
    let mut out = String::new();
    for component in registry.components() {
        let _ = writeln!(out, "{}", component.name);
        for path in &component.paths {
            let marker = if root.join(path).exists() {
                ""
            } else {
                " (missing)"
            };
            let _ = writeln!(out, "  {}{marker}", path.display());
        }
    }
    out
}
