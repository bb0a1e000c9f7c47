//! Component registry: named bundles of source-relative paths.
//!
//! The built-in registry mirrors the layout of the framework template.  A
//! template may replace it by shipping a `components.toml` at its root:
//!
//! ```toml
//! [[component]]
//! name = "agents"
//! paths = [".claude/agents"]
//!
//! [[component]]
//! name = "makefile"
//! paths = ["Makefile", "make/"]
//! ```
use std::collections::HashSet;
use std::path::{Component as PathComponent, Path, PathBuf};

use serde::Deserialize;

use super::toml_loader;
use crate::error::ConfigError;

/// Keyword that selects every registered component.
pub const ALL: &str = "all";

/// File name of the optional registry override in the source root.
pub const REGISTRY_FILE: &str = "components.toml";

/// Built-in components in registration order.
const BUILTIN: &[(&str, &[&str])] = &[
    ("agents", &[".claude/agents"]),
    ("commands", &[".claude/commands"]),
    ("hooks", &[".claude/hooks"]),
    ("settings", &[".claude/settings.json"]),
    ("makefile", &["Makefile", "make/"]),
    ("docs", &["docs/"]),
    ("claudemd", &["CLAUDE.md"]),
];

/// A named bundle of one or more paths relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Component {
    /// Unique registry key.
    pub name: String,
    /// Paths installed for this component, in order.
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "component")]
    components: Vec<Component>,
}

/// Ordered, immutable mapping from component name to source paths.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    components: Vec<Component>,
}

/// Outcome of matching requested names against the registry.
#[derive(Debug)]
pub struct Selection<'a> {
    /// Components to install, in request (or registration) order.
    pub components: Vec<&'a Component>,
    /// Requested names that are not registered.
    pub unknown: Vec<String>,
}

impl ComponentRegistry {
    /// Build a registry from components, validating names and paths.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate or reserved names, components without
    /// paths, and paths that are absolute or contain `..`.
    pub fn new(components: Vec<Component>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for component in &components {
            if component.name == ALL {
                return Err(ConfigError::ReservedName(component.name.clone()));
            }
            if !seen.insert(component.name.as_str()) {
                return Err(ConfigError::DuplicateComponent(component.name.clone()));
            }
            if component.paths.is_empty() {
                return Err(ConfigError::EmptyComponent(component.name.clone()));
            }
            for path in &component.paths {
                validate_path(&component.name, path)?;
            }
        }
        Ok(Self { components })
    }

    /// The registry compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            components: BUILTIN
                .iter()
                .map(|(name, paths)| Component {
                    name: (*name).to_string(),
                    paths: paths.iter().map(PathBuf::from).collect(),
                })
                .collect(),
        }
    }

    /// Load a registry from a `components.toml` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file: RegistryFile = toml_loader::load_config(path)?;
        Self::new(file.components)
    }

    /// Load `components.toml` from `source_root` if present, otherwise the
    /// built-in registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the override file exists but is invalid.
    pub fn for_source_root(source_root: &Path) -> Result<Self, ConfigError> {
        let path = source_root.join(REGISTRY_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::builtin())
        }
    }

    /// Look up a component by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// All components in registration order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Resolve requested names into components.
    ///
    /// An empty request or any occurrence of [`ALL`] selects every component
    /// in registration order.  Otherwise the request order is kept, repeats
    /// collapse to their first occurrence, and unregistered names are
    /// returned in [`Selection::unknown`].
    #[must_use]
    pub fn select<S: AsRef<str>>(&self, requested: &[S]) -> Selection<'_> {
        if requested.is_empty() || requested.iter().any(|r| r.as_ref() == ALL) {
            return Selection {
                components: self.components.iter().collect(),
                unknown: Vec::new(),
            };
        }

        let mut seen = HashSet::new();
        let mut components = Vec::new();
        let mut unknown = Vec::new();
        for requested_name in requested {
            let name = requested_name.as_ref();
            if !seen.insert(name) {
                continue;
            }
            match self.get(name) {
                Some(component) => components.push(component),
                None => unknown.push(name.to_string()),
            }
        }
        Selection {
            components,
            unknown,
        }
    }
}

fn validate_path(component: &str, path: &Path) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidPath {
        component: component.to_string(),
        path: path.display().to_string(),
        reason: reason.to_string(),
    };
    if path.as_os_str().is_empty() {
        return Err(invalid("must not be empty"));
    }
    for part in path.components() {
        match part {
            PathComponent::Prefix(_) | PathComponent::RootDir => {
                return Err(invalid("must be relative"));
            }
            PathComponent::ParentDir => return Err(invalid("must not contain '..'")),
            PathComponent::CurDir | PathComponent::Normal(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn write_temp_toml(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REGISTRY_FILE);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn names(selection: &Selection<'_>) -> Vec<String> {
        selection
            .components
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    #[test]
    fn builtin_registration_order() {
        let registry = ComponentRegistry::builtin();
        let listing: Vec<String> = registry
            .components()
            .iter()
            .map(|c| {
                let paths: Vec<String> =
                    c.paths.iter().map(|p| p.display().to_string()).collect();
                format!("{}: {}", c.name, paths.join(", "))
            })
            .collect();
        insta::assert_snapshot!(listing.join("\n"), @r"
        agents: .claude/agents
        commands: .claude/commands
        hooks: .claude/hooks
        settings: .claude/settings.json
        makefile: Makefile, make/
        docs: docs/
        claudemd: CLAUDE.md
        ");
    }

    #[test]
    fn builtin_passes_validation() {
        let builtin = ComponentRegistry::builtin();
        assert!(ComponentRegistry::new(builtin.components().to_vec()).is_ok());
    }

    #[test]
    fn all_expands_in_registration_order() {
        let registry = ComponentRegistry::builtin();
        let selection = registry.select(&["docs", ALL]);
        assert_eq!(selection.components.len(), 7);
        assert_eq!(selection.components[0].name, "agents");
        assert!(selection.unknown.is_empty());
    }

    #[test]
    fn empty_request_selects_everything() {
        let registry = ComponentRegistry::builtin();
        let selection = registry.select::<&str>(&[]);
        assert_eq!(selection.components.len(), 7);
    }

    #[test]
    fn request_order_is_kept() {
        let registry = ComponentRegistry::builtin();
        let selection = registry.select(&["hooks", "agents"]);
        assert_eq!(names(&selection), vec!["hooks", "agents"]);
    }

    #[test]
    fn unknown_names_are_reported_not_fatal() {
        let registry = ComponentRegistry::builtin();
        let selection = registry.select(&["agents", "bogus"]);
        assert_eq!(names(&selection), vec!["agents"]);
        assert_eq!(selection.unknown, vec!["bogus"]);
    }

    #[test]
    fn repeated_names_collapse() {
        let registry = ComponentRegistry::builtin();
        let selection = registry.select(&["docs", "docs", "bogus", "bogus"]);
        assert_eq!(names(&selection), vec!["docs"]);
        assert_eq!(selection.unknown, vec!["bogus"]);
    }

    #[test]
    fn load_preserves_file_order() {
        let (_dir, path) = write_temp_toml(
            "[[component]]\nname = \"zeta\"\npaths = [\"z\"]\n\n\
             [[component]]\nname = \"alpha\"\npaths = [\"a\", \"b/\"]\n",
        );
        let registry = ComponentRegistry::load(&path).unwrap();
        let selection = registry.select::<&str>(&[]);
        assert_eq!(names(&selection), vec!["zeta", "alpha"]);
        assert_eq!(
            registry.get("alpha").unwrap().paths,
            vec![PathBuf::from("a"), PathBuf::from("b/")]
        );
    }

    #[test]
    fn load_rejects_duplicates() {
        let (_dir, path) = write_temp_toml(
            "[[component]]\nname = \"a\"\npaths = [\"x\"]\n\n\
             [[component]]\nname = \"a\"\npaths = [\"y\"]\n",
        );
        let err = ComponentRegistry::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateComponent(ref n) if n == "a"));
    }

    #[test]
    fn load_rejects_reserved_name() {
        let (_dir, path) = write_temp_toml("[[component]]\nname = \"all\"\npaths = [\"x\"]\n");
        let err = ComponentRegistry::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReservedName(_)));
    }

    #[test]
    fn load_rejects_empty_paths() {
        let (_dir, path) = write_temp_toml("[[component]]\nname = \"a\"\npaths = []\n");
        let err = ComponentRegistry::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyComponent(_)));
    }

    #[test]
    fn rejects_parent_dir_and_absolute_paths() {
        let parent = Component {
            name: "a".to_string(),
            paths: vec![PathBuf::from("../outside")],
        };
        assert!(matches!(
            ComponentRegistry::new(vec![parent]).unwrap_err(),
            ConfigError::InvalidPath { .. }
        ));

        let absolute = Component {
            name: "b".to_string(),
            paths: vec![PathBuf::from("/etc/passwd")],
        };
        let err = ComponentRegistry::new(vec![absolute]).unwrap_err();
        assert!(err.to_string().contains("must be relative"));
    }

    #[test]
    fn load_reports_parse_errors() {
        let (_dir, path) = write_temp_toml("[[component]]\nname = 3\n");
        let err = ComponentRegistry::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn for_source_root_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ComponentRegistry::for_source_root(dir.path()).unwrap();
        assert!(registry.get("claudemd").is_some());
    }

    #[test]
    fn for_source_root_prefers_override_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(REGISTRY_FILE),
            "[[component]]\nname = \"only\"\npaths = [\"only.txt\"]\n",
        )
        .unwrap();
        let registry = ComponentRegistry::for_source_root(dir.path()).unwrap();
        assert_eq!(registry.components().len(), 1);
        assert!(registry.get("agents").is_none());
    }
}
