//! Component registry configuration.
pub mod components;
pub mod toml_loader;

pub use components::{ALL, Component, ComponentRegistry, REGISTRY_FILE, Selection};
