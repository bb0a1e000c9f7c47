//! Command: print version information.

/// Version string baked in at build time, or the crate version.
#[must_use]
pub fn current() -> &'static str {
    option_env!("FRAMEWORK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the installer version to stdout.
pub fn run() {
    println!("framework-install {}", current());
}
