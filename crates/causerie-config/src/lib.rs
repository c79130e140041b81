// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered TOML configuration for Causerie.
//!
//! Unknown keys are rejected, environment variables override files, and
//! every failure is reported as a miette diagnostic.
//!
//! ```no_run
//! let config = causerie_config::load_and_validate().expect("config errors");
//! println!("short window: {}", config.memory.short_window_size);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError, ConfigSource};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::CauserieConfig;

/// Loads the file hierarchy plus environment overrides, then validates.
pub fn load_and_validate() -> Result<CauserieConfig, Vec<ConfigError>> {
    checked(loader::load_config(), hierarchy_sources)
}

/// Loads one explicit file plus environment overrides, then validates.
pub fn load_and_validate_path(path: &Path) -> Result<CauserieConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        read_source(&path.display().to_string(), path)
            .into_iter()
            .collect()
    })
}

/// Parses and validates an inline TOML document.
pub fn load_and_validate_str(toml_content: &str) -> Result<CauserieConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![ConfigSource::new("<inline>", toml_content)]
    })
}

/// Sources are only read back when extraction failed, to place spans.
fn checked(
    extracted: Result<CauserieConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<ConfigSource>,
) -> Result<CauserieConfig, Vec<ConfigError>> {
    let config = extracted.map_err(|err| diagnostic::from_figment(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

fn read_source(name: &str, path: &Path) -> Option<ConfigSource> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| ConfigSource::new(name, content))
}

fn hierarchy_sources() -> Vec<ConfigSource> {
    let local = Path::new(loader::LOCAL_CONFIG_FILE);
    let local_name = std::env::current_dir()
        .map(|dir| dir.join(local).display().to_string())
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.to_string());

    let mut sources = Vec::new();
    sources.extend(read_source(&local_name, local));
    if let Some(user) = loader::user_config_path() {
        sources.extend(read_source(&user.display().to_string(), &user));
    }
    sources.extend(read_source(
        loader::SYSTEM_CONFIG_PATH,
        Path::new(loader::SYSTEM_CONFIG_PATH),
    ));
    sources
}
