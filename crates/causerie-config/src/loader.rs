// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment layering.
//!
//! Later layers win: compiled defaults, `/etc/causerie/causerie.toml`,
//! `$XDG_CONFIG_HOME/causerie/causerie.toml`, `./causerie.toml`, then
//! `CAUSERIE_<SECTION>_<KEY>` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;

use crate::model::CauserieConfig;

pub const SYSTEM_CONFIG_PATH: &str = "/etc/causerie/causerie.toml";

pub const LOCAL_CONFIG_FILE: &str = "causerie.toml";

/// Top-level tables; env keys are split after the first of these.
const SECTIONS: &[&str] = &["agent", "gemini", "memory", "storage"];

pub fn load_config() -> Result<CauserieConfig, figment::Error> {
    build_figment().extract()
}

/// Defaults plus `toml_content`. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<CauserieConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

pub fn load_config_from_path(path: &Path) -> Result<CauserieConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_overrides())
        .extract()
}

/// The full hierarchy, unextracted.
pub fn build_figment() -> Figment {
    let mut figment = defaults().merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_overrides())
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("causerie").join(LOCAL_CONFIG_FILE))
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(CauserieConfig::default()))
}

/// `CAUSERIE_MEMORY_SHORT_WINDOW_SIZE` maps to `memory.short_window_size`.
/// Keys contain underscores, so only the section separator becomes a dot.
/// Figment hands the key over in its original case.
fn env_overrides() -> Env {
    Env::prefixed("CAUSERIE_").map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_toml_overrides_defaults() {
        let config = load_config_from_str("[memory]\nshort_window_size = 3\n").unwrap();
        assert_eq!(config.memory.short_window_size, 3);
        assert_eq!(
            config.memory.summarize_threshold,
            CauserieConfig::default().memory.summarize_threshold
        );
    }

    #[test]
    fn env_keys_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CAUSERIE_MEMORY_SHORT_WINDOW_SIZE", "4");
            jail.set_env("CAUSERIE_GEMINI_MODEL", "gemini-test");
            jail.set_env("CAUSERIE_MEMORY_AUTO_SUMMARIZE", "false");
            let config: CauserieConfig = defaults().merge(env_overrides()).extract()?;
            assert_eq!(config.memory.short_window_size, 4);
            assert_eq!(config.gemini.model, "gemini-test");
            assert!(!config.memory.auto_summarize);
            Ok(())
        });
    }
}
