// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Causerie - hybrid conversation memory.
//!
//! Binary entry point: summarize a transcript, run an interactive shell, or
//! check the configuration.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod shell;
mod summarize;

use std::path::PathBuf;
use std::sync::Arc;

use causerie_config::model::CauserieConfig;
use causerie_core::{CauserieError, ChatMessage};
use causerie_gemini::{API_KEY_ENV, GeminiProvider};
use causerie_memory::{HybridMemory, HybridMemoryBuilder};
use clap::{Parser, Subcommand};
use tracing::warn;

/// Causerie - hybrid short-term/long-term conversation memory.
#[derive(Parser, Debug)]
#[command(name = "causerie", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a JSON transcript and print the resulting memory.
    Summarize {
        /// JSON array of messages.
        transcript: PathBuf,
        /// Re-summarize the whole conversation, ignoring the threshold.
        #[arg(long)]
        force: bool,
        /// Skip the remote model and use the local summarizer.
        #[arg(long)]
        offline: bool,
    },
    /// Launch an interactive REPL session.
    Shell {
        /// Conversation id; pinned facts are stored under it.
        #[arg(long)]
        conversation: Option<String>,
    },
    /// Validate configuration and print the effective memory settings.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => causerie_config::load_and_validate_path(path),
        None => causerie_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            causerie_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Summarize {
            transcript,
            force,
            offline,
        }) => summarize::run_summarize(&config, &transcript, force, offline).await,
        Some(Commands::Shell { conversation }) => shell::run_shell(config, conversation).await,
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("causerie: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Builder for a memory over `messages`, wired to Gemini when an API key is
/// available and to the local summarizer only otherwise.
pub(crate) fn memory_builder(
    config: &CauserieConfig,
    messages: Vec<ChatMessage>,
    offline: bool,
) -> HybridMemoryBuilder {
    let builder = HybridMemory::builder(&config.memory).messages(messages);
    if offline {
        return builder;
    }
    match GeminiProvider::new(config) {
        Ok(provider) => {
            let model = provider.default_model().to_string();
            builder.provider(Arc::new(provider), model)
        }
        Err(e) => {
            warn!(
                error = %e,
                "remote summarization unavailable (set gemini.api_key or {}), using the local summarizer",
                API_KEY_ENV
            );
            builder
        }
    }
}

fn print_config(config: &CauserieConfig) -> Result<(), CauserieError> {
    let memory = toml::to_string_pretty(&config.memory)
        .map_err(|e| CauserieError::Internal(format!("failed to render config: {e}")))?;
    let key_source = if config.gemini.api_key.is_some() {
        "config"
    } else if std::env::var(API_KEY_ENV).is_ok() {
        "environment"
    } else {
        "missing"
    };

    println!("causerie: config valid (agent.name={})", config.agent.name);
    println!("gemini.model = {:?}", config.gemini.model);
    println!("gemini.api_key = {key_source}");
    println!("storage.database_path = {:?}", config.storage.database_path);
    println!("\n[memory]\n{memory}");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("causerie={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_summarize_flags() {
        let cli = Cli::try_parse_from(["causerie", "summarize", "chat.json", "--force"]).unwrap();
        match cli.command {
            Some(Commands::Summarize {
                transcript,
                force,
                offline,
            }) => {
                assert_eq!(transcript, PathBuf::from("chat.json"));
                assert!(force);
                assert!(!offline);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn offline_builder_builds_without_api_key() {
        let config = CauserieConfig::default();
        let memory = memory_builder(&config, Vec::new(), true).build().unwrap();
        assert_eq!(memory.total_count(), 0);
    }

    #[test]
    fn default_config_renders() {
        assert!(print_config(&CauserieConfig::default()).is_ok());
    }
}
