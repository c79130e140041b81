// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `causerie shell` command implementation.
//!
//! Interactive REPL over one conversation. Input lines are published on the
//! event bus and a [`MemoryDriver`] applies them, so summarization runs in
//! the background exactly as it would behind a chat view. Pinned facts are
//! kept in the SQLite key-value store.

use std::sync::Arc;

use causerie_bus::{BusEvent, EventBus};
use causerie_config::model::CauserieConfig;
use causerie_core::{CauserieError, ChatMessage, ConversationId, MemoryStatus};
use causerie_memory::{FactBook, HybridMemory, MemoryDriver};
use causerie_storage::SqliteKvStore;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::warn;

/// One parsed shell input line.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    User(&'a str),
    Assistant(&'a str),
    Force,
    Status,
    Context,
    Pin(&'a str),
    Unpin(&'a str),
    Facts,
    Conversations,
    Offline,
    Online,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    if !line.starts_with('/') {
        return Command::User(line);
    }
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };
    match (name, arg.is_empty()) {
        ("/assistant", false) => Command::Assistant(arg),
        ("/force", _) => Command::Force,
        ("/status", _) => Command::Status,
        ("/context", _) => Command::Context,
        ("/pin", false) => Command::Pin(arg),
        ("/unpin", false) => Command::Unpin(arg),
        ("/facts", _) => Command::Facts,
        ("/conversations", _) => Command::Conversations,
        ("/offline", _) => Command::Offline,
        ("/online", _) => Command::Online,
        ("/help", _) => Command::Help,
        ("/quit" | "/exit", _) => Command::Quit,
        _ => Command::Unknown(name),
    }
}

struct Session {
    memory: HybridMemory,
    bus: Arc<EventBus>,
    store: Arc<SqliteKvStore>,
    facts: FactBook,
}

/// Runs the `causerie shell` interactive REPL.
pub async fn run_shell(
    config: CauserieConfig,
    conversation: Option<String>,
) -> Result<(), CauserieError> {
    let conversation_id = conversation
        .map(ConversationId)
        .unwrap_or_else(ConversationId::generate);

    let store = Arc::new(SqliteKvStore::from_config(&config.storage).await?);
    let facts = FactBook::new(store.clone(), conversation_id.as_str());

    let bus = Arc::new(EventBus::default());
    let memory = crate::memory_builder(&config, Vec::new(), false)
        .conversation_id(conversation_id.clone())
        .bus(bus.clone())
        .build()?;
    let driver = MemoryDriver::new(memory.clone(), &bus).spawn();

    let session = Session {
        memory,
        bus,
        store,
        facts,
    };

    let mut rl = DefaultEditor::new()
        .map_err(|e| CauserieError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "causerie shell".bold().green());
    println!(
        "conversation {}. Type {} for commands, {} to exit.\n",
        conversation_id.as_str().cyan(),
        "/help".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", config.agent.name.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let command = parse_command(&line);
                if command == Command::Quit {
                    break;
                }
                if let Err(e) = session.handle(command).await {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    session.bus.publish(BusEvent::Shutdown);
    if let Err(e) = driver.await {
        warn!(error = %e, "memory driver task failed");
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

impl Session {
    async fn handle(&self, command: Command<'_>) -> Result<(), CauserieError> {
        let conversation_id = self.memory.conversation_id().clone();
        match command {
            Command::User(text) => {
                self.bus.publish(BusEvent::MessageAppended {
                    conversation_id,
                    message: ChatMessage::user(text),
                });
            }
            Command::Assistant(text) => {
                self.bus.publish(BusEvent::MessageAppended {
                    conversation_id,
                    message: ChatMessage::assistant(text),
                });
            }
            Command::Force => {
                self.bus
                    .publish(BusEvent::ForceSummarize { conversation_id });
                println!("{}", "full summarization requested".dimmed());
            }
            Command::Offline => {
                self.bus
                    .publish(BusEvent::ConnectivityChanged { online: false });
                println!("{}", "offline: local summarizer only".dimmed());
            }
            Command::Online => {
                self.bus
                    .publish(BusEvent::ConnectivityChanged { online: true });
                println!("{}", "online".dimmed());
            }
            Command::Status => self.print_status(),
            Command::Context => self.print_context().await?,
            Command::Pin(fact) => {
                if self.facts.pin(fact).await? {
                    println!("{} {fact}", "pinned".green());
                } else {
                    println!("{}", "already pinned".yellow());
                }
            }
            Command::Unpin(fact) => {
                if self.facts.unpin(fact).await? {
                    println!("{} {fact}", "unpinned".green());
                } else {
                    println!("{}", "not pinned".yellow());
                }
            }
            Command::Facts => {
                let pinned = self.facts.load().await?;
                if pinned.is_empty() {
                    println!("{}", "no pinned facts".dimmed());
                }
                for fact in pinned {
                    println!("- {fact}");
                }
            }
            Command::Conversations => {
                let namespaces = self.pinned_conversations().await?;
                if namespaces.is_empty() {
                    println!("{}", "no conversation has pinned facts".dimmed());
                }
                for namespace in namespaces {
                    if namespace == conversation_id.as_str() {
                        println!("- {} {}", namespace.cyan(), "(current)".dimmed());
                    } else {
                        println!("- {namespace}");
                    }
                }
            }
            Command::Help => print_help(),
            Command::Unknown(name) => {
                println!("{} {name}; try {}", "unknown command".yellow(), "/help".yellow());
            }
            Command::Quit => {}
        }
        Ok(())
    }

    /// Conversations with at least one pinned fact, sorted.
    async fn pinned_conversations(&self) -> Result<Vec<String>, CauserieError> {
        let keys = self.store.keys_with_prefix(FactBook::KEY_PREFIX).await?;
        Ok(keys
            .iter()
            .filter_map(|key| FactBook::namespace_of(key))
            .map(str::to_string)
            .collect())
    }

    fn print_status(&self) {
        let state = self.memory.state();
        let status = match state.status {
            MemoryStatus::Idle => "idle".normal(),
            MemoryStatus::Running => "running".cyan(),
            MemoryStatus::Ready => "ready".green(),
            MemoryStatus::Error => "error".red(),
        };
        let view = self.memory.view();
        println!("status: {status}");
        println!(
            "turns: {} (short-term {}, optimized: {})",
            view.total_count, view.short_count, view.optimized
        );
        match state.summarized_until {
            Some(until) => println!("summarized through turn {until}"),
            None => println!("nothing summarized yet"),
        }
        println!("facts: {}", state.facts.len());
        if self.memory.is_offline() {
            println!("{}", "offline".yellow());
        }
        if let Some(error) = state.error {
            println!("{}: {error}", "last error".red());
        }
    }

    async fn print_context(&self) -> Result<(), CauserieError> {
        let context = self.memory.long_term_context();
        if context.is_empty() {
            println!("{}", "(no long-term memory yet)".dimmed());
        } else {
            println!("{context}");
        }
        let pinned = self.facts.load().await?;
        if !pinned.is_empty() {
            println!("{}", "Faits épinglés:".bold());
            for fact in pinned {
                println!("- {fact}");
            }
        }
        Ok(())
    }
}

fn print_help() {
    let rows = [
        ("<text>", "append a user message"),
        ("/assistant <text>", "append an assistant message"),
        ("/force", "re-summarize the whole conversation"),
        ("/status", "show memory status"),
        ("/context", "show the long-term context and pinned facts"),
        ("/pin <fact>", "pin a durable fact"),
        ("/unpin <fact>", "remove a pinned fact"),
        ("/facts", "list pinned facts"),
        ("/conversations", "list conversations with pinned facts"),
        ("/offline, /online", "toggle the remote summarizer"),
        ("/quit", "exit"),
    ];
    for (command, description) in rows {
        println!("  {:<20} {description}", command.yellow());
    }
}
