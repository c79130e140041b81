// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid conversation memory for Causerie.
//!
//! Recent turns stay verbatim in a short-term window; older turns are folded
//! into a summary plus a list of durable facts by a remote model, with a
//! deterministic local summarizer as fallback. The rendered long-term block
//! is meant to be prepended to downstream prompts.

pub mod classifier;
pub mod driver;
pub mod factbook;
pub mod fallback;
pub mod manager;
pub mod policy;
pub mod render;
pub mod state;
pub mod summarizer;
pub mod text;
pub mod window;

pub use classifier::{Classifier, FactKind, FactPatterns};
pub use driver::MemoryDriver;
pub use factbook::FactBook;
pub use fallback::FallbackSummarizer;
pub use manager::{HybridMemory, HybridMemoryBuilder, SummarizeOutcome, SummarySource};
pub use policy::{Mode, Plan, SkipReason};
pub use render::render_long_term_context;
pub use state::{MemoryState, MemoryView, SummarizeResult};
pub use summarizer::{Summarizer, parse_summary_response};
