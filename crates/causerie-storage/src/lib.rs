// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value persistence backends for Causerie.
//!
//! Both backends implement [`causerie_core::KeyValueStore`]:
//! - [`MemoryKvStore`]: process-local map
//! - [`SqliteKvStore`]: SQLite file through tokio-rusqlite

pub mod memory;
pub mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;
