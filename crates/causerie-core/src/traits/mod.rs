// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports the memory manager talks through. Implementations live in the
//! gemini and storage crates; test doubles in `causerie-test-utils`.

pub mod adapter;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use provider::ProviderAdapter;
pub use storage::KeyValueStore;
