// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Causerie integration tests.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock text provider with scripted replies, failure
//!   injection, call counting and an optional gate
//! - [`fixtures`] - Conversation builders

pub mod fixtures;
pub mod mock_provider;

pub use mock_provider::{MockProvider, MockReply};
