// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! External service adapters.

pub mod gemini;

pub use gemini::{EnhancementKind, GeminiClient, DEFAULT_GEMINI_MODEL};
