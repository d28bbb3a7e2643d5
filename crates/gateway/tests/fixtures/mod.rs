// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Test fixtures for endpoint testing
//!
//! This module provides a stub contract gateway that counts every trait call,
//! plus helpers for spawning the server against it over a real socket.

pub mod stub;

pub use stub::*;
