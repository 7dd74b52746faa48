// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Wrangle registry tests.
//!
//! Provides mock plugins and instrumented factories for fast, deterministic
//! tests that do not depend on installed packages.
//!
//! # Components
//!
//! - [`MockPlugin`] - Configurable plugin implementing every capability trait
//! - [`CountingFactory`], [`FailingFactory`], [`PanickingFactory`] - Factories that count constructions
//! - [`GatedFactory`] - Factory that blocks until released, for concurrency tests

pub mod factory;
pub mod mock_plugin;

pub use factory::{CountingFactory, FailingFactory, GatedFactory, PanickingFactory};
pub use mock_plugin::MockPlugin;
