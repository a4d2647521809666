// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # operators
//!
//! Operators own a configured kernel plus whatever it needs between runs,
//! and hand execution to a [`Scheduler`](scheduler::Scheduler).
//!
//! - [`CpuScale`]: resize with nearest, bilinear or area sampling. The
//!   lifecycle `Unconfigured → Configured → Prepared` is a type-state, so
//!   running before configuring does not compile.
//! - [`CpuActivation`]: element-wise activation.
//! - [`ScaleConfig`]: TOML configuration for the scale operator and its
//!   worker count.

mod activation;
mod config;
mod error;
mod scale;
mod tables;

pub use activation::CpuActivation;
pub use config::ScaleConfig;
pub use error::OperatorError;
pub use scale::{Configured, CpuScale, Prepared, ScaleState, Unconfigured};
pub use tables::SideTables;
