// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # MPG Pendant Interface Firmware
//!
//! Firmware for a small board that bridges a manual pulse generator pendant (quadrature
//! hand-wheel, axis and step selector switches, rapid button, e-stop) to a host over a serial
//! link. The host polls with single-byte commands and gets fixed-width ASCII frames back.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`quadrature`] | Hand-wheel decoding and the shared motion accumulator |
//! | [`switches`] | Selector switch sampling, mode state and MPG indicator flashing |
//! | [`protocol`] | Command/response state machine and wire format |
//! | [`hw`] | LED, input polarity and STM32F7 peripheral wrappers |
//! | [`config`] | Compile-time tuning |
//!
//! ## Getting Started
//!
//! Run the unit tests on the host:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod hw;
pub mod protocol;
pub mod quadrature;
pub mod switches;

pub use config::Config;
