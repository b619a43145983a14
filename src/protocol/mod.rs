// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod engine;
pub mod messages;

pub use engine::{Engine, Link, ProtocolState, Rejected, Response, Transport};
pub use messages::{Command, StatusReport};
