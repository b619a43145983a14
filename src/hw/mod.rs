// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod heartbeat;
pub mod inputs;
pub mod led;

#[cfg(target_os = "none")]
pub mod pins;
#[cfg(target_os = "none")]
pub mod timer;
#[cfg(target_os = "none")]
pub mod usart;
#[cfg(target_os = "none")]
pub mod watchdog;

pub use heartbeat::Heartbeat;
pub use led::Led;

#[cfg(target_os = "none")]
pub use pins::{BoardPins, OutPin, PortSnapshot};
#[cfg(target_os = "none")]
pub use timer::SampleTimer;
#[cfg(target_os = "none")]
pub use usart::Usart;
#[cfg(target_os = "none")]
pub use watchdog::Watchdog;
