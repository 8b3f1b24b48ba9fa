//! FloodSaver controller library.
//!
//! Decides, once per sensor poll, whether the supply valve should be open,
//! whether the alarm should sound and whether the water source has
//! faulted.  Exposes the pure-logic modules for integration testing and
//! for the board support layer that owns the actual pins.

#![deny(unused_must_use)]

pub mod accumulator;
pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod fsm;
pub mod sensors;

pub mod adapters;
pub mod drivers;

pub use config::FloodConfig;
pub use fsm::context::{Inputs, Outputs, Status};
pub use fsm::{StateId, ValveController};
