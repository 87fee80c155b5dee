//! Containers module - the consumption and expiry state machine.

mod components;

pub use components::*;
