//! Platform abstraction layer
//!
//! The simulation is platform-free. Browser hosts drive it through the
//! bindings in `web`; native hosts use `sim::Game` directly.

#[cfg(target_arch = "wasm32")]
pub mod web;
