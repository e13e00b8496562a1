//! WindowHost: the boundary to the host window manager
//!
//! Everything the controller knows about real windows comes through the
//! `WindowHost` trait and the normalized `WindowEvent` feed. The simulated host
//! is an in-memory window manager used by the console driver.

mod simulated;
mod r#trait;

pub use self::r#trait::WindowHost;
pub use self::simulated::SimulatedHost;
