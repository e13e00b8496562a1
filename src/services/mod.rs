pub mod bounds_store;
pub mod controller;
pub mod focuser;
pub mod locator;
pub mod persister;
pub mod window_host;

#[cfg(test)]
pub mod test_support;

pub use bounds_store::create_bounds_store;
pub use controller::KeepWindowController;
pub use window_host::SimulatedHost;
