pub mod bus;
pub mod config;
pub mod constants;
pub mod echo;
pub mod events;
pub mod export;
pub mod models;
pub mod runtime;
pub mod store;
pub mod tracing_setup;

pub use bus::{Signal, SignalBus};
pub use events::{CoreCommand, CoreEvent};
pub use runtime::{CoreHandle, CoreRuntime};
