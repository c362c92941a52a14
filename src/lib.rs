//! Order queue and motion synchronization for top-down ship control.
//!
//! Ships accept a queue of spatial orders (move to a point, move and face a
//! direction, follow a moving target) and execute them one at a time, once
//! per simulation tick, until the queue is empty.

pub mod config;
pub mod ecs;
pub mod error;
pub mod logging;
pub mod movement;

pub use config::FleetConfig;
pub use ecs::Fleet;
pub use error::{FleetError, FleetResult};
pub use logging::init as init_logging;
