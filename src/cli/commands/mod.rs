//! CLI command implementations.

mod doctor;
mod serve;
mod setup;

pub use doctor::run_doctor;
pub use serve::run_serve;
pub use setup::run_setup;
