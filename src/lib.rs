//! Lander descent over a fixed ground profile: polygon containment as the
//! collision oracle, a fuel-limited thruster economy, and a render loop
//! running next to the command source.

mod driver;
mod error;
pub mod init;
mod simulation;

pub use driver::*;
pub use error::Error;
pub use simulation::*;
