mod collision;
mod lander;
mod physics;
mod render;

pub use collision::*;
pub use lander::*;
pub use physics::*;
pub use render::*;
