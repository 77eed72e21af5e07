pub use atom::Atom;
pub use geometry::*;
pub use helpers::*;
pub use system::*;

pub mod atom;
pub mod geometry;
mod helpers;
mod input_check;
pub mod parameter_handling;
pub mod parameters;
pub mod system;
