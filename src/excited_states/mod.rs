pub use solvers::*;
pub use tda::*;
pub use transition_charges::*;
pub use utils::*;

mod solvers;
pub(crate) mod tda;
mod transition_charges;
mod utils;
