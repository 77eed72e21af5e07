pub use fermi_occupation::fermi_occupation;
pub use helpers::*;
pub use scc_routine::{RestrictedScc, SccError};

mod fermi_occupation;
pub mod gamma_approximation;
pub mod h0_and_s;
mod helpers;
pub mod logging;
pub(crate) mod mixer;
pub(crate) mod mulliken;
pub(crate) mod scc_routine;
