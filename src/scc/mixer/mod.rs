pub mod anderson;

pub use anderson::*;
