pub(crate) mod array_helper;
pub mod linalg;
#[cfg(test)]
pub(crate) mod tests;
mod zbrent;

use std::fmt;
use std::time::Instant;
pub use zbrent::zbrent;

/// A simple timer based on std::time::Instant, to implement the std::fmt::Display trait on
pub struct Timer {
    pub(crate) time: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Timer {
            time: Instant::now(),
        }
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:>68} {:>8.2} s",
            "elapsed time:",
            self.time.elapsed().as_secs_f32()
        )
    }
}
