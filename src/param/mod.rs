pub mod elements;
pub mod slako_transformations;

pub use elements::Element;
