pub mod error;
pub mod paragraph;

pub use error::*;
pub use paragraph::*;
