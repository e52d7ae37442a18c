pub mod memory;
pub mod output;

pub use memory::*;
pub use output::*;
