pub mod opinion;
pub mod sheet;
pub mod theme;

pub use opinion::*;
pub use sheet::*;
pub use theme::*;
