pub mod auth;
pub mod docs;
pub mod error;
pub mod sheets;

pub use auth::*;
pub use docs::*;
pub use error::*;
pub use sheets::*;
