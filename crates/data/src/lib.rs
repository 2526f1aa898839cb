//! Loading of the card catalogue and round settings.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
