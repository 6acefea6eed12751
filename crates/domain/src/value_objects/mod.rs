//! Value objects - Immutable objects defined by their attributes

mod names;
mod token;

pub use names::{DisplayName, Username};
pub use token::LoginToken;
