pub mod password;
pub mod token;

pub use token::{Token, SCOPE_AUTHENTICATION};
