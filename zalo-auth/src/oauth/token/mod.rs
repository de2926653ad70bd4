//! Authorization code exchange.

mod exchange;
mod tokens;

pub use exchange::{TokenExchanger, SECRET_KEY_HEADER};
pub use tokens::{TokenGrant, TokenResult};
