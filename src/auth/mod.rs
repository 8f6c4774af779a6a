pub mod claims;
pub mod ownership;
pub mod password;
pub mod token;

pub use claims::{Claims, Principal};
pub use ownership::{authorize_mutation, check_ownership, Owned};
pub use token::{TokenError, TokenIssuer, TokenValidator, TOKEN_LIFETIME_HOURS};
