// Two security tiers:
// public (no token) and protected (valid bearer token required).

pub mod extract;
pub mod protected;
pub mod public;
