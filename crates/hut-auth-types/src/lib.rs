//! Admin-session boundary types shared by the auth service (issuer) and the
//! content/moderation services (validators).

pub mod cookie;
pub mod guard;
pub mod token;
