//! Token and cookie types for Jupiter authentication.
//!
//! Provides the access/refresh [`token::TokenCodec`], refresh-token cookie
//! builders, and the bearer-token middleware guarding protected routes.

pub mod bearer;
pub mod cookie;
pub mod token;
