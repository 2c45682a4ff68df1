//! Service plumbing shared by Jupiter binaries: error envelope, request ids,
//! tracing setup and environment helpers.

pub mod config;
pub mod error;
pub mod middleware;
pub mod tracing;
