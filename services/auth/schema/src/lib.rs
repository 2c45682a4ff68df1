//! sea-orm entities for the auth service tables.

pub mod one_time_codes;
pub mod sessions;
pub mod users;
