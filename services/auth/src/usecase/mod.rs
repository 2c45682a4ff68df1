pub mod login;
pub mod one_time_code;
pub mod session;
