//! The application's stores: each owns one slice of state and reduces the
//! shared action vocabulary into it.

pub mod map_options;
pub mod query;
pub mod route;
pub mod settings;
