//! DOM-free stores, ports and routines.

pub mod auth;
pub mod context;
pub mod cookie;
pub mod fetch;
pub mod host;
pub mod language;
pub mod notify;
pub mod persistence;
pub mod preference;
pub mod session;
pub mod store;
pub mod theme;
