//! API endpoint groups.

pub mod servers;

pub use servers::{ListServersParams, ListServersResponse, ServerRecord, ServersApi};
