//! Transport layer for the Pulse SDK.

pub mod http;

pub use http::HttpTransport;
