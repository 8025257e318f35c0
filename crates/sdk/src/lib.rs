//! # Pulse SDK
//!
//! Rust client for the [PulseMCP](https://www.pulsemcp.com) server directory API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pulse_sdk::{ListServersParams, PulseClient, PulseResult};
//!
//! #[tokio::main]
//! async fn main() -> PulseResult<()> {
//!     let client = PulseClient::builder().build()?;
//!
//!     let page = client
//!         .servers()
//!         .list(&ListServersParams::new().query("github").count_per_page(10))
//!         .await?;
//!     println!("{} of {} servers", page.servers.len(), page.total_count);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use api::{ListServersParams, ListServersResponse, ServerRecord};
pub use client::{PulseClient, PulseClientBuilder};
pub use config::{ClientConfig, RetryConfig, DEFAULT_BASE_URL};
pub use error::{PulseError, PulseResult};
