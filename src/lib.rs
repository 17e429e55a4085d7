//! vebra-rs: async client for the CFP/Vebra property export API.
//!
//! The export service hands out data over a hierarchical resource tree
//! (branches → properties → property details, plus time-bucketed "updated
//! since" feeds) and authenticates either with HTTP Basic credentials or a
//! short-lived server-issued token. This crate negotiates that lifecycle
//! transparently: the first call goes out with Basic credentials, the token
//! returned by the server is cached for an hour, and a rejected token is
//! retried exactly once with the original credentials before the call fails.
//!
//! Responses are XML; every endpoint returns an [`XmlDocument`] the caller
//! can navigate without this crate imposing a schema.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use vebra_rs::VebraClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VebraClient::new("username", "password", "MyFeed")?;
//!
//!     let branches = client.branches().await?;
//!     for branch in branches.root().children("branch") {
//!         println!("{}", branch.child("name").map_or("", |n| n.text()));
//!     }
//!
//!     // Branch details establish the context the property calls build on.
//!     client.branch_details(42).await?;
//!     let list = client.property_list().await?;
//!     println!("{} properties", list.root().children("property").count());
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod feed;
pub mod xml;

pub use crate::core::client::{AuthHeader, VebraClient, VebraClientBuilder};
pub use crate::core::error::VebraError;
pub use crate::core::session::{CachedToken, InMemorySessionStore, SessionStore};
pub use crate::feed::FeedContext;
pub use crate::xml::{XmlDocument, XmlElement};

/// Re-export of the chrono types used across the public API.
pub use chrono::{DateTime, Utc};
