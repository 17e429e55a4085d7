//! Core components of the `vebra-rs` client.
//!
//! This module holds the foundational building blocks of the library:
//! - The main [`VebraClient`] and its builder.
//! - The primary [`VebraError`] type.
//! - The session/token store seam and the call executor.

/// The main client (`VebraClient`), builder, and auth header selection.
pub mod client;
/// The primary error type (`VebraError`) for the crate.
pub mod error;
pub(crate) mod net;
/// The token store seam (`SessionStore`) and its in-memory default.
pub mod session;

// convenient re-exports so most code can just `use crate::core::VebraClient`
pub use client::{VebraClient, VebraClientBuilder};
pub use error::VebraError;
pub use session::{CachedToken, InMemorySessionStore, SessionStore};
