//! Centralized constants for default endpoints, auth, and UA.

/// Host serving the export API. The base URL is derived as
/// `{host}/export/{datafeed}/v{version}`.
pub(crate) const DEFAULT_HOST: &str = "http://webservices.vebra.com";

/// Export API version used when the builder does not override it.
pub(crate) const DEFAULT_API_VERSION: u8 = 7;

/// Response header carrying a freshly issued session token.
pub(crate) const TOKEN_HEADER: &str = "Token";

/// Tokens are honoured by the server for one hour from issue.
pub(crate) const TOKEN_TTL_SECS: i64 = 3600;

/// Default UA identifying this crate.
pub(crate) const USER_AGENT: &str = concat!("vebra-rs/", env!("CARGO_PKG_VERSION"));
