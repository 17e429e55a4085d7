//! The call executor: one GET per logical call, with the bounded
//! re-authentication protocol.
//!
//! A 401 on the first attempt flips `force_basic` and re-issues the call
//! once with the account credentials; a 401 on that retry is terminal. The
//! loop can run at most twice because the flip happens exactly once — the
//! termination guarantee is structural, not counted.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::IF_MODIFIED_SINCE;
use url::Url;

use crate::core::VebraClient;
use crate::core::error::VebraError;

impl VebraClient {
    /// Perform one logical export call and return the raw body.
    pub(crate) async fn call(
        &self,
        url: Url,
        if_modified_since: Option<DateTime<Utc>>,
    ) -> Result<String, VebraError> {
        let mut force_basic = false;
        loop {
            let header = self.auth_header(force_basic);
            let mut req = header.apply(self.http().get(url.clone()));
            if let Some(since) = if_modified_since {
                req = req.header(IF_MODIFIED_SINCE, http_date(since));
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(url = %url, forced = force_basic, "dispatching export call");

            let resp = req.send().await?;
            let status = resp.status();

            if status == StatusCode::UNAUTHORIZED {
                if force_basic {
                    return Err(VebraError::AuthenticationFailed {
                        url: url.to_string(),
                    });
                }
                // The server no longer honours whatever we sent; any cached
                // token is dead weight from here on.
                self.invalidate_token();
                force_basic = true;
                continue;
            }
            if status == StatusCode::NOT_MODIFIED {
                return Err(VebraError::NotModified {
                    url: url.to_string(),
                });
            }
            if !status.is_success() {
                return Err(VebraError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            // The forced retry carried raw credentials, not a token; its
            // headers are not a token grant.
            if !force_basic {
                self.capture_token(resp.headers());
            }
            return Ok(resp.text().await?);
        }
    }
}

/// RFC-1123 date for conditional requests, always in GMT.
pub(crate) fn http_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
