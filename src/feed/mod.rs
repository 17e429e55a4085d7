//! The export resource tree: branches, properties, and the time-bucketed
//! "updated since" feeds.
//!
//! The service couples its calls temporally: the property list hangs off the
//! last branch-details URL, and property details hang off the last
//! property-list URL. That context is kept explicit here — [`FeedContext`]
//! is readable and settable by the caller, and every dependent call has an
//! `_at` form taking the URL outright.

use chrono::{DateTime, Utc};
use url::Url;

use crate::core::{VebraClient, VebraError};
use crate::xml::{self, XmlDocument};

/// The resolved-URL context dependent calls build on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedContext {
    /// URL of the last branch fetched via [`VebraClient::branch_details`].
    pub branch_url: Option<Url>,
    /// URL of the last property list fetched via
    /// [`VebraClient::property_list`] / [`VebraClient::property_list_at`].
    pub property_list_url: Option<Url>,
}

impl VebraClient {
    /// List the branches of the configured data feed.
    ///
    /// # Errors
    ///
    /// Fails with a [`VebraError`] when the request or the XML decode fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn branches(&self) -> Result<XmlDocument, VebraError> {
        let url = self.resource_url("branch")?;
        let body = self.call(url, None).await?;
        xml::decode(&body)
    }

    /// Fetch the details of one branch and remember its URL as the branch
    /// context for a subsequent [`property_list`](Self::property_list) call.
    ///
    /// # Errors
    ///
    /// Fails with a [`VebraError`] when the request or the XML decode fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn branch_details(&self, agent_id: u32) -> Result<XmlDocument, VebraError> {
        let url = self.resource_url(&format!("branch/{agent_id}"))?;
        self.context_lock().write().await.branch_url = Some(url.clone());
        let body = self.call(url, None).await?;
        xml::decode(&body)
    }

    /// List the properties of the branch in context.
    ///
    /// # Errors
    ///
    /// Fails with [`VebraError::Usage`] when no branch context has been
    /// established (call [`branch_details`](Self::branch_details) or
    /// [`set_branch_url`](Self::set_branch_url) first, or use
    /// [`property_list_at`](Self::property_list_at)).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn property_list(&self) -> Result<XmlDocument, VebraError> {
        let branch_url = self.context_lock().read().await.branch_url.clone();
        let branch_url = branch_url.ok_or_else(|| {
            VebraError::Usage("property_list requires branch context; fetch branch details first or use property_list_at".into())
        })?;
        self.property_list_at(branch_url).await
    }

    /// List the properties of an explicitly supplied branch URL, remembering
    /// the resolved list URL as the property-list context.
    ///
    /// # Errors
    ///
    /// Fails with a [`VebraError`] when the request or the XML decode fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn property_list_at(&self, branch_url: Url) -> Result<XmlDocument, VebraError> {
        let url = join_path(&branch_url, "property")?;
        self.context_lock().write().await.property_list_url = Some(url.clone());
        let body = self.call(url, None).await?;
        xml::decode(&body)
    }

    /// Fetch the details of one property from the list in context.
    ///
    /// With an `if_modified_since` watermark the server answers 304 when the
    /// property is unchanged, surfaced as [`VebraError::NotModified`].
    ///
    /// # Errors
    ///
    /// Fails with [`VebraError::Usage`] when no property-list context has
    /// been established.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn property_details(
        &self,
        property_id: u64,
        if_modified_since: Option<DateTime<Utc>>,
    ) -> Result<XmlDocument, VebraError> {
        let list_url = self.context_lock().read().await.property_list_url.clone();
        let list_url = list_url.ok_or_else(|| {
            VebraError::Usage("property_details requires property-list context; fetch the property list first or use property_details_at".into())
        })?;
        let url = join_path(&list_url, &property_id.to_string())?;
        let body = self.call(url, if_modified_since).await?;
        xml::decode(&body)
    }

    /// Fetch property details from an explicit URL, bypassing the context.
    ///
    /// # Errors
    ///
    /// Fails with a [`VebraError`] when the request or the XML decode fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn property_details_at(
        &self,
        url: Url,
        if_modified_since: Option<DateTime<Utc>>,
    ) -> Result<XmlDocument, VebraError> {
        let body = self.call(url, if_modified_since).await?;
        xml::decode(&body)
    }

    /// Feed of properties updated since `since` (UTC calendar bucket).
    ///
    /// # Errors
    ///
    /// Fails with a [`VebraError`] when the request or the XML decode fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn updated_properties(
        &self,
        since: DateTime<Utc>,
        if_modified_since: Option<DateTime<Utc>>,
    ) -> Result<XmlDocument, VebraError> {
        let url = self.resource_url(&window_path("property", since))?;
        let body = self.call(url, if_modified_since).await?;
        xml::decode(&body)
    }

    /// Feed of media files updated since `since` (UTC calendar bucket).
    ///
    /// # Errors
    ///
    /// Fails with a [`VebraError`] when the request or the XML decode fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn updated_files(
        &self,
        since: DateTime<Utc>,
        if_modified_since: Option<DateTime<Utc>>,
    ) -> Result<XmlDocument, VebraError> {
        let url = self.resource_url(&window_path("files", since))?;
        let body = self.call(url, if_modified_since).await?;
        xml::decode(&body)
    }

    /* ---------------- Context access ---------------- */

    /// Snapshot of the current feed context.
    pub async fn context(&self) -> FeedContext {
        self.context_lock().read().await.clone()
    }

    /// Set the branch context directly, as if
    /// [`branch_details`](Self::branch_details) had resolved `url`.
    pub async fn set_branch_url(&self, url: Url) {
        self.context_lock().write().await.branch_url = Some(url);
    }

    /// Set the property-list context directly.
    pub async fn set_property_list_url(&self, url: Url) {
        self.context_lock().write().await.property_list_url = Some(url);
    }

    fn resource_url(&self, path: &str) -> Result<Url, VebraError> {
        join_path(self.base(), path)
    }
}

/// Append a path segment string to a URL, tolerating trailing slashes.
fn join_path(base: &Url, path: &str) -> Result<Url, VebraError> {
    let base = base.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/{path}"))?)
}

/// `{prefix}/{Y}/{m}/{d}/{H}/{M}/{S}` — the server buckets "updated since"
/// feeds by UTC calendar fields. `%S` is second-of-minute (00-59).
fn window_path(prefix: &str, since: DateTime<Utc>) -> String {
    format!("{prefix}/{}", since.format("%Y/%m/%d/%H/%M/%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_path_breaks_out_utc_calendar_fields() {
        let t = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(window_path("property", t), "property/2024/03/05/07/08/09");
        assert_eq!(window_path("files", t), "files/2024/03/05/07/08/09");
    }

    #[test]
    fn window_path_seconds_are_second_of_minute() {
        // 1st, 2nd, 3rd of a month: an ordinal-suffix rendering of the
        // seconds field would produce "st"/"nd"/"rd" instead of digits.
        for (sec, want) in [(0, "00"), (1, "01"), (22, "22"), (59, "59")] {
            let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, sec).unwrap();
            let path = window_path("property", t);
            assert!(path.ends_with(&format!("/{want}")), "got {path}");
        }
    }

    #[test]
    fn window_path_zero_pads_every_field() {
        let t = Utc.with_ymd_and_hms(2001, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(window_path("files", t), "files/2001/01/02/03/04/05");
    }

    #[test]
    fn join_path_tolerates_trailing_slash() {
        let base = Url::parse("http://h/export/F/v7/").unwrap();
        assert_eq!(
            join_path(&base, "branch").unwrap().as_str(),
            "http://h/export/F/v7/branch"
        );
    }
}
