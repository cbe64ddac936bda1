//! Headshot styles, uploads and listing.

use std::time::Duration;

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::models::{
    Headshot, HeadshotList, HeadshotPayload, HeadshotQuery, PhotoUpload, StyleInfo, UploadResult,
};
use crate::request::{FormPart, RequestBody, RequestOptions};

/// How often [`HeadshotService::watch`] re-lists while generation runs.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(5);

/// Headshot routes under `/headshots`.
#[derive(Debug, Clone, Copy)]
pub struct HeadshotService<'a> {
    client: &'a ApiClient,
}

impl<'a> HeadshotService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Styles the backend can generate.
    pub async fn styles(&self) -> Result<Vec<StyleInfo>> {
        self.client.get("/headshots/styles", None).await
    }

    /// Upload a photo and start generation in the requested styles.
    ///
    /// The form carries `photo`, `styles` (a JSON array) and an optional
    /// `prompt`.
    pub async fn upload(&self, upload: &PhotoUpload) -> Result<UploadResult> {
        if upload.styles.is_empty() {
            return Err(ApiError::InvalidRequest {
                reason: "at least one style is required".to_string(),
            });
        }

        let styles = serde_json::to_string(&upload.styles).map_err(|e| {
            ApiError::InvalidRequest {
                reason: format!("cannot encode styles: {e}"),
            }
        })?;

        let mut parts = vec![
            FormPart::file(
                "photo",
                upload.file_name.clone(),
                upload.mime.clone(),
                upload.bytes.clone(),
            ),
            FormPart::text("styles", styles),
        ];
        if let Some(prompt) = upload.prompt.as_deref().filter(|p| !p.is_empty()) {
            parts.push(FormPart::text("prompt", prompt));
        }

        self.client
            .post("/headshots/generate", Some(RequestBody::Multipart(parts)), None)
            .await
    }

    /// Headshots of the current user.
    pub async fn list(&self, query: &HeadshotQuery) -> Result<HeadshotList> {
        let options = RequestOptions::new()
            .query_opt("page", query.page)
            .query_opt("limit", query.limit)
            .query_opt("status", query.status.map(|s| s.as_str()));
        self.client.get("/headshots", Some(options)).await
    }

    /// A single headshot.
    pub async fn get(&self, id: &str) -> Result<Headshot> {
        let payload: HeadshotPayload = self.client.get(&format!("/headshots/{id}"), None).await?;
        Ok(payload.headshot)
    }

    /// Delete a headshot.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete::<serde_json::Value>(&format!("/headshots/{id}"), None)
            .await?;
        Ok(())
    }

    /// Re-list every `interval` until no headshot is `processing`.
    ///
    /// `on_update` sees every page fetched, including the final one, which
    /// is also returned.
    pub async fn watch<F>(
        &self,
        query: &HeadshotQuery,
        interval: Duration,
        mut on_update: F,
    ) -> Result<HeadshotList>
    where
        F: FnMut(&HeadshotList),
    {
        loop {
            let page = self.list(query).await?;
            on_update(&page);
            if !page.has_processing() {
                return Ok(page);
            }
            tracing::debug!(?interval, "headshots still processing, polling again");
            tokio::time::sleep(interval).await;
        }
    }
}
