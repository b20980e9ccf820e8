use super::RecordStore;
use crate::error::{MedrepError, Result};
use crate::model::{Doctor, DoctorFields, DoctorId};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, Url};

const COLLECTION_PATH: &str = "api/doctors";

/// Record store backed by the doctors REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: Url,
}

impl HttpStore {
    /// Builds a store rooted at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| MedrepError::InvalidUrl(format!("{normalized}: {e}")))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> Result<Url> {
        self.base_url
            .join(COLLECTION_PATH)
            .map_err(|e| MedrepError::InvalidUrl(e.to_string()))
    }

    fn record_url(&self, id: &DoctorId) -> Result<Url> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|_| MedrepError::InvalidUrl(format!("{} cannot carry a path", self.base_url)))?
            .push(id.as_str());
        Ok(url)
    }
}

/// Turns non-2xx responses into `MedrepError::Status`, keeping the body text.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), %body, "doctors API rejected request");
    Err(MedrepError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Decodes a write response into a record, tolerating bodies that aren't one.
async fn record_from_body(response: Response) -> Result<Option<Doctor>> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(None);
    }
    match serde_json::from_slice::<Doctor>(&bytes) {
        Ok(doc) => Ok(Some(doc)),
        Err(e) => {
            tracing::debug!(error = %e, "write response is not a record");
            Ok(None)
        }
    }
}

impl RecordStore for HttpStore {
    async fn list(&self) -> Result<Vec<Doctor>> {
        let url = self.collection_url()?;
        tracing::debug!(%url, "GET");
        let response = check_status(self.client.get(url).send().await?).await?;
        let bytes = response.bytes().await?;
        let records: Option<Vec<Doctor>> = serde_json::from_slice(&bytes)?;
        Ok(records.unwrap_or_default())
    }

    async fn create(&self, draft: &DoctorFields) -> Result<Option<Doctor>> {
        let url = self.collection_url()?;
        tracing::debug!(%url, "POST");
        let response = check_status(self.client.post(url).json(draft).send().await?).await?;
        record_from_body(response).await
    }

    async fn update(&self, id: &DoctorId, draft: &DoctorFields) -> Result<Option<Doctor>> {
        let url = self.record_url(id)?;
        tracing::debug!(%url, "PUT");
        let response = check_status(self.client.put(url).json(draft).send().await?).await?;
        record_from_body(response).await
    }

    async fn delete(&self, id: &DoctorId) -> Result<()> {
        let url = self.record_url(id)?;
        tracing::debug!(%url, "DELETE");
        check_status(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}
