//! Readwise Reader (API v3) operations.

use crate::client::{join_url, ApiResponse, Client};
use crate::error::ApiError;
use crate::models::NewDocument;

/// A handle to the Readwise Reader API (v3).
///
/// Lightweight and cloneable; operations make HTTP requests on demand.
#[derive(Clone, Debug)]
pub struct Reader {
    client: Client,
    base: String,
}

impl Reader {
    pub(crate) fn new(client: Client) -> Self {
        let base = join_url(&client.base_url, "/api/v3");
        Self { client, base }
    }

    /// Root URL for v3 endpoints.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Issue a GET request against an arbitrary v3 endpoint. Status
    /// checking is left to the caller.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .get_raw(&join_url(&self.base, endpoint), params)
            .await
    }

    /// Issue a POST request with a JSON body against an arbitrary v3
    /// endpoint. Status checking is left to the caller.
    pub async fn post(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .post_raw(&join_url(&self.base, endpoint), body)
            .await
    }

    /// Save a document to Reader via `POST /save/`.
    ///
    /// The service answers 201 when the document was created and 200 when
    /// it already existed; both are success. The response body (document
    /// id and Reader URL) is returned for the caller to decode.
    pub async fn save(&self, document: &NewDocument) -> Result<ApiResponse, ApiError> {
        let body = serde_json::to_value(document)?;
        let response = self.post("/save/", &body).await?;
        response.error_for_status()
    }
}
