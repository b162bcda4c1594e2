//! Readwise library (API v2) operations: books, highlights, tags.

use crate::client::{join_url, ApiResponse, Client};
use crate::error::ApiError;
use crate::models::{Book, Category, Highlight, NewHighlight, Tag};
use crate::pagination::{PageIterator, Results};

/// Page size requested by listing operations. The books and highlights
/// endpoints return a lot of data, so large pages keep the request count
/// down.
const LIST_PAGE_SIZE: &str = "1000";

/// A handle to the Readwise API (v2).
///
/// This is a lightweight, cloneable object - not a persistent connection.
/// Operations make HTTP requests on demand.
#[derive(Clone, Debug)]
pub struct Library {
    client: Client,
    base: String,
}

impl Library {
    pub(crate) fn new(client: Client) -> Self {
        let base = join_url(&client.base_url, "/api/v2");
        Self { client, base }
    }

    /// Root URL for v2 endpoints.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Issue a GET request against an arbitrary v2 endpoint.
    ///
    /// The response is returned whatever its status; checking it is up to
    /// the caller.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .get_raw(&join_url(&self.base, endpoint), params)
            .await
    }

    /// Issue a POST request with a JSON body against an arbitrary v2
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

    /// Issue a DELETE request against an arbitrary v2 endpoint. Status
    /// checking is left to the caller.
    pub async fn delete(&self, endpoint: &str) -> Result<ApiResponse, ApiError> {
        self.client.delete_raw(&join_url(&self.base, endpoint)).await
    }

    /// Lazily traverse all pages of a list endpoint.
    ///
    /// The first request is a GET for `path` with `params`; afterwards the
    /// iterator follows each page's `next` locator until a page carries
    /// none. See [`PageIterator`] for the full contract.
    pub fn paginate(&self, path: impl Into<String>, params: Vec<(String, String)>) -> PageIterator {
        PageIterator::new(self.client.clone(), self.base.clone(), path.into(), params)
    }

    /// All books in the given category, across all pages.
    pub fn books(&self, category: Category) -> Results<Book> {
        let params = vec![
            ("category".to_string(), category.as_str().to_string()),
            ("page_size".to_string(), LIST_PAGE_SIZE.to_string()),
        ];
        Results::new(self.paginate("/books/", params))
    }

    /// All highlights belonging to a book, across all pages.
    pub fn book_highlights(&self, book_id: i64) -> Results<Highlight> {
        let params = vec![
            ("book_id".to_string(), book_id.to_string()),
            ("page_size".to_string(), LIST_PAGE_SIZE.to_string()),
        ];
        Results::new(self.paginate("/highlights/", params))
    }

    /// All tags on a book.
    pub fn book_tags(&self, book_id: i64) -> Results<Tag> {
        let params = vec![("page_size".to_string(), LIST_PAGE_SIZE.to_string())];
        Results::new(self.paginate(format!("/books/{}/tags", book_id), params))
    }

    /// Create highlights in bulk via `POST /highlights/`.
    ///
    /// Returns the raw response on success so callers can decode the
    /// created records if they need them.
    pub async fn create_highlights(
        &self,
        highlights: &[NewHighlight],
    ) -> Result<ApiResponse, ApiError> {
        let body = serde_json::json!({ "highlights": highlights });
        let response = self.post("/highlights/", &body).await?;
        response.error_for_status()
    }

    /// Create a single highlight.
    pub async fn create_highlight(&self, highlight: NewHighlight) -> Result<ApiResponse, ApiError> {
        self.create_highlights(std::slice::from_ref(&highlight)).await
    }

    /// Add a tag to a book.
    pub async fn add_tag(&self, book_id: i64, name: &str) -> Result<ApiResponse, ApiError> {
        let body = serde_json::json!({ "name": name });
        let response = self
            .post(&format!("/books/{}/tags/", book_id), &body)
            .await?;
        response.error_for_status()
    }

    /// Remove a tag from a book.
    pub async fn remove_tag(&self, book_id: i64, tag_id: i64) -> Result<(), ApiError> {
        let response = self
            .delete(&format!("/books/{}/tags/{}", book_id, tag_id))
            .await?;
        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Client {
        Client::builder("test_token")
            .base_url(server.uri())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_books_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/books/"))
            .and(query_param("category", "articles"))
            .and(query_param("page_size", "1000"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"results": [], "next": null})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let books = client
            .library()
            .books(Category::Articles)
            .collect()
            .await
            .unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_book_highlights() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/highlights/"))
            .and(query_param("book_id", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next": null,
                "results": [{
                    "id": 1,
                    "text": "Test Highlight",
                    "note": "Test Note",
                    "location": 1,
                    "location_type": "page",
                    "url": "https://example.com/highlight",
                    "color": "yellow",
                    "updated": "2020-01-01T00:00:00Z",
                    "book_id": 1,
                    "tags": [
                        {"id": 1, "name": "test_tag"},
                        {"id": 2, "name": "test_tag_2"}
                    ]
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let highlights = client
            .library()
            .book_highlights(1)
            .collect()
            .await
            .unwrap();

        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].text, "Test Highlight");
        assert_eq!(highlights[0].note.as_deref(), Some("Test Note"));
        assert_eq!(highlights[0].book_id, 1);
        assert_eq!(highlights[0].tags.len(), 2);
    }

    #[tokio::test]
    async fn test_book_tags() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/books/7/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next": null,
                "results": [{"id": 3, "name": "rust"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let tags = client.library().book_tags(7).collect().await.unwrap();
        assert_eq!(tags, vec![Tag { id: 3, name: "rust".into() }]);
    }

    #[tokio::test]
    async fn test_create_highlight_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/highlights/"))
            .and(body_json(json!({
                "highlights": [{
                    "text": "some text",
                    "title": "A Title",
                    "category": "articles",
                    "note": "a note"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .library()
            .create_highlight(NewHighlight::new("some text", "A Title").note("a note"))
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_add_and_remove_tag() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/books/1/tags/"))
            .and(body_json(json!({"name": "rust"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": 5, "name": "rust"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/v2/books/1/tags/5"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let library = client.library();

        let created = library.add_tag(1, "rust").await.unwrap();
        let tag: Tag = created.json().unwrap();
        assert_eq!(tag.id, 5);

        library.remove_tag(1, 5).await.unwrap();
    }

    #[tokio::test]
    async fn test_typed_write_maps_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/highlights/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "nope"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client
            .library()
            .create_highlight(NewHighlight::new("text", "Title"))
            .await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_custom_get_leaves_status_to_caller() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/export/"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "missing"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.library().get("/export/", &[]).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
    }
}
