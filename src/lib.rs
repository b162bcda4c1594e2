//! Readwise Rust Client
//!
//! A Rust client library for the Readwise and Readwise Reader HTTP APIs:
//! books, highlights and tags from the [Readwise API](https://readwise.io/api_deets),
//! and document saving from the [Reader API](https://readwise.io/reader_api).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use readwise::{Category, Client, NewDocument};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("your-access-token");
//!     let library = client.library();
//!
//!     // Iterate all article sources; pages are fetched on demand
//!     let mut books = library.books(Category::Articles);
//!     while let Some(book) = books.next_item().await? {
//!         println!("{} ({} highlights)", book.title, book.num_highlights);
//!     }
//!
//!     // Raw pagination over any list endpoint
//!     let mut pages = library.paginate("/highlights/", Vec::new());
//!     while let Some(page) = pages.next_page().await? {
//!         let body: serde_json::Value = page.json()?;
//!         println!("{:?}", body["results"]);
//!     }
//!
//!     // Save a document to Reader
//!     client
//!         .reader()
//!         .save(&NewDocument::new("https://example.com/post"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod library;
mod models;
mod pagination;
mod reader;

pub use client::{ApiResponse, Client, ClientBuilder};
pub use error::{ApiError, BuildError};
pub use library::Library;
pub use models::{Book, Category, Highlight, Location, NewDocument, NewHighlight, Tag};
pub use pagination::{PageIterator, Results};
pub use reader::Reader;
