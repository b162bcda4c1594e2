//! Typed representations of Readwise API objects and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tag attached to a book or a highlight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Source category of a book in the Readwise library.
///
/// The API uses the plural form as a query value (`?category=articles`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Articles,
    Books,
    Tweets,
    Podcasts,
}

impl Category {
    /// Convert to query parameter value
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Articles => "articles",
            Category::Books => "books",
            Category::Tweets => "tweets",
            Category::Podcasts => "podcasts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A book in the Readwise library.
///
/// "Book" is the API's umbrella term for any highlight source: books,
/// articles, tweet threads, and podcast episodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub category: String,
    pub source: Option<String>,
    pub num_highlights: i64,
    pub last_highlight_at: Option<DateTime<Utc>>,
    pub updated: DateTime<Utc>,
    pub cover_image_url: Option<String>,
    pub highlights_url: Option<String>,
    pub source_url: Option<String>,
    pub asin: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub document_note: Option<String>,
}

/// A highlight in the Readwise library.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Highlight {
    pub id: i64,
    pub text: String,
    pub note: Option<String>,
    pub location: Option<i64>,
    pub location_type: Option<String>,
    pub url: Option<String>,
    pub color: Option<String>,
    pub updated: DateTime<Utc>,
    pub book_id: i64,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Payload for creating a highlight via `POST /highlights/`.
#[derive(Clone, Debug, Serialize)]
#[non_exhaustive]
pub struct NewHighlight {
    pub text: String,
    pub title: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewHighlight {
    /// Create a highlight payload with the required fields.
    ///
    /// The title names the source the highlight belongs to; the category
    /// defaults to [`Category::Articles`].
    pub fn new(text: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: title.into(),
            category: Category::Articles,
            author: None,
            highlighted_at: None,
            source_url: None,
            note: None,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn highlighted_at(mut self, at: DateTime<Utc>) -> Self {
        self.highlighted_at = Some(at);
        self
    }

    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Where a saved document lands in Readwise Reader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    #[default]
    New,
    Later,
    Archive,
    Feed,
}

impl Location {
    /// Convert to wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::New => "new",
            Location::Later => "later",
            Location::Archive => "archive",
            Location::Feed => "feed",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload for saving a document via the Reader API's `POST /save/`.
#[derive(Clone, Debug, Serialize)]
#[non_exhaustive]
pub struct NewDocument {
    pub url: String,
    pub location: Location,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_clean_html: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_using: Option<String>,
}

impl NewDocument {
    /// Create a document payload for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            location: Location::default(),
            tags: Vec::new(),
            html: None,
            should_clean_html: None,
            title: None,
            author: None,
            summary: None,
            published_at: None,
            image_url: None,
            saved_using: None,
        }
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Provide the document body instead of letting Reader fetch the URL.
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn should_clean_html(mut self, clean: bool) -> Self {
        self.should_clean_html = Some(clean);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn saved_using(mut self, client_name: impl Into<String>) -> Self {
        self.saved_using = Some(client_name.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
