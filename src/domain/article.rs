use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::RequestDescriptor;
use crate::app::{BylineError, Result};
use crate::domain::author::{Author, ProfileDto};
use crate::domain::ids::{Slug, Username};

/// Markdown source of an article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body(String);

impl Body {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self(markdown.into())
    }

    pub fn as_markdown(&self) -> &str {
        &self.0
    }
}

/// Completeness marker for list-view articles: no body was fetched, and no
/// accessor exists to pretend otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview;

/// Completeness marker for fully loaded articles, carrying the body.
///
/// Only [`Article::<Preview>::with_body`] and [`Article::<Full>::decode`]
/// can produce one; there is no way to manufacture a body from nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Full {
    body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub favorited: bool,
    pub favorites_count: u64,
}

/// An article record whose type parameter tracks how much of it was fetched.
///
/// `Article<Preview>` comes from feed listings and has no body accessor;
/// `Article<Full>` comes from single-article responses (or an explicit
/// body attach) and adds [`body`](Article::<Full>::body). Two articles are
/// the same resource iff their slugs are equal; consumers reconcile by slug,
/// never by structural equality.
#[derive(Debug, Clone, PartialEq)]
pub struct Article<Extra> {
    slug: Slug,
    author: Author,
    metadata: Metadata,
    extra: Extra,
}

/// Null-tolerant but presence-required: an explicit `null` decodes to
/// `None`, while a payload missing the field is a decode error.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleDto {
    slug: String,
    title: String,
    #[serde(deserialize_with = "nullable")]
    description: Option<String>,
    body: Option<String>,
    tag_list: Vec<String>,
    created_at: DateTime<Utc>,
    favorited: bool,
    favorites_count: u64,
    author: ProfileDto,
}

impl ArticleDto {
    fn parse(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| BylineError::decode("article", e))
    }

    fn into_parts(self, viewer: Option<&Username>) -> Result<(Slug, Author, Metadata, Option<Body>)> {
        let slug = Slug::parse(&self.slug).map_err(|e| BylineError::decode("article.slug", e))?;
        let author = Author::from_dto(self.author, viewer)?;
        let metadata = Metadata {
            title: self.title,
            description: self.description,
            tags: self.tag_list,
            created_at: self.created_at,
            favorited: self.favorited,
            favorites_count: self.favorites_count,
        };
        Ok((slug, author, metadata, self.body.map(Body::new)))
    }
}

impl<Extra> Article<Extra> {
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The only field-level transformation: fold a follow/unfollow result
    /// back into an already loaded article without refetching it.
    pub fn map_author(mut self, transform: impl FnOnce(Author) -> Author) -> Self {
        self.author = transform(self.author);
        self
    }

    /// POST when currently unfavorited, DELETE when favorited. This is a
    /// request description, not a mutation; the caller applies the decoded
    /// article from the response on success.
    pub fn favorite_toggle(&self) -> RequestDescriptor {
        let method = if self.metadata.favorited {
            Method::DELETE
        } else {
            Method::POST
        };
        RequestDescriptor::new(method, format!("/articles/{}/favorite", self.slug))
    }
}

impl Article<Preview> {
    /// Decode a list-view article; `body` is ignored even when present.
    pub fn decode(value: &Value, viewer: Option<&Username>) -> Result<Self> {
        let (slug, author, metadata, _) = ArticleDto::parse(value)?.into_parts(viewer)?;
        Ok(Self {
            slug,
            author,
            metadata,
            extra: Preview,
        })
    }

    /// Attach an explicitly supplied body. Pure and total; metadata, slug
    /// and author carry over unchanged.
    pub fn with_body(self, body: Body) -> Article<Full> {
        Article {
            slug: self.slug,
            author: self.author,
            metadata: self.metadata,
            extra: Full { body },
        }
    }
}

impl Article<Full> {
    /// Decode a single-article response; a missing `body` is a decode error.
    pub fn decode(value: &Value, viewer: Option<&Username>) -> Result<Self> {
        let (slug, author, metadata, body) = ArticleDto::parse(value)?.into_parts(viewer)?;
        let body = body.ok_or_else(|| BylineError::decode("article.body", "missing field"))?;
        Ok(Self {
            slug,
            author,
            metadata,
            extra: Full { body },
        })
    }

    pub fn body(&self) -> &Body {
        &self.extra.body
    }
}

/// Editable fields of an article, used for create and update payloads.
#[derive(Debug, Clone, Default)]
pub struct ArticleDraft {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl ArticleDraft {
    pub fn create_request(&self) -> RequestDescriptor {
        RequestDescriptor::post("/articles").with_body(self.payload())
    }

    pub fn update_request(&self, slug: &Slug) -> RequestDescriptor {
        RequestDescriptor::put(format!("/articles/{}", slug)).with_body(self.payload())
    }

    fn payload(&self) -> Value {
        json!({
            "article": {
                "title": self.title,
                "description": self.description,
                "body": self.body,
                "tagList": self.tags,
            }
        })
    }
}
