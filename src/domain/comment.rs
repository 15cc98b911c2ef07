use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::api::RequestDescriptor;
use crate::app::{BylineError, Result};
use crate::domain::author::{Author, ProfileDto};
use crate::domain::ids::{CommentId, Slug, Username};

/// A comment on an article. Delete responses are correlated back to the
/// originating comment by [`CommentId`], not by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    id: CommentId,
    body: String,
    created_at: DateTime<Utc>,
    author: Author,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentDto {
    id: i64,
    body: String,
    created_at: DateTime<Utc>,
    author: ProfileDto,
}

impl Comment {
    pub fn decode(value: &Value, viewer: Option<&Username>) -> Result<Self> {
        let dto: CommentDto = serde_json::from_value(value.clone())
            .map_err(|e| BylineError::decode("comment", e))?;
        Ok(Self {
            id: CommentId::new(dto.id),
            body: dto.body,
            created_at: dto.created_at,
            author: Author::from_dto(dto.author, viewer)?,
        })
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn delete_request(&self, slug: &Slug) -> RequestDescriptor {
        RequestDescriptor::delete(format!("/articles/{}/comments/{}", slug, self.id))
    }
}
