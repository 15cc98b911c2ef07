use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::api::{unwrap_envelope, Gateway, RequestDescriptor};
use crate::app::{BylineError, Result};
use crate::domain::{
    Article, ArticleDraft, Author, Comment, CommentId, Email, FollowedAuthor, Full, Preview,
    Slug, UnfollowedAuthor, Username,
};
use crate::feed::{Feed, FeedSource};
use crate::session::{Credential, LoggedInUser};

/// Optional changes submitted from the settings page; absent fields are
/// left untouched by the server.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    fn payload(&self) -> Value {
        let mut user = Map::new();
        let fields = [
            ("username", &self.username),
            ("email", &self.email),
            ("bio", &self.bio),
            ("image", &self.avatar),
            ("password", &self.password),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                user.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        json!({ "user": user })
    }
}

/// Typed operations against the REST gateway.
///
/// Every method builds a [`RequestDescriptor`], hands it to the gateway,
/// and decodes the enveloped response against the viewer identity carried
/// by the credential (absent for anonymous reads).
#[derive(Clone)]
pub struct ApiClient {
    gateway: Arc<dyn Gateway + Send + Sync>,
}

impl ApiClient {
    pub fn new(gateway: Arc<dyn Gateway + Send + Sync>) -> Self {
        Self { gateway }
    }

    fn viewer(credential: Option<&Credential>) -> Option<&Username> {
        credential.map(Credential::username)
    }

    // --- session -----------------------------------------------------------

    pub async fn login(&self, email: &Email, password: &str) -> Result<LoggedInUser> {
        let request = RequestDescriptor::post("/users/login")
            .with_body(json!({"user": {"email": email, "password": password}}));
        let value = self.gateway.execute(&request, None).await?;
        LoggedInUser::decode(unwrap_envelope(&value, "user")?)
    }

    pub async fn register(
        &self,
        username: &Username,
        email: &Email,
        password: &str,
    ) -> Result<LoggedInUser> {
        let request = RequestDescriptor::post("/users").with_body(
            json!({"user": {"username": username, "email": email, "password": password}}),
        );
        let value = self.gateway.execute(&request, None).await?;
        LoggedInUser::decode(unwrap_envelope(&value, "user")?)
    }

    pub async fn update_user(
        &self,
        update: &UserUpdate,
        credential: &Credential,
    ) -> Result<LoggedInUser> {
        let request = RequestDescriptor::put("/user").with_body(update.payload());
        let value = self.gateway.execute(&request, Some(credential)).await?;
        LoggedInUser::decode(unwrap_envelope(&value, "user")?)
    }

    /// Re-fetch the identity behind a credential, picking up server-side
    /// profile changes.
    pub async fn current_user(&self, credential: &Credential) -> Result<LoggedInUser> {
        let request = RequestDescriptor::get("/user");
        let value = self.gateway.execute(&request, Some(credential)).await?;
        LoggedInUser::decode(unwrap_envelope(&value, "user")?)
    }

    // --- articles ----------------------------------------------------------

    pub async fn article(
        &self,
        slug: &Slug,
        credential: Option<&Credential>,
    ) -> Result<Article<Full>> {
        let request = RequestDescriptor::get(format!("/articles/{}", slug));
        let value = self.gateway.execute(&request, credential).await?;
        Article::<Full>::decode(unwrap_envelope(&value, "article")?, Self::viewer(credential))
    }

    pub async fn create_article(
        &self,
        draft: &ArticleDraft,
        credential: &Credential,
    ) -> Result<Article<Full>> {
        let value = self
            .gateway
            .execute(&draft.create_request(), Some(credential))
            .await?;
        Article::<Full>::decode(
            unwrap_envelope(&value, "article")?,
            Some(credential.username()),
        )
    }

    pub async fn update_article(
        &self,
        slug: &Slug,
        draft: &ArticleDraft,
        credential: &Credential,
    ) -> Result<Article<Full>> {
        let value = self
            .gateway
            .execute(&draft.update_request(slug), Some(credential))
            .await?;
        Article::<Full>::decode(
            unwrap_envelope(&value, "article")?,
            Some(credential.username()),
        )
    }

    pub async fn delete_article(&self, slug: &Slug, credential: &Credential) -> Result<()> {
        let request = RequestDescriptor::delete(format!("/articles/{}", slug));
        self.gateway.execute(&request, Some(credential)).await?;
        Ok(())
    }

    /// Issue the toggle described by the article's current favorited flag
    /// and decode the authoritative result. The caller folds it back into
    /// its feed by slug.
    pub async fn toggle_favorite<Extra>(
        &self,
        article: &Article<Extra>,
        credential: &Credential,
    ) -> Result<Article<Preview>> {
        let value = self
            .gateway
            .execute(&article.favorite_toggle(), Some(credential))
            .await?;
        Article::<Preview>::decode(
            unwrap_envelope(&value, "article")?,
            Some(credential.username()),
        )
    }

    // --- feeds -------------------------------------------------------------

    pub async fn feed(
        &self,
        source: &FeedSource,
        page: u64,
        credential: Option<&Credential>,
    ) -> Result<(u64, Feed)> {
        let request = source.request(page, credential)?;
        let value = self.gateway.execute(&request, credential).await?;
        let feed = Feed::decode(&value, Self::viewer(credential))?;
        Ok((page, feed))
    }

    // --- tags --------------------------------------------------------------

    /// The site-wide tag cloud. Anonymous; order is the server's.
    pub async fn tags(&self) -> Result<Vec<String>> {
        let request = RequestDescriptor::get("/tags");
        let value = self.gateway.execute(&request, None).await?;
        let entries = unwrap_envelope(&value, "tags")?
            .as_array()
            .ok_or_else(|| BylineError::decode("tags", "missing or not a list"))?;
        entries
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(String::from)
                    .ok_or_else(|| BylineError::decode("tags", "not a string"))
            })
            .collect()
    }

    // --- profiles ----------------------------------------------------------

    pub async fn profile(
        &self,
        username: &Username,
        credential: Option<&Credential>,
    ) -> Result<Author> {
        let request = RequestDescriptor::get(format!("/profiles/{}", username));
        let value = self.gateway.execute(&request, credential).await?;
        Author::decode(unwrap_envelope(&value, "profile")?, Self::viewer(credential))
    }

    /// The follow transition exists only on [`UnfollowedAuthor`]; the
    /// resulting variant is re-decoded from the response, never assumed.
    pub async fn follow(
        &self,
        author: &UnfollowedAuthor,
        credential: &Credential,
    ) -> Result<Author> {
        let value = self
            .gateway
            .execute(&author.follow_request(), Some(credential))
            .await?;
        Author::decode(
            unwrap_envelope(&value, "profile")?,
            Some(credential.username()),
        )
    }

    pub async fn unfollow(
        &self,
        author: &FollowedAuthor,
        credential: &Credential,
    ) -> Result<Author> {
        let value = self
            .gateway
            .execute(&author.unfollow_request(), Some(credential))
            .await?;
        Author::decode(
            unwrap_envelope(&value, "profile")?,
            Some(credential.username()),
        )
    }

    // --- comments ----------------------------------------------------------

    pub async fn comments(
        &self,
        slug: &Slug,
        credential: Option<&Credential>,
    ) -> Result<Vec<Comment>> {
        let request = RequestDescriptor::get(format!("/articles/{}/comments", slug));
        let value = self.gateway.execute(&request, credential).await?;
        let entries = unwrap_envelope(&value, "comments")?
            .as_array()
            .ok_or_else(|| BylineError::decode("comments", "missing or not a list"))?;
        entries
            .iter()
            .map(|entry| Comment::decode(entry, Self::viewer(credential)))
            .collect()
    }

    pub async fn post_comment(
        &self,
        slug: &Slug,
        body: &str,
        credential: &Credential,
    ) -> Result<Comment> {
        let request = RequestDescriptor::post(format!("/articles/{}/comments", slug))
            .with_body(json!({"comment": {"body": body}}));
        let value = self.gateway.execute(&request, Some(credential)).await?;
        Comment::decode(
            unwrap_envelope(&value, "comment")?,
            Some(credential.username()),
        )
    }

    /// Returns the deleted id so the caller can correlate the response with
    /// the comment it targeted.
    pub async fn delete_comment(
        &self,
        slug: &Slug,
        id: CommentId,
        credential: &Credential,
    ) -> Result<CommentId> {
        let request = RequestDescriptor::delete(format!("/articles/{}/comments/{}", slug, id));
        self.gateway.execute(&request, Some(credential)).await?;
        Ok(id)
    }
}
