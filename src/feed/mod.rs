use serde_json::Value;

use crate::api::RequestDescriptor;
use crate::app::{BylineError, Result};
use crate::domain::{Article, Preview, Username};
use crate::session::Credential;

/// A named query configuration selectable in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Personalized feed; requires a signed-in viewer.
    YourFeed,
    GlobalFeed,
    TagFeed(String),
    FavoritedFeed(Username),
    AuthorFeed(Username),
}

impl FeedSource {
    pub fn page_size(&self) -> u64 {
        match self {
            FeedSource::YourFeed | FeedSource::GlobalFeed | FeedSource::TagFeed(_) => 10,
            FeedSource::FavoritedFeed(_) | FeedSource::AuthorFeed(_) => 5,
        }
    }

    pub fn label(&self) -> String {
        match self {
            FeedSource::YourFeed => "Your Feed".to_string(),
            FeedSource::GlobalFeed => "Global Feed".to_string(),
            FeedSource::TagFeed(tag) => format!("#{}", tag),
            FeedSource::FavoritedFeed(username) => format!("Favorited by {}", username),
            FeedSource::AuthorFeed(username) => format!("Articles by {}", username),
        }
    }

    /// Build the page query for this source. `page` starts at 1.
    ///
    /// Tag/author/favorited set exactly one filter; the global feed sets
    /// none. The personalized feed hits `/articles/feed` instead and fails
    /// here, before any network call, when no credential is present.
    pub fn request(
        &self,
        page: u64,
        credential: Option<&Credential>,
    ) -> Result<RequestDescriptor> {
        let descriptor = match self {
            FeedSource::YourFeed => {
                if credential.is_none() {
                    return Err(BylineError::Unauthenticated {
                        action: "view your feed".to_string(),
                    });
                }
                RequestDescriptor::get("/articles/feed")
            }
            FeedSource::GlobalFeed => RequestDescriptor::get("/articles"),
            FeedSource::TagFeed(tag) => {
                RequestDescriptor::get("/articles").with_query("tag", tag)
            }
            FeedSource::FavoritedFeed(username) => {
                RequestDescriptor::get("/articles").with_query("favorited", username)
            }
            FeedSource::AuthorFeed(username) => {
                RequestDescriptor::get("/articles").with_query("author", username)
            }
        };

        let limit = self.page_size();
        let offset = page.saturating_sub(1) * limit;
        Ok(descriptor
            .with_query("limit", limit)
            .with_query("offset", offset))
    }
}

/// The selectable sources of a feed page: a non-empty ordered list with
/// exactly one selected at a time.
#[derive(Debug, Clone)]
pub struct FeedSources {
    sources: Vec<FeedSource>,
    selected: usize,
}

impl FeedSources {
    pub fn new(first: FeedSource, rest: Vec<FeedSource>) -> Self {
        let mut sources = vec![first];
        sources.extend(rest);
        Self {
            sources,
            selected: 0,
        }
    }

    pub fn all(&self) -> &[FeedSource] {
        &self.sources
    }

    pub fn selected(&self) -> &FeedSource {
        &self.sources[self.selected]
    }

    /// Move the selected marker without reordering. Returns `true` when the
    /// selection changed; by convention the caller then reloads page 1.
    pub fn select(&mut self, source: &FeedSource) -> bool {
        match self.sources.iter().position(|s| s == source) {
            Some(index) if index != self.selected => {
                self.selected = index;
                true
            }
            _ => false,
        }
    }
}

/// One page of articles plus the server's total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    articles: Vec<Article<Preview>>,
    total_count: u64,
}

impl Feed {
    /// Decode `{"articles": […], "articlesCount": n}`.
    pub fn decode(value: &Value, viewer: Option<&Username>) -> Result<Self> {
        let entries = value
            .get("articles")
            .and_then(Value::as_array)
            .ok_or_else(|| BylineError::decode("articles", "missing or not a list"))?;
        let total_count = value
            .get("articlesCount")
            .and_then(Value::as_u64)
            .ok_or_else(|| BylineError::decode("articlesCount", "missing or not a count"))?;

        let articles = entries
            .iter()
            .map(|entry| Article::<Preview>::decode(entry, viewer))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            articles,
            total_count,
        })
    }

    pub fn articles(&self) -> &[Article<Preview>] {
        &self.articles
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self, page_size: u64) -> u64 {
        self.total_count.div_ceil(page_size)
    }

    /// Page links are suppressed entirely when everything fits on one page.
    pub fn show_page_links(&self, page_size: u64) -> bool {
        self.total_pages(page_size) > 1
    }

    /// Reconcile a favorite-toggle result: replace exactly the entry with
    /// the matching slug, leaving order and every other entry untouched.
    /// Returns `false` when the article is no longer in this page.
    pub fn replace(&mut self, updated: Article<Preview>) -> bool {
        match self
            .articles
            .iter_mut()
            .find(|article| article.slug() == updated.slug())
        {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article_payload(slug: &str, favorited: bool, count: u64) -> Value {
        json!({
            "slug": slug,
            "title": slug,
            "description": null,
            "tagList": [],
            "createdAt": "2016-02-18T03:22:56.637Z",
            "favorited": favorited,
            "favoritesCount": count,
            "author": {
                "username": "jake",
                "bio": null,
                "image": null,
                "following": false
            }
        })
    }

    fn feed_payload(slugs: &[&str], total: u64) -> Value {
        json!({
            "articles": slugs
                .iter()
                .map(|slug| article_payload(slug, false, 3))
                .collect::<Vec<_>>(),
            "articlesCount": total,
        })
    }

    fn credential() -> Credential {
        let raw = json!({"username": "jake", "token": "tok"});
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_page_sizes_per_source() {
        let jake = Username::parse("jake").unwrap();
        assert_eq!(FeedSource::YourFeed.page_size(), 10);
        assert_eq!(FeedSource::GlobalFeed.page_size(), 10);
        assert_eq!(FeedSource::TagFeed("rust".into()).page_size(), 10);
        assert_eq!(FeedSource::FavoritedFeed(jake.clone()).page_size(), 5);
        assert_eq!(FeedSource::AuthorFeed(jake).page_size(), 5);
    }

    #[test]
    fn test_global_feed_page_three_offsets_twenty() {
        let request = FeedSource::GlobalFeed.request(3, None).unwrap();
        assert_eq!(request.path, "/articles");
        assert_eq!(
            request.query,
            vec![("limit", "10".to_string()), ("offset", "20".to_string())]
        );
    }

    #[test]
    fn test_filter_sources_set_exactly_one_filter() {
        let request = FeedSource::TagFeed("dragons".into()).request(1, None).unwrap();
        assert_eq!(request.query[0], ("tag", "dragons".to_string()));
        assert_eq!(request.query.len(), 3); // tag + limit + offset

        let jake = Username::parse("jake").unwrap();
        let request = FeedSource::AuthorFeed(jake.clone()).request(2, None).unwrap();
        assert_eq!(request.query[0], ("author", "jake".to_string()));
        assert_eq!(
            request.query[1..],
            [("limit", "5".to_string()), ("offset", "5".to_string())]
        );

        let request = FeedSource::FavoritedFeed(jake).request(1, None).unwrap();
        assert_eq!(request.query[0], ("favorited", "jake".to_string()));
    }

    #[test]
    fn test_your_feed_requires_credential_before_any_network() {
        let err = FeedSource::YourFeed.request(1, None).unwrap_err();
        assert_eq!(err.to_string(), "Please sign in to view your feed.");

        let request = FeedSource::YourFeed.request(1, Some(&credential())).unwrap();
        assert_eq!(request.path, "/articles/feed");
    }

    #[test]
    fn test_select_preserves_order_and_marks_one() {
        let global = FeedSource::GlobalFeed;
        let tag = FeedSource::TagFeed("rust".into());
        let mut sources = FeedSources::new(global.clone(), vec![tag.clone()]);
        assert_eq!(sources.selected(), &global);

        assert!(sources.select(&tag));
        assert_eq!(sources.selected(), &tag);
        assert_eq!(sources.all(), &[global.clone(), tag.clone()]);

        // Re-selecting the active source is not a change.
        assert!(!sources.select(&tag));
        // Selecting an absent source is ignored.
        assert!(!sources.select(&FeedSource::YourFeed));
        assert_eq!(sources.selected(), &tag);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let feed = Feed::decode(&feed_payload(&[], 25), None).unwrap();
        assert_eq!(feed.total_pages(10), 3);
        assert!(feed.show_page_links(10));

        let feed = Feed::decode(&feed_payload(&[], 10), None).unwrap();
        assert_eq!(feed.total_pages(10), 1);
        assert!(!feed.show_page_links(10));

        let feed = Feed::decode(&feed_payload(&[], 0), None).unwrap();
        assert_eq!(feed.total_pages(10), 0);
        assert!(!feed.show_page_links(10));
    }

    #[test]
    fn test_replace_swaps_only_the_matching_slug() {
        let slugs = ["a0", "a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8", "a9"];
        let mut feed = Feed::decode(&feed_payload(&slugs, 10), None).unwrap();
        let before = feed.articles().to_vec();

        let updated =
            Article::<Preview>::decode(&article_payload("a4", true, 4), None).unwrap();
        assert!(feed.replace(updated.clone()));

        for (index, article) in feed.articles().iter().enumerate() {
            if index == 4 {
                assert_eq!(article, &updated);
                assert!(article.metadata().favorited);
                assert_eq!(article.metadata().favorites_count, 4);
            } else {
                assert_eq!(article, &before[index]);
            }
        }
    }

    #[test]
    fn test_replace_of_departed_article_is_discarded() {
        let mut feed = Feed::decode(&feed_payload(&["a0"], 1), None).unwrap();
        let stranger =
            Article::<Preview>::decode(&article_payload("gone", true, 1), None).unwrap();
        assert!(!feed.replace(stranger));
        assert_eq!(feed.articles().len(), 1);
    }
}
