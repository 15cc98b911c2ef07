pub mod article;
pub mod author;
pub mod comment;
pub mod ids;

pub use article::{Article, ArticleDraft, Body, Full, Metadata, Preview};
pub use author::{Author, FollowedAuthor, Profile, UnfollowedAuthor};
pub use comment::Comment;
pub use ids::{Avatar, CommentId, Email, Slug, Username};
