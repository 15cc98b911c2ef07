use serde::Deserialize;
use serde_json::Value;

use crate::api::RequestDescriptor;
use crate::app::{BylineError, Result};
use crate::domain::ids::{Avatar, Username};

/// Public-facing identity of a user: who they are, not how the viewer
/// relates to them. Immutable; follow/unfollow replaces the wrapping
/// [`Author`] variant, never the profile itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    username: Username,
    bio: Option<String>,
    avatar: Avatar,
}

impl Profile {
    pub fn new(username: Username, bio: Option<String>, avatar: Avatar) -> Self {
        Self {
            username,
            bio,
            avatar,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }
}

/// An author the viewer currently follows. The only transition out is
/// [`unfollow_request`](Self::unfollow_request).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowedAuthor(Profile);

impl FollowedAuthor {
    pub fn profile(&self) -> &Profile {
        &self.0
    }

    pub fn username(&self) -> &Username {
        self.0.username()
    }

    /// DELETE `/profiles/{username}/follow`. The response is re-decoded
    /// against the viewer; the server decides the resulting state.
    pub fn unfollow_request(&self) -> RequestDescriptor {
        RequestDescriptor::delete(format!("/profiles/{}/follow", self.username()))
    }
}

/// An author the viewer does not follow. The only transition out is
/// [`follow_request`](Self::follow_request).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfollowedAuthor(Profile);

impl UnfollowedAuthor {
    pub fn profile(&self) -> &Profile {
        &self.0
    }

    pub fn username(&self) -> &Username {
        self.0.username()
    }

    /// POST `/profiles/{username}/follow`.
    pub fn follow_request(&self) -> RequestDescriptor {
        RequestDescriptor::post(format!("/profiles/{}/follow", self.username()))
    }
}

/// How the viewer relates to an article's or comment's author.
///
/// Exactly one variant holds at a time, decided at decode time by comparing
/// the payload username against the viewer's own. `IsSelf` is absorbing: no
/// follow transition exists into or out of it, and the wrapper types make a
/// wrong-variant transition a compile error rather than a runtime check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    Following(FollowedAuthor),
    NotFollowing(UnfollowedAuthor),
    IsSelf(Profile),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileDto {
    username: String,
    bio: Option<String>,
    image: Option<String>,
    following: bool,
}

impl Author {
    pub(crate) fn from_dto(dto: ProfileDto, viewer: Option<&Username>) -> Result<Self> {
        let username = Username::parse(&dto.username)
            .map_err(|e| BylineError::decode("profile.username", e))?;
        let profile = Profile::new(username, dto.bio, Avatar::new(dto.image));

        Ok(if viewer == Some(profile.username()) {
            Author::IsSelf(profile)
        } else if dto.following {
            Author::Following(FollowedAuthor(profile))
        } else {
            Author::NotFollowing(UnfollowedAuthor(profile))
        })
    }

    /// Decode a profile payload, classifying the variant against the viewer
    /// (absent when logged out).
    pub fn decode(value: &Value, viewer: Option<&Username>) -> Result<Self> {
        let dto: ProfileDto = serde_json::from_value(value.clone())
            .map_err(|e| BylineError::decode("profile", e))?;
        Self::from_dto(dto, viewer)
    }

    pub fn profile(&self) -> &Profile {
        match self {
            Author::Following(author) => author.profile(),
            Author::NotFollowing(author) => author.profile(),
            Author::IsSelf(profile) => profile,
        }
    }

    pub fn username(&self) -> &Username {
        self.profile().username()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(following: bool) -> Value {
        json!({
            "username": "celeb_ine",
            "bio": "I work at statefarm",
            "image": "https://example.com/ine.png",
            "following": following,
        })
    }

    #[test]
    fn test_decode_matches_following_flag_for_other_users() {
        let viewer = Username::parse("reader").unwrap();

        let author = Author::decode(&payload(true), Some(&viewer)).unwrap();
        assert!(matches!(author, Author::Following(_)));

        let author = Author::decode(&payload(false), Some(&viewer)).unwrap();
        assert!(matches!(author, Author::NotFollowing(_)));
    }

    #[test]
    fn test_decode_is_self_wins_over_following_flag() {
        let viewer = Username::parse("celeb_ine").unwrap();
        let author = Author::decode(&payload(true), Some(&viewer)).unwrap();
        assert!(matches!(author, Author::IsSelf(_)));
    }

    #[test]
    fn test_decode_logged_out_viewer_never_is_self() {
        let author = Author::decode(&payload(false), None).unwrap();
        assert!(matches!(author, Author::NotFollowing(_)));
    }

    #[test]
    fn test_decode_missing_username_names_field() {
        let err = Author::decode(&json!({"bio": null}), None).unwrap_err();
        assert!(err.to_string().contains("profile"));
    }

    #[test]
    fn test_decode_missing_following_flag_is_an_error() {
        let mut value = payload(false);
        value.as_object_mut().unwrap().remove("following");
        let err = Author::decode(&value, None).unwrap_err();
        assert!(err.to_string().contains("following"), "got: {}", err);
    }

    #[test]
    fn test_transition_requests_target_follow_endpoint() {
        let author = Author::decode(&payload(false), None).unwrap();
        let Author::NotFollowing(unfollowed) = author else {
            panic!("expected NotFollowing");
        };
        let request = unfollowed.follow_request();
        assert_eq!(request.method, reqwest::Method::POST);
        assert_eq!(request.path, "/profiles/celeb_ine/follow");

        let author = Author::decode(&payload(true), None).unwrap();
        let Author::Following(followed) = author else {
            panic!("expected Following");
        };
        let request = followed.unfollow_request();
        assert_eq!(request.method, reqwest::Method::DELETE);
        assert_eq!(request.path, "/profiles/celeb_ine/follow");
    }
}
