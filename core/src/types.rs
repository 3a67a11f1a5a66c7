//! Entity model for the dev.to API.
//!
//! # Design
//! These types mirror the JSON shapes the service returns and accepts. Read
//! types (`Article`, `User`) default every field so sparse responses still
//! decode; the write type (`CreateArticle`) omits zero-valued fields so the
//! service only sees what the caller actually set.

use serde::{Deserialize, Deserializer, Serialize};

/// An article owned by the authenticated user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Article {
    pub type_of: String,
    pub id: u64,
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    pub cover_image: Option<String>,
    pub published: bool,
    #[serde(deserialize_with = "null_as_empty")]
    pub body_markdown: String,
    pub slug: String,
    pub path: String,
    pub url: String,
    pub canonical_url: Option<String>,
    pub tag_list: Vec<String>,
    pub comments_count: u64,
    pub positive_reactions_count: u64,
    pub public_reactions_count: u64,
    pub page_views_count: u64,
    pub published_at: Option<String>,
    pub published_timestamp: Option<String>,
}

/// Payload for creating or updating an article.
///
/// Only `title` is always sent. Every other field is left out of the JSON
/// while it holds its zero value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateArticle {
    pub title: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub published: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body_markdown: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub series: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub canonical_url: String,
}

/// Wire wrapper required by the create and update endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct ArticleEnvelope<'a> {
    pub article: &'a CreateArticle,
}

/// The authenticated account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    pub type_of: String,
    pub id: u64,
    pub username: String,
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub summary: String,
    /// `None` when the service omits the handle, sends `null`, or sends a
    /// non-string placeholder.
    #[serde(deserialize_with = "lenient_string")]
    pub twitter_username: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub github_username: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub website_url: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub location: String,
    pub joined_at: String,
    pub profile_image: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}
