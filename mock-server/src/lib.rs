use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const DEFAULT_API_KEY: &str = "test-api-key";

const USERNAME: &str = "mockuser";
const PUBLISHED_AT: &str = "2019-04-17T09:33:16Z";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub type_of: String,
    pub id: u64,
    pub title: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub published: bool,
    pub body_markdown: String,
    pub slug: String,
    pub path: String,
    pub url: String,
    pub canonical_url: Option<String>,
    pub tag_list: Vec<String>,
    pub published_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ArticleInput {
    pub title: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub body_markdown: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
}

#[derive(Deserialize)]
pub struct ArticleEnvelope {
    pub article: ArticleInput,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub type_of: String,
    pub id: u64,
    pub username: String,
    pub name: String,
    pub summary: Option<String>,
    pub twitter_username: Option<String>,
    pub github_username: Option<String>,
    pub website_url: Option<String>,
    pub location: Option<String>,
    pub joined_at: String,
    pub profile_image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub status: u16,
}

/// Error reply in the service's `{"error", "status"}` shape.
pub struct ApiFailure(StatusCode, &'static str);

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.1.to_string(),
            status: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

struct Store {
    articles: Vec<Article>,
    next_id: u64,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    store: Arc<RwLock<Store>>,
}

impl AppState {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiFailure> {
        match headers.get("api-key").and_then(|v| v.to_str().ok()) {
            Some(key) if key == &*self.api_key => Ok(()),
            _ => Err(ApiFailure(StatusCode::UNAUTHORIZED, "unauthorized")),
        }
    }
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        store: Arc::new(RwLock::new(Store {
            articles: Vec::new(),
            next_id: 1,
        })),
    };
    Router::new()
        .route("/articles/me/all", get(list_my_articles))
        .route("/articles", post(create_article))
        .route("/articles/{id}", put(update_article))
        .route("/users/me", get(current_user))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock dev.to API listening");
    }
    axum::serve(listener, app(api_key)).await
}

fn slugify(title: &str, id: u64) -> String {
    let words: Vec<String> = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    format!("{}-{id}", words.join("-"))
}

fn apply(article: &mut Article, input: ArticleInput) {
    let slug = slugify(&input.title, article.id);
    article.path = format!("/{USERNAME}/{slug}");
    article.url = format!("https://dev.to/{USERNAME}/{slug}");
    article.slug = slug;
    article.title = input.title;
    article.description = input.description;
    article.published = input.published;
    article.published_at = input.published.then(|| PUBLISHED_AT.to_string());
    article.body_markdown = input.body_markdown;
    article.tag_list = input.tags;
    article.canonical_url = input.canonical_url;
}

fn body_taken(articles: &[Article], body: &str, except: Option<u64>) -> bool {
    !body.is_empty()
        && articles
            .iter()
            .any(|a| Some(a.id) != except && a.body_markdown == body)
}

async fn list_my_articles(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Article>>, ApiFailure> {
    state.authorize(&headers)?;
    let store = state.store.read().await;
    Ok(Json(store.articles.clone()))
}

async fn create_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(envelope): Json<ArticleEnvelope>,
) -> Result<(StatusCode, Json<Article>), ApiFailure> {
    state.authorize(&headers)?;
    let mut store = state.store.write().await;
    if body_taken(&store.articles, &envelope.article.body_markdown, None) {
        return Err(ApiFailure(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Body markdown has already been taken",
        ));
    }

    let id = store.next_id;
    store.next_id += 1;
    let mut article = Article {
        type_of: "article".to_string(),
        id,
        title: String::new(),
        description: String::new(),
        cover_image: None,
        published: false,
        body_markdown: String::new(),
        slug: String::new(),
        path: String::new(),
        url: String::new(),
        canonical_url: None,
        tag_list: Vec::new(),
        published_at: None,
    };
    apply(&mut article, envelope.article);
    store.articles.push(article.clone());
    info!(id, "article created");
    Ok((StatusCode::CREATED, Json(article)))
}

async fn update_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(envelope): Json<ArticleEnvelope>,
) -> Result<Json<Article>, ApiFailure> {
    state.authorize(&headers)?;
    let mut store = state.store.write().await;
    if body_taken(&store.articles, &envelope.article.body_markdown, Some(id)) {
        return Err(ApiFailure(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Body markdown has already been taken",
        ));
    }
    let article = store
        .articles
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or(ApiFailure(StatusCode::NOT_FOUND, "not found"))?;
    apply(article, envelope.article);
    info!(id, "article updated");
    Ok(Json(article.clone()))
}

async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<User>, ApiFailure> {
    state.authorize(&headers)?;
    Ok(Json(User {
        type_of: "user".to_string(),
        id: 1234,
        username: USERNAME.to_string(),
        name: "Mock User".to_string(),
        summary: Some("Writes test articles".to_string()),
        twitter_username: None,
        github_username: Some(USERNAME.to_string()),
        website_url: None,
        location: Some("Localhost".to_string()),
        joined_at: "Apr 14, 2017".to_string(),
        profile_image: "https://dev.to/uploads/user/profile_image/1234/mock.png".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_lowercase_and_dashed() {
        assert_eq!(slugify("Hello, World! Rust 2021", 7), "hello-world-rust-2021-7");
    }

    #[test]
    fn envelope_requires_title() {
        let result: Result<ArticleEnvelope, _> = serde_json::from_str(r#"{"article":{"published":true}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn envelope_defaults_optional_fields() {
        let input: ArticleEnvelope = serde_json::from_str(r#"{"article":{"title":"Only title"}}"#).unwrap();
        assert_eq!(input.article.title, "Only title");
        assert!(!input.article.published);
        assert!(input.article.body_markdown.is_empty());
        assert!(input.article.tags.is_empty());
    }

    fn article(id: u64, body: &str) -> Article {
        Article {
            type_of: "article".to_string(),
            id,
            title: "t".to_string(),
            description: String::new(),
            cover_image: None,
            published: false,
            body_markdown: body.to_string(),
            slug: String::new(),
            path: String::new(),
            url: String::new(),
            canonical_url: None,
            tag_list: Vec::new(),
            published_at: None,
        }
    }

    #[test]
    fn envelope_accepts_fields_the_mock_does_not_store() {
        let input: ArticleEnvelope =
            serde_json::from_str(r#"{"article":{"title":"Part one","series":"Intro"}}"#).unwrap();
        assert_eq!(input.article.title, "Part one");
    }

    #[test]
    fn empty_body_is_never_taken() {
        assert!(!body_taken(&[article(1, "")], "", None));
    }

    #[test]
    fn body_taken_ignores_the_article_being_updated() {
        let articles = [article(1, "same")];
        assert!(body_taken(&articles, "same", None));
        assert!(!body_taken(&articles, "same", Some(1)));
        assert!(body_taken(&[article(2, "same")], "same", Some(1)));
    }
}
