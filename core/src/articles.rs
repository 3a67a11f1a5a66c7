//! Article operations for the authenticated user.

use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Article, ArticleEnvelope, CreateArticle};
use crate::Client;

impl Client {
    /// All articles of the authenticated user, published or not.
    ///
    /// API reference: <https://developers.forem.com/api/v0#tag/articles/operation/getUserAllArticles>
    pub fn list_my_articles(&self) -> Result<Vec<Article>, ApiError> {
        self.request_json(HttpMethod::Get, "/articles/me/all", None, "article listing")
    }

    /// Looks up one of the user's articles by id.
    ///
    /// There is no endpoint for a single unpublished article, so this lists
    /// every article and picks the matching one. `Ok(None)` means the
    /// listing succeeded but no article has that id.
    pub fn get_my_article(&self, id: u64) -> Result<Option<Article>, ApiError> {
        let articles = self.list_my_articles()?;
        Ok(articles.into_iter().find(|article| article.id == id))
    }

    /// API reference: <https://developers.forem.com/api/v0#tag/articles/operation/createArticle>
    pub fn create_article(&self, article: &CreateArticle) -> Result<Article, ApiError> {
        self.upsert(None, article)
    }

    /// API reference: <https://developers.forem.com/api/v0#tag/articles/operation/updateArticle>
    pub fn update_article(&self, id: u64, article: &CreateArticle) -> Result<Article, ApiError> {
        self.upsert(Some(id), article)
    }

    fn upsert(&self, id: Option<u64>, article: &CreateArticle) -> Result<Article, ApiError> {
        let (method, path) = match id {
            Some(id) => (HttpMethod::Put, format!("/articles/{id}")),
            None => (HttpMethod::Post, "/articles".to_string()),
        };

        let body = serde_json::to_string(&ArticleEnvelope { article })
            .map_err(|e| ApiError::Serialization(format!("article envelope: {e}")))?;

        self.request_json(method, &path, Some(body), "article response")
    }
}
