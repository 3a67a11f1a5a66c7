//! User operations.

use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::User;
use crate::Client;

impl Client {
    /// The user the API key belongs to.
    ///
    /// API reference: <https://developers.forem.com/api/v0#tag/users/operation/getUserMe>
    pub fn current_user(&self) -> Result<User, ApiError> {
        self.request_json(HttpMethod::Get, "/users/me", None, "user response")
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::{client_with, StubTransport, TEST_KEY};
    use crate::error::ApiError;
    use crate::http::HttpMethod;

    #[test]
    fn current_user_decodes_profile() {
        let transport = StubTransport::new(
            200,
            r#"{
                "type_of": "user",
                "id": 1234,
                "username": "bob",
                "name": "bob",
                "summary": "Hello, world",
                "twitter_username": "bob",
                "github_username": "bob",
                "website_url": null,
                "location": "New York",
                "joined_at": "Jan 1, 2017",
                "profile_image": "https://res.cloudinary.com/profile.jpeg"
            }"#,
        );
        let client = client_with(transport.clone(), Vec::new());
        let user = client.current_user().unwrap();

        assert_eq!(user.id, 1234);
        assert_eq!(user.username, "bob");
        assert_eq!(user.twitter_username.as_deref(), Some("bob"));
        assert_eq!(user.website_url, "");
        assert_eq!(user.joined_at, "Jan 1, 2017");

        let req = transport.last_request();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/users/me");
        assert_eq!(req.header("api-key"), Some(TEST_KEY));
    }

    #[test]
    fn current_user_without_twitter_handle() {
        let client = client_with(
            StubTransport::new(200, r#"{"username":"bob","twitter_username":null}"#),
            Vec::new(),
        );
        assert!(client.current_user().unwrap().twitter_username.is_none());
    }

    #[test]
    fn current_user_unauthorized() {
        let client = client_with(
            StubTransport::new(401, r#"{"error":"unauthorized","status":401}"#),
            Vec::new(),
        );
        let err = client.current_user().unwrap_err();
        assert!(matches!(err, ApiError::Remote(_)));
        assert_eq!(err.status(), Some(401));
    }
}
