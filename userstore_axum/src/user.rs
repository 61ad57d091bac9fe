use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
};
use std::sync::Arc;

use userstore::{User, UserStore};

use crate::error::IntoResponseError;
use crate::extract::{EmailField, ValidUser};

/// Path for single-user operations
pub const USER_ROUTE: &str = "/user";
/// Path listing every user
pub const USERS_ROUTE: &str = "/users";

/// A store shared by all handlers. Requests run concurrently; each store
/// synchronizes its own state.
pub type SharedUserStore = Arc<dyn UserStore>;

/// Wrap a store for use with [`user_router`]
pub fn shared_store(store: impl UserStore) -> SharedUserStore {
    Arc::new(store)
}

/// Create a router for the user CRUD endpoints
pub fn user_router(store: SharedUserStore) -> Router {
    Router::new()
        .route(
            USER_ROUTE,
            get(get_user_handler)
                .put(add_user_handler)
                .post(update_user_handler)
                .delete(delete_user_handler),
        )
        .route(USERS_ROUTE, get(list_users_handler))
        .with_state(store)
}

/// Adds a new user, overwriting any user with the same email
async fn add_user_handler(
    State(store): State<SharedUserStore>,
    ValidUser(user): ValidUser,
) -> Result<String, (StatusCode, String)> {
    let email = user.email.clone();
    tracing::debug!("Adding user: {}", email);

    store.insert_new_user(user).await.into_response_error()?;

    Ok(format!("{email} added successfully!\n"))
}

/// Returns the user matching the email field
async fn get_user_handler(
    State(store): State<SharedUserStore>,
    EmailField(email): EmailField,
) -> Result<Json<User>, (StatusCode, String)> {
    tracing::debug!("Getting user: {}", email);

    let user = store.find_user_by_email(&email).await.into_response_error()?;

    Ok(Json(user))
}

/// Updates name and password of an existing user
async fn update_user_handler(
    State(store): State<SharedUserStore>,
    ValidUser(user): ValidUser,
) -> Result<String, (StatusCode, String)> {
    let email = user.email.clone();
    tracing::debug!("Updating user: {}", email);

    store.update_user(user).await.into_response_error()?;

    Ok(format!("{email} updated successfully!\n"))
}

async fn delete_user_handler(
    State(store): State<SharedUserStore>,
    EmailField(email): EmailField,
) -> Result<String, (StatusCode, String)> {
    tracing::debug!("Deleting user: {}", email);

    store.delete_user(&email).await.into_response_error()?;

    Ok(format!("{email} deleted successfully!\n"))
}

/// Returns a JSON array with every user
async fn list_users_handler(
    State(store): State<SharedUserStore>,
) -> Result<Json<Vec<User>>, (StatusCode, String)> {
    let users = store.get_all_users().await.into_response_error()?;

    tracing::debug!("Listing {} users", users.len());
    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, Response, header};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;
    use userstore::{InMemoryUserStore, UserError};

    const TEST_EMAIL: &str = "bari@gmail.com";

    fn test_user() -> User {
        User::new(TEST_EMAIL.to_string(), "bari".to_string(), "1234".to_string())
    }

    async fn store_with(users: Vec<User>) -> SharedUserStore {
        let store = InMemoryUserStore::new();
        for user in users {
            store.insert_new_user(user).await.unwrap();
        }
        shared_store(store)
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_request(method: Method, email: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(USER_ROUTE)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("email={email}")))
            .unwrap()
    }

    fn query_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn send(store: &SharedUserStore, request: Request<Body>) -> Response<Body> {
        user_router(store.clone()).oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_list_users_empty_is_500() {
        let store = store_with(vec![]).await;

        let response = send(&store, query_request(Method::GET, USERS_ROUTE)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Error: There are no users\n");
    }

    #[tokio::test]
    async fn test_list_users_returns_json_array() {
        let store = store_with(vec![test_user()]).await;

        let response = send(&store, query_request(Method::GET, USERS_ROUTE)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let users: Vec<User> = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, TEST_EMAIL);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let store = store_with(vec![test_user()]).await;

        let response = send(&store, query_request(Method::GET, "/")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_user() {
        let store = store_with(vec![]).await;
        let body = r#"{"email":"bari@gmail.com","name":"bari","password":"1234"}"#;

        let response = send(&store, json_request(Method::PUT, USER_ROUTE, body)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            "bari@gmail.com added successfully!\n"
        );
        let stored = store.find_user_by_email(TEST_EMAIL).await.unwrap();
        assert_eq!(stored.name, "bari");
        assert_eq!(stored.password, "1234");
    }

    #[tokio::test]
    async fn test_add_user_trims_email() {
        let store = store_with(vec![]).await;
        let body = r#"{"email":" bari@gmail.com ","name":"bari","password":"1234"}"#;

        let response = send(&store, json_request(Method::PUT, USER_ROUTE, body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let found = send(
            &store,
            query_request(Method::GET, "/user?email=bari%40gmail.com"),
        )
        .await;
        assert_eq!(found.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_add_user_bad_requests() {
        let store = store_with(vec![]).await;

        for body in [
            "null",
            "{}",
            r#"{"email":"abc","name":"bari","password":"1234"}"#,
        ] {
            let response = send(&store, json_request(Method::PUT, USER_ROUTE, body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }

        assert_eq!(
            store.get_all_users().await,
            Err(UserError::NoData)
        );
    }

    #[tokio::test]
    async fn test_add_user_wrong_route_is_404() {
        let store = store_with(vec![]).await;
        let body = r#"{"email":"bari@gmail.com","name":"bari","password":"1234"}"#;

        let response = send(&store, json_request(Method::PUT, "/", body)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_user() {
        let store = store_with(vec![test_user()]).await;

        let response = send(
            &store,
            query_request(Method::GET, "/user?email=bari%40gmail.com"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let user: User = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(user.email, TEST_EMAIL);
        assert_eq!(user.name, "bari");
    }

    #[tokio::test]
    async fn test_get_user_from_multipart() {
        let store = store_with(vec![test_user()]).await;
        let body = "--B\r\nContent-Disposition: form-data; name=\"email\"\r\n\r\nbari@gmail.com\r\n--B--\r\n";
        let request = Request::builder()
            .method(Method::GET)
            .uri(USER_ROUTE)
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=B")
            .body(Body::from(body))
            .unwrap();

        let response = send(&store, request).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_user_errors() {
        let store = store_with(vec![test_user()]).await;

        let cases = [
            ("/user", StatusCode::BAD_REQUEST),
            ("/user?email=abc", StatusCode::BAD_REQUEST),
            ("/user?email=a%40gmail.com", StatusCode::NOT_FOUND),
        ];
        for (uri, expected) in cases {
            let response = send(&store, query_request(Method::GET, uri)).await;
            assert_eq!(response.status(), expected, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn test_update_user_keeps_created_at() {
        let mut original = test_user();
        original.created_at = Utc::now() - Duration::days(1);
        let store = store_with(vec![original.clone()]).await;
        let body = r#"{"email":"bari@gmail.com","name":"bari2","password":"12345"}"#;

        let response = send(&store, json_request(Method::POST, USER_ROUTE, body)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            "bari@gmail.com updated successfully!\n"
        );
        let stored = store.find_user_by_email(TEST_EMAIL).await.unwrap();
        assert_eq!(stored.name, "bari2");
        assert_eq!(stored.password, "12345");
        assert_eq!(stored.created_at, original.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_404() {
        let store = store_with(vec![test_user()]).await;
        let body = r#"{"email":"bari@gmail.comabc","name":"bari","password":"1234"}"#;

        let response = send(&store, json_request(Method::POST, USER_ROUTE, body)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let store = store_with(vec![test_user()]).await;

        let response = send(&store, form_request(Method::DELETE, "bari%40gmail.com")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            "bari@gmail.com deleted successfully!\n"
        );

        let again = send(&store, form_request(Method::DELETE, "bari%40gmail.com")).await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user_bad_requests() {
        let store = store_with(vec![test_user()]).await;

        for email in ["", "abc"] {
            let response = send(&store, form_request(Method::DELETE, email)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "email: {email}");
        }

        assert!(store.find_user_by_email(TEST_EMAIL).await.is_ok());
    }

    /// Store whose lookups take a fixed time, to observe request overlap
    struct SlowStore;

    const LOOKUP_DELAY: std::time::Duration = std::time::Duration::from_millis(200);

    #[async_trait::async_trait]
    impl UserStore for SlowStore {
        async fn init(&self) -> Result<(), UserError> {
            Ok(())
        }

        async fn get_all_users(&self) -> Result<Vec<User>, UserError> {
            Err(UserError::NoData)
        }

        async fn delete_user(&self, _email: &str) -> Result<(), UserError> {
            Err(UserError::NotFound)
        }

        async fn insert_new_user(&self, _user: User) -> Result<(), UserError> {
            Ok(())
        }

        async fn update_user(&self, _user: User) -> Result<(), UserError> {
            Err(UserError::NotFound)
        }

        async fn find_user_by_email(&self, email: &str) -> Result<User, UserError> {
            tokio::time::sleep(LOOKUP_DELAY).await;
            Ok(User::new(email.to_string(), "n".to_string(), "p".to_string()))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_lookups_overlap() {
        let store = shared_store(SlowStore);
        let started = std::time::Instant::now();

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let app = user_router(store.clone());
                tokio::spawn(async move {
                    app.oneshot(query_request(Method::GET, "/user?email=a%40b.com"))
                        .await
                        .unwrap()
                        .status()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        let elapsed = started.elapsed();
        assert!(
            elapsed < LOOKUP_DELAY * 3,
            "5 lookups of {LOOKUP_DELAY:?} took {elapsed:?}"
        );
    }
}
