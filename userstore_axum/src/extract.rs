use axum::{
    Json,
    extract::{Form, FromRequest, Multipart, Query, Request},
};
use http::{StatusCode, header};
use serde::Deserialize;
use validator::ValidateEmail;

use userstore::User;

/// Name of the form field carrying the email
pub const EMAIL_FIELD: &str = "email";

const MISSING_EMAIL: &str = "Please add an email to the form-data request\n";
const MISSING_USER_FIELDS: &str = "Please try again and enter email, username and password\n";

type Rejection = (StatusCode, String);

fn bad_request(e: impl std::fmt::Display) -> Rejection {
    (StatusCode::BAD_REQUEST, format!("{e}\n"))
}

fn check_email(email: &str) -> Result<(), Rejection> {
    if email.is_empty() {
        return Err((StatusCode::BAD_REQUEST, MISSING_EMAIL.to_string()));
    }
    if !email.validate_email() {
        return Err(bad_request(format!("Invalid email address: {email}")));
    }
    Ok(())
}

#[derive(Deserialize, Default)]
struct EmailForm {
    #[serde(default)]
    email: String,
}

/// A syntactically valid email taken from the request.
///
/// Read from a `multipart/form-data` body, an urlencoded body, or the query
/// string, in that order of preference depending on the content type.
#[derive(Debug)]
pub struct EmailField(pub String);

impl<S> FromRequest<S> for EmailField
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let email = if content_type.starts_with("multipart/form-data") {
            email_from_multipart(req, state).await?
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(form) = Form::<EmailForm>::from_request(req, state)
                .await
                .map_err(bad_request)?;
            form.email
        } else {
            let Query(form) = Query::<EmailForm>::try_from_uri(req.uri()).map_err(bad_request)?;
            form.email
        };

        let email = email.trim().to_string();
        check_email(&email)?;
        Ok(EmailField(email))
    }
}

async fn email_from_multipart<S>(req: Request, state: &S) -> Result<String, Rejection>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(bad_request)?;

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        if field.name() == Some(EMAIL_FIELD) {
            return field.text().await.map_err(bad_request);
        }
    }

    Ok(String::new())
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct UserPayload {
    email: String,
    name: String,
    password: String,
}

/// A complete user parsed from a JSON body, stamped with the current time.
/// The email is trimmed the same way as [`EmailField`].
#[derive(Debug)]
pub struct ValidUser(pub User);

impl<S> FromRequest<S> for ValidUser
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<UserPayload>::from_request(req, state)
            .await
            .map_err(|e| bad_request(format!("Invalid JSON body: {}", e.body_text())))?;

        let email = payload.email.trim().to_string();
        if email.is_empty() || payload.name.is_empty() || payload.password.is_empty() {
            return Err((StatusCode::BAD_REQUEST, MISSING_USER_FIELDS.to_string()));
        }
        check_email(&email)?;

        Ok(ValidUser(User::new(email, payload.name, payload.password)))
    }
}
