use http::StatusCode;
use userstore::UserError;

/// Helper trait for converting store results into an HTTP status and message
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// `NotFound` becomes 404; every other store failure is a 500
impl<T> IntoResponseError<T> for Result<T, UserError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                UserError::NotFound => StatusCode::NOT_FOUND,
                UserError::NoData
                | UserError::Storage(_)
                | UserError::Connection(_)
                | UserError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            if status.is_server_error() {
                tracing::error!(error = %e, "User store operation failed");
            }
            (status, format!("Error: {e}\n"))
        })
    }
}
