//! Gateway error types.

/// Errors from the routing/search gateway.
///
/// These never escape the gateway's dispatch boundary uncaught: settlement
/// turns them into failure actions carrying [`user_message`].
///
/// [`user_message`]: GatewayError::user_message
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized.
    #[error("response parse error: {message}")]
    Json { message: String },

    /// A required location reference was missing before issuing the request.
    #[error("missing {0} location reference")]
    MissingLocation(&'static str),
}

impl GatewayError {
    /// A message suitable for showing to the user in a dismissible error.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Network(_) => {
                "Could not reach the routing service. Please try again.".to_string()
            }
            GatewayError::Api { status, .. } => {
                format!("The routing service returned an error (status {status}).")
            }
            GatewayError::Json { .. } => {
                "The routing service returned an unexpected response.".to_string()
            }
            GatewayError::MissingLocation(which) => format!(
                "The {which} location is missing. Please select locations from the search results."
            ),
        }
    }
}
