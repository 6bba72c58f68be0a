use thiserror::Error;

/// Fixed copy shown to end users on any upstream fetch failure. Deliberately
/// generic: status codes and scraping-detection detail stay in the logs.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "This often happens when a website's code is \
formatted incorrectly. We've automatically recorded this incident so we can fix it.";

/// Errors that can occur during recipe extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Network-level failure while fetching the page
    #[error("failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The fetch exceeded its deadline
    #[error("request timed out")]
    Timeout,

    /// The upstream site answered with a non-2xx status
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    /// Neither the structured-data nor the heuristic extractor found anything
    #[error("no recipe data found")]
    NoRecipeData,

    /// Output serialization failure
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ExtractError {
    /// Plain, non-technical message safe to surface to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExtractError::Fetch(_)
            | ExtractError::Timeout
            | ExtractError::UpstreamStatus(_) => UPSTREAM_FAILURE_MESSAGE,
            ExtractError::NoRecipeData => "No recipe data found",
            ExtractError::Serialize(_) => "Something went wrong on our side. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_errors_share_generic_message() {
        assert_eq!(
            ExtractError::Timeout.user_message(),
            ExtractError::UpstreamStatus(403).user_message()
        );
        assert_eq!(
            ExtractError::UpstreamStatus(403).user_message(),
            UPSTREAM_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_no_data_message() {
        assert_eq!(
            ExtractError::NoRecipeData.user_message(),
            "No recipe data found"
        );
    }

    #[test]
    fn test_status_preserved_internally() {
        // Internal display keeps the status for logs even though the user
        // message does not.
        let err = ExtractError::UpstreamStatus(403);
        assert!(err.to_string().contains("403"));
        assert!(!err.user_message().contains("403"));
    }

    #[test]
    fn test_serialize_error_has_internal_copy() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ExtractError::from(json_err);
        assert_eq!(
            err.user_message(),
            "Something went wrong on our side. Please try again."
        );
    }
}
