use thiserror::Error;

#[derive(Error, Debug)]
pub enum GovconError {
    #[error("Invalid URL: {0}")]
    Url(String),
    /// The request never produced a response (backend down, DNS, timeout).
    #[error("No response received: {0}")]
    Request(String),
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("ParsingError: {0}")]
    Parsing(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl GovconError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GovconError::Status { status, .. } => Some(*status),
            GovconError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Text to show inline: the server's own message when it sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GovconError::Status { message, .. } if !message.trim().is_empty() => {
                message.trim().to_string()
            }
            GovconError::NotFound(what) => format!("{} not found", what),
            _ => fallback.to_string(),
        }
    }

    /// Hint logged alongside a failure to point at the likely culprit.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            GovconError::Request(_) => {
                Some("This usually means the backend is not running or is unreachable")
            }
            GovconError::Status { status: 404, .. } | GovconError::NotFound(_) => {
                Some("API endpoint not found. Check that the backend route exists")
            }
            GovconError::Status { status, .. } if *status >= 500 => {
                Some("Server error. Check backend logs for details")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_text_wins_over_fallback() {
        let err = GovconError::Status {
            status: 400,
            message: "Funded value exceeds total value".to_string(),
        };
        assert_eq!(
            err.user_message("Failed to update funding"),
            "Funded value exceeds total value"
        );
    }

    #[test]
    fn empty_body_uses_fallback() {
        let err = GovconError::Status {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message("Failed to load contracts"), "Failed to load contracts");
        assert!(err.hint().is_some());

        let err = GovconError::Request("connection refused".to_string());
        assert_eq!(err.user_message("Failed to load contracts"), "Failed to load contracts");
        assert_eq!(err.status(), None);
    }
}
