//! Classified error taxonomy shared by the fetch layer and every renderer.

use thiserror::Error;

/// Preview-subsystem error, classified once at the fetch boundary and carried
/// unchanged through the renderers.
///
/// Display strings are the user-facing messages the host page shows directly;
/// renderers must not re-wrap them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// HTTP 404 from the backend.
    #[error("File not found - it may have been deleted")]
    NotFound,
    /// HTTP 403 from the backend.
    #[error("You don't have permission to view this file")]
    Forbidden,
    /// HTTP 500 from the backend.
    #[error("Service unavailable - please try again later")]
    ServiceUnavailable,
    /// Any other non-2xx HTTP status.
    #[error("{message}")]
    Http {
        /// Raw HTTP status code.
        status: u16,
        /// Human-readable message for the status.
        message: String,
    },
    /// Transport failure before any HTTP status was produced.
    #[error("Network error - unable to connect to server")]
    Network,
    /// Payload arrived but is not what the renderer expected.
    #[error("{0}")]
    Format(String),
    /// An optional capability (highlighting library) failed to load.
    #[error("{0}")]
    CapabilityLoad(String),
    /// `render` was called without a container element.
    #[error("Container element is required")]
    MissingContainer,
}

impl PreviewError {
    /// Classifies a non-2xx HTTP status into the taxonomy.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            403 => Self::Forbidden,
            500 => Self::ServiceUnavailable,
            other => Self::Http {
                status: other,
                message: format!("Failed to load file (HTTP {other})"),
            },
        }
    }

    /// Returns the HTTP status this error was classified from, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound => Some(404),
            Self::Forbidden => Some(403),
            Self::ServiceUnavailable => Some(500),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the Office renderer may recover from this error in place.
    ///
    /// Conversion-class errors (anything rooted in fetching or converting the
    /// document) degrade to an inline fallback panel. Configuration errors and
    /// capability-load failures rethrow to the host page.
    pub fn is_conversion_error(&self) -> bool {
        !matches!(self, Self::MissingContainer | Self::CapabilityLoad(_))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_templates_match_user_facing_copy() {
        assert_eq!(
            PreviewError::from_status(404).to_string(),
            "File not found - it may have been deleted"
        );
        assert_eq!(
            PreviewError::from_status(403).to_string(),
            "You don't have permission to view this file"
        );
        assert_eq!(
            PreviewError::from_status(500).to_string(),
            "Service unavailable - please try again later"
        );
        assert_eq!(
            PreviewError::from_status(502).to_string(),
            "Failed to load file (HTTP 502)"
        );
    }

    #[test]
    fn classified_errors_round_trip_their_status() {
        assert_eq!(PreviewError::from_status(404).status(), Some(404));
        assert_eq!(PreviewError::from_status(418).status(), Some(418));
        assert_eq!(PreviewError::Network.status(), None);
        assert_eq!(PreviewError::Format("bad".into()).status(), None);
    }

    #[test]
    fn conversion_class_excludes_configuration_and_capability_errors() {
        assert!(PreviewError::NotFound.is_conversion_error());
        assert!(PreviewError::Network.is_conversion_error());
        assert!(PreviewError::Format("x".into()).is_conversion_error());
        assert!(!PreviewError::MissingContainer.is_conversion_error());
        assert!(!PreviewError::CapabilityLoad("x".into()).is_conversion_error());
    }
}
