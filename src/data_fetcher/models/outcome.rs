use crate::error::AppError;

/// Result of a single data source fetch.
///
/// A failed outcome carries only the reason; there is no payload to write.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Success { data: T },
    Failure { reason: String },
}

impl<T> FetchOutcome<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Payload of a successful fetch
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Failure reason of an unsuccessful fetch
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}

impl<T> From<Result<T, AppError>> for FetchOutcome<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}
