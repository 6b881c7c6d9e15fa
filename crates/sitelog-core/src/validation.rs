use serde::{Deserialize, Serialize};

/// Outcome of a validator that can fail for a human-facing reason.
///
/// The message is present exactly when the result is a rejection. Fields are
/// private so the only ways in are [`ValidationResult::valid`],
/// [`ValidationResult::invalid`] and deserialization, which enforces the same rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawValidationResult")]
pub struct ValidationResult {
    is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawValidationResult {
    is_valid: bool,
    #[serde(default)]
    message: Option<String>,
}

impl TryFrom<RawValidationResult> for ValidationResult {
    type Error = String;

    fn try_from(raw: RawValidationResult) -> Result<Self, Self::Error> {
        match (raw.is_valid, raw.message) {
            (true, None) => Ok(Self::valid()),
            (false, Some(message)) => Ok(Self::invalid(message)),
            (true, Some(_)) => Err("an accepted result cannot carry a message".to_string()),
            (false, None) => Err("a rejected result must carry a message".to_string()),
        }
    }
}

impl ValidationResult {
    /// Creates an accepting result.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    /// Creates a rejecting result carrying the reason.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }

    /// Whether the input was accepted.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Returns the rejection reason, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
