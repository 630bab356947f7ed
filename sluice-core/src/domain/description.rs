//! Description domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::CodecError;

/// Maximum length of a stored description, in characters
pub const MAX_DESCRIPTION_LEN: usize = 22_550;

/// Durable record of an original pipeline submission
///
/// Holds the submitted request text verbatim. Restart rebuilds the stage
/// list from this text, so it is never rewritten once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Description {
    /// Creates a description with a fresh identity
    ///
    /// Fails if the text exceeds [`MAX_DESCRIPTION_LEN`] characters.
    pub fn new(text: impl Into<String>) -> Result<Self, CodecError> {
        let text = text.into();
        let len = text.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(CodecError::DescriptionTooLong {
                len,
                max: MAX_DESCRIPTION_LEN,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            text,
            created_at: Utc::now(),
        })
    }
}
