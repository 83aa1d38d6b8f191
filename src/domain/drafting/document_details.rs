//! Details confirmed by the user for a drafted document.
//!
//! The extractor only proposes values. The user corrects them and ticks them
//! as verified; export is held back until then.

use serde::{Deserialize, Serialize};

use crate::domain::document::{DetailField, ExtractedDetails};
use crate::domain::foundation::DomainError;

/// Document details as last confirmed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDetails {
    pub details: ExtractedDetails,
    pub verified: bool,
}

impl DocumentDetails {
    /// Extractor output nobody has looked at yet.
    pub fn proposed(details: ExtractedDetails) -> Self {
        Self {
            details,
            verified: false,
        }
    }

    /// Details submitted by the user.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` if `verified` is set while a field is blank.
    pub fn confirmed(details: ExtractedDetails, verified: bool) -> Result<Self, DomainError> {
        if verified {
            if let Some(field) = DetailField::ALL
                .into_iter()
                .find(|field| details.get(*field).trim().is_empty())
            {
                return Err(DomainError::validation(
                    field.key(),
                    format!("{} cannot be blank in verified details", field),
                ));
            }
        }
        Ok(Self { details, verified })
    }

    /// Withdraws verification, keeping the values.
    pub fn revoke(&mut self) {
        self.verified = false;
    }
}
