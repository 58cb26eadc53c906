//! The inline order form.
//!
//! The form is split the same way the rest of the crate is: a pure
//! [`FormDescription`] decides what the form looks like for a given prefill
//! and mode, and a [`FormBlock`] is one live, independently editable instance
//! of that description sitting in the transcript.

mod block;
mod description;
mod payload;
mod prefill;

pub use block::FormBlock;
pub use block::SubmitControl;
pub use description::FormDescription;
pub use description::OptionKind;
pub use description::ProductField;
pub use description::ProductOption;
pub use description::ProductSelector;
pub use description::TextField;
pub use description::TextInputKind;
pub use payload::SUBMISSION_PREFIX;
pub use payload::SubmissionPayload;
pub use payload::parse_quantity;
pub use prefill::FormPrefill;

use serde::Deserialize;
use serde::Deserializer;
use std::fmt;

/// Identity of a rendered form block, unique within one transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormId(pub u64);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "form-{}", self.0)
    }
}

/// Whether the form collects details or asks the user to confirm an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Edit,
    Confirm,
}

impl FormMode {
    /// `"confirm"` selects confirm mode; anything else is edit.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("confirm") => FormMode::Confirm,
            _ => FormMode::Edit,
        }
    }

    pub fn is_confirm(self) -> bool {
        matches!(self, FormMode::Confirm)
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            FormMode::Edit => "Send Details",
            FormMode::Confirm => "Confirm Order",
        }
    }

    pub fn submitted_label(self) -> &'static str {
        match self {
            FormMode::Edit => "Sent!",
            FormMode::Confirm => "Confirmed!",
        }
    }
}

impl<'de> Deserialize<'de> for FormMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(FormMode::parse(raw.as_ref().and_then(|v| v.as_str())))
    }
}

/// Field keys shared by the prefill state and the submission payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    FullName,
    Email,
    Phone,
    Address,
    ProductInterest,
    Quantity,
}

impl FieldKey {
    pub const ALL: [FieldKey; 6] = [
        FieldKey::FullName,
        FieldKey::Email,
        FieldKey::Phone,
        FieldKey::Address,
        FieldKey::ProductInterest,
        FieldKey::Quantity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::FullName => "full_name",
            FieldKey::Email => "email",
            FieldKey::Phone => "phone",
            FieldKey::Address => "address",
            FieldKey::ProductInterest => "product_interest",
            FieldKey::Quantity => "quantity",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FieldKey::FullName => "Full Name",
            FieldKey::Email => "Email",
            FieldKey::Phone => "Phone",
            FieldKey::Address => "Address",
            FieldKey::ProductInterest => "Select Product",
            FieldKey::Quantity => "Qty",
        }
    }
}

/// Errors raised when a submit action cannot start.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0} has already been submitted")]
    AlreadySubmitted(FormId),

    #[error("{0} is not in the transcript")]
    UnknownForm(FormId),

    #[error("failed to encode submission: {0}")]
    Encode(#[from] serde_json::Error),
}
