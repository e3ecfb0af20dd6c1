use pricematch_core::{Candidate, MainField, MainRecord, SelectedProduct};
use pricematch_sources::SourceError;
use rust_decimal::Decimal;

use crate::effect::FormAction;

/// Everything the controller reacts to: user actions and request completions.
#[derive(Debug, Clone)]
pub enum Event {
    /// Install the record being curated and capture its initial snapshot.
    Load(MainRecord),
    Search(String),
    SearchCompleted {
        source: String,
        generation: u64,
        result: Result<Vec<Candidate>, FetchFailure>,
    },
    /// An empty identifier deselects.
    Select {
        source: String,
        identifier: String,
    },
    DetailCompleted {
        source: String,
        generation: u64,
        selection: u64,
        result: Result<SelectedProduct, FetchFailure>,
    },
    EditField {
        field: MainField,
        value: String,
    },
    /// Copy one field from a source's selected product into the main record.
    CopyField {
        source: String,
        field: MainField,
    },
    /// Copy the average or selected price, adjusted by `percentage` (the
    /// configured markup when `None`).
    CopyPrice {
        percentage: Option<Decimal>,
    },
    AdjustPrice {
        base: Decimal,
        percentage: Decimal,
    },
    Submit(FormAction),
    SubmitCompleted {
        action: FormAction,
        record: MainRecord,
        result: Result<(), FetchFailure>,
    },
    Revert,
}

/// A failed request, reduced to what the controller shows and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Message supplied by the server in an unsuccessful envelope.
    pub message: Option<String>,
    /// `true` when the transport or payload failed rather than the server
    /// answering `"success": false`.
    pub transport: bool,
    pub detail: String,
}

impl FetchFailure {
    /// An unsuccessful envelope.
    #[must_use]
    pub fn rejected(message: Option<&str>) -> Self {
        Self {
            message: message.map(str::to_string),
            transport: false,
            detail: message.unwrap_or("request was not successful").to_string(),
        }
    }

    /// A transport-level failure.
    #[must_use]
    pub fn transport(detail: impl Into<String>) -> Self {
        Self {
            message: None,
            transport: true,
            detail: detail.into(),
        }
    }
}

impl From<&SourceError> for FetchFailure {
    fn from(err: &SourceError) -> Self {
        Self {
            message: err.server_message().map(str::to_string),
            transport: err.is_transport(),
            detail: err.to_string(),
        }
    }
}
