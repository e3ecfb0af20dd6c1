use pricematch_core::{MainField, MainRecord, SelectedProduct, SourceConfig, Tone};
use rust_decimal::Decimal;

/// Output of a state transition: something to draw, or a request to make.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Render(View),
    Search {
        source: SourceConfig,
        term: String,
        generation: u64,
    },
    FetchDetail {
        source: SourceConfig,
        identifier: String,
        generation: u64,
        selection: u64,
    },
    Submit {
        action: FormAction,
        fields: Vec<(&'static str, String)>,
        /// The main record as submitted; echoed back in the completion.
        record: MainRecord,
    },
}

/// Render instructions. Sources are referred to by name.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Alert(String),
    Busy(bool),
    /// Empty the source's list and hide its detail and difference.
    ClearSource(String),
    Candidates {
        source: String,
        options: Vec<CandidateOption>,
    },
    /// The "no products found" placeholder.
    NoProducts(String),
    Detail {
        source: String,
        product: SelectedProduct,
        /// Per-field copy affordances.
        copyable: Vec<(MainField, String)>,
    },
    HideDetail(String),
    Difference {
        source: String,
        text: String,
        tone: Tone,
    },
    HideDifference(String),
    Average(Option<Decimal>),
    CopyButton(CopyButton),
    MainField {
        field: MainField,
        value: String,
    },
    SaveControls {
        visible: bool,
    },
    Submitted {
        action: FormAction,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyButton {
    Hidden,
    CopySelected,
    CopyAverage,
}

impl CopyButton {
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        match self {
            CopyButton::Hidden => None,
            CopyButton::CopySelected => Some("Copy Selected"),
            CopyButton::CopyAverage => Some("Copy Average"),
        }
    }
}

/// Action marker carried by a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Save the curated record.
    Yes,
    /// No retailer product matches this record.
    No,
    Skip,
}

impl FormAction {
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            FormAction::Yes => "yes",
            FormAction::No => "no",
            FormAction::Skip => "skip",
        }
    }
}

impl std::fmt::Display for FormAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.marker())
    }
}
