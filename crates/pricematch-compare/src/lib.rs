//! The comparison controller: per-source search/selection state, derived price
//! comparisons, and the main-record editing workflow.
//!
//! [`ControllerState::handle`] is a pure transition from an [`Event`] to a list
//! of [`Effect`]s. [`Runtime`] performs the I/O effects and feeds completions
//! back in as events.

mod derive;
pub mod effect;
pub mod error;
pub mod event;
pub mod runtime;
pub mod state;

pub use effect::{CandidateOption, CopyButton, Effect, FormAction, View};
pub use error::CompareError;
pub use event::{Event, FetchFailure};
pub use runtime::{Renderer, Runtime};
pub use state::ControllerState;
