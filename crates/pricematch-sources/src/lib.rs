pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{SourceClient, SubmitReceipt};
pub use error::SourceError;
pub use normalize::{normalize_candidates, normalize_detail};
