//! Core type definitions using newtype patterns for type safety.
//!
//! Targets are validated once, before a scan starts, so the engine never
//! sees a malformed base URL or domain.

mod candidate;
mod scan_id;
mod target;

pub use candidate::Candidate;
pub use scan_id::{ScanId, ScanIdError};
pub use target::{BaseUrl, Domain, TargetError};
