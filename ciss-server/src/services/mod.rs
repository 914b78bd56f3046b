//! Service Layer
//!
//! Domain services behind the API handlers:
//! - [`employee_id`] - registry id generation (client abbreviation + financial year)
//! - [`searchable`] - search token derivation for the directory
//! - [`storage`] - local blob store for uploaded documents
//! - [`qr`] - identity QR generation
//! - [`pdf`] - profile kit rendering
//! - [`verification`] - external AI document verification

pub mod employee_id;
pub mod pdf;
pub mod qr;
pub mod searchable;
pub mod storage;
pub mod verification;

pub use storage::BlobStore;
pub use verification::DocumentVerifier;
