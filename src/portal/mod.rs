//! Job and job-application operations.
//!
//! [`PortalService`] is the only thing the HTTP handlers call. It converts
//! between client JSON and stored documents and performs the read-time
//! enrichment of applications (see [`mod@enrich`]).

pub mod enrich;
mod service;

pub use enrich::{enrich, job_reference, ENRICHED_FIELDS, JOB_REFERENCE_FIELD};
pub use service::{PortalService, APPLICANT_EMAIL_FIELD};
