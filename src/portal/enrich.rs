//! Read-time enrichment of job applications.
//!
//! Applications store only a `jobId`. When listing them, a few display fields
//! are copied from the referenced job. The copied values are never written
//! back.

use mongodb::bson::{oid::ObjectId, Bson, Document};

/// Field on an application that references its job.
pub const JOB_REFERENCE_FIELD: &str = "jobId";

/// Job fields copied onto an application when it is listed.
pub const ENRICHED_FIELDS: [&str; 4] = ["title", "company", "location", "company_logo"];

/// Extract the referenced job id from an application.
///
/// Returns `None` when the reference is missing, has an unexpected type, or
/// is not a valid ObjectId. Callers treat all of these as "job absent".
pub fn job_reference(application: &Document) -> Option<ObjectId> {
    match application.get(JOB_REFERENCE_FIELD)? {
        Bson::String(id) => ObjectId::parse_str(id).ok(),
        Bson::ObjectId(id) => Some(*id),
        _ => None,
    }
}

/// Copy the enriched fields from `job` onto `application`.
///
/// A field the job lacks is removed from the application, so the response
/// always reflects the job and never a stale client-submitted value.
pub fn enrich(application: &mut Document, job: &Document) {
    for field in ENRICHED_FIELDS {
        match job.get(field) {
            Some(value) => {
                application.insert(field, value.clone());
            }
            None => {
                application.remove(field);
            }
        }
    }
}
