//! Portal service: the data operations behind every route.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::PortalError;
use crate::store::{
    document_from_json, document_to_json, parse_object_id, Collection, DeleteAck, DocumentStore,
    InsertAck,
};

use super::enrich::{enrich, job_reference};

/// Field on an application holding the applicant's email.
pub const APPLICANT_EMAIL_FIELD: &str = "applicantEmail";

/// Jobs and job applications over a shared document store.
///
/// Every method issues a single store call, except
/// [`applications_for`](Self::applications_for) which additionally looks up
/// each application's job, one query per application.
pub struct PortalService<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> PortalService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Jobs
    // -------------------------------------------------------------------------

    pub async fn create_job(&self, job: Map<String, Value>) -> Result<InsertAck, PortalError> {
        let document = document_from_json(job)?;
        Ok(self.store.insert(Collection::Jobs, document).await?)
    }

    pub async fn list_jobs(&self) -> Result<Vec<Value>, PortalError> {
        let jobs = self.store.find_all(Collection::Jobs).await?;
        Ok(jobs.into_iter().map(document_to_json).collect())
    }

    /// Fetch one job by its hex id. Unknown ids yield `None`.
    pub async fn get_job(&self, id: &str) -> Result<Option<Value>, PortalError> {
        let id = parse_object_id(id)?;
        let job = self.store.find_by_id(Collection::Jobs, &id).await?;
        Ok(job.map(document_to_json))
    }

    // -------------------------------------------------------------------------
    // Applications
    // -------------------------------------------------------------------------

    pub async fn create_application(
        &self,
        application: Map<String, Value>,
    ) -> Result<InsertAck, PortalError> {
        let document = document_from_json(application)?;
        Ok(self
            .store
            .insert(Collection::JobApplications, document)
            .await?)
    }

    /// List the applications submitted under `requested_email`, enriched with
    /// their jobs' display fields.
    ///
    /// `session_email` is the email from the caller's verified session. Both
    /// must be present and equal, otherwise the call fails with
    /// [`PortalError::Forbidden`] before touching the store.
    pub async fn applications_for(
        &self,
        session_email: Option<&str>,
        requested_email: Option<&str>,
    ) -> Result<Vec<Value>, PortalError> {
        let email = match (session_email, requested_email) {
            (Some(session), Some(requested)) if session == requested => requested,
            _ => return Err(PortalError::Forbidden),
        };

        let mut applications = self
            .store
            .find_by_field(Collection::JobApplications, APPLICANT_EMAIL_FIELD, email)
            .await?;

        let mut enriched = 0usize;
        for application in applications.iter_mut() {
            let Some(job_id) = job_reference(application) else {
                continue;
            };
            if let Some(job) = self.store.find_by_id(Collection::Jobs, &job_id).await? {
                enrich(application, &job);
                enriched += 1;
            }
        }

        debug!(
            count = applications.len(),
            enriched, "Listed job applications"
        );

        Ok(applications.into_iter().map(document_to_json).collect())
    }

    pub async fn delete_application(&self, id: &str) -> Result<DeleteAck, PortalError> {
        let id = parse_object_id(id)?;
        Ok(self
            .store
            .delete_by_id(Collection::JobApplications, &id)
            .await?)
    }
}

impl<S: DocumentStore> Clone for PortalService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
