//! Job application integration tests.
//!
//! Tests verify:
//! - Listing is restricted to the session's own email
//! - Listed applications are enriched from their referenced job
//! - Applications whose job is gone are returned unenriched
//! - Deletion by id

use axum::http::StatusCode;
use mongodb::bson::{doc, oid::ObjectId};
use serde_json::json;

use job_portal::store::Collection;

use super::test_utils::{
    body_json, delete, get_with_cookie, login, post_json, send, test_router, MockStore,
};

// =============================================================================
// Ownership
// =============================================================================

#[tokio::test]
async fn test_list_own_applications() {
    let store = MockStore::new();
    let router = test_router(store.clone());

    store
        .seed(
            Collection::JobApplications,
            doc! { "applicantEmail": "a@x.com", "resume": "cv-a.pdf" },
        )
        .await;
    store
        .seed(
            Collection::JobApplications,
            doc! { "applicantEmail": "b@x.com", "resume": "cv-b.pdf" },
        )
        .await;

    let cookie = login(&router, "a@x.com").await;
    let response = send(
        &router,
        get_with_cookie("/jobApplications?email=a@x.com", &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let applications = body.as_array().unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["applicantEmail"], "a@x.com");
    assert_eq!(applications[0]["resume"], "cv-a.pdf");
}

#[tokio::test]
async fn test_list_other_email_forbidden() {
    let store = MockStore::new();
    let router = test_router(store.clone());

    store
        .seed(
            Collection::JobApplications,
            doc! { "applicantEmail": "b@x.com" },
        )
        .await;

    let cookie = login(&router, "a@x.com").await;
    let response = send(
        &router,
        get_with_cookie("/jobApplications?email=b@x.com", &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["error"], "forbidden");
    assert_eq!(body["status"], 403);
}

#[tokio::test]
async fn test_list_without_email_param_forbidden() {
    let router = test_router(MockStore::new());

    let cookie = login(&router, "a@x.com").await;
    let response = send(&router, get_with_cookie("/jobApplications", &cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_session_without_email_forbidden() {
    let router = test_router(MockStore::new());

    let response = send(&router, post_json("/jwt", json!({ "name": "Ada" }))).await;
    let cookie = super::test_utils::set_cookie(&response).unwrap();
    let cookie = cookie.split(';').next().unwrap();

    let response = send(
        &router,
        get_with_cookie("/jobApplications?email=a@x.com", cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_empty_for_new_applicant() {
    let router = test_router(MockStore::new());

    let cookie = login(&router, "new@x.com").await;
    let response = send(
        &router,
        get_with_cookie("/jobApplications?email=new@x.com", &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

// =============================================================================
// Enrichment
// =============================================================================

#[tokio::test]
async fn test_applications_enriched_from_job() {
    let store = MockStore::new();
    let router = test_router(store.clone());

    let ack = body_json(
        send(
            &router,
            post_json(
                "/jobs",
                json!({
                    "title": "Backend Engineer",
                    "company": "Acme",
                    "location": "Remote",
                    "company_logo": "https://acme.example/logo.png",
                    "salary": 100000,
                }),
            ),
        )
        .await,
    )
    .await;
    let job_id = ack["insertedId"].as_str().unwrap().to_string();

    let response = send(
        &router,
        post_json(
            "/jobApplications",
            json!({
                "applicantEmail": "a@x.com",
                "jobId": job_id,
                "title": "stale title",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = login(&router, "a@x.com").await;
    let body = body_json(
        send(
            &router,
            get_with_cookie("/jobApplications?email=a@x.com", &cookie),
        )
        .await,
    )
    .await;

    let application = &body[0];
    assert_eq!(application["jobId"], job_id.as_str());
    assert_eq!(application["title"], "Backend Engineer");
    assert_eq!(application["company"], "Acme");
    assert_eq!(application["location"], "Remote");
    assert_eq!(application["company_logo"], "https://acme.example/logo.png");
    // Only the display fields are copied
    assert!(application.get("salary").is_none());

    // Enrichment is read-time only
    let stored = store.documents(Collection::JobApplications).await;
    assert_eq!(stored[0].get_str("title").unwrap(), "stale title");
    assert!(stored[0].get("company").is_none());
}

#[tokio::test]
async fn test_enrichment_looks_up_each_application() {
    let store = MockStore::new();
    let router = test_router(store.clone());

    let job_id = store
        .seed(Collection::Jobs, doc! { "title": "Engineer" })
        .await;
    for _ in 0..3 {
        store
            .seed(
                Collection::JobApplications,
                doc! { "applicantEmail": "a@x.com", "jobId": job_id.to_hex() },
            )
            .await;
    }

    let cookie = login(&router, "a@x.com").await;
    let body = body_json(
        send(
            &router,
            get_with_cookie("/jobApplications?email=a@x.com", &cookie),
        )
        .await,
    )
    .await;

    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(store.find_by_id_count(), 3);
    for application in body.as_array().unwrap() {
        assert_eq!(application["title"], "Engineer");
    }
}

#[tokio::test]
async fn test_application_for_missing_job_left_unenriched() {
    let store = MockStore::new();
    let router = test_router(store.clone());

    store
        .seed(
            Collection::JobApplications,
            doc! {
                "applicantEmail": "a@x.com",
                "jobId": ObjectId::new().to_hex(),
                "title": "as submitted",
            },
        )
        .await;
    store
        .seed(
            Collection::JobApplications,
            doc! { "applicantEmail": "a@x.com", "jobId": "not-an-id" },
        )
        .await;

    let cookie = login(&router, "a@x.com").await;
    let response = send(
        &router,
        get_with_cookie("/jobApplications?email=a@x.com", &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let applications = body.as_array().unwrap();
    assert_eq!(applications.len(), 2);
    assert_eq!(applications[0]["title"], "as submitted");
    assert!(applications[0].get("company").is_none());
    assert_eq!(applications[1]["jobId"], "not-an-id");
}

#[tokio::test]
async fn test_enrichment_drops_fields_job_lacks() {
    let store = MockStore::new();
    let router = test_router(store.clone());

    let job_id = store
        .seed(Collection::Jobs, doc! { "title": "Engineer", "company": "Acme" })
        .await;
    store
        .seed(
            Collection::JobApplications,
            doc! {
                "applicantEmail": "a@x.com",
                "jobId": job_id.to_hex(),
                "location": "submitted location",
            },
        )
        .await;

    let cookie = login(&router, "a@x.com").await;
    let body = body_json(
        send(
            &router,
            get_with_cookie("/jobApplications?email=a@x.com", &cookie),
        )
        .await,
    )
    .await;

    assert_eq!(body[0]["company"], "Acme");
    assert!(body[0].get("location").is_none());
    assert!(body[0].get("company_logo").is_none());
}

// =============================================================================
// Deletion
// =============================================================================

#[tokio::test]
async fn test_delete_application() {
    let store = MockStore::new();
    let router = test_router(store.clone());

    let ack = body_json(
        send(
            &router,
            post_json("/jobApplications", json!({ "applicantEmail": "a@x.com" })),
        )
        .await,
    )
    .await;
    let id = ack["insertedId"].as_str().unwrap().to_string();

    let response = send(&router, delete(&format!("/jobApplications/{}", id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "acknowledged": true, "deletedCount": 1 })
    );

    let cookie = login(&router, "a@x.com").await;
    let body = body_json(
        send(
            &router,
            get_with_cookie("/jobApplications?email=a@x.com", &cookie),
        )
        .await,
    )
    .await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_delete_unknown_application() {
    let router = test_router(MockStore::new());

    let response = send(
        &router,
        delete(&format!("/jobApplications/{}", ObjectId::new().to_hex())),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deletedCount"], 0);
}

#[tokio::test]
async fn test_delete_malformed_id_returns_400() {
    let router = test_router(MockStore::new());

    let response = send(&router, delete("/jobApplications/xyz")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_id");
}

#[tokio::test]
async fn test_delete_needs_no_session() {
    let store = MockStore::new();
    let router = test_router(store.clone());

    let id = store
        .seed(
            Collection::JobApplications,
            doc! { "applicantEmail": "b@x.com" },
        )
        .await;

    let response = send(&router, delete(&format!("/jobApplications/{}", id.to_hex()))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(store
        .documents(Collection::JobApplications)
        .await
        .is_empty());
}
