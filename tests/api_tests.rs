//! End-to-end tests driving the HTTP router.

mod common;

use axum::http::StatusCode;
use common::{ADMIN_EMAIL, ADMIN_PASSWORD, login, reviewer_token, send, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_auth_guards_protected_routes() {
    let (app, _) = spawn_app("api-auth").await;

    let (status, body) = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Authorization header missing or malformed.");

    let (status, body) = send(&app, "GET", "/api/questions", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token.");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials.");

    let (status, body) = send(&app, "POST", "/api/auth/login", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email and password are required.");

    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["role"], "ADMIN");
}

#[tokio::test]
async fn test_reviewer_cannot_create_reviewers() {
    let (app, _) = spawn_app("api-admin-gate").await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (_, reviewer) = reviewer_token(&app, &admin, "rev@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviewers",
        Some(&reviewer),
        Some(json!({ "email": "other@example.com", "password": "long-enough" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden: Insufficient permissions");

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviewers",
        Some(&admin),
        Some(json!({ "email": "rev@example.com", "password": "long-enough" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists.");

    let (status, _) = send(
        &app,
        "POST",
        "/api/reviewers",
        Some(&admin),
        Some(json!({ "email": "short@example.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_resets_reviewer_password() {
    let (app, _) = spawn_app("api-password").await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (id, _) = reviewer_token(&app, &admin, "rev@example.com").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/reviewers/{id}/password"),
        Some(&admin),
        Some(json!({ "newPassword": "a-brand-new-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    login(&app, "rev@example.com", "a-brand-new-secret").await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/reviewers/9999/password",
        Some(&admin),
        Some(json!({ "newPassword": "a-brand-new-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_exit_interview_flow() {
    let (app, _) = spawn_app("api-exit-interview").await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (reviewer_id, reviewer) = reviewer_token(&app, &admin, "rev@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/questions",
        Some(&reviewer),
        Some(json!({ "text": "How was the onboarding?", "type": "RATING" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let q1 = body["data"]["id"].as_i64().unwrap();
    assert!(body["data"]["options"].is_null());

    let (status, body) = send(
        &app,
        "POST",
        "/api/forms",
        Some(&reviewer),
        Some(json!({ "title": "Exit Interview" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let form_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/forms/{form_id}/questions/{q1}"),
        Some(&reviewer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["order"], 0);

    let (status, body) = send(
        &app,
        "POST",
        "/api/feedback-requests",
        Some(&reviewer),
        Some(json!({ "candidateEmail": "a@b.com", "formId": form_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 64);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/feedback-requests?reviewerId={reviewer_id}"),
        Some(&reviewer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["status"], "PENDING");
    assert_eq!(body["data"][0]["form"]["title"], "Exit Interview");

    let uri = format!("/api/feedback-requests/token/{token}");
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["candidateEmail"], "a@b.com");
    assert_eq!(body["data"]["form"]["title"], "Exit Interview");
    assert_eq!(body["data"]["form"]["questions"][0]["id"], q1);
    assert_eq!(body["data"]["form"]["questions"][0]["type"], "RATING");

    let submit_uri = format!("/api/feedback/token/{token}");
    let answers = json!({ "answers": [{ "questionId": q1, "rating": 4 }] });
    let (status, body) = send(&app, "POST", &submit_uri, None, Some(answers.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["answers"][0]["rating"], 4.0);
    let feedback_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "This feedback request has already been submitted."
    );

    let (status, body) = send(&app, "POST", &submit_uri, None, Some(answers)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Feedback already submitted");

    let (status, body) = send(
        &app,
        "GET",
        "/api/feedback-requests?status=SUBMITTED",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["feedback"]["answers"][0]["question"]["id"], q1);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/feedback/{feedback_id}"),
        Some(&reviewer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["feedbackRequest"]["candidateEmail"], "a@b.com");
    assert_eq!(body["data"]["feedbackRequest"]["reviewer"]["id"], reviewer_id);
    assert_eq!(body["data"]["answers"][0]["rating"], 4.0);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/feedback/{feedback_id}"),
        Some(&reviewer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", "/api/feedback-requests", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_issue_on_empty_form_is_rejected() {
    let (app, _) = spawn_app("api-empty-form").await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/forms",
        Some(&admin),
        Some(json!({ "title": "Blank" })),
    )
    .await;
    let form_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/feedback-requests",
        Some(&admin),
        Some(json!({ "candidateEmail": "a@b.com", "formId": form_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Form must contain at least one question before it can be used"
    );

    let (status, body) = send(
        &app,
        "POST",
        "/api/feedback-requests",
        Some(&admin),
        Some(json!({ "candidateEmail": "", "formId": form_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Candidate email and form ID are required.");

    let (status, body) = send(&app, "GET", "/api/feedback-requests", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_owner_cannot_rename_form() {
    let (app, _) = spawn_app("api-forbidden").await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (_, owner) = reviewer_token(&app, &admin, "owner@example.com").await;
    let (_, other) = reviewer_token(&app, &admin, "other@example.com").await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/forms",
        Some(&owner),
        Some(json!({ "title": "Panel Review" })),
    )
    .await;
    let form_id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/forms/{form_id}");

    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(&other),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Panel Review");

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&admin),
        Some(json!({ "title": "Panel Review v2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Panel Review v2");
}

#[tokio::test]
async fn test_bad_input_is_reported_in_envelope() {
    let (app, _) = spawn_app("api-bad-input").await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/questions",
        Some(&admin),
        Some(json!({ "text": "Pick one", "type": "CHECKBOX" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid question type.");

    let (status, body) = send(&app, "GET", "/api/questions?page=0", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, "GET", "/api/forms/abc", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, "GET", "/api/questions/4242", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Question not found");

    let (status, body) = send(&app, "GET", "/api/feedback-requests/token/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid or expired token.");

    let (status, body) = send(
        &app,
        "POST",
        "/api/feedback/token/nope",
        None,
        Some(json!({ "answers": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let (app, _) = spawn_app("api-list").await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    for text in ["Describe TEAMWORK", "Rate the office", "teamwork again"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/questions",
            Some(&admin),
            Some(json!({ "text": text, "type": "TEXT" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/api/questions?search=TeamWork", Some(&admin), None).await;
    let found = body["data"].as_array().unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0]["text"], "teamwork again");

    let (_, body) = send(
        &app,
        "GET",
        "/api/questions?page=2&pageSize=2",
        Some(&admin),
        None,
    )
    .await;
    let page = body["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["text"], "Describe TEAMWORK");

    let (_, body) = send(&app, "GET", "/api/questions?type=RATING", Some(&admin), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_page_beyond_any_offset_is_rejected() {
    let (app, _) = spawn_app("api-huge-page").await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    for uri in [
        "/api/questions?page=10000000000000000&pageSize=1000",
        "/api/forms?page=18446744073709551615&pageSize=1000",
        "/api/feedback-requests?page=18446744073709551615&pageSize=2",
    ] {
        let (status, body) = send(&app, "GET", uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "page is out of range");
    }

    let (status, _) = send(&app, "GET", "/api/system/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_search_terms_match_literally() {
    let (app, _) = spawn_app("api-search-literal").await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    for text in ["plain question", "50% done?", "ÉTÉ holiday", "snake_case naming"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/questions",
            Some(&admin),
            Some(json!({ "text": text, "type": "TEXT" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let texts = |body: serde_json::Value| -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["text"].as_str().unwrap().to_string())
            .collect()
    };

    // `%` and `_` are ordinary characters in a search term.
    let (_, body) = send(&app, "GET", "/api/questions?search=%25", Some(&admin), None).await;
    assert_eq!(texts(body), ["50% done?"]);

    let (_, body) = send(&app, "GET", "/api/questions?search=_", Some(&admin), None).await;
    assert_eq!(texts(body), ["snake_case naming"]);

    // "été", matched against "ÉTÉ holiday".
    let (_, body) = send(
        &app,
        "GET",
        "/api/questions?search=%C3%A9t%C3%A9",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(texts(body), ["ÉTÉ holiday"]);

    for title in ["100% remote", "Onsite"] {
        send(
            &app,
            "POST",
            "/api/forms",
            Some(&admin),
            Some(json!({ "title": title })),
        )
        .await;
    }
    let (_, body) = send(&app, "GET", "/api/forms?title=0%25", Some(&admin), None).await;
    let forms = body["data"].as_array().unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["title"], "100% remote");
}

#[tokio::test]
async fn test_non_owner_cannot_delete_feedback() {
    let (app, _) = spawn_app("api-feedback-owner").await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (_, owner) = reviewer_token(&app, &admin, "owner@example.com").await;
    let (_, other) = reviewer_token(&app, &admin, "other@example.com").await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/questions",
        Some(&owner),
        Some(json!({ "text": "Culture fit?", "type": "TEXT" })),
    )
    .await;
    let q = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        "POST",
        "/api/forms",
        Some(&owner),
        Some(json!({ "title": "Onsite" })),
    )
    .await;
    let form_id = body["data"]["id"].as_i64().unwrap();
    send(
        &app,
        "POST",
        &format!("/api/forms/{form_id}/questions/{q}"),
        Some(&owner),
        None,
    )
    .await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/feedback-requests",
        Some(&owner),
        Some(json!({ "candidateEmail": "c@example.com", "candidateName": "José", "formId": form_id })),
    )
    .await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/feedback/token/{token}"),
        None,
        Some(json!({ "answers": [{ "questionId": q, "text": "Strong" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let feedback_id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/feedback/{feedback_id}");

    let (status, body) = send(&app, "DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, body) = send(&app, "GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["answers"][0]["text"], "Strong");

    // "JOSÉ" finds "José" by candidate name.
    let (_, body) = send(
        &app,
        "GET",
        "/api/feedback-requests?candidateName=JOS%C3%89",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["status"], "SUBMITTED");

    let (status, _) = send(&app, "DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(
        &app,
        "POST",
        "/api/feedback-requests",
        Some(&owner),
        Some(json!({ "candidateEmail": "d@example.com", "formId": form_id })),
    )
    .await;
    let request_uri = format!("/api/feedback-requests/{}", body["data"]["id"]);

    let (status, _) = send(&app, "DELETE", &request_uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &request_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
