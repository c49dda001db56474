use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinSet;
use waitlist_api::waitlist::{InterestType, NotificationPreference};

use crate::helpers::TestApp;

#[tokio::test]
async fn api_waitlist_created() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(&json!({ "email": " A@B.com ", "name": "Jo" }))
        .await?;

    assert_eq!(
        res.status(),
        StatusCode::CREATED,
        "Wrong response StatusCode: {}",
        res.status()
    );
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Successfully added to waitlist!");
    let id = body["id"].as_i64().expect("id is not an integer");
    assert!(id > 0);

    let entries = app.entries().await?;
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(i64::from(entry.id), id);
    assert_eq!(entry.email, "a@b.com");
    assert_eq!(entry.name, "Jo");
    assert_eq!(entry.whatsapp, "");
    assert_eq!(entry.notification_preference, NotificationPreference::Email);
    assert_eq!(entry.interest_type, InterestType::Both);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_stores_all_fields() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(&json!({
            "email": "vendor@example.com",
            "name": "  Ursula Le Guin ",
            "whatsapp": " +44 7700 900123 ",
            "notification_preference": "whatsapp",
            "interest_type": "vendor",
        }))
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let entries = app.entries().await?;
    let entry = &entries[0];
    assert_eq!(entry.name, "Ursula Le Guin");
    assert_eq!(entry.whatsapp, "+44 7700 900123");
    assert_eq!(entry.notification_preference, NotificationPreference::Whatsapp);
    assert_eq!(entry.interest_type, InterestType::Vendor);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_returns_400_when_email_is_missing() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (json!({ "name": "John Doe" }), "Missing email"),
        (json!({ "email": null, "name": "John Doe" }), "Null email"),
        (json!({ "email": "" }), "Empty email"),
        (json!({ "email": "  \t " }), "Whitespace email"),
        (json!({}), "Empty json"),
    ];

    for (body, description) in cases {
        let res = app.post_waitlist(&body).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "The API did not return a 400 BAD REQUEST when the payload was: {description}"
        );
        let body: Value = res.json().await?;
        assert_eq!(body["error"], "Email is required", "payload: {description}");
    }

    assert!(app.entries().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn api_waitlist_null_body_reports_missing_email() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_waitlist_raw("null").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Email is required");

    Ok(())
}

#[tokio::test]
async fn api_waitlist_returns_400_for_malformed_body() -> Result<()> {
    let app = TestApp::spawn().await?;

    for body in ["{\"email\": ", "[1, 2, 3]", "{\"email\": 42}"] {
        let res = app.post_waitlist_raw(body).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let body: Value = res.json().await?;
        assert!(body["error"]
            .as_str()
            .is_some_and(|msg| msg.starts_with("Invalid request body")));
    }

    assert!(app.entries().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn api_waitlist_returns_409_for_same_normalized_email() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(&json!({ "email": "User@Example.com" }))
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .post_waitlist(&json!({ "email": "user@example.com ", "name": "Someone Else" }))
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "This email is already registered");

    let entries = app.entries().await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].email, "user@example.com");
    assert_eq!(entries[0].name, "");

    Ok(())
}

#[tokio::test]
async fn api_waitlist_concurrent_duplicates_store_one_entry() -> Result<()> {
    let app = TestApp::spawn().await?;
    let url = format!("http://{}/api/waitlist", app.addr);

    let mut requests = JoinSet::new();
    for i in 0..8 {
        let client = app.http_client.clone();
        let url = url.clone();
        let email = if i % 2 == 0 { "race@example.com" } else { " RACE@example.com" };
        requests.spawn(async move {
            client
                .post(url)
                .json(&json!({ "email": email }))
                .send()
                .await
                .map(|res| res.status())
        });
    }

    let mut statuses = Vec::new();
    while let Some(status) = requests.join_next().await {
        statuses.push(status??);
    }

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let conflicts = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
    assert_eq!(created, 1, "statuses: {statuses:?}");
    assert_eq!(conflicts, 7, "statuses: {statuses:?}");
    assert_eq!(app.entries().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_unknown_preferences_fall_back_to_defaults() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(&json!({
            "email": "defaults@example.com",
            "notification_preference": "telegram",
            "interest_type": "investor",
        }))
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let entries = app.entries().await?;
    assert_eq!(entries[0].notification_preference, NotificationPreference::Email);
    assert_eq!(entries[0].interest_type, InterestType::Both);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_returns_500_without_leaking_details() -> Result<()> {
    let app = TestApp::spawn().await?;
    sqlx::query("DROP TABLE waitlist_entries")
        .execute(app.dm.db())
        .await?;

    let res = app
        .post_waitlist(&json!({ "email": "nobody@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let req_id = res
        .headers()
        .get("x-request-id")
        .and_then(|id| id.to_str().ok())
        .map(str::to_owned);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Server error. Please try again later.");
    assert_eq!(body["req_id"].as_str(), req_id.as_deref());
    assert!(!body.to_string().contains("waitlist_entries"));

    Ok(())
}

#[tokio::test]
async fn api_waitlist_non_string_preferences_fall_back_to_defaults() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(&json!({
            "email": "typed@example.com",
            "notification_preference": ["sms"],
            "interest_type": 5,
        }))
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let entries = app.entries().await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].notification_preference, NotificationPreference::Email);
    assert_eq!(entries[0].interest_type, InterestType::Both);

    Ok(())
}
