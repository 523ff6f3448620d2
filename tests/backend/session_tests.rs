// Client session against the real user-record service over an in-memory pipe.

#[path = "../common/mod.rs"]
mod common;

use common::{args, in_process_session, seeded_data_dir};
use serde_json::{Value, json};
use std::sync::Arc;
use userdesk_core::session::{BackendSession, SessionError};
use userdesk_core::types::Arguments;

async fn user_count(session: &dyn BackendSession) -> usize {
    let listing = session.read_resource("users://all").await.expect("listing");
    serde_json::from_str::<Vec<Value>>(listing.first_text().expect("text"))
        .expect("json array")
        .len()
}

#[tokio::test]
async fn create_user_extends_the_listing_with_the_next_id() {
    let dir = seeded_data_dir();
    let session = in_process_session(&dir.path().join("data")).await;

    let result = session
        .call_tool(
            "create-user",
            args(json!({ "name": "Cara", "email": "cara@example.com", "address": "3 Rd", "phone": "555-0003" })),
        )
        .await
        .expect("call succeeds");

    assert_eq!(result.text(), "User 3 created successfully");
    let listing = session.read_resource("users://all").await.expect("listing");
    let users: Vec<Value> = serde_json::from_str(listing.first_text().expect("text")).expect("json");
    assert_eq!(users.len(), 3);
    assert_eq!(users[2]["id"], 3);
    assert_eq!(users[2]["email"], "cara@example.com");
}

#[tokio::test]
async fn concurrent_creates_never_share_an_id() {
    let dir = seeded_data_dir();
    let session = Arc::new(in_process_session(&dir.path().join("data")).await);

    let calls: Vec<_> = (0..6)
        .map(|n| {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                session
                    .call_tool(
                        "create-user",
                        args(json!({ "name": format!("U{n}"), "email": format!("u{n}@x.com"), "address": "x", "phone": "1" })),
                    )
                    .await
            })
        })
        .collect();
    for call in calls {
        assert!(!call.await.expect("join").expect("call").is_error);
    }

    let listing = session.read_resource("users://all").await.expect("listing");
    let users: Vec<Value> = serde_json::from_str(listing.first_text().expect("text")).expect("json");
    let mut ids: Vec<u64> = users.iter().filter_map(|u| u["id"].as_u64()).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
}

#[tokio::test]
async fn sandbox_and_unknown_uris_map_to_typed_errors() {
    let dir = seeded_data_dir();
    let data = dir.path().join("data");
    let session = in_process_session(&data).await;

    let outside = format!("file://{}", dir.path().join("secret.txt").display());
    assert!(matches!(
        session.read_resource(&outside).await,
        Err(SessionError::AccessDenied(_))
    ));

    let traversal = format!("file://{}/../secret.txt", data.display());
    for uri in [traversal.as_str(), "file://../../etc/passwd", "file://etc/passwd"] {
        assert!(
            matches!(session.read_resource(uri).await, Err(SessionError::AccessDenied(_))),
            "{uri} should be denied"
        );
    }

    assert!(matches!(
        session.read_resource("bogus://thing").await,
        Err(SessionError::UnknownResource(uri)) if uri == "bogus://thing"
    ));
    assert!(matches!(
        session.read_resource("users://99/profile").await,
        Err(SessionError::UnknownResource(_))
    ));
}

#[tokio::test]
async fn listed_file_resource_is_readable() {
    let dir = seeded_data_dir();
    let session = in_process_session(&dir.path().join("data")).await;

    let resources = session.list_resources().await.expect("resources");
    let file_uri = resources
        .iter()
        .map(|r| r.uri.clone())
        .find(|uri| uri.starts_with("file://"))
        .expect("file resource listed");

    let contents = session.read_resource(&file_uri).await.expect("inside the sandbox");

    assert!(contents.first_text().is_some_and(|t| t.contains("linus@example.com")));
}

#[tokio::test]
async fn unknown_tool_and_failed_generator_are_distinguished() {
    let dir = seeded_data_dir();
    let session = in_process_session(&dir.path().join("data")).await;

    assert!(matches!(
        session.call_tool("drop-users", Arguments::new()).await,
        Err(SessionError::UnknownTool(name)) if name == "drop-users"
    ));

    let random = session
        .call_tool("create-random-user", Arguments::new())
        .await
        .expect("reported as a result");
    assert!(random.is_error);
    assert!(random.text().starts_with("Failed to fetch random user from API: "));
    assert_eq!(user_count(&session).await, 2);
}

#[tokio::test]
async fn closing_the_session_fails_later_calls() {
    let dir = seeded_data_dir();
    let session = in_process_session(&dir.path().join("data")).await;

    session.close().await;

    let err = session.list_tools().await.expect_err("closed");
    assert!(err.is_fatal(), "{err}");
}
