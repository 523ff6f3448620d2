// Shared fixtures: a seeded data directory and a client session wired to the
// user-record server through an in-memory pipe.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use userdesk_core::tooling::{ClientHandlers, McpSession};
use userdesk_core::types::{Arguments, Root};
use userdesk_server::{ServerSettings, UserDeskService};

pub const SEED: &str = r#"[
  {"id": 1, "name": "Ada", "email": "ada@example.com", "address": "1 Loop", "phone": "555-0001"},
  {"id": 2, "name": "Linus", "email": "linus@example.com", "address": "2 Tree", "phone": "555-0002"}
]"#;

pub fn seeded_data_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("data")).expect("mkdir");
    std::fs::write(dir.path().join("data").join("users.json"), SEED).expect("seed users");
    std::fs::write(dir.path().join("secret.txt"), "outside").expect("seed secret");
    dir
}

pub fn roots(data_dir: &Path) -> Vec<Root> {
    vec![Root {
        uri: format!("file://{}", data_dir.display()),
        name: Some("User Data Directory".to_string()),
    }]
}

pub async fn in_process_session(data_dir: &Path) -> McpSession {
    // Port 9 (discard) refuses connections, so random-user fetches fail fast.
    let settings = ServerSettings::new(data_dir).with_random_user_endpoint("http://127.0.0.1:9/");
    let service = UserDeskService::new(&settings);

    let (client, server) = tokio::io::duplex(1 << 16);
    let (server_read, server_write) = tokio::io::split(server);
    tokio::spawn(async move {
        let _ = userdesk_server::serve(service, server_read, server_write).await;
    });

    let (client_read, client_write) = tokio::io::split(client);
    McpSession::over_streams(
        "userdesk",
        client_read,
        client_write,
        ClientHandlers::new(roots(data_dir)),
        Some(Duration::from_secs(10)),
    )
    .await
    .expect("handshake succeeds")
}

pub fn args(value: serde_json::Value) -> Arguments {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Arguments::new(),
    }
}
