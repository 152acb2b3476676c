// Integration tests against a running server
// Run with: cargo test --test integration_test -- --ignored
// Expects gatehouse-api listening on localhost:9000 with GitHub OAuth configured.

use gatehouse_contracts::SessionInfo;

const API_BASE_URL: &str = "http://localhost:9000";

#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_anonymous_auth_surface() {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build client");

    // Health is always reachable
    let health = client
        .get(format!("{}/health", API_BASE_URL))
        .send()
        .await
        .expect("Failed to reach /health");
    assert_eq!(health.status(), 200);

    // No cookie: session endpoint reports null
    let session = client
        .get(format!("{}/v1/auth/session", API_BASE_URL))
        .send()
        .await
        .expect("Failed to reach session endpoint");
    assert_eq!(session.status(), 200);
    let info: Option<SessionInfo> = session.json().await.expect("Failed to parse session");
    assert!(info.is_none());

    // No cookie: guarded endpoint rejects with the fixed message
    let me = client
        .get(format!("{}/v1/me", API_BASE_URL))
        .send()
        .await
        .expect("Failed to reach /v1/me");
    assert_eq!(me.status(), 401);
    assert_eq!(me.text().await.unwrap(), "Unauthorized");

    // Sign-in hands the browser off to GitHub
    let signin = client
        .get(format!("{}/v1/auth/signin/github", API_BASE_URL))
        .send()
        .await
        .expect("Failed to reach sign-in endpoint");
    assert_eq!(signin.status(), 303);
    let location = signin
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("Missing redirect location");
    assert!(location.starts_with("https://github.com/login/oauth/authorize?"));
}
