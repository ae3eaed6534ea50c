mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_then_login() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let account = common::register(&client, &server).await?;

    let res = client
        .post(server.url("/api/users/login"))
        .json(&json!({ "username": account.name, "password": "secret123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["expires_in"], 24 * 3600);
    assert_eq!(body["data"]["user"]["id"], account.id);
    assert_eq!(body["data"]["user"]["role"], "User");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().unwrap();
    let me: Value = client
        .get(server.url("/api/users/me"))
        .bearer_auth(token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(me["data"]["name"], account.name);
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_rejected() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let account = common::register(&client, &server).await?;

    let res = client
        .post(server.url("/api/auth/register"))
        .json(&json!({
            "name": account.name,
            "email": "someone-else@example.com",
            "password": "secret123"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Username already exists");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let account = common::register(&client, &server).await?;

    let res = client
        .post(server.url("/api/users/register"))
        .json(&json!({
            "name": format!("{}_2", account.name),
            "email": format!("{}@example.com", account.name),
            "password": "secret123"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Email already exists");
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let account = common::register(&client, &server).await?;

    for (name, password) in [(account.name.as_str(), "not-the-password"), ("nobody-by-this-name", "secret123")] {
        let res = client
            .post(server.url("/api/auth/login"))
            .json(&json!({ "username": name, "password": password }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: Value = res.json().await?;
        assert_eq!(body["message"], "Invalid username or password");
    }
    Ok(())
}

#[tokio::test]
async fn users_only_see_themselves() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let alice = common::register(&client, &server).await?;
    let bob = common::register(&client, &server).await?;

    let list: Value = client
        .get(server.url("/api/users"))
        .bearer_auth(&alice.token)
        .send()
        .await?
        .json()
        .await?;
    let users = list["data"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], alice.id);

    let res = client
        .get(server.url(&format!("/api/users/{}", bob.id)))
        .bearer_auth(&alice.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn users_cannot_modify_other_accounts() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let owner = common::register(&client, &server).await?;
    let intruder = common::register(&client, &server).await?;

    let res = client
        .put(server.url(&format!("/api/users/{}", owner.id)))
        .bearer_auth(&intruder.token)
        .json(&json!({ "name": "taken-over", "email": "taken-over@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(server.url(&format!("/api/users/{}", owner.id)))
        .bearer_auth(&intruder.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(server.url("/api/users/me"))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["name"], owner.name);
    Ok(())
}

#[tokio::test]
async fn role_change_requires_admin() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let account = common::register(&client, &server).await?;

    let update = json!({
        "name": account.name,
        "email": format!("{}@example.com", account.name),
        "role": "Admin"
    });

    let res = client
        .put(server.url(&format!("/api/users/{}", account.id)))
        .bearer_auth(&account.token)
        .json(&update)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Same request from an admin succeeds
    let admin = common::register(&client, &server).await?;
    server.promote(admin.id).await?;
    let res = client
        .put(server.url(&format!("/api/users/{}", account.id)))
        .bearer_auth(&admin.token)
        .json(&update)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn deleted_user_token_stops_working() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let account = common::register(&client, &server).await?;

    let res = client
        .delete(server.url(&format!("/api/users/{}", account.id)))
        .bearer_auth(&account.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(server.url("/api/users/me"))
        .bearer_auth(&account.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
