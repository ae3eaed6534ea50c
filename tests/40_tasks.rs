mod common;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn task_defaults_and_update() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let owner = common::register(&client, &server).await?;
    let project_id = common::create_project(&client, &server, &owner, "Sprint").await?;

    let res = client
        .post(server.url("/api/tasks"))
        .bearer_auth(&owner.token)
        .json(&json!({ "title": "Plan", "project_id": project_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    let task = &created["data"];
    assert_eq!(task["status"], "ToDo");
    assert_eq!(task["description"], "");

    // Missing due date defaults to roughly a week out
    let due: DateTime<Utc> = task["due_date"].as_str().unwrap().parse()?;
    let expected = Utc::now() + Duration::days(7);
    assert!((due - expected).num_minutes().abs() < 5);

    let task_id = task["id"].as_i64().unwrap();
    let res = client
        .put(server.url(&format!("/api/tasks/{}", task_id)))
        .bearer_auth(&owner.token)
        .json(&json!({
            "title": "Plan sprint",
            "description": "Backlog grooming",
            "status": "InProgress",
            "due_date": "2031-05-01T09:00:00Z"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let body: Value = client
        .get(server.url(&format!("/api/tasks/{}", task_id)))
        .bearer_auth(&owner.token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["status"], "InProgress");
    assert_eq!(body["data"]["title"], "Plan sprint");
    assert!(body["data"]["comments"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn task_in_foreign_project_is_rejected() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let owner = common::register(&client, &server).await?;
    let intruder = common::register(&client, &server).await?;
    let project_id = common::create_project(&client, &server, &owner, "Closed").await?;

    let res = client
        .post(server.url("/api/tasks"))
        .bearer_auth(&intruder.token)
        .json(&json!({ "title": "Sneaky", "project_id": project_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Project not found or access denied");

    let task_id = common::create_task(&client, &server, &owner, project_id).await?;
    let res = client
        .get(server.url(&format!("/api/tasks/{}", task_id)))
        .bearer_auth(&intruder.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(server.url(&format!("/api/tasks/{}", task_id)))
        .bearer_auth(&intruder.token)
        .json(&json!({ "title": "Hijacked", "status": "Done" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(server.url(&format!("/api/tasks/{}", task_id)))
        .bearer_auth(&intruder.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The owner's task is untouched
    let res = client
        .get(server.url(&format!("/api/tasks/{}", task_id)))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["title"], "Write tests");
    assert_eq!(body["data"]["status"], "ToDo");
    Ok(())
}

#[tokio::test]
async fn task_list_filters() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let owner = common::register(&client, &server).await?;
    let first = common::create_project(&client, &server, &owner, "First").await?;
    let second = common::create_project(&client, &server, &owner, "Second").await?;
    common::create_task(&client, &server, &owner, first).await?;
    common::create_task(&client, &server, &owner, second).await?;

    client
        .post(server.url("/api/tasks"))
        .bearer_auth(&owner.token)
        .json(&json!({ "title": "Finished", "project_id": second, "status": "Done" }))
        .send()
        .await?;

    let all: Value = client
        .get(server.url("/api/tasks"))
        .bearer_auth(&owner.token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(all["data"].as_array().unwrap().len(), 3);

    let by_project: Value = client
        .get(server.url(&format!("/api/tasks?project_id={}", second)))
        .bearer_auth(&owner.token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(by_project["data"].as_array().unwrap().len(), 2);

    let done: Value = client
        .get(server.url(&format!("/api/tasks?project_id={}&status=Done", second)))
        .bearer_auth(&owner.token)
        .send()
        .await?
        .json()
        .await?;
    let done = done["data"].as_array().unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0]["title"], "Finished");
    Ok(())
}

#[tokio::test]
async fn comment_through_task_route() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let owner = common::register(&client, &server).await?;
    let project_id = common::create_project(&client, &server, &owner, "Discussed").await?;
    let task_id = common::create_task(&client, &server, &owner, project_id).await?;

    let res = client
        .post(server.url(&format!("/api/tasks/{}/comments", task_id)))
        .bearer_auth(&owner.token)
        .json(&json!({ "content": "Looks good" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let comment: Value = res.json().await?;
    assert_eq!(comment["data"]["task_id"], task_id);
    assert_eq!(comment["data"]["user_id"], owner.id);

    let body: Value = client
        .get(server.url(&format!("/api/tasks/{}", task_id)))
        .bearer_auth(&owner.token)
        .send()
        .await?
        .json()
        .await?;
    let comments = body["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "Looks good");
    Ok(())
}
