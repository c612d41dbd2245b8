mod support;

use chrono::Duration;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use support::spawn_server;

async fn join(client: &Client, base: &str, name: &str) -> StatusCode {
    client
        .post(format!("{}/participants", base))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("join")
        .status()
}

async fn post_message(
    client: &Client,
    base: &str,
    user: &str,
    body: Value,
) -> reqwest::Response {
    client
        .post(format!("{}/messages", base))
        .header("User", user)
        .json(&body)
        .send()
        .await
        .expect("post message")
}

async fn read_messages(client: &Client, base: &str, user: &str, limit: Option<&str>) -> Vec<Value> {
    let mut request = client
        .get(format!("{}/messages", base))
        .header("User", user);
    if let Some(limit) = limit {
        request = request.query(&[("limit", limit)]);
    }
    request
        .send()
        .await
        .expect("read messages")
        .json::<Vec<Value>>()
        .await
        .expect("messages json")
}

#[tokio::test]
async fn participant_registration_flow() {
    let server = spawn_server().await;
    let base = server.base_url.as_str();
    let client = Client::new();

    assert_eq!(join(&client, base, "maria").await, StatusCode::CREATED);
    assert_eq!(join(&client, base, "maria").await, StatusCode::CONFLICT);
    assert_eq!(join(&client, base, "").await, StatusCode::UNPROCESSABLE_ENTITY);

    let participants = client
        .get(format!("{}/participants", base))
        .send()
        .await
        .expect("list")
        .json::<Vec<Value>>()
        .await
        .expect("participants json");
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["name"], "maria");
    assert!(participants[0].get("lastSeen").is_some());

    let messages = read_messages(&client, base, "maria", None).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["from"], "maria");
    assert_eq!(messages[0]["to"], "Todos");
    assert_eq!(messages[0]["type"], "status");
    assert_eq!(messages[0]["time"], "12:00:00");
}

#[tokio::test]
async fn message_visibility_and_limit_flow() {
    let server = spawn_server().await;
    let base = server.base_url.as_str();
    let client = Client::new();

    for name in ["A", "B", "C"] {
        assert_eq!(join(&client, base, name).await, StatusCode::CREATED);
    }

    let response = post_message(
        &client,
        base,
        "A",
        json!({ "to": "B", "text": "hi", "type": "private_message" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let private: Value = response.json().await.expect("message json");
    let private_sequence = private["sequence"].as_u64().expect("sequence");

    let rejected = post_message(
        &client,
        base,
        "ghost",
        json!({ "to": "Todos", "text": "hi", "type": "message" }),
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bad_type = post_message(
        &client,
        base,
        "A",
        json!({ "to": "Todos", "text": "hi", "type": "status" }),
    )
    .await;
    assert_eq!(bad_type.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let for_b = read_messages(&client, base, "B", None).await;
    assert!(for_b.iter().any(|m| m["sequence"] == private_sequence));
    let for_c = read_messages(&client, base, "C", None).await;
    assert!(for_c.iter().all(|m| m["sequence"] != private_sequence));

    for text in ["1", "2"] {
        post_message(
            &client,
            base,
            "B",
            json!({ "to": "Todos", "text": text, "type": "message" }),
        )
        .await;
    }

    // A 可见：三条进入消息 + 两条广播
    let last_two = read_messages(&client, base, "A", Some("2")).await;
    assert_eq!(last_two.len(), 2);
    assert_eq!(last_two[0]["text"], "1");
    assert_eq!(last_two[1]["text"], "2");

    assert_eq!(read_messages(&client, base, "A", Some("0")).await.len(), 5);
    assert_eq!(read_messages(&client, base, "A", Some("abc")).await.len(), 5);
    assert_eq!(read_messages(&client, base, "A", Some("2.5")).await.len(), 2);
}

#[tokio::test]
async fn message_ownership_flow() {
    let server = spawn_server().await;
    let base = server.base_url.as_str();
    let client = Client::new();

    join(&client, base, "A").await;
    join(&client, base, "B").await;

    let message: Value = post_message(
        &client,
        base,
        "A",
        json!({ "to": "Todos", "text": "typo", "type": "message" }),
    )
    .await
    .json()
    .await
    .expect("message json");
    let url = format!("{}/messages/{}", base, message["sequence"]);

    let update = client
        .put(&url)
        .header("User", "A")
        .json(&json!({ "to": "Todos", "text": "fixed", "type": "message" }))
        .send()
        .await
        .expect("update");
    assert_eq!(update.status(), StatusCode::OK);
    let updated: Value = update.json().await.expect("updated json");
    assert_eq!(updated["text"], "fixed");

    let invalid_update = client
        .put(&url)
        .header("User", "A")
        .json(&json!({ "to": "", "text": "fixed", "type": "message" }))
        .send()
        .await
        .expect("invalid update");
    assert_eq!(invalid_update.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let by_b = client
        .delete(&url)
        .header("User", "B")
        .send()
        .await
        .expect("delete by B");
    assert_eq!(by_b.status(), StatusCode::UNAUTHORIZED);

    let by_a = client
        .delete(&url)
        .header("User", "A")
        .send()
        .await
        .expect("delete by A");
    assert_eq!(by_a.status(), StatusCode::NO_CONTENT);

    let again = client
        .delete(&url)
        .header("User", "A")
        .send()
        .await
        .expect("delete again");
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    for user in ["A", "B"] {
        let messages = read_messages(&client, base, user, None).await;
        assert!(messages.iter().all(|m| m["sequence"] != message["sequence"]));
    }
}

#[tokio::test]
async fn presence_heartbeat_and_eviction_flow() {
    let server = spawn_server().await;
    let base = server.base_url.as_str();
    let client = Client::new();

    join(&client, base, "A").await;
    join(&client, base, "B").await;

    let unknown = client
        .post(format!("{}/status", base))
        .header("User", "ghost")
        .send()
        .await
        .expect("status ghost");
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    // B 在 5 秒后发送心跳，A 没有
    server.clock.advance(Duration::seconds(5));
    let refreshed = client
        .post(format!("{}/status", base))
        .header("User", "B")
        .send()
        .await
        .expect("status B");
    assert_eq!(refreshed.status(), StatusCode::OK);

    server.clock.advance(Duration::seconds(6));
    let report = server.sweeper.sweep_once().await;
    assert_eq!(report.evicted.len(), 1);
    assert_eq!(report.evicted[0].as_str(), "A");

    let participants = client
        .get(format!("{}/participants", base))
        .send()
        .await
        .expect("list")
        .json::<Vec<Value>>()
        .await
        .expect("participants json");
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["name"], "B");

    let messages = read_messages(&client, base, "B", None).await;
    let left: Vec<_> = messages
        .iter()
        .filter(|m| m["from"] == "A" && m["type"] == "status")
        .collect();
    assert_eq!(left.len(), 2, "进入消息和离开消息各一条");

    // 被移出后 A 不能再发消息
    let after = post_message(
        &client,
        base,
        "A",
        json!({ "to": "Todos", "text": "still here?", "type": "message" }),
    )
    .await;
    assert_eq!(after.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
