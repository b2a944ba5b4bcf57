//! Document collection endpoints under `/crud-operations`.

use serde_json::{json, Value};

mod common;

async fn seed(app: &common::TestApp, texts: &[&str]) -> Vec<String> {
    for text in texts {
        let res = app.post_json("/crud-operations", &json!({ "text": text })).await;
        assert_eq!(res.status(), 200);
    }
    let body = app.get_json("/crud-operations").await;
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["_id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_then_list_and_item() {
    let app = common::spawn_app().await;

    let res = app.post_json("/crud-operations", &json!({ "text": "buy milk" })).await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "List saved" }));

    let list = app.get_json("/crud-operations").await;
    assert_eq!(list["message"], "Data obtained.");
    let docs = list["data"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["text"], "buy milk");
    assert!(docs[0]["createdAt"].is_string());
    assert_eq!(docs[0]["createdAt"], docs[0]["updatedAt"]);

    let id = docs[0]["_id"].as_str().unwrap();
    assert_eq!(id.len(), 32);

    let item = app.get_json(&format!("/crud-operations/item/{id}")).await;
    assert_eq!(item["data"].as_array().unwrap().len(), 1);
    assert_eq!(item["data"][0]["_id"], id);

    let missing = app.get_json("/crud-operations/item/nope").await;
    assert_eq!(missing["data"], json!([]));
}

#[tokio::test]
async fn test_create_without_text_is_rejected() {
    let app = common::spawn_app().await;

    for body in [json!({}), json!({ "text": "" }), json!({ "text": null })] {
        let res = app.post_json("/crud-operations", &body).await;
        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "Please pass text.");
    }

    let count = app.get_json("/crud-operations/count").await;
    assert_eq!(count["data"], 0);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let app = common::spawn_app().await;

    let res = app
        .client
        .post(app.url("/crud-operations"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid request body.");
}

#[tokio::test]
async fn test_list_filters() {
    let app = common::spawn_app().await;
    let ids = seed(&app, &["Groceries", "garden tools", "Taxes"]).await;

    let by_text = app.get_json("/crud-operations?text=GAR").await;
    let texts: Vec<&str> = by_text["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["garden tools"]);

    let by_id = app.get_json(&format!("/crud-operations?_id={}", ids[2])).await;
    assert_eq!(by_id["data"].as_array().unwrap().len(), 1);
    assert_eq!(by_id["data"][0]["text"], "Taxes");

    let by_alias = app.get_json(&format!("/crud-operations?id={}", ids[0])).await;
    assert_eq!(by_alias["data"][0]["text"], "Groceries");

    let count = app.get_json("/crud-operations/count").await;
    let all = app.get_json("/crud-operations").await;
    assert_eq!(count["data"], all["data"].as_array().unwrap().len());
}

#[tokio::test]
async fn test_pagination_pages() {
    let app = common::spawn_app().await;
    let texts: Vec<String> = (1..=7).map(|i| format!("item {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    seed(&app, &refs).await;

    let first = app.get_json("/crud-operations/pagination").await;
    assert_eq!(first["total"], 7);
    assert_eq!(first["data"].as_array().unwrap().len(), 5);
    assert_eq!(first["data"][0]["text"], "item 1");

    let second = app.get_json("/crud-operations/pagination?page=2&row=5").await;
    let second_data = second["data"].as_array().unwrap();
    assert_eq!(second_data.len(), 2);
    assert_eq!(second_data[0]["text"], "item 6");
    assert_eq!(second_data[1]["text"], "item 7");

    let past_end = app.get_json("/crud-operations/pagination?page=3&row=5").await;
    assert_eq!(past_end["data"], json!([]));
    assert_eq!(past_end["total"], 7);

    let coerced = app.get_json("/crud-operations/pagination?page=abc&row=-3").await;
    assert_eq!(coerced["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = common::spawn_app().await;
    let ids = seed(&app, &["draft"]).await;
    let id = &ids[0];

    let res = app
        .client
        .put(app.url(&format!("/crud-operations/{id}")))
        .json(&json!({ "text": "final" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "List updated");

    let item = app.get_json(&format!("/crud-operations/item/{id}")).await;
    assert_eq!(item["data"][0]["text"], "final");

    let res = app
        .client
        .delete(app.url(&format!("/crud-operations/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "List deleted");

    let count = app.get_json("/crud-operations/count").await;
    assert_eq!(count["data"], 0);
}

#[tokio::test]
async fn test_update_and_delete_unknown_id_still_succeed() {
    let app = common::spawn_app().await;
    seed(&app, &["keep"]).await;

    let res = app
        .client
        .put(app.url("/crud-operations/ffffffffffffffffffffffffffffffff"))
        .json(&json!({ "text": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = app
        .client
        .delete(app.url("/crud-operations/ffffffffffffffffffffffffffffffff"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "List deleted");

    let count = app.get_json("/crud-operations/count").await;
    assert_eq!(count["data"], 1);
}

#[tokio::test]
async fn test_bulk_delete() {
    let app = common::spawn_app().await;
    let ids = seed(&app, &["a", "b", "c"]).await;

    let res = app
        .client
        .delete(app.url("/crud-operations"))
        .json(&json!({ "selected": [ids[0], ids[2], "unknown"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "List deleted");

    let remaining = app.get_json("/crud-operations").await;
    let docs = remaining["data"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["text"], "b");

    let res = app
        .client
        .delete(app.url("/crud-operations"))
        .json(&json!({ "selected": "not-a-list" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let count = app.get_json("/crud-operations/count").await;
    assert_eq!(count["data"], 1);
}

#[tokio::test]
async fn test_writes_on_static_paths_are_no_ops() {
    let app = common::spawn_app().await;
    seed(&app, &["untouched"]).await;

    let res = app
        .client
        .put(app.url("/crud-operations/count"))
        .json(&json!({ "text": "changed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "List updated");

    let res = app
        .client
        .delete(app.url("/crud-operations/pagination"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "List deleted");

    let res = app
        .client
        .delete(app.url("/crud-operations/relational/count"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "List deleted");

    let list = app.get_json("/crud-operations").await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
    assert_eq!(list["data"][0]["text"], "untouched");
}

#[tokio::test]
async fn test_form_encoded_bulk_delete() {
    let app = common::spawn_app().await;
    let ids = seed(&app, &["a", "b", "c"]).await;

    let form = [("selected[]", ids[0].as_str()), ("selected[]", ids[1].as_str())];
    let res = app
        .client
        .delete(app.url("/crud-operations"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let remaining = app.get_json("/crud-operations").await;
    let docs = remaining["data"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["text"], "c");
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let app = common::spawn_app().await;
    seed(&app, &["Éclair recipe", "plain bread"]).await;
    let res = app
        .post_json("/crud-operations/relational", &json!({ "text": "Éclair recipe" }))
        .await;
    assert_eq!(res.status(), 200);

    let docs = app.get_json("/crud-operations?text=%C3%A9clair").await;
    assert_eq!(docs["data"].as_array().unwrap().len(), 1);

    let rows = app.get_json("/crud-operations/relational?text=%C3%A9clair").await;
    assert_eq!(rows["data"].as_array().unwrap().len(), 1);
}
