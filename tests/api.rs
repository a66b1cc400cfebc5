mod common;

use reqwest::StatusCode;
use serde_json::{Value, json};

async fn create_category(client: &reqwest::Client, base_url: &str, name: &str) -> i64 {
    let resp: Value = client
        .post(format!("{}/api/v1/categories", base_url))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("create category")
        .json()
        .await
        .expect("parse category response");
    resp["data"]["id"].as_i64().expect("category id")
}

async fn create_app(client: &reqwest::Client, base_url: &str, body: Value) -> i64 {
    let resp = client
        .post(format!("{}/api/v1/apps", base_url))
        .json(&body)
        .send()
        .await
        .expect("create app");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp: Value = resp.json().await.expect("parse app response");
    resp["data"]["id"].as_i64().expect("app id")
}

/// Games holds ratings 4.0 and 4.5, Tools one paid 3.0-rated app.
async fn seed_catalog(client: &reqwest::Client, base_url: &str) -> (i64, i64) {
    let games_id = create_category(client, base_url, "Games").await;
    let tools_id = create_category(client, base_url, "Tools").await;

    create_app(
        client,
        base_url,
        json!({
            "app_id": "com.example.puzzle",
            "app_name": "Puzzle Quest",
            "category_id": games_id,
            "rating": 4.0,
            "free": true,
            "price": 0.0,
            "installs": 50000,
            "released": "2020-03-14",
            "last_updated": "2021-06-01",
            "content_rating": "Everyone"
        }),
    )
    .await;
    create_app(
        client,
        base_url,
        json!({
            "app_id": "com.example.racer",
            "app_name": "Speed Racer",
            "category_id": games_id,
            "rating": 4.5,
            "free": true,
            "price": 0.0,
            "installs": 1000000,
            "released": "2021-07-02",
            "last_updated": "2021-09-30",
            "content_rating": "Teen"
        }),
    )
    .await;
    create_app(
        client,
        base_url,
        json!({
            "app_id": "com.example.scanner",
            "app_name": "Doc Scanner",
            "category_id": tools_id,
            "rating": 3.0,
            "free": false,
            "price": 2.0,
            "installs": 10000,
            "released": "2019-11-20",
            "last_updated": "2020-01-15",
            "content_rating": "Everyone"
        }),
    )
    .await;

    (games_id, tools_id)
}

#[tokio::test]
async fn filters_report_fallback_bounds_on_empty_catalog() {
    let server = common::TestServer::start().await;
    let client = reqwest::Client::new();

    let resp: Value = client
        .get(format!("{}/api/v1/filters", server.base_url))
        .send()
        .await
        .expect("get filters")
        .json()
        .await
        .expect("parse filters");

    let data = &resp["data"];
    assert_eq!(data["categories"], json!([]));
    assert_eq!(data["content_ratings"], json!([]));
    assert_eq!(data["min_rating"], json!(0.0));
    assert_eq!(data["max_rating"], json!(5.0));
    assert_eq!(data["min_price"], json!(0.0));
    assert_eq!(data["max_price"], json!(100.0));
    assert_eq!(data["min_installs"], json!(0));
    assert_eq!(data["max_installs"], json!(10000000));
}

#[tokio::test]
async fn filters_report_data_bounds() {
    let server = common::TestServer::start().await;
    let client = reqwest::Client::new();
    seed_catalog(&client, &server.base_url).await;

    let resp: Value = client
        .get(format!("{}/api/v1/filters", server.base_url))
        .send()
        .await
        .expect("get filters")
        .json()
        .await
        .expect("parse filters");

    let data = &resp["data"];
    assert_eq!(data["categories"], json!(["Games", "Tools"]));
    assert_eq!(data["content_ratings"], json!(["Everyone", "Teen"]));
    assert_eq!(data["min_rating"], json!(3.0));
    assert_eq!(data["max_rating"], json!(4.5));
    assert_eq!(data["max_price"], json!(2.0));
    assert_eq!(data["min_installs"], json!(10000));
    assert_eq!(data["max_installs"], json!(1000000));
}

#[tokio::test]
async fn category_crud_round_trip() {
    let server = common::TestServer::start().await;
    let client = reqwest::Client::new();

    let id = create_category(&client, &server.base_url, "Productivity").await;

    let resp: Value = client
        .get(format!("{}/api/v1/categories/{}", server.base_url, id))
        .send()
        .await
        .expect("get category")
        .json()
        .await
        .expect("parse category");
    assert_eq!(resp["data"]["name"], "Productivity");

    // Duplicate names conflict
    let resp = client
        .post(format!("{}/api/v1/categories", server.base_url))
        .json(&json!({ "name": "Productivity" }))
        .send()
        .await
        .expect("create duplicate");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = client
        .put(format!("{}/api/v1/categories/{}", server.base_url, id))
        .json(&json!({ "name": "Office" }))
        .send()
        .await
        .expect("update category");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp: Value = client
        .get(format!("{}/api/v1/categories/{}", server.base_url, id))
        .send()
        .await
        .expect("get updated")
        .json()
        .await
        .expect("parse updated");
    assert_eq!(resp["data"]["name"], "Office");

    let resp = client
        .delete(format!("{}/api/v1/categories/{}", server.base_url, id))
        .send()
        .await
        .expect("delete category");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/api/v1/categories/{}", server.base_url, id))
        .send()
        .await
        .expect("get deleted");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Mutating a missing row is a miss, not a server error
    let resp = client
        .put(format!("{}/api/v1/categories/{}", server.base_url, id))
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .expect("update deleted");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn developer_crud_round_trip() {
    let server = common::TestServer::start().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/v1/developers", server.base_url))
        .json(&json!({ "name": "Acme Apps", "email": "dev@acme.example" }))
        .send()
        .await
        .expect("create developer");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp: Value = resp.json().await.expect("parse developer");
    let id = resp["data"]["id"].as_i64().expect("developer id");

    let resp = client
        .post(format!("{}/api/v1/developers", server.base_url))
        .json(&json!({ "name": "Other", "email": "dev@acme.example" }))
        .send()
        .await
        .expect("create duplicate email");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = client
        .post(format!("{}/api/v1/developers", server.base_url))
        .json(&json!({ "name": "No Email", "email": "not-an-email" }))
        .send()
        .await
        .expect("create invalid email");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .put(format!("{}/api/v1/developers/{}", server.base_url, id))
        .json(&json!({ "name": "Acme Studios", "email": "studio@acme.example" }))
        .send()
        .await
        .expect("update developer");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp: Value = client
        .get(format!("{}/api/v1/developers/{}", server.base_url, id))
        .send()
        .await
        .expect("get developer")
        .json()
        .await
        .expect("parse developer");
    assert_eq!(resp["data"]["email"], "studio@acme.example");

    let resp = client
        .delete(format!("{}/api/v1/developers/{}", server.base_url, id))
        .send()
        .await
        .expect("delete developer");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn app_crud_and_referenced_deletes() {
    let server = common::TestServer::start().await;
    let client = reqwest::Client::new();

    let category_id = create_category(&client, &server.base_url, "Games").await;
    let app_id = create_app(
        &client,
        &server.base_url,
        json!({
            "app_id": "com.example.puzzle",
            "app_name": "Puzzle Quest",
            "category_id": category_id,
            "rating": 4.5,
            "free": true,
            "released": "2020-03-14",
            "scraped_time": "2021-06-15 10:30:00"
        }),
    )
    .await;

    let resp: Value = client
        .get(format!("{}/api/v1/apps/{}", server.base_url, app_id))
        .send()
        .await
        .expect("get app")
        .json()
        .await
        .expect("parse app");
    assert_eq!(resp["data"]["app_name"], "Puzzle Quest");
    assert_eq!(resp["data"]["released"], "2020-03-14");
    assert_eq!(resp["data"]["scraped_time"], "2021-06-15 10:30:00");

    // A category with live apps cannot be deleted
    let resp = client
        .delete(format!("{}/api/v1/categories/{}", server.base_url, category_id))
        .send()
        .await
        .expect("delete referenced category");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Full replace: omitted fields clear
    let resp = client
        .put(format!("{}/api/v1/apps/{}", server.base_url, app_id))
        .json(&json!({
            "app_id": "com.example.puzzle",
            "app_name": "Puzzle Quest Deluxe",
            "free": false
        }))
        .send()
        .await
        .expect("replace app");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp: Value = client
        .get(format!("{}/api/v1/apps/{}", server.base_url, app_id))
        .send()
        .await
        .expect("get replaced app")
        .json()
        .await
        .expect("parse replaced app");
    assert_eq!(resp["data"]["app_name"], "Puzzle Quest Deluxe");
    assert_eq!(resp["data"]["free"], false);
    assert!(resp["data"].get("rating").is_none() || resp["data"]["rating"].is_null());
    assert!(resp["data"].get("category_id").is_none() || resp["data"]["category_id"].is_null());

    let resp = client
        .delete(format!("{}/api/v1/apps/{}", server.base_url, app_id))
        .send()
        .await
        .expect("delete app");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/api/v1/apps/{}", server.base_url, app_id))
        .send()
        .await
        .expect("get deleted app");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // With the reference gone the category can be removed
    let resp = client
        .delete(format!("{}/api/v1/categories/{}", server.base_url, category_id))
        .send()
        .await
        .expect("delete category");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn app_create_rejects_bad_payloads() {
    let server = common::TestServer::start().await;
    let client = reqwest::Client::new();

    // Rating outside 0-5
    let resp = client
        .post(format!("{}/api/v1/apps", server.base_url))
        .json(&json!({ "app_id": "com.example.bad", "app_name": "Bad", "rating": 7.5 }))
        .send()
        .await
        .expect("create with bad rating");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Dangling category reference
    let resp = client
        .post(format!("{}/api/v1/apps", server.base_url))
        .json(&json!({ "app_id": "com.example.bad", "app_name": "Bad", "category_id": 999 }))
        .send()
        .await
        .expect("create with dangling reference");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Duplicate external id
    create_app(
        &client,
        &server.base_url,
        json!({ "app_id": "com.example.dup", "app_name": "First" }),
    )
    .await;
    let resp = client
        .post(format!("{}/api/v1/apps", server.base_url))
        .json(&json!({ "app_id": "com.example.dup", "app_name": "Second" }))
        .send()
        .await
        .expect("create duplicate app_id");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_apps_filters_and_paginates() {
    let server = common::TestServer::start().await;
    let client = reqwest::Client::new();
    seed_catalog(&client, &server.base_url).await;

    // Identity filter: all rows, paginated
    let resp: Value = client
        .get(format!("{}/api/v1/apps?per_page=2", server.base_url))
        .send()
        .await
        .expect("list apps")
        .json()
        .await
        .expect("parse page");
    assert_eq!(resp["data"]["total_apps"], 3);
    assert_eq!(resp["data"]["total_pages"], 2);
    assert_eq!(resp["data"]["current_page"], 1);
    assert_eq!(resp["data"]["apps"].as_array().expect("apps").len(), 2);

    // Past the last page: empty, not an error
    let resp: Value = client
        .get(format!("{}/api/v1/apps?per_page=2&page=5", server.base_url))
        .send()
        .await
        .expect("list past end")
        .json()
        .await
        .expect("parse page");
    assert_eq!(resp["data"]["apps"], json!([]));
    assert_eq!(resp["data"]["total_pages"], 2);

    // Range + category
    let resp: Value = client
        .get(format!(
            "{}/api/v1/apps?category=Tools&min_price=1.0",
            server.base_url
        ))
        .send()
        .await
        .expect("list tools")
        .json()
        .await
        .expect("parse tools page");
    assert_eq!(resp["data"]["total_apps"], 1);
    assert_eq!(resp["data"]["apps"][0]["app_name"], "Doc Scanner");

    // Unknown category narrows to empty, never to all rows
    let resp: Value = client
        .get(format!("{}/api/v1/apps?category=Nope", server.base_url))
        .send()
        .await
        .expect("list unknown category")
        .json()
        .await
        .expect("parse empty page");
    assert_eq!(resp["data"]["total_apps"], 0);
    assert_eq!(resp["data"]["apps"], json!([]));

    // free=false is a constraint, not "unset"
    let resp: Value = client
        .get(format!("{}/api/v1/apps?free=false", server.base_url))
        .send()
        .await
        .expect("list paid apps")
        .json()
        .await
        .expect("parse paid page");
    assert_eq!(resp["data"]["total_apps"], 1);
    assert_eq!(resp["data"]["apps"][0]["app_id"], "com.example.scanner");

    // Pagination bounds are validated before querying
    for bad in ["page=0", "per_page=0", "per_page=100000"] {
        let resp = client
            .get(format!("{}/api/v1/apps?{}", server.base_url, bad))
            .send()
            .await
            .expect("bad pagination");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{bad}");
    }
}

#[tokio::test]
async fn aggregation_endpoints() {
    let server = common::TestServer::start().await;
    let client = reqwest::Client::new();
    seed_catalog(&client, &server.base_url).await;

    let resp: Value = client
        .get(format!(
            "{}/api/v1/apps/rating_distribution?category=Games",
            server.base_url
        ))
        .send()
        .await
        .expect("rating distribution")
        .json()
        .await
        .expect("parse distribution");
    assert_eq!(
        resp["data"],
        json!([
            { "rating": 4.0, "count": 1 },
            { "rating": 4.5, "count": 1 }
        ])
    );

    let resp: Value = client
        .get(format!("{}/api/v1/apps/release_trend", server.base_url))
        .send()
        .await
        .expect("release trend")
        .json()
        .await
        .expect("parse trend");
    assert_eq!(
        resp["data"],
        json!([
            { "year": 2019, "count": 1 },
            { "year": 2020, "count": 1 },
            { "year": 2021, "count": 1 }
        ])
    );

    let resp: Value = client
        .get(format!(
            "{}/api/v1/apps/update_trend?category=Games",
            server.base_url
        ))
        .send()
        .await
        .expect("update trend")
        .json()
        .await
        .expect("parse update trend");
    assert_eq!(resp["data"], json!([{ "year": 2021, "count": 2 }]));

    let resp: Value = client
        .get(format!(
            "{}/api/v1/apps/average_rating?category=Games",
            server.base_url
        ))
        .send()
        .await
        .expect("average rating")
        .json()
        .await
        .expect("parse average");
    assert_eq!(resp["data"]["category"], "Games");
    assert_eq!(resp["data"]["average_rating"], 4.25);

    // Category detail lookup on an unknown name is a distinct miss
    let resp = client
        .get(format!(
            "{}/api/v1/apps/average_rating?category=Nope",
            server.base_url
        ))
        .send()
        .await
        .expect("average for unknown category");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn average_rating_is_null_on_empty_catalog() {
    let server = common::TestServer::start().await;
    let client = reqwest::Client::new();

    let resp: Value = client
        .get(format!("{}/api/v1/apps/average_rating", server.base_url))
        .send()
        .await
        .expect("average rating")
        .json()
        .await
        .expect("parse average");
    assert_eq!(resp["data"]["category"], "All");
    assert!(resp["data"]["average_rating"].is_null());
}
