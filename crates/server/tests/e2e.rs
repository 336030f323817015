use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::restaurant::repository::mock::MockRestaurantRepository;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes::{self, ServerState};

struct TestApp {
    base_url: String,
    repo: Arc<MockRestaurantRepository>,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let repo = Arc::new(MockRestaurantRepository::default());
    let app = routes::build_router(ServerState::new(repo.clone()), CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, repo })
}

fn olive_garden() -> Value {
    json!({"name": "Olive Garden", "city": "Austin", "estimatedCost": 30, "averageRating": "4.2", "votes": 100})
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(app.url("/health")).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn e2e_restaurant_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let res = client.post(app.url("/restaurant")).json(&olive_garden()).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    assert_eq!(res.headers()["location"], "/restaurant/1");
    assert_eq!(res.json::<Value>().await?, json!({"id": 1}));

    let res = client.post(app.url("/restaurant")).json(&olive_garden()).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "duplicate");
    assert_eq!(body["severity"], "fatal");
    assert_eq!(body["message"], "Restaurant already exist with name Olive Garden and city Austin");

    let res = client.get(app.url("/restaurant/query?city=AUSTIN")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let list: Value = res.json().await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["averageRating"], "4.2");

    let res = client
        .put(app.url("/restaurant/1"))
        .json(&json!({"averageRating": "4.5", "votes": 105}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"id": 1}));

    let one: Value = client.get(app.url("/restaurant/1")).send().await?.json().await?;
    assert_eq!(
        one,
        json!({"id": 1, "name": "Olive Garden", "city": "Austin", "estimatedCost": 30, "averageRating": "4.5", "votes": 105})
    );

    let res = client.delete(app.url("/restaurant/1")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = client.delete(app.url("/restaurant/1")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "exception");
    assert_eq!(body["message"], "Entity with id '1' can't be found.");
    assert!(app.repo.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_put_on_unknown_id_falls_back_to_create() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    // only rating and votes travel in the body, so the fallback create lacks a name
    let res = client
        .put(app.url("/restaurant/9"))
        .json(&json!({"averageRating": "4.5", "votes": 1}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "invalid");
    assert_eq!(body["message"], "Required field [name] missed");
    assert!(app.repo.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_query_and_sort() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();
    for (name, city, rating) in [("A", "Austin", "3.5"), ("B", "Dallas", "4.8"), ("C", "austin", "4.10")] {
        let body = json!({"name": name, "city": city, "estimatedCost": 10, "averageRating": rating, "votes": 1});
        let res = client.post(app.url("/restaurant")).json(&body).send().await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }

    let sorted: Value = client.get(app.url("/restaurant/sort")).send().await?.json().await?;
    let names: Vec<&str> = sorted.as_array().unwrap().iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);

    let by_city: Value = client.get(app.url("/restaurant/query?city=Austin")).send().await?.json().await?;
    assert_eq!(by_city.as_array().map(Vec::len), Some(2));

    // id wins over city and yields a single object
    let single: Value = client.get(app.url("/restaurant/query?id=2&city=Austin")).send().await?.json().await?;
    assert_eq!(single["name"], "B");

    // an empty id falls through to the city filter
    let res = client.get(app.url("/restaurant/query?id=&city=Austin")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let by_city: Value = res.json().await?;
    assert_eq!(by_city.as_array().map(Vec::len), Some(2));

    let res = client.get(app.url("/restaurant/query?id=42")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let empty: Value = client.get(app.url("/restaurant/query?city=%20")).send().await?.json().await?;
    assert_eq!(empty, json!([]));
    let empty: Value = client.get(app.url("/restaurant/query")).send().await?.json().await?;
    assert_eq!(empty, json!([]));

    let all: Value = client.get(app.url("/restaurant")).send().await?.json().await?;
    let ids: Vec<i64> = all.as_array().unwrap().iter().filter_map(|r| r["id"].as_i64()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn e2e_invalid_input_is_400() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let mut bad_rating = olive_garden();
    bad_rating["averageRating"] = json!("four point five");
    let res = client.post(app.url("/restaurant")).json(&bad_rating).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Parameter 'averageRating' should be Decimal number format.");

    let mut missing_city = olive_garden();
    missing_city.as_object_mut().unwrap().remove("city");
    let res = client.post(app.url("/restaurant")).json(&missing_city).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = client
        .post(app.url("/restaurant"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "invalid");

    let res = client.get(app.url("/restaurant/query?id=abc")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    assert_eq!(app.repo.save_count(), 0);
    Ok(())
}

#[tokio::test]
async fn e2e_unsupported_method_is_405() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::Client::new().patch(app.url("/restaurant")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.json::<Value>().await?["code"], "not-supported");
    Ok(())
}

#[tokio::test]
async fn e2e_store_failure_is_500() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.repo.fail_with("connection refused");
    let res = reqwest::get(app.url("/restaurant")).await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "exception");
    assert_eq!(body["severity"], "fatal");
    Ok(())
}
