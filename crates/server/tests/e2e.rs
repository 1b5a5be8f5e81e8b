use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use configs::AppConfig;

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let dir = std::env::temp_dir().join(format!("car_doctor_e2e_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.database.data_dir = dir.to_string_lossy().into_owned();
    cfg.auth.token_secret = Some("e2e-secret".into());

    let app = server::startup::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, client: reqwest::Client::new(), dir })
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[tokio::test]
async fn e2e_booking_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;

    let resp = app.client.get(app.url("/")).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    assert_eq!(resp.text().await?, "car doctor server is running");

    // login
    let resp = app.client.post(app.url("/jwt")).json(&json!({"email": "a@x.com"})).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let cookie = resp
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
        .expect("session cookie");
    assert!(cookie.starts_with("token="));
    assert_eq!(resp.json::<Value>().await?, json!({"success": true}));

    // book
    let resp = app
        .client
        .post(app.url("/bookings"))
        .json(&json!({"email": "a@x.com", "serviceName": "Oil change", "price": 40}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let id = resp.json::<Value>().await?["insertedId"].as_str().unwrap().to_string();

    // list without and with the cookie
    let resp = app.client.get(app.url("/bookings?email=a@x.com")).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::UNAUTHORIZED);

    let resp = app.client.get(app.url("/bookings?email=a@x.com")).header(COOKIE, &cookie).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let list = resp.json::<Value>().await?;
    assert!(list.as_array().unwrap().iter().any(|b| b["_id"] == id.as_str()));

    let resp = app.client.get(app.url("/bookings?email=b@x.com")).header(COOKIE, &cookie).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::FORBIDDEN);

    // confirm then delete
    let resp = app
        .client
        .patch(app.url(&format!("/bookings/{id}")))
        .json(&json!({"confirmationStatus": "confirmed"}))
        .send()
        .await?;
    assert_eq!(resp.json::<Value>().await?["modifiedCount"], 1);

    let resp = app.client.delete(app.url(&format!("/bookings/{id}"))).send().await?;
    assert_eq!(resp.json::<Value>().await?["deletedCount"], 1);
    Ok(())
}

#[tokio::test]
async fn e2e_cors_preflight_allows_configured_origin() -> anyhow::Result<()> {
    let app = start_server().await?;
    let resp = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/bookings"))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await?;
    assert!(resp.status().is_success());
    let headers = resp.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "http://localhost:5173");
    assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
    let mut methods: Vec<String> = headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()?
        .split(',')
        .map(|m| m.trim().to_string())
        .collect();
    methods.sort();
    assert_eq!(methods, vec!["DELETE", "GET", "OPTIONS", "PATCH", "POST"]);
    Ok(())
}
