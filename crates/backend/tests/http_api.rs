mod common;

use backend::routes::configure_routes;
use backend::shared::config::Config;
use backend::shared::state::AppState;
use contracts::domain::a003_emergency_call::aggregate::CallPriority;
use contracts::enums::UserRole;
use serde_json::{json, Value};

use common::*;

struct TestServer {
    base: String,
    client: reqwest::Client,
    state: AppState,
}

impl TestServer {
    async fn start() -> Self {
        let db = test_db().await;
        let state = AppState::new(db, Config::in_memory(), "test-secret".into());
        let app = configure_routes(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
            state,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Sign in and return the access token
    async fn login(&self, username: &str) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/token/"))
            .json(&json!({ "username": username, "password": format!("{}-pass", username) }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200, "login of {}", username);
        let body: Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    async fn post(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn patch(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_health_and_api_root_are_public() {
    let server = TestServer::start().await;

    let health = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);

    let root: Value = server
        .client
        .get(server.url("/api/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(root["endpoints"]["emergency_calls"], "/api/emergency-calls/");
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let server = TestServer::start().await;

    let response = server
        .client
        .get(server.url("/api/ambulances/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = server.get("/api/ambulances/", "not-a-token").await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let server = TestServer::start().await;
    user(&server.state.db, "sarah", UserRole::Dispatcher).await;

    let response = server
        .client
        .post(server.url("/api/auth/token/"))
        .json(&json!({ "username": "sarah", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_navigation_follows_role() {
    let server = TestServer::start().await;
    user(&server.state.db, "sarah", UserRole::Dispatcher).await;
    user(&server.state.db, "lisa", UserRole::Paramedic).await;

    let token = server.login("sarah").await;
    let session: Value = server
        .get("/api/navigation/", &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(session["user"]["role"], "dispatcher");
    let ids: Vec<&str> = session["sections"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|section| section["items"].as_array().unwrap())
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["calls", "tracking", "patients"]);

    let token = server.login("lisa").await;
    let session: Value = server
        .get("/api/navigation/", &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(session["user"]["role"], "paramedic");
    assert_eq!(session["sections"][0]["items"][0]["id"], "patients");
}

#[tokio::test]
async fn test_only_admin_creates_users() {
    let server = TestServer::start().await;
    user(&server.state.db, "root", UserRole::Admin).await;
    user(&server.state.db, "mike", UserRole::Driver).await;
    let new_user = json!({
        "username": "tom",
        "password": "tom-pass",
        "email": "tom@ams.test",
        "full_name": "Tom Driver",
        "role": "driver",
        "phone": "+100000001"
    });

    let driver_token = server.login("mike").await;
    let response = server.post("/api/users/", &driver_token, new_user.clone()).await;
    assert_eq!(response.status(), 403);

    let admin_token = server.login("root").await;
    let response = server.post("/api/users/", &admin_token, new_user).await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_dispatch_flow_over_http() {
    let server = TestServer::start().await;
    user(&server.state.db, "sarah", UserRole::Dispatcher).await;
    let amb = ambulance(&server.state.db, "AMB-001").await;
    let token = server.login("sarah").await;

    let response = server
        .post("/api/emergency-calls/", &token, json!(call_dto(CallPriority::Critical)))
        .await;
    assert_eq!(response.status(), 201);
    let call: Value = response.json().await.unwrap();
    let call_id = call["id"].as_str().unwrap().to_string();
    assert_eq!(call["status"], "pending");

    let pending: Value = server
        .get("/api/emergency-calls/pending/", &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(pending.as_array().unwrap().len(), 1);

    // Skipping straight to completed is refused
    let response = server
        .post(
            &format!("/api/emergency-calls/{}/status/", call_id),
            &token,
            json!({ "status": "completed" }),
        )
        .await;
    assert_eq!(response.status(), 409);

    let response = server
        .post(
            &format!("/api/emergency-calls/{}/assign/", call_id),
            &token,
            json!({ "ambulance_id": amb.id }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let assigned: Value = response.json().await.unwrap();
    assert_eq!(assigned["status"], "assigned");

    let ambulance: Value = server
        .get(&format!("/api/ambulances/{}/", amb.id), &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(ambulance["status"], "assigned");

    let available: Value = server
        .get("/api/ambulances/available/", &token)
        .await
        .json()
        .await
        .unwrap();
    assert!(available.as_array().unwrap().is_empty());

    let response = server
        .post(
            &format!("/api/emergency-calls/{}/status/", call_id),
            &token,
            json!({ "status": "cancelled" }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let ambulance: Value = server
        .get(&format!("/api/ambulances/{}/", amb.id), &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(ambulance["status"], "available");

    let summary: Value = server
        .get("/api/reports/dispatch-summary/", &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(summary["total_calls"], 1);
}

#[tokio::test]
async fn test_missing_call_is_not_found() {
    let server = TestServer::start().await;
    user(&server.state.db, "sarah", UserRole::Dispatcher).await;
    let token = server.login("sarah").await;

    let response = server.get("/api/emergency-calls/missing/", &token).await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_dispatched_ambulance_is_locked_over_http() {
    let server = TestServer::start().await;
    let sarah = user(&server.state.db, "sarah", UserRole::Dispatcher).await;
    user(&server.state.db, "root", UserRole::Admin).await;
    let amb = ambulance(&server.state.db, "AMB-001").await;
    let open_call = call(&server.state.db, CallPriority::High, &claims_for(&sarah)).await;
    let token = server.login("root").await;

    let response = server
        .post(
            &format!("/api/emergency-calls/{}/assign/", open_call.id),
            &token,
            json!({ "ambulance_id": amb.id }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = server
        .patch(
            &format!("/api/ambulances/{}/status/", amb.id),
            &token,
            json!({ "status": "maintenance" }),
        )
        .await;
    assert_eq!(response.status(), 409);

    let response = server
        .delete(&format!("/api/ambulances/{}/", amb.id), &token)
        .await;
    assert_eq!(response.status(), 409);

    let response = server
        .patch(
            &format!("/api/ambulances/{}/location/", amb.id),
            &token,
            json!({ "latitude": 40.75, "longitude": -73.99 }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let moved: Value = response.json().await.unwrap();
    assert_eq!(moved["status"], "assigned");
}

#[tokio::test]
async fn test_dispatcher_cannot_file_inspections() {
    let server = TestServer::start().await;
    user(&server.state.db, "sarah", UserRole::Dispatcher).await;
    let amb = ambulance(&server.state.db, "AMB-001").await;
    let token = server.login("sarah").await;

    let response = server
        .post(
            "/api/inspections/driver/",
            &token,
            json!({
                "ambulance_id": amb.id,
                "date": "2024-09-10",
                "shift": "morning",
                "vehicle_inspection": [],
                "mileage": 1200,
                "fuel_level": 80,
                "overall_status": "ready"
            }),
        )
        .await;
    assert_eq!(response.status(), 403);
}
