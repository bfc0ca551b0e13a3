//! In-process stand-in for the backend REST API.
//!
//! Serves `/api/v1/{users,issues}` from a small mutable fixture on a random
//! local port and records every request it receives.
#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

use heaven_admin::api::SessionCredentials;

pub const GOOD_TOKEN: &str = "good-token";

/// Status change the fake refuses, with the backend's own wording.
pub const PROTECTED_USER_ID: i64 = 1;
pub const PROTECTED_MESSAGE: &str = "Cannot suspend last active admin";

pub fn credentials(token: &str) -> SessionCredentials {
    SessionCredentials {
        token: token.to_string(),
        user_id: "42".to_string(),
        session_id: "sess-1".to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Value,
    pub authorization: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListShape {
    Array,
    Envelope,
}

#[derive(Clone)]
pub struct FakeBackend {
    users: Arc<Mutex<Vec<Value>>>,
    issues: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shape: Arc<Mutex<ListShape>>,
}

impl FakeBackend {
    fn new() -> Self {
        let users = vec![
            json!({
                "id": 1, "first_name": "Ana", "last_name": "Costa",
                "email": "ana@example.com", "user_type": "HOST",
                "status": "ACTIVE", "approval_status": "APPROVED",
                "address": {"city": "Lisbon", "country": "Portugal"},
                "created_at": "2024-03-01T10:00:00Z"
            }),
            json!({
                "id": 2, "first_name": "Bruno", "last_name": "Silva",
                "email": "bruno@example.com", "user_type": "HOST",
                "status": "ACTIVE", "approval_status": "APPROVED",
                "address": {"city": "Porto", "country": "Portugal"}
            }),
            json!({
                "id": 3, "first_name": "Carla", "last_name": "Dias",
                "email": "carla@example.com", "user_type": "HOST",
                "status": "PENDING", "approval_status": "PENDING",
                "address": {"city": "Faro", "country": "Portugal"}
            }),
            json!({
                "id": 10, "first_name": "Gil", "email": "gil@example.com",
                "user_type": "GUEST", "status": "ACTIVE"
            }),
        ];
        let issues = vec![
            json!({
                "id": 7, "ticket_number": "HC-7", "subject": "Leaking roof",
                "status": "OPEN", "priority": "HIGH",
                "reporter": {"first_name": "Gil", "email": "gil@example.com"}
            }),
            json!({
                "id": 8, "ticket_number": "HC-8", "subject": "Refund request",
                "status": "RESOLVED"
            }),
        ];
        Self {
            users: Arc::new(Mutex::new(users)),
            issues: Arc::new(Mutex::new(issues)),
            requests: Arc::default(),
            shape: Arc::new(Mutex::new(ListShape::Envelope)),
        }
    }

    pub fn set_shape(&self, shape: ListShape) {
        *self.shape.lock().unwrap() = shape;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path_suffix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path.ends_with(path_suffix))
            .count()
    }

    pub fn user(&self, id: i64) -> Option<Value> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u["id"] == id)
            .cloned()
    }

    pub fn issue(&self, id: i64) -> Option<Value> {
        self.issues
            .lock()
            .unwrap()
            .iter()
            .find(|i| i["id"] == id)
            .cloned()
    }

    fn record(&self, req: &HttpRequest, body: Value) {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            method: req.method().to_string(),
            path: req.path().to_string(),
            body,
            authorization: header("authorization"),
            user_id: header("x-user-id"),
            session_id: header("x-session-id"),
            request_id: header("x-request-id"),
        });
    }

    fn collection(&self, name: &str) -> Option<&Arc<Mutex<Vec<Value>>>> {
        match name {
            "users" => Some(&self.users),
            "issues" => Some(&self.issues),
            _ => None,
        }
    }

    fn search(&self, collection: &str, body: &Value) -> HttpResponse {
        if body["search_query"] == "boom" {
            return HttpResponse::Ok()
                .json(json!({"status": false, "errMessage": "Search index offline", "data": {}}));
        }
        let Some(records) = self.collection(collection) else {
            return HttpResponse::NotFound().finish();
        };

        let wanted = |field: &str, record: &Value| match body.get(field).and_then(Value::as_array) {
            Some(values) => values.contains(&record[field]),
            None => true,
        };
        let needle = body["search_query"].as_str().map(str::to_lowercase);
        let matches: Vec<Value> = records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                wanted("user_type", r) && wanted("status", r) && wanted("approval_status", r)
            })
            .filter(|r| match &needle {
                Some(needle) => r.to_string().to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();

        let page = body["page"].as_u64().unwrap_or(1).max(1) as usize;
        let limit = body["limit"].as_u64().unwrap_or(10) as usize;
        let total = matches.len();
        let list: Vec<Value> = matches
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        let data = match *self.shape.lock().unwrap() {
            ListShape::Array => json!(list),
            ListShape::Envelope => json!({
                "list": list,
                "pagination": {"page": page, "limit": limit, "total": total}
            }),
        };
        HttpResponse::Ok().json(json!({"status": true, "data": data}))
    }

    fn get(&self, collection: &str, id: &str) -> HttpResponse {
        let found = self.collection(collection).and_then(|records| {
            records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r["id"].to_string() == id)
                .cloned()
        });
        match found {
            Some(record) => HttpResponse::Ok().json(json!({"status": true, "data": record})),
            None => HttpResponse::NotFound().finish(),
        }
    }

    fn patch(&self, collection: &str, id: &str, field: &str, body: &Value) -> HttpResponse {
        if collection == "users" && field == "status" && id == PROTECTED_USER_ID.to_string() {
            return HttpResponse::BadRequest()
                .json(json!({"status": false, "errMessage": PROTECTED_MESSAGE}));
        }
        let Some(records) = self.collection(collection) else {
            return HttpResponse::NotFound().finish();
        };
        let mut records = records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|r| r["id"].to_string() == id) else {
            return HttpResponse::NotFound().finish();
        };
        match field {
            "status" => record["status"] = body["status"].clone(),
            "approval" => {
                record["approval_status"] = body["approval_status"].clone();
                record["rejection_reason"] = body
                    .get("rejection_reason")
                    .cloned()
                    .unwrap_or(Value::Null);
            }
            _ => return HttpResponse::NotFound().finish(),
        }
        HttpResponse::Ok().json(json!({"status": true, "data": record.clone()}))
    }
}

async fn handle(
    req: HttpRequest,
    body: web::Bytes,
    backend: web::Data<FakeBackend>,
) -> HttpResponse {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    backend.record(&req, body.clone());

    let authorized = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {GOOD_TOKEN}").as_str());
    if !authorized {
        return HttpResponse::Unauthorized().finish();
    }

    let path = req.path().trim_start_matches("/api/v1/").to_string();
    let segments: Vec<&str> = path.split('/').collect();
    match (req.method().as_str(), segments.as_slice()) {
        ("POST", [collection, "search"]) => backend.search(collection, &body),
        ("GET", [collection, id]) => backend.get(collection, id),
        ("PATCH", [collection, id, field]) => backend.patch(collection, id, field, &body),
        _ => HttpResponse::NotFound().finish(),
    }
}

/// Starts the fake on `127.0.0.1` and returns its base URL.
///
/// Must be called from inside an Actix system, e.g. an `#[actix_web::test]`.
pub fn spawn_backend() -> (String, FakeBackend) {
    let backend = FakeBackend::new();
    let data = web::Data::new(backend.clone());
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .default_service(web::to(handle))
    })
    .workers(1)
    .disable_signals()
    .listen(listener)
    .unwrap()
    .run();
    actix_web::rt::spawn(server);

    (format!("http://{addr}"), backend)
}
