use std::time::Duration;

use actix_identity::{Identity, IdentityMiddleware};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpMessage, HttpRequest, HttpResponse, test, web};
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::{FlashMessagesFramework, Level};
use tera::Tera;

use heaven_admin::api::client::HeavenApi;
use heaven_admin::api::fixtures::FixtureSource;
use heaven_admin::configure_routes;
use heaven_admin::controller::mutation::MutationDispatcher;
use heaven_admin::models::auth::AuthenticatedUser;
use heaven_admin::models::config::ServerConfig;
use heaven_admin::routes::alert_level_to_str;

mod common;

use common::{GOOD_TOKEN, spawn_backend};

const SECRET: &str = "test-secret-test-secret-test-secret-test-secret-test-secret-0001";

fn server_config(api_base_url: &str) -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        templates_dir: "templates/**/*".to_string(),
        secret: SECRET.to_string(),
        auth_service_url: "http://auth.localhost".to_string(),
        api_base_url: api_base_url.to_string(),
        api_timeout_secs: 5,
    }
}

/// Signs in as `sub` 42 with the given role and backend token.
async fn test_login(req: HttpRequest, path: web::Path<(String, String)>) -> HttpResponse {
    let (role, token) = path.into_inner();
    let user = AuthenticatedUser {
        sub: "42".to_string(),
        email: "admin@example.com".to_string(),
        name: "Admin".to_string(),
        roles: vec![role],
        session_id: "sess-1".to_string(),
        token,
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    let jwt = user.to_jwt(SECRET).unwrap();
    Identity::login(&req.extensions(), jwt).unwrap();
    HttpResponse::Ok().finish()
}

macro_rules! dashboard {
    ($base_url:expr) => {{
        let key = Key::from(SECRET.as_bytes());
        let store = CookieMessageStore::builder(key.clone()).build();
        let flash = FlashMessagesFramework::builder(store).build();
        test::init_service(
            App::new()
                .wrap(flash)
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key)
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new(Tera::new("templates/**/*").unwrap()))
                .app_data(web::Data::new(
                    HeavenApi::new($base_url, Duration::from_secs(5)).unwrap(),
                ))
                .app_data(web::Data::new(MutationDispatcher::new()))
                .app_data(web::Data::new(FixtureSource))
                .app_data(web::Data::new(server_config($base_url)))
                .route("/test/login/{role}/{token}", web::post().to(test_login))
                .configure(configure_routes),
        )
        .await
    }};
}

macro_rules! sign_in {
    ($app:expr, $role:expr, $token:expr) => {{
        let req = test::TestRequest::post()
            .uri(&format!("/test/login/{}/{}", $role, $token))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        resp.response()
            .cookies()
            // Like a browser, drop cookies the response asked to delete.
            .filter(|c| c.max_age() != Some(actix_web::cookie::time::Duration::ZERO))
            .map(Cookie::into_owned)
            .collect::<Vec<_>>()
    }};
}

fn with_cookies(mut req: test::TestRequest, cookies: &[Cookie<'static>]) -> test::TestRequest {
    for cookie in cookies {
        req = req.cookie(cookie.clone());
    }
    req
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn anonymous_visitor_is_sent_to_signin() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);

    let req = test::TestRequest::get().uri("/hosts").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/signin");
    assert!(backend.requests().is_empty());
}

#[actix_web::test]
async fn user_without_admin_role_is_not_assigned() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_support", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::get().uri("/hosts"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/na");
    assert!(backend.requests().is_empty());
}

#[actix_web::test]
async fn expired_backend_session_is_sent_to_signin() {
    let (base_url, _backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", "expired");

    let req = with_cookies(test::TestRequest::get().uri("/guests"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/signin");
}

#[actix_web::test]
async fn host_list_renders_backend_rows() {
    let (base_url, _backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::get().uri("/hosts"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Ana Costa"));
    assert!(body.contains("Carla Dias"));
    assert!(body.contains("Location only narrows the rows on this page."));
}

#[actix_web::test]
async fn json_list_applies_badge_filter() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(
        test::TestRequest::get().uri("/api/v1/hosts?status=verified"),
        &cookies,
    )
    .to_request();
    let page: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let items = page["users"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|u| u["status"] == "verified"));
    assert_eq!(backend.requests()[0].body["status"], serde_json::json!(["ACTIVE"]));
}

#[actix_web::test]
async fn location_refines_current_page_only() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(
        test::TestRequest::get().uri("/api/v1/hosts?location=porto"),
        &cookies,
    )
    .to_request();
    let page: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let items = page["users"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Bruno Silva");
    assert!(backend.requests()[0].body.get("location").is_none());
}

#[actix_web::test]
async fn suspend_redirects_to_next_and_updates_backend() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::post().uri("/hosts/2/status"), &cookies)
        .set_form([("action", "suspend"), ("next", "/hosts?page=1")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/hosts?page=1");
    assert_eq!(backend.user(2).unwrap()["status"], "SUSPENDED");
}

#[actix_web::test]
async fn refused_status_change_goes_back_to_list() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::post().uri("/hosts/1/status"), &cookies)
        .set_form([("action", "suspend"), ("next", "//evil.example.com")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/hosts");
    assert_eq!(backend.user(1).unwrap()["status"], "ACTIVE");
}

#[actix_web::test]
async fn guests_have_no_approval_route() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::post().uri("/guests/10/approval"), &cookies)
        .set_form([("decision", "approve")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(backend.requests().is_empty());
}

#[actix_web::test]
async fn export_returns_csv_of_filtered_page() {
    let (base_url, _backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(
        test::TestRequest::get().uri("/hosts/export?status=verified"),
        &cookies,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("id,name,email"));
    assert!(lines[1].starts_with("1,Ana Costa,ana@example.com"));
}

#[actix_web::test]
async fn approve_pending_host() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::post().uri("/hosts/3/approval"), &cookies)
        .set_form([("decision", "approve"), ("next", "/hosts/3")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/hosts/3");
    assert_eq!(backend.count("PATCH", "/users/3/approval"), 1);
    assert_eq!(backend.user(3).unwrap()["approval_status"], "APPROVED");
}

#[actix_web::test]
async fn reject_sends_reason_with_decision() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::post().uri("/hosts/3/approval"), &cookies)
        .set_form([("decision", "reject"), ("reason", "Photos < 3 & blurry")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/hosts");
    let carla = backend.user(3).unwrap();
    assert_eq!(carla["approval_status"], "REJECTED");
    assert_eq!(carla["rejection_reason"], "Photos < 3 & blurry");
}

#[actix_web::test]
async fn reject_with_blank_reason_sends_nothing() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(
        test::TestRequest::post().uri("/coordinators/3/approval"),
        &cookies,
    )
    .set_form([("decision", "reject"), ("reason", "   "), ("next", "/\\evil.example")])
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/coordinators");
    assert_eq!(backend.count("PATCH", "/approval"), 0);
    assert_eq!(backend.user(3).unwrap()["approval_status"], "PENDING");
}

#[actix_web::test]
async fn ticket_list_renders_backend_rows() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::get().uri("/tickets"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Leaking roof"));
    assert!(body.contains("Refund request"));
    assert_eq!(backend.count("POST", "/issues/search"), 1);
}

#[actix_web::test]
async fn ticket_detail_shows_subject_and_reporter() {
    let (base_url, _backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::get().uri("/tickets/7"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("HC-7"));
    assert!(body.contains("Leaking roof"));
    assert!(body.contains("gil@example.com"));
}

#[actix_web::test]
async fn resolving_ticket_redirects_back_to_it() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::post().uri("/tickets/7/status"), &cookies)
        .set_form([("status", "RESOLVED"), ("next", "/tickets/7")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/tickets/7");
    assert_eq!(backend.count("PATCH", "/issues/7/status"), 1);
    assert_eq!(backend.issue(7).unwrap()["status"], "RESOLVED");
}

#[actix_web::test]
async fn unknown_ticket_status_is_refused_before_backend() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::post().uri("/tickets/7/status"), &cookies)
        .set_form([("status", "ESCALATED")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/tickets");
    assert!(backend.requests().is_empty());
    assert_eq!(backend.issue(7).unwrap()["status"], "OPEN");
}

#[actix_web::test]
async fn training_lists_fixture_modules() {
    let (base_url, backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::get().uri("/training"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Welcome to Heaven Connect"));
    assert!(body.contains("Coordinator onboarding"));
    assert!(backend.requests().is_empty());
}

#[actix_web::test]
async fn training_module_shows_lessons_and_total() {
    let (base_url, _backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::get().uri("/training/2"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Listing photography"));
    assert!(body.contains("Staging rooms"));
    assert!(body.contains("21 min"));
}

#[actix_web::test]
async fn missing_training_module_goes_back_to_list() {
    let (base_url, _backend) = spawn_backend();
    let app = dashboard!(&base_url);
    let cookies = sign_in!(app, "heaven_admin", GOOD_TOKEN);

    let req = with_cookies(test::TestRequest::get().uri("/training/99"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/training");
}
