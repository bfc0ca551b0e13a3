//! JSON variants of the list screens.

use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use serde_json::json;

use crate::api::client::HeavenApi;
use crate::controller::mutation::MutationDispatcher;
use crate::domain::user::UserKind;
use crate::forms::list::ListParams;
use crate::models::auth::AuthenticatedUser;
use crate::services::tickets as tickets_service;
use crate::services::users as users_service;
use crate::services::ServiceError;

fn json_error(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::SessionExpired | ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().finish()
        }
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        err => {
            log::error!("API request failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/{screen}")]
pub async fn api_v1_list(
    req: HttpRequest,
    screen: web::Path<String>,
    user: AuthenticatedUser,
    api: web::Data<HeavenApi>,
    dispatcher: web::Data<MutationDispatcher>,
) -> impl Responder {
    let params = match ListParams::from_query(req.query_string()) {
        Ok(params) => params,
        Err(err) => return json_error(ServiceError::from(err)),
    };

    let credentials = user.credentials();
    let backend = api.session(&credentials);

    if screen.as_str() == "tickets" {
        return match tickets_service::load_ticket_list(&backend, &dispatcher, &user, &params).await
        {
            Ok(page) => HttpResponse::Ok().json(page),
            Err(err) => json_error(err),
        };
    }

    let Some(kind) = UserKind::from_slug(&screen) else {
        return json_error(ServiceError::NotFound);
    };
    match users_service::load_user_list(&backend, &dispatcher, &user, kind, &params).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => json_error(err),
    }
}
