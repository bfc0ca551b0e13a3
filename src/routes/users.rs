//! Hosts, guests and area coordinators share one set of handlers; the first
//! path segment picks the [`UserKind`].

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::client::HeavenApi;
use crate::api::fixtures::FixtureSource;
use crate::controller::mutation::MutationDispatcher;
use crate::domain::user::UserKind;
use crate::forms::list::{ListParams, pager_base};
use crate::forms::users::{ApprovalForm, UserStatusForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template, safe_next, service_error_response};
use crate::services::export as export_service;
use crate::services::users as users_service;

fn kind_of(screen: &str) -> Option<UserKind> {
    UserKind::from_slug(screen)
}

#[get("/{screen:hosts|guests|coordinators}")]
pub async fn show_users(
    req: HttpRequest,
    screen: web::Path<String>,
    user: AuthenticatedUser,
    api: web::Data<HeavenApi>,
    dispatcher: web::Data<MutationDispatcher>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(kind) = kind_of(&screen) else {
        return HttpResponse::NotFound().finish();
    };
    let params = match ListParams::from_query(req.query_string()) {
        Ok(params) => params,
        Err(err) => {
            log::warn!("Bad list query: {err}");
            FlashMessage::error("Invalid filter values.").send();
            return redirect(&format!("/{}", kind.slug()));
        }
    };

    let credentials = user.credentials();
    let backend = api.session(&credentials);
    match users_service::load_user_list(&backend, &dispatcher, &user, kind, &params).await {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                kind.slug(),
                &server_config.auth_service_url,
            );
            context.insert("screen", &data.screen);
            context.insert("users", &data.users);
            context.insert("error", &data.error);
            context.insert("filters", &data.filters);
            context.insert("busy_ids", &data.busy_ids);
            context.insert("query_string", req.query_string());
            context.insert("pager_base", &pager_base(req.query_string()));

            render_template(&tera, "users/index.html", &context)
        }
        Err(err) => service_error_response(err, "/na"),
    }
}

#[get("/{screen:hosts|guests|coordinators}/export")]
pub async fn export_users(
    req: HttpRequest,
    screen: web::Path<String>,
    user: AuthenticatedUser,
    api: web::Data<HeavenApi>,
) -> impl Responder {
    let Some(kind) = kind_of(&screen) else {
        return HttpResponse::NotFound().finish();
    };
    let list_url = format!("/{}", kind.slug());
    let params = match ListParams::from_query(req.query_string()) {
        Ok(params) => params,
        Err(err) => {
            log::warn!("Bad export query: {err}");
            return HttpResponse::BadRequest().finish();
        }
    };

    let credentials = user.credentials();
    let backend = api.session(&credentials);
    match export_service::export_users_csv(&backend, &user, kind, &params).await {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", kind.slug()),
            ))
            .body(body),
        Err(err) => service_error_response(err, &list_url),
    }
}

#[get("/{screen:hosts|guests|coordinators}/{id}")]
pub async fn show_user(
    path: web::Path<(String, String)>,
    user: AuthenticatedUser,
    api: web::Data<HeavenApi>,
    placeholders: web::Data<FixtureSource>,
    dispatcher: web::Data<MutationDispatcher>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (screen, id) = path.into_inner();
    let Some(kind) = kind_of(&screen) else {
        return HttpResponse::NotFound().finish();
    };
    let list_url = format!("/{}", kind.slug());

    let credentials = user.credentials();
    let backend = api.session(&credentials);
    match users_service::load_user_detail(
        &backend,
        placeholders.get_ref(),
        &dispatcher,
        &user,
        kind,
        &id,
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                kind.slug(),
                &server_config.auth_service_url,
            );
            context.insert("screen", &data.screen);
            context.insert("user", &data.user);
            context.insert("busy", &data.busy);
            context.insert("bookings", &data.bookings);

            render_template(&tera, "users/show.html", &context)
        }
        Err(err) => service_error_response(err, &list_url),
    }
}

#[post("/{screen:hosts|guests|coordinators}/{id}/status")]
pub async fn change_user_status(
    path: web::Path<(String, String)>,
    user: AuthenticatedUser,
    api: web::Data<HeavenApi>,
    dispatcher: web::Data<MutationDispatcher>,
    web::Form(form): web::Form<UserStatusForm>,
) -> impl Responder {
    let (screen, id) = path.into_inner();
    let Some(kind) = kind_of(&screen) else {
        return HttpResponse::NotFound().finish();
    };
    let list_url = format!("/{}", kind.slug());
    let next = safe_next(form.next.as_deref(), &list_url).to_string();

    let credentials = user.credentials();
    let backend = api.session(&credentials);
    match users_service::change_user_status(&backend, &dispatcher, &user, &id, &form).await {
        Ok(updated) => {
            FlashMessage::success(format!("{} is now {}.", updated.name, updated.status)).send();
            redirect(&next)
        }
        Err(err) => service_error_response(err, &next),
    }
}

#[post("/{screen:hosts|coordinators}/{id}/approval")]
pub async fn change_user_approval(
    path: web::Path<(String, String)>,
    user: AuthenticatedUser,
    api: web::Data<HeavenApi>,
    dispatcher: web::Data<MutationDispatcher>,
    web::Form(form): web::Form<ApprovalForm>,
) -> impl Responder {
    let (screen, id) = path.into_inner();
    let Some(kind) = kind_of(&screen) else {
        return HttpResponse::NotFound().finish();
    };
    let list_url = format!("/{}", kind.slug());
    let next = safe_next(form.next.as_deref(), &list_url).to_string();

    let credentials = user.credentials();
    let backend = api.session(&credentials);
    match users_service::change_user_approval(&backend, &dispatcher, &user, kind, &id, &form)
        .await
    {
        Ok(updated) => {
            FlashMessage::success(format!(
                "{} approval is now {}.",
                updated.name, updated.approval_status
            ))
            .send();
            redirect(&next)
        }
        Err(err) => service_error_response(err, &next),
    }
}
