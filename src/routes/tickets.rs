use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::client::HeavenApi;
use crate::controller::mutation::MutationDispatcher;
use crate::forms::list::{ListParams, pager_base};
use crate::forms::tickets::TicketStatusForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template, safe_next, service_error_response};
use crate::services::tickets as tickets_service;

#[get("/tickets")]
pub async fn show_tickets(
    req: HttpRequest,
    user: AuthenticatedUser,
    api: web::Data<HeavenApi>,
    dispatcher: web::Data<MutationDispatcher>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = match ListParams::from_query(req.query_string()) {
        Ok(params) => params,
        Err(err) => {
            log::warn!("Bad ticket query: {err}");
            FlashMessage::error("Invalid filter values.").send();
            return redirect("/tickets");
        }
    };

    let credentials = user.credentials();
    let backend = api.session(&credentials);
    match tickets_service::load_ticket_list(&backend, &dispatcher, &user, &params).await {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "tickets",
                &server_config.auth_service_url,
            );
            context.insert("tickets", &data.tickets);
            context.insert("error", &data.error);
            context.insert("filters", &data.filters);
            context.insert("busy_ids", &data.busy_ids);
            context.insert("statuses", &tickets_service::TICKET_STATUSES);
            context.insert("query_string", req.query_string());
            context.insert("pager_base", &pager_base(req.query_string()));

            render_template(&tera, "tickets/index.html", &context)
        }
        Err(err) => service_error_response(err, "/na"),
    }
}

#[get("/tickets/{id}")]
pub async fn show_ticket(
    id: web::Path<String>,
    user: AuthenticatedUser,
    api: web::Data<HeavenApi>,
    dispatcher: web::Data<MutationDispatcher>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let credentials = user.credentials();
    let backend = api.session(&credentials);
    match tickets_service::load_ticket_detail(&backend, &dispatcher, &user, &id).await {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "tickets",
                &server_config.auth_service_url,
            );
            context.insert("ticket", &data.ticket);
            context.insert("busy", &data.busy);
            context.insert("statuses", &data.statuses);

            render_template(&tera, "tickets/show.html", &context)
        }
        Err(err) => service_error_response(err, "/tickets"),
    }
}

#[post("/tickets/{id}/status")]
pub async fn change_ticket_status(
    id: web::Path<String>,
    user: AuthenticatedUser,
    api: web::Data<HeavenApi>,
    dispatcher: web::Data<MutationDispatcher>,
    web::Form(form): web::Form<TicketStatusForm>,
) -> impl Responder {
    let next = safe_next(form.next.as_deref(), "/tickets").to_string();

    let credentials = user.credentials();
    let backend = api.session(&credentials);
    match tickets_service::change_ticket_status(&backend, &dispatcher, &user, &id, &form).await {
        Ok(updated) => {
            FlashMessage::success(format!("Ticket {} is now {}.", updated.number, updated.status))
                .send();
            redirect(&next)
        }
        Err(err) => service_error_response(err, &next),
    }
}
