use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::fixtures::FixtureSource;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, render_template, service_error_response};
use crate::services::training as training_service;

#[get("/training")]
pub async fn show_training(
    user: AuthenticatedUser,
    placeholders: web::Data<FixtureSource>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match training_service::load_training(placeholders.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "training",
                &server_config.auth_service_url,
            );
            context.insert("modules", &data.modules);
            render_template(&tera, "training/index.html", &context)
        }
        Err(err) => service_error_response(err, "/na"),
    }
}

#[get("/training/{module_id}")]
pub async fn show_training_module(
    module_id: web::Path<i64>,
    user: AuthenticatedUser,
    placeholders: web::Data<FixtureSource>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match training_service::load_training_module(
        placeholders.get_ref(),
        &user,
        module_id.into_inner(),
    ) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "training",
                &server_config.auth_service_url,
            );
            context.insert("module", &data.module);
            context.insert("total_minutes", &data.total_minutes);
            render_template(&tera, "training/show.html", &context)
        }
        Err(err) => service_error_response(err, "/training"),
    }
}
