pub mod api;
pub mod controller;
pub mod domain;
pub mod pagination;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Role required for every dashboard screen.
pub const SERVICE_ACCESS_ROLE: &str = "heaven_admin";

#[cfg(feature = "server")]
pub use server::{configure_routes, run};

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::api::client::HeavenApi;
    use crate::api::fixtures::FixtureSource;
    use crate::controller::mutation::MutationDispatcher;
    use crate::middleware::RedirectUnauthorized;
    use crate::models::config::ServerConfig;
    use crate::routes::api::api_v1_list;
    use crate::routes::main::{logout, not_assigned, show_index};
    use crate::routes::tickets::{change_ticket_status, show_ticket, show_tickets};
    use crate::routes::training::{show_training, show_training_module};
    use crate::routes::users::{
        change_user_approval, change_user_status, export_users, show_user, show_users,
    };

    /// Registers every dashboard route. Handlers expect `HeavenApi`,
    /// `MutationDispatcher`, `FixtureSource`, `Tera` and `ServerConfig` as
    /// app data.
    pub fn configure_routes(cfg: &mut web::ServiceConfig) {
        cfg.service(not_assigned)
            .service(web::scope("/api").service(api_v1_list))
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(show_tickets)
                    .service(show_ticket)
                    .service(change_ticket_status)
                    .service(show_training)
                    .service(show_training_module)
                    .service(show_users)
                    // Before `show_user`, which would take "export" as an id.
                    .service(export_users)
                    .service(show_user)
                    .service(change_user_status)
                    .service(change_user_approval)
                    .service(logout),
            );
    }

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let api = HeavenApi::new(&server_config.api_base_url, server_config.api_timeout())
            .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;
        let api = web::Data::new(api);

        // Shared so a record stays busy across concurrent requests.
        let dispatcher = web::Data::new(MutationDispatcher::new());
        let placeholders = web::Data::new(FixtureSource);

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Serving on {}:{} against {}",
            bind_address.0,
            bind_address.1,
            server_config.api_base_url
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(format!(".{}", server_config.domain)))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .configure(configure_routes)
                .app_data(web::Data::new(tera.clone()))
                .app_data(api.clone())
                .app_data(dispatcher.clone())
                .app_data(placeholders.clone())
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
