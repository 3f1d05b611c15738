//! # Web API Module
//!
//! Axum-based REST surface: route table, shared state, middleware stack
//! and the server entry point.
//!
//! ## Route Map
//!
//! - `GET /` - liveness check (public)
//! - `POST /api/auth/register`, `POST /api/auth/login` - public
//! - everything else under `/api` - JWT bearer token required

use axum::routing::{get, post, put};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::database;

pub mod auth;
pub mod authz;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod state;
pub mod validation;

use state::AppState;

/// Assemble the full application router around the shared state.
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::health::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    let protected_routes = Router::new()
        .route("/api/auth/change-password", put(handlers::auth::change_password))
        .route("/api/users", get(handlers::users::list))
        .route("/api/users/profile", get(handlers::users::own_profile))
        .route(
            "/api/users/:id",
            get(handlers::users::get)
                .put(handlers::users::update)
                .delete(handlers::users::remove),
        )
        .route(
            "/api/profiles",
            post(handlers::profiles::create).get(handlers::profiles::list),
        )
        .route(
            "/api/profiles/:id",
            get(handlers::profiles::get)
                .put(handlers::profiles::update)
                .delete(handlers::profiles::remove),
        )
        .route(
            "/api/member-categories",
            post(handlers::member_categories::create).get(handlers::member_categories::list),
        )
        .route(
            "/api/member-categories/:id",
            get(handlers::member_categories::get)
                .put(handlers::member_categories::update)
                .delete(handlers::member_categories::remove),
        )
        .route(
            "/api/member-category-users",
            post(handlers::member_category_users::create)
                .get(handlers::member_category_users::list),
        )
        .route(
            "/api/member-category-users/:userId/:categoryId",
            get(handlers::member_category_users::get)
                .delete(handlers::member_category_users::remove),
        )
        .route(
            "/api/event-types",
            post(handlers::event_types::create).get(handlers::event_types::list),
        )
        .route(
            "/api/event-types/:id",
            get(handlers::event_types::get)
                .put(handlers::event_types::update)
                .delete(handlers::event_types::remove),
        )
        .route("/api/events", post(handlers::events::create).get(handlers::events::list))
        .route(
            "/api/events/:id",
            get(handlers::events::get)
                .put(handlers::events::update)
                .delete(handlers::events::remove),
        )
        .route(
            "/api/monthly-contributions",
            post(handlers::monthly_contributions::create)
                .get(handlers::monthly_contributions::list),
        )
        .route(
            "/api/monthly-contributions/:id",
            get(handlers::monthly_contributions::get)
                .put(handlers::monthly_contributions::update)
                .delete(handlers::monthly_contributions::remove),
        )
        .route(
            "/api/event-contributions",
            post(handlers::event_contributions::create).get(handlers::event_contributions::list),
        )
        .route(
            "/api/event-contributions/:id",
            get(handlers::event_contributions::get)
                .put(handlers::event_contributions::update)
                .delete(handlers::event_contributions::remove),
        )
        .route(
            "/api/assistance-requests",
            post(handlers::assistance_requests::create).get(handlers::assistance_requests::list),
        )
        .route(
            "/api/assistance-requests/:id",
            get(handlers::assistance_requests::get)
                .put(handlers::assistance_requests::update)
                .delete(handlers::assistance_requests::remove),
        )
        .route(
            "/api/fund-transactions",
            post(handlers::fund_transactions::create).get(handlers::fund_transactions::list),
        )
        .route(
            "/api/fund-transactions/:id",
            get(handlers::fund_transactions::get)
                .put(handlers::fund_transactions::update)
                .delete(handlers::fund_transactions::remove),
        )
        .route(
            "/api/sanctions",
            post(handlers::sanctions::create).get(handlers::sanctions::list),
        )
        .route(
            "/api/sanctions/:id",
            get(handlers::sanctions::get)
                .put(handlers::sanctions::update)
                .delete(handlers::sanctions::remove),
        )
        .route(
            "/api/family-meetings",
            post(handlers::family_meetings::create).get(handlers::family_meetings::list),
        )
        .route(
            "/api/family-meetings/:id",
            get(handlers::family_meetings::get)
                .put(handlers::family_meetings::update)
                .delete(handlers::family_meetings::remove),
        )
        .route(
            "/api/meeting-attendances",
            post(handlers::meeting_attendances::create).get(handlers::meeting_attendances::list),
        )
        .route(
            "/api/meeting-attendances/:meetingId/:userId",
            get(handlers::meeting_attendances::get)
                .put(handlers::meeting_attendances::update)
                .delete(handlers::meeting_attendances::remove),
        )
        .route(
            "/api/notifications",
            post(handlers::notifications::create).get(handlers::notifications::list),
        )
        .route("/api/notifications/:id/read", put(handlers::notifications::mark_read))
        .route(
            "/api/notifications/:id",
            get(handlers::notifications::get).delete(handlers::notifications::remove),
        )
        .route(
            "/api/settings",
            post(handlers::settings::create).get(handlers::settings::list),
        )
        .route(
            "/api/settings/:key",
            get(handlers::settings::get)
                .put(handlers::settings::update)
                .delete(handlers::settings::remove),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let router = public_routes.merge(protected_routes);
    middleware::apply_middleware_stack(router, config).with_state(state)
}

/// Bind the configured address and run the server until shutdown.
pub async fn serve(config: AppConfig, pool: PgPool) -> crate::Result<()> {
    let bind_address = config.server.bind_address.clone();
    let state = AppState::new(pool.clone(), config.clone());
    let router = build_router(state, &config);

    let listener = TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database::shutdown(pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_router_builds_without_live_database() {
        let config = AppConfig::default();
        let pool = PgPool::connect_lazy("postgres://localhost/famfund_test")
            .expect("lazy pool construction does not touch the network");
        let state = AppState::new(pool, config.clone());
        let _router = build_router(state, &config);
    }
}
