use axum::routing::{delete, get, post};
use axum::Router;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{auth, checkins, events, health_check, notifications, registrations};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/notifications", get(notifications::my_notifications))
        .route("/events", post(events::create_event).get(events::list_events))
        .route("/my-events", get(events::my_events))
        .route(
            "/events/:slug",
            get(events::get_event).put(events::update_event),
        )
        .route("/events/:slug/publish", post(events::publish_event))
        .route("/events/:slug/cancel", post(events::cancel_event))
        .route("/events/:slug/attendees", get(events::event_attendees))
        .route("/events/:slug/notify", post(events::notify_attendees))
        .route(
            "/events/:slug/registrations",
            post(registrations::create_registration),
        )
        .route("/registrations", get(registrations::my_registrations))
        .route(
            "/registrations/:id/cancel",
            post(registrations::cancel_registration),
        )
        .route(
            "/registrations/:id/ticket",
            get(registrations::download_ticket),
        )
        .route(
            "/events/:slug/check-ins",
            post(checkins::perform_checkin).get(checkins::list_checkins),
        )
        .route("/events/:slug/check-ins/stats", get(checkins::checkin_stats))
        .route("/events/:slug/scan", get(checkins::scan_lookup))
        .route("/check-ins/:id", delete(checkins::undo_checkin))
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
