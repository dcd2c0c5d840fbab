use anyhow::Result;
use axum::{
    middleware as axum_middleware,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod billing;
pub mod config;
pub mod database;
pub mod drivers;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notify;

use config::Config;
use drivers::payment::{momo::MoMo, vnpay::VnPay, zalopay::ZaloPay, PaymentGateway};
use notify::NotificationHub;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub gateways: Arc<HashMap<String, Arc<dyn PaymentGateway>>>,
    pub hub: Arc<NotificationHub>,
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "rentcp-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // API v1 routes
        .nest("/api/v1", api_v1_routes(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_v1_routes(state: AppState) -> Router<AppState> {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/rooms/public", get(handlers::rooms::list_public_rooms))
        .route("/rooms/public/:id", get(handlers::rooms::get_public_room))
        .route("/search", get(handlers::rooms::search_rooms))
        // Token travels in the query string; the handler validates it itself
        .route("/ws", get(notify::ws_handler))
        // Gateway return redirects carry their own signatures
        .route(
            "/payment/:gateway/return",
            get(handlers::payments::payment_return),
        );

    // Routes for any signed-in user (tenants included)
    let protected_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/password", post(handlers::auth::change_password))
        .route("/contracts/my", get(handlers::contracts::my_contracts))
        .route("/bills/my-bills", get(handlers::bills::my_bills))
        .route("/bills/:id", get(handlers::bills::get_bill))
        .route("/bills/:id/pay-cash", post(handlers::bills::pay_cash))
        .route(
            "/payment/:gateway/create",
            post(handlers::payments::create_payment),
        )
        .route(
            "/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notifications::mark_all_read),
        )
        .route(
            "/notifications/:id/read",
            put(handlers::notifications::mark_read),
        )
        .route(
            "/notifications/:id",
            delete(handlers::notifications::delete_notification),
        )
        .route(
            "/complaints",
            get(handlers::complaints::my_complaints).post(handlers::complaints::create_complaint),
        );

    // Back-office routes: ADMIN or STAFF only
    let admin_routes = Router::new()
        .route(
            "/admin/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/admin/users/:id",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/admin/rooms",
            get(handlers::rooms::list_rooms_admin).post(handlers::rooms::create_room),
        )
        .route(
            "/admin/rooms/:id",
            get(handlers::rooms::get_room)
                .put(handlers::rooms::update_room)
                .delete(handlers::rooms::delete_room),
        )
        .route("/admin/contracts", get(handlers::contracts::list_contracts))
        .route("/admin/contracts/checkin", post(handlers::contracts::checkin))
        .route("/admin/contracts/:id", get(handlers::contracts::get_contract))
        .route("/admin/contracts/:id/end", put(handlers::contracts::end_contract))
        .route(
            "/admin/contracts/:id/cancel",
            put(handlers::contracts::cancel_contract),
        )
        .route(
            "/admin/bills",
            get(handlers::bills::list_bills).post(handlers::bills::create_bill),
        )
        .route(
            "/admin/bills/:id/confirm-cash",
            put(handlers::bills::confirm_cash),
        )
        .route("/admin/complaints", get(handlers::complaints::list_complaints))
        .route(
            "/admin/complaints/:id/status",
            put(handlers::complaints::update_complaint_status),
        )
        .layer(axum_middleware::from_fn(middleware::require_admin));

    let authed = protected_routes.merge(admin_routes).layer(
        axum_middleware::from_fn_with_state(state, middleware::auth_middleware),
    );

    Router::new().merge(public_routes).merge(authed)
}

pub fn initialize_payment_gateways(
    config: &Config,
) -> Result<HashMap<String, Arc<dyn PaymentGateway>>> {
    let mut gateways: HashMap<String, Arc<dyn PaymentGateway>> = HashMap::new();

    if let (Some(tmn_code), Some(hash_secret)) =
        (&config.vnpay_tmn_code, &config.vnpay_hash_secret)
    {
        info!("Initialized VNPAY gateway");
        gateways.insert(
            "vnpay".to_string(),
            Arc::new(VnPay::new(
                tmn_code.clone(),
                hash_secret.clone(),
                config.vnpay_pay_url.clone(),
            )),
        );
    }

    if let (Some(partner_code), Some(access_key), Some(secret_key)) = (
        &config.momo_partner_code,
        &config.momo_access_key,
        &config.momo_secret_key,
    ) {
        match MoMo::new(
            partner_code.clone(),
            access_key.clone(),
            secret_key.clone(),
            config.momo_endpoint.clone(),
        ) {
            Ok(gateway) => {
                info!("Initialized MoMo gateway");
                gateways.insert("momo".to_string(), Arc::new(gateway));
            }
            Err(e) => {
                tracing::warn!("Failed to initialize MoMo gateway: {}", e);
            }
        }
    }

    if let (Some(app_id), Some(key1)) = (&config.zalopay_app_id, &config.zalopay_key1) {
        match ZaloPay::new(
            app_id.clone(),
            key1.clone(),
            config.zalopay_endpoint.clone(),
        ) {
            Ok(gateway) => {
                info!("Initialized ZaloPay gateway");
                gateways.insert("zalopay".to_string(), Arc::new(gateway));
            }
            Err(e) => {
                tracing::warn!("Failed to initialize ZaloPay gateway: {}", e);
            }
        }
    }

    // Online payment is optional: a cash-only deployment runs with no gateways.
    info!(
        "Initialized {} payment gateways: {:?}",
        gateways.len(),
        gateways.keys().collect::<Vec<_>>()
    );
    Ok(gateways)
}
