use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use event_ticketing::config::AppConfig;
use event_ticketing::gateways::mock::MockGateway;
use event_ticketing::gateways::stripe::StripeGateway;
use event_ticketing::gateways::CheckoutGateway;
use event_ticketing::http::{handlers, middleware};
use event_ticketing::repo::events_repo::EventsRepo;
use event_ticketing::repo::payments_repo::PaymentsRepo;
use event_ticketing::repo::promotions_repo::PromotionsRepo;
use event_ticketing::repo::tickets_repo::TicketsRepo;
use event_ticketing::repo::users_repo::UsersRepo;
use event_ticketing::repo::webhook_events_repo::WebhookEventsRepo;
use event_ticketing::service::event_service::EventService;
use event_ticketing::service::mailer::Mailer;
use event_ticketing::service::payment_service::PaymentService;
use event_ticketing::service::promotion_service::PromotionService;
use event_ticketing::service::reconciliation::ReconciliationService;
use event_ticketing::service::report::ReportService;
use event_ticketing::service::ticket_service::TicketService;
use event_ticketing::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let events_repo = EventsRepo { pool: pool.clone() };
    let tickets_repo = TicketsRepo { pool: pool.clone() };
    let payments_repo = PaymentsRepo { pool: pool.clone() };
    let promotions_repo = PromotionsRepo { pool: pool.clone() };
    let users_repo = UsersRepo { pool: pool.clone() };
    let webhook_events_repo = WebhookEventsRepo { pool: pool.clone() };

    let gateway: Arc<dyn CheckoutGateway> = if cfg.stripe_secret_key.is_empty() {
        tracing::warn!("no gateway credentials configured, using the mock checkout gateway");
        Arc::new(MockGateway {
            checkout_base: "http://localhost:3000/mock-checkout".to_string(),
            behavior: std::env::var("MOCK_GATEWAY_BEHAVIOR")
                .unwrap_or_else(|_| "ALWAYS_SUCCESS".to_string()),
        })
    } else {
        Arc::new(StripeGateway {
            base_url: cfg.stripe_base_url.clone(),
            secret_key: cfg.stripe_secret_key.clone(),
            timeout_ms: cfg.gateway_timeout_ms,
            client: reqwest::Client::new(),
        })
    };

    let mailer = Mailer::from_config(&cfg);

    let event_service = EventService {
        events_repo: events_repo.clone(),
        promotions_repo: promotions_repo.clone(),
    };
    let ticket_service = TicketService {
        pool: pool.clone(),
        tickets_repo: tickets_repo.clone(),
        events_repo: events_repo.clone(),
        promotions_repo: promotions_repo.clone(),
    };
    let payment_service = PaymentService {
        payments_repo: payments_repo.clone(),
        tickets_repo: tickets_repo.clone(),
        gateway: gateway.clone(),
    };
    let promotion_service = PromotionService {
        promotions_repo: promotions_repo.clone(),
        events_repo: events_repo.clone(),
    };
    let reconciliation = ReconciliationService {
        payments_repo: payments_repo.clone(),
        tickets_repo: tickets_repo.clone(),
        events_repo: events_repo.clone(),
        users_repo: users_repo.clone(),
        webhook_events_repo,
        mailer: mailer.clone(),
    };
    let report_service = ReportService { pool: pool.clone() };

    let state = AppState {
        config: cfg.clone(),
        users_repo,
        event_service,
        ticket_service,
        payment_service,
        promotion_service,
        reconciliation,
        report_service,
        gateway,
        mailer,
    };

    let admin_key = cfg.internal_api_key.clone();
    let admin_routes = Router::new()
        .route("/events/all", get(handlers::events::list_all_events))
        .route("/payments/:payment_id/status", post(handlers::payments::update_status))
        .route("/revenue", get(handlers::payments::total_revenue))
        .route("/reports/sales.csv", get(handlers::reports::sales_report))
        .route("/reports/users.csv", get(handlers::reports::users_report))
        .route("/reports/events.csv", get(handlers::reports::events_report))
        .route("/reports/revenue.csv", get(handlers::reports::revenue_report))
        .layer(from_fn_with_state(
            admin_key,
            middleware::admin_auth::require_internal_api_key,
        ));

    let app = Router::new()
        .route("/health", get(handlers::ops::health))
        .route("/ops/readiness", get(handlers::ops::readiness))
        .route("/ops/liveness", get(handlers::ops::liveness))
        .route("/events", get(handlers::events::list_events).post(handlers::events::create_event))
        .route("/events/search", get(handlers::events::search_events))
        .route("/events/upcoming", get(handlers::events::upcoming_events))
        .route(
            "/events/:event_id",
            get(handlers::events::get_event)
                .put(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
        .route("/events/:event_id/availability", get(handlers::events::availability))
        .route("/events/:event_id/price", get(handlers::events::price_quote))
        .route("/events/:event_id/tickets", get(handlers::tickets::event_tickets))
        .route("/events/:event_id/promotions", get(handlers::promotions::event_promotions))
        .route("/tickets/purchase", post(handlers::tickets::purchase))
        .route("/tickets/validate", post(handlers::tickets::validate))
        .route("/tickets/:ticket_id", get(handlers::tickets::get_ticket))
        .route("/tickets/:ticket_id/cancel", post(handlers::tickets::cancel))
        .route("/tickets/:ticket_id/refund", post(handlers::tickets::refund))
        .route("/tickets/:ticket_id/payments", get(handlers::payments::ticket_payments))
        .route("/customers/:customer_id/tickets", get(handlers::tickets::customer_tickets))
        .route("/customers/:customer_id/payments", get(handlers::payments::customer_payments))
        .route("/payments/validate", get(handlers::payments::validate))
        .route("/payments/:payment_id", get(handlers::payments::get_payment))
        .route(
            "/promotions",
            get(handlers::promotions::list_promotions).post(handlers::promotions::create_promotion),
        )
        .route("/promotions/active", get(handlers::promotions::active_promotions))
        .route("/promotions/validate", post(handlers::promotions::validate_promotion))
        .route(
            "/promotions/:promotion_id",
            get(handlers::promotions::get_promotion)
                .put(handlers::promotions::update_promotion)
                .delete(handlers::promotions::delete_promotion),
        )
        .route("/organizers/:organizer_id/events", get(handlers::events::organizer_events))
        .route("/organizers/:organizer_id/revenue", get(handlers::payments::organizer_revenue))
        .route(
            "/organizers/:organizer_id/promotions",
            get(handlers::promotions::organizer_promotions),
        )
        .route("/webhooks/stripe", post(handlers::webhooks::stripe_webhook))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
