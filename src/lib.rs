pub mod config;
pub mod domain {
    pub mod event;
    pub mod payment;
    pub mod promotion;
    pub mod ticket;
    pub mod user;
}
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod events;
        pub mod ops;
        pub mod payments;
        pub mod promotions;
        pub mod reports;
        pub mod tickets;
        pub mod webhooks;
    }
    pub mod middleware {
        pub mod admin_auth;
    }
}
pub mod repo {
    pub mod events_repo;
    pub mod payments_repo;
    pub mod promotions_repo;
    pub mod tickets_repo;
    pub mod users_repo;
    pub mod webhook_events_repo;
}
pub mod service {
    pub mod event_service;
    pub mod mailer;
    pub mod payment_service;
    pub mod promotion_service;
    pub mod reconciliation;
    pub mod report;
    pub mod ticket_service;
}

#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub users_repo: repo::users_repo::UsersRepo,
    pub event_service: service::event_service::EventService,
    pub ticket_service: service::ticket_service::TicketService,
    pub payment_service: service::payment_service::PaymentService,
    pub promotion_service: service::promotion_service::PromotionService,
    pub reconciliation: service::reconciliation::ReconciliationService,
    pub report_service: service::report::ReportService,
    pub gateway: std::sync::Arc<dyn gateways::CheckoutGateway>,
    pub mailer: service::mailer::Mailer,
}
