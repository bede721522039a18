use crate::config::AppConfig;
use crate::domain::event::Event;
use crate::domain::ticket::Ticket;
use crate::domain::user::User;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use rust_decimal::Decimal;

/// Fire-and-forget SMTP sender. Without SMTP configuration every send
/// degrades to a log line, and a transport failure is logged, never
/// retried and never propagated.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
}

impl Mailer {
    pub fn from_config(cfg: &AppConfig) -> Self {
        if cfg.smtp_host.is_empty() || cfg.smtp_from_email.is_empty() {
            tracing::warn!("smtp not configured; notification emails will only be logged");
            return Mailer { transport: None, from: None };
        }

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .map(|builder| {
                builder
                    .port(cfg.smtp_port)
                    .credentials(Credentials::new(cfg.smtp_username.clone(), cfg.smtp_password.clone()))
                    .build()
            })
            .map_err(|e| tracing::warn!("smtp transport setup failed: {}", e))
            .ok();

        let from = format!("{} <{}>", cfg.smtp_from_name, cfg.smtp_from_email)
            .parse::<Mailbox>()
            .map_err(|e| tracing::warn!("invalid smtp sender address: {}", e))
            .ok();

        Mailer { transport, from }
    }

    pub async fn send_purchase_initiated(&self, user: &User, event: &Event, quantity: usize, total: Decimal) {
        let subject = format!("Payment Processing - {}", event.title);
        let body = purchase_initiated_body(user, event, quantity, total);
        self.send(&user.email, subject, body).await;
    }

    pub async fn send_ticket_confirmation(&self, user: &User, ticket: &Ticket, event: &Event) {
        let subject = format!("Your Ticket for {}", event.title);
        let body = ticket_confirmation_body(user, ticket, event);
        self.send(&user.email, subject, body).await;
    }

    async fn send(&self, to: &str, subject: String, body: String) {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            tracing::info!("email skipped (smtp unconfigured): \"{}\" -> {}", subject, to);
            return;
        };

        let Ok(to_addr) = to.parse::<Mailbox>() else {
            tracing::warn!("not sending email, invalid recipient address: {}", to);
            return;
        };

        let message = Message::builder()
            .from(from.clone())
            .to(to_addr)
            .subject(&subject)
            .header(ContentType::TEXT_HTML)
            .body(body);

        match message {
            Ok(message) => match transport.send(message).await {
                Ok(_) => tracing::info!("email \"{}\" sent to {}", subject, to),
                Err(e) => tracing::warn!("email send to {} failed: {}", to, e),
            },
            Err(e) => tracing::warn!("could not build email for {}: {}", to, e),
        }
    }
}

pub fn purchase_initiated_body(user: &User, event: &Event, quantity: usize, total: Decimal) -> String {
    format!(
        "<html><body>\
         <h1>Payment Processing</h1>\
         <p>Dear {},</p>\
         <p>Your payment for <strong>{}</strong> is being processed.</p>\
         <p>Tickets: {} &mdash; Total: {}</p>\
         <p>You will receive your tickets once the payment completes.</p>\
         </body></html>",
        user.full_name(),
        event.title,
        quantity,
        total,
    )
}

pub fn ticket_confirmation_body(user: &User, ticket: &Ticket, event: &Event) -> String {
    format!(
        "<html><body>\
         <h1>Your Ticket</h1>\
         <p>Dear {},</p>\
         <p>Your ticket for <strong>{}</strong> on {} at {} is confirmed.</p>\
         <p>Price paid: {}</p>\
         <p>Present this code at the gate:</p>\
         <p><strong>{}</strong></p>\
         </body></html>",
        user.full_name(),
        event.title,
        event.date.format("%b %d, %Y %H:%M UTC"),
        event.location,
        ticket.price,
        ticket.qr_code,
    )
}
