//! Outbound e-mail
//!
//! Messages are built here and handed to a [`Mailer`]. Delivery failures are
//! logged and swallowed so that an unreachable mail provider never fails the
//! request that triggered the message.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::MailConfig;

/// A rendered message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Delivery backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> anyhow::Result<()>;
}

/// Used when mail is disabled: logs instead of sending
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        info!(to = %email.to, subject = %email.subject, "Mail disabled, message not sent");
        Ok(())
    }
}

/// Posts messages as JSON to a transactional mail HTTP API
pub struct HttpMailer {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    from: String,
}

#[derive(Serialize)]
struct OutgoingMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    pub fn new(url: String, api_key: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        let body = OutgoingMessage {
            from: &self.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        request.send().await?.error_for_status()?;
        Ok(())
    }
}

/// Pick the backend from configuration
pub fn mailer_from_config(config: &MailConfig) -> std::sync::Arc<dyn Mailer> {
    match (&config.api_url, config.enabled) {
        (Some(url), true) => std::sync::Arc::new(HttpMailer::new(
            url.clone(),
            config.api_key.clone(),
            config.from.clone(),
        )),
        _ => std::sync::Arc::new(LogMailer),
    }
}

/// Message builders and fire-and-log delivery
pub struct MailService;

impl MailService {
    /// Send and log the outcome. Never fails.
    pub async fn deliver(mailer: &dyn Mailer, email: Email) -> bool {
        let to = email.to.clone();
        let subject = email.subject.clone();
        match mailer.send(email).await {
            Ok(()) => {
                info!(to = %to, subject = %subject, "Email sent");
                true
            }
            Err(e) => {
                warn!(to = %to, subject = %subject, error = %e, "Failed to send email");
                false
            }
        }
    }

    pub fn invitation(to: &str, token: &str, frontend_url: &str) -> Email {
        Email {
            to: to.to_string(),
            subject: "You have been invited to FleetOps".to_string(),
            text: format!(
                "You have been invited to join FleetOps.\n\n\
                 Complete your registration here:\n{}/complete-registration?token={}\n\n\
                 The link is valid for 24 hours.",
                frontend_url, token
            ),
        }
    }

    pub fn password_reset(to: &str, token: &str, frontend_url: &str) -> Email {
        Email {
            to: to.to_string(),
            subject: "Password reset".to_string(),
            text: format!(
                "A password reset was requested for your account.\n\n\
                 Choose a new password here:\n{}/reset-password?token={}\n\n\
                 The link is valid for 1 hour. Ignore this message if you did not ask for it.",
                frontend_url, token
            ),
        }
    }

    pub fn car_assigned(to: &str, car_name: &str, license_plate: &str) -> Email {
        Email {
            to: to.to_string(),
            subject: "A car has been assigned to you".to_string(),
            text: format!(
                "You have been assigned the car {} ({}).",
                car_name, license_plate
            ),
        }
    }

    pub fn route_assigned(to: &str, route_name: &str) -> Email {
        Email {
            to: to.to_string(),
            subject: "A route has been assigned to you".to_string(),
            text: format!("You have been assigned the route {}.", route_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invitation_link_contains_token() {
        let email = MailService::invitation("a@b.c", "abc123", "https://app.example");
        assert_eq!(email.to, "a@b.c");
        assert!(
            email
                .text
                .contains("https://app.example/complete-registration?token=abc123")
        );
    }

    #[tokio::test]
    async fn test_deliver_swallows_failures() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("smtp down")));

        let sent = MailService::deliver(&mailer, MailService::route_assigned("d@x.y", "North")).await;
        assert!(!sent);
    }

    #[tokio::test]
    async fn test_deliver_passes_message_through() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|e| e.subject.contains("car") && e.text.contains("B-XY 123"))
            .times(1)
            .returning(|_| Ok(()));

        let sent =
            MailService::deliver(&mailer, MailService::car_assigned("d@x.y", "Van 3", "B-XY 123"))
                .await;
        assert!(sent);
    }
}
