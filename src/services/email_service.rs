// tasktracker-service/src/services/email_service.rs
//
// Outbound transactional email. Invitation emails go through a `Mailer`; the
// Resend implementation is used when an API key is configured, otherwise the
// message is only logged.
use crate::models::ServiceError;
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ServiceError>;
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

pub struct ResendMailer {
    api_key: String,
    from: String,
    client: Client,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                error!("Failed to create HTTP client: {:?}", e);
                ServiceError::InternalServerError
            })?;

        Ok(Self { api_key, from, client })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ServiceError> {
        let request = ResendRequest {
            from: &self.from,
            to: vec![to],
            subject,
            html,
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Email request to {} failed: {:?}", to, e);
                ServiceError::InternalServerError
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("❌ Email provider rejected message to {} ({}): {}", to, status, body);
            return Err(ServiceError::InternalServerError);
        }

        info!("📧 Sent email to {}: {}", to, subject);
        Ok(())
    }
}

// Used when no provider key is configured
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ServiceError> {
        info!("📧 [email not sent] to: {} subject: {}", to, subject);
        log::debug!("{}", html);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Keeps every message in memory. Tests read them back with [`MemoryMailer::sent`].
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ServiceError> {
        let mut sent = self.sent.lock().map_err(|_| ServiceError::InternalServerError)?;
        sent.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

pub fn mailer_from_config(api_key: Option<&str>, from: &str) -> Result<Arc<dyn Mailer>, ServiceError> {
    match api_key {
        Some(key) => Ok(Arc::new(ResendMailer::new(key.to_string(), from.to_string())?)),
        None => {
            info!("RESEND_API_KEY not set, invitation emails will only be logged");
            Ok(Arc::new(LogMailer))
        }
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// (subject, html)
pub fn invitation_email(workspace_name: &str, inviter_name: &str, link: &str) -> (String, String) {
    let workspace = escape_html(workspace_name);
    let inviter = escape_html(inviter_name);
    let subject = format!("{} invited you to join {}", inviter_name, workspace_name);
    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif; color: #1f2933;">
    <h2>You're invited to {workspace}</h2>
    <p><strong>{inviter}</strong> has invited you to collaborate in the <strong>{workspace}</strong> workspace.</p>
    <p>
      <a href="{link}" style="display: inline-block; padding: 10px 18px; background: #2563eb; color: #ffffff; text-decoration: none; border-radius: 6px;">
        Accept invitation
      </a>
    </p>
    <p>Or paste this link into your browser: <br/><a href="{link}">{link}</a></p>
    <p style="color: #7b8794; font-size: 12px;">This invitation expires in 7 days.</p>
  </body>
</html>"#,
        workspace = workspace,
        inviter = inviter,
        link = link,
    );
    (subject, html)
}
