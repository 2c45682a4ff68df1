//! Email transports.
//!
//! [`ResendNotifier`] posts rendered templates to the Resend HTTP API.
//! [`LogNotifier`] only logs the delivery and is used when no API key is
//! configured. The application state holds an [`EmailNotifier`], which
//! dispatches to one of them.

use anyhow::Context as _;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::domain::email::{EmailTemplate, TemplateVars};
use crate::domain::repository::Notifier;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

#[derive(Clone)]
pub struct ResendNotifier {
    client: Client,
    api_key: String,
    from: String,
}

impl ResendNotifier {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            from,
        }
    }
}

impl Notifier for ResendNotifier {
    async fn send(
        &self,
        to: &str,
        template: EmailTemplate,
        vars: &TemplateVars,
    ) -> anyhow::Result<()> {
        let body = ResendEmail {
            from: &self.from,
            to: [to],
            subject: template.subject(),
            html: template.render(vars),
        };
        self.client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("send email request")?
            .error_for_status()
            .context("resend rejected email")?;

        info!(template = template.id(), "email sent");
        Ok(())
    }
}

/// Logs instead of sending. Template variables are not logged since they
/// carry the login code.
#[derive(Clone, Debug)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn send(
        &self,
        to: &str,
        template: EmailTemplate,
        _vars: &TemplateVars,
    ) -> anyhow::Result<()> {
        info!(to, template = template.id(), "email delivery skipped, no transport configured");
        Ok(())
    }
}

#[derive(Clone)]
pub enum EmailNotifier {
    Resend(ResendNotifier),
    Log(LogNotifier),
}

impl Notifier for EmailNotifier {
    async fn send(
        &self,
        to: &str,
        template: EmailTemplate,
        vars: &TemplateVars,
    ) -> anyhow::Result<()> {
        match self {
            Self::Resend(n) => n.send(to, template, vars).await,
            Self::Log(n) => n.send(to, template, vars).await,
        }
    }
}
