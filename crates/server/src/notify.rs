// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Best-effort email notification relay.
//!
//! A new report fires exactly one notification to the configured admin
//! address. Dispatch is fire-and-forget: the send runs on its own task
//! under a short timeout, and any failure is logged at warn level and
//! otherwise dropped. The HTTP response never waits on or reflects the
//! outcome.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How long a notification send may run before being abandoned.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// The facts a report-created notification carries.
#[derive(Debug, Clone)]
pub struct ReportNotification {
    /// The reported facility's id.
    pub facility_id: i64,
    /// The issue type's wire string.
    pub issue_type: String,
    /// The report description, if any.
    pub description: Option<String>,
}

/// A sink for report-created notifications.
pub trait Notifier: Send + Sync {
    /// Sends a notification about a newly created report.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason on failure; callers log it and
    /// move on.
    fn report_created(
        &self,
        notification: &ReportNotification,
    ) -> impl std::future::Future<Output = Result<(), String>> + Send;
}

/// SMTP configuration for the relay.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// SMTP relay host.
    pub host: String,
    /// SMTP relay port.
    pub port: u16,
    /// Optional credentials.
    pub username: Option<String>,
    /// Optional credentials.
    pub password: Option<String>,
    /// Sender address.
    pub from_address: String,
    /// The admin address notifications go to.
    pub admin_address: String,
}

/// Notifier that delivers over SMTP via `lettre`.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Builds an SMTP notifier from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay host or an address is invalid.
    pub fn new(settings: &SmtpSettings) -> Result<Self, Box<dyn std::error::Error>> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port);
        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }
        Ok(Self {
            transport: builder.build(),
            from: settings.from_address.parse()?,
            to: settings.admin_address.parse()?,
        })
    }
}

impl Notifier for SmtpNotifier {
    async fn report_created(&self, notification: &ReportNotification) -> Result<(), String> {
        let description: &str = notification.description.as_deref().unwrap_or("");
        let body: String = format!(
            "A new report has been submitted.\n\nFacility: {}\nIssue: {}\nDescription: {}",
            notification.facility_id, notification.issue_type, description
        );
        let email: Message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject("New WASH Facility Report Submitted")
            .body(body)
            .map_err(|e| format!("Failed to build message: {e}"))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| format!("SMTP send failed: {e}"))?;
        Ok(())
    }
}

/// Notifier used when SMTP is unconfigured: logs and succeeds.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn report_created(&self, notification: &ReportNotification) -> Result<(), String> {
        info!(
            facility_id = notification.facility_id,
            issue_type = %notification.issue_type,
            "report notification (smtp unconfigured)"
        );
        Ok(())
    }
}

/// The notifier variants the server can run with.
pub enum AnyNotifier {
    /// Deliver over SMTP.
    Smtp(SmtpNotifier),
    /// Log only.
    Log(LogNotifier),
}

impl Notifier for AnyNotifier {
    async fn report_created(&self, notification: &ReportNotification) -> Result<(), String> {
        match self {
            Self::Smtp(n) => n.report_created(notification).await,
            Self::Log(n) => n.report_created(notification).await,
        }
    }
}

/// Fires a notification on its own task and forgets it.
///
/// The send is bounded by [`DISPATCH_TIMEOUT`]; timeout or failure is
/// logged at warn and swallowed.
pub fn dispatch(notifier: Arc<AnyNotifier>, notification: ReportNotification) {
    tokio::spawn(async move {
        let send = notifier.report_created(&notification);
        match tokio::time::timeout(DISPATCH_TIMEOUT, send).await {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => {
                warn!(
                    facility_id = notification.facility_id,
                    %reason,
                    "report notification failed"
                );
            }
            Err(_) => {
                warn!(
                    facility_id = notification.facility_id,
                    "report notification timed out"
                );
            }
        }
    });
}
