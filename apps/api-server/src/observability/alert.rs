//! Alerting layer for tracing.
//!
//! ERROR events are copied into a bounded channel and a background task hands
//! them to an [`AlertSender`]. The layer never blocks the logging call; when
//! the channel is full the alert is dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{Event, Subscriber};
use tracing_subscriber::{Layer, layer::Context};

const CHANNEL_CAPACITY: usize = 100;

/// A captured ERROR event.
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub service: String,
    pub message: String,
    pub target: String,
    pub timestamp: DateTime<Utc>,
    pub fields: Vec<(String, String)>,
}

impl AlertMessage {
    /// Plain-text rendering shared by the console and webhook senders.
    pub fn render(&self) -> String {
        let mut text = format!(
            "[{}] error in {}: {}\nat {}",
            self.service,
            self.target,
            self.message,
            self.timestamp.to_rfc3339()
        );
        for (name, value) in &self.fields {
            text.push_str(&format!("\n{name} = {value}"));
        }
        text
    }
}

#[async_trait::async_trait]
pub trait AlertSender: Send + Sync {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("Failed to send alert: {0}")]
    SendError(String),
}

/// Writes alerts to stderr.
pub struct ConsoleAlertSender;

#[async_trait::async_trait]
impl AlertSender for ConsoleAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        eprintln!("ALERT {}", alert.render());
        Ok(())
    }
}

/// Posts `{"text": ...}` to a chat webhook.
pub struct WebhookAlertSender {
    url: String,
    client: reqwest::Client,
}

impl WebhookAlertSender {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl AlertSender for WebhookAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        let payload = serde_json::json!({ "text": alert.render() });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AlertError::SendError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AlertError::SendError(format!(
                "webhook returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Tracing layer forwarding ERROR events to an [`AlertSender`].
pub struct AlertLayer {
    service: String,
    sender: mpsc::Sender<AlertMessage>,
}

impl AlertLayer {
    /// Spawns the dispatch task on the current tokio runtime.
    pub fn new(alert_sender: Arc<dyn AlertSender>, service: String) -> Self {
        let (tx, mut rx) = mpsc::channel::<AlertMessage>(CHANNEL_CAPACITY);

        tokio::spawn(async move {
            while let Some(alert) = rx.recv().await {
                // Not logged through tracing, which would loop back here.
                if let Err(e) = alert_sender.send(alert).await {
                    eprintln!("{e}");
                }
            }
        });

        Self {
            service,
            sender: tx,
        }
    }

    pub fn console(service: String) -> Self {
        Self::new(Arc::new(ConsoleAlertSender), service)
    }

    pub fn webhook(url: String, service: String) -> Self {
        Self::new(Arc::new(WebhookAlertSender::new(url)), service)
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn record(&mut self, name: &str, value: String) {
        if name == "message" {
            self.message = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.record(field.name(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.record(field.name(), value.to_string());
    }
}

impl<S> Layer<S> for AlertLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::ERROR {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let alert = AlertMessage {
            service: self.service.clone(),
            message: visitor.message,
            target: event.metadata().target().to_string(),
            timestamp: Utc::now(),
            fields: visitor.fields,
        };

        let _ = self.sender.try_send(alert);
    }
}
