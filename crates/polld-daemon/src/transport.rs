//! JSON-lines push transport
//!
//! Writes one record per push message, `{"app_id": ..., "payload": ...}`,
//! to a byte stream (stdout for the daemon). A relay bridge reads the
//! stream and forwards the payloads.

use std::io::Write;

use anyhow::Context;
use polld_core::{
    domain::{ApplicationId, PushMessage},
    ports::IPushTransport,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Serialize)]
struct Record<'a> {
    app_id: &'a ApplicationId,
    payload: &'a PushMessage,
}

/// Transport writing newline-delimited JSON records
pub struct JsonLinesTransport<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the transport and returns the writer
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonLinesTransport<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

#[async_trait::async_trait]
impl<W: Write + Send> IPushTransport for JsonLinesTransport<W> {
    async fn deliver(&self, app_id: &ApplicationId, message: &PushMessage) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(&Record {
            app_id,
            payload: message,
        })
        .context("Failed to serialize push message")?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(&line)
            .and_then(|()| writer.flush())
            .context("Failed to write push record")?;

        debug!(app_id = %app_id, bytes = line.len(), "Push record written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use polld_core::domain::{Card, EmblemCounter, Notification};

    use super::*;

    #[tokio::test]
    async fn test_writes_one_record_per_line() {
        let transport = JsonLinesTransport::new(Vec::new());
        let app_id = ApplicationId::new("com.example.mail_mail").unwrap();

        transport
            .deliver(
                &app_id,
                &PushMessage::with_notification(Notification::new(Card::new("Hi"))),
            )
            .await
            .unwrap();
        transport
            .deliver(
                &app_id,
                &PushMessage::with_notification(
                    Notification::default().with_emblem_counter(EmblemCounter::new(0, false)),
                ),
            )
            .await
            .unwrap();

        let output = String::from_utf8(transport.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(
            first,
            serde_json::json!({
                "app_id": "com.example.mail_mail",
                "payload": { "notification": { "card": { "summary": "Hi" } } }
            })
        );

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(
            second["payload"]["notification"]["emblem-counter"],
            serde_json::json!({ "count": 0, "visible": false })
        );
    }
}
