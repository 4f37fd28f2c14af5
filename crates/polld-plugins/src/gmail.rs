//! Gmail plugin
//!
//! Reports unread inbox messages of a Google account.
//!
//! ## Dedup and ordering
//!
//! - A message is reported once: the plugin remembers the ids of the unread
//!   messages seen by the last successful poll and only reports ids outside
//!   that set. The set is replaced on every successful poll, so it never
//!   holds more than one listing.
//! - New messages are emitted oldest first.
//! - More than [`MAX_INDIVIDUAL_NOTIFICATIONS`] new messages collapse into a
//!   single summary notification.
//! - Every batch with new mail carries the unread count as emblem counter.
//!   When the count changes without new mail (messages were read elsewhere),
//!   a badge-only push message updates the counter.
//! - A failed poll leaves the remembered state untouched, so the next poll
//!   reports the same messages again.

use std::collections::HashSet;

use async_trait::async_trait;
use polld_core::{
    domain::{auth::keys, ApplicationId, AuthTokens, EmblemCounter, Notification, PushMessage},
    ports::{IPlugin, PluginError},
    usecases::MessageBuilder,
};
use tracing::{debug, info};

use crate::client::{GmailClient, MessageMetadata};

/// Upper bound on message references requested per poll
const MAX_RESULTS: u32 = 20;

/// New messages beyond this count are reported as one summary notification
pub const MAX_INDIVIDUAL_NOTIFICATIONS: usize = 4;

/// Icon shown on Gmail cards
const GMAIL_ICON: &str = "/usr/share/icons/suru/apps/scalable/gmail-symbolic.svg";

/// Web URL opened by the card action
const GMAIL_WEB_URL: &str = "https://mail.google.com/mail/mu/mp/#cv/priority/";

/// Plugin polling one Gmail account
pub struct GmailPlugin {
    app_id: ApplicationId,
    client: GmailClient,
    builder: MessageBuilder,
    /// Unread message ids as of the last successful poll
    reported: HashSet<String>,
    /// Unread count as of the last successful poll
    last_unread: Option<u32>,
}

impl GmailPlugin {
    /// Creates a plugin delivering to `app_id`
    pub fn new(app_id: ApplicationId, client: GmailClient, builder: MessageBuilder) -> Self {
        Self {
            app_id,
            client,
            builder,
            reported: HashSet::new(),
            last_unread: None,
        }
    }

    fn message_for(&self, meta: &MessageMetadata) -> PushMessage {
        let sender = meta.from.as_deref().map(sender_name).unwrap_or("Unknown sender");
        let subject = meta
            .subject
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("(no subject)");
        let action = format!("{GMAIL_WEB_URL}{}", meta.thread_id);

        self.builder.standard(sender, subject, &action, GMAIL_ICON)
    }

    fn summary_message(&self, count: usize) -> PushMessage {
        self.builder.standard(
            &format!("{count} new messages"),
            "You have new mail in your inbox",
            GMAIL_WEB_URL,
            GMAIL_ICON,
        )
    }
}

#[async_trait]
impl IPlugin for GmailPlugin {
    fn application_id(&self) -> &ApplicationId {
        &self.app_id
    }

    async fn poll(&mut self, auth: &AuthTokens) -> Result<Vec<PushMessage>, PluginError> {
        let token = auth.require_str(keys::ACCESS_TOKEN)?;

        let unread = self.client.list_unread(token, MAX_RESULTS).await?;

        let new_refs: Vec<_> = unread
            .messages
            .iter()
            .filter(|m| !self.reported.contains(&m.id))
            .collect();
        debug!(
            app_id = %self.app_id,
            unread = unread.messages.len(),
            new = new_refs.len(),
            "Gmail listing"
        );

        let mut batch = if new_refs.len() > MAX_INDIVIDUAL_NOTIFICATIONS {
            vec![self.summary_message(new_refs.len())]
        } else {
            let mut metas = Vec::with_capacity(new_refs.len());
            for r in &new_refs {
                metas.push(self.client.get_message(token, &r.id).await?);
            }
            metas.sort_by_key(|m| m.received);
            metas.iter().map(|m| self.message_for(m)).collect()
        };

        let count = unread.total_estimate;
        let counter = EmblemCounter::new(count, count > 0);
        if let Some(last) = batch.last_mut() {
            if let Some(notification) = last.notification.as_mut() {
                notification.emblem_counter = Some(counter);
            }
        } else if self.last_unread.is_some_and(|last| last != count) {
            batch.push(PushMessage::with_notification(
                Notification::default().with_emblem_counter(counter),
            ));
        }

        self.reported = unread.messages.into_iter().map(|m| m.id).collect();
        self.last_unread = Some(count);

        if !batch.is_empty() {
            info!(app_id = %self.app_id, messages = batch.len(), unread = count, "New Gmail activity");
        }
        Ok(batch)
    }
}

/// Display part of a `From` header
///
/// `"Alice Example" <alice@example.com>` yields `Alice Example`; a bare
/// address is returned without angle brackets.
fn sender_name(from: &str) -> &str {
    let from = from.trim();
    match from.find('<') {
        Some(0) => from.trim_start_matches('<').trim_end_matches('>'),
        Some(idx) => {
            let name = from[..idx].trim().trim_matches('"').trim();
            if name.is_empty() {
                from[idx..].trim_start_matches('<').trim_end_matches('>')
            } else {
                name
            }
        }
        None => from,
    }
}
