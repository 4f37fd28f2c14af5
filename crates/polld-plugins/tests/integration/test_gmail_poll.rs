//! Integration tests for GmailPlugin poll cycles
//!
//! Verifies notification content, dedup across polls, collapsing, badge
//! updates, and the credential-expiry signal.

use polld_core::{
    domain::{AuthTokens, EmblemCounter, PushMessage, Tag, Vibrate},
    ports::{IPlugin, PluginError},
};
use polld_plugins::gmail::MAX_INDIVIDUAL_NOTIFICATIONS;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{self, APP_ID};

fn summary(msg: &PushMessage) -> &str {
    &msg.notification.as_ref().unwrap().card.as_ref().unwrap().summary
}

fn emblem(msg: &PushMessage) -> Option<EmblemCounter> {
    msg.notification.as_ref().unwrap().emblem_counter
}

#[tokio::test]
async fn test_first_poll_reports_unread_oldest_first() {
    let (server, mut plugin) = common::setup_gmail_mock().await;
    common::mount_unread_list(&server, &[("m2", "t2"), ("m1", "t1")], 1).await;
    common::mount_message(&server, "m1", "t1", "Alice Example <alice@example.com>", "Lunch?", 1_000).await;
    common::mount_message(&server, "m2", "t2", "bob@example.com", "Report", 2_000).await;

    assert_eq!(plugin.application_id().as_str(), APP_ID);

    let messages = plugin.poll(&common::auth()).await.expect("poll failed");

    assert_eq!(messages.len(), 2);
    assert_eq!(summary(&messages[0]), "Alice Example");
    assert_eq!(summary(&messages[1]), "bob@example.com");

    let notification = messages[0].notification.as_ref().unwrap();
    let card = notification.card.as_ref().unwrap();
    assert_eq!(card.body.as_deref(), Some("Lunch?"));
    assert_eq!(card.actions.len(), 1);
    assert!(card.actions[0].ends_with("t1"));
    assert!(card.popup);
    assert!(card.persist);
    assert_eq!(notification.sound.as_deref(), Some("sounds/ubuntu/notifications/Slick.ogg"));
    assert_eq!(notification.vibrate, Some(Vibrate::duration(200)));
    assert_eq!(notification.tag, Some(Tag::new("account-polld").unwrap()));

    // only the last message of the batch carries the badge
    assert_eq!(emblem(&messages[0]), None);
    assert_eq!(emblem(&messages[1]), Some(EmblemCounter::new(2, true)));

    for msg in &messages {
        assert!(msg.validate().is_ok());
    }
}

#[tokio::test]
async fn test_repeated_poll_reports_only_new_messages() {
    let (server, mut plugin) = common::setup_gmail_mock().await;
    common::mount_unread_list(&server, &[("m1", "t1")], 2).await;
    common::mount_unread_list(&server, &[("m3", "t3"), ("m1", "t1")], 1).await;
    common::mount_message(&server, "m1", "t1", "Alice <alice@example.com>", "One", 1_000).await;
    common::mount_message(&server, "m3", "t3", "Carol <carol@example.com>", "Three", 3_000).await;

    let first = plugin.poll(&common::auth()).await.expect("first poll");
    assert_eq!(first.len(), 1);

    let second = plugin.poll(&common::auth()).await.expect("second poll");
    assert!(second.is_empty(), "unchanged inbox must not notify again");

    let third = plugin.poll(&common::auth()).await.expect("third poll");
    assert_eq!(third.len(), 1);
    assert_eq!(summary(&third[0]), "Carol");
    assert_eq!(emblem(&third[0]), Some(EmblemCounter::new(2, true)));
}

#[tokio::test]
async fn test_many_new_messages_collapse_into_summary() {
    let (server, mut plugin) = common::setup_gmail_mock().await;
    let ids: Vec<(String, String)> = (0..MAX_INDIVIDUAL_NOTIFICATIONS + 2)
        .map(|i| (format!("m{i}"), format!("t{i}")))
        .collect();
    let refs: Vec<(&str, &str)> = ids.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    common::mount_unread_list(&server, &refs, 1).await;

    let messages = plugin.poll(&common::auth()).await.expect("poll failed");

    assert_eq!(messages.len(), 1);
    assert_eq!(
        summary(&messages[0]),
        format!("{} new messages", MAX_INDIVIDUAL_NOTIFICATIONS + 2)
    );
    assert_eq!(
        emblem(&messages[0]),
        Some(EmblemCounter::new((MAX_INDIVIDUAL_NOTIFICATIONS + 2) as u32, true))
    );
}

#[tokio::test]
async fn test_messages_read_elsewhere_clear_the_badge() {
    let (server, mut plugin) = common::setup_gmail_mock().await;
    common::mount_unread_list(&server, &[("m1", "t1")], 1).await;
    common::mount_unread_list(&server, &[], 1).await;
    common::mount_message(&server, "m1", "t1", "Alice <alice@example.com>", "One", 1_000).await;

    plugin.poll(&common::auth()).await.expect("first poll");
    let second = plugin.poll(&common::auth()).await.expect("second poll");

    assert_eq!(second.len(), 1);
    let notification = second[0].notification.as_ref().unwrap();
    assert!(notification.card.is_none());
    assert_eq!(notification.emblem_counter, Some(EmblemCounter::new(0, false)));
    assert!(second[0].validate().is_ok());
}

#[tokio::test]
async fn test_rejected_credentials_return_token_expired() {
    let (server, mut plugin) = common::setup_gmail_mock().await;
    common::mount_unauthorized(&server).await;

    let result = plugin.poll(&common::auth()).await;

    match result {
        Err(PluginError::TokenExpired) => {}
        Err(other) => panic!("expected TokenExpired, got {other:?}"),
        Ok(messages) => panic!("expected TokenExpired, got {} messages", messages.len()),
    }
}

#[tokio::test]
async fn test_missing_access_token_is_generic_failure() {
    let (_server, mut plugin) = common::setup_gmail_mock().await;

    let err = plugin.poll(&AuthTokens::new()).await.unwrap_err();

    assert!(!err.is_token_expired());
    assert!(err.to_string().contains("AccessToken"));
}

#[tokio::test]
async fn test_failed_metadata_fetch_fails_whole_poll_and_retries_later() {
    let (server, mut plugin) = common::setup_gmail_mock().await;
    common::mount_unread_list(&server, &[("m1", "t1")], 2).await;
    Mock::given(method("GET"))
        .and(path("/users/me/messages/m1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    common::mount_message(&server, "m1", "t1", "Alice <alice@example.com>", "One", 1_000).await;

    let err = plugin.poll(&common::auth()).await.unwrap_err();
    assert!(matches!(err, PluginError::Failure(_)));

    let retry = plugin.poll(&common::auth()).await.expect("retry poll");
    assert_eq!(retry.len(), 1);
    assert_eq!(summary(&retry[0]), "Alice");
}
