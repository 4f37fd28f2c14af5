//! Integration tests for polld-plugins
//!
//! Uses wiremock to simulate the Gmail API and verifies end-to-end
//! behavior of the GmailClient and GmailPlugin poll cycles.

mod common;

mod test_client;
mod test_gmail_poll;
