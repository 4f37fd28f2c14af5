//! Plugin registry
//!
//! Maps the plugin id found in an account's configuration to the plugin's
//! classification and builds plugin instances for the daemon.

use anyhow::{Context, Result};
use polld_core::{
    domain::{ApplicationId, PluginCategory, Priority},
    ports::IPlugin,
    usecases::MessageBuilder,
};

use crate::{client::GmailClient, gmail::GmailPlugin};

/// Static description of a plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginDescriptor {
    /// Id used in account configuration
    pub id: &'static str,
    pub category: PluginCategory,
    /// Drives the polling cadence of every account using this plugin
    pub priority: Priority,
    /// Delivery target when the account does not override it
    pub default_app_id: &'static str,
}

/// Gmail: new mail is a direct message, hence `High`
pub const GMAIL: PluginDescriptor = PluginDescriptor {
    id: "gmail",
    category: PluginCategory::Email,
    priority: Priority::High,
    default_app_id: "com.ubuntu.developer.webapps.webapp-gmail_webapp-gmail",
};

/// Known plugins and how to construct them
#[derive(Debug, Clone)]
pub struct PluginRegistry {
    descriptors: Vec<PluginDescriptor>,
    gmail_client: GmailClient,
}

impl PluginRegistry {
    /// Registry of the built-in plugins talking to their public backends
    pub fn new() -> Self {
        Self {
            descriptors: vec![GMAIL],
            gmail_client: GmailClient::new(),
        }
    }

    /// Points Gmail plugins at a different API base URL (useful for testing)
    pub fn with_gmail_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.gmail_client = GmailClient::with_base_url(base_url);
        self
    }

    /// Looks up a plugin by id
    pub fn descriptor(&self, plugin_id: &str) -> Option<&PluginDescriptor> {
        self.descriptors.iter().find(|d| d.id == plugin_id)
    }

    /// All registered plugins
    pub fn descriptors(&self) -> &[PluginDescriptor] {
        &self.descriptors
    }

    /// Builds a plugin instance for one account
    ///
    /// # Arguments
    /// * `plugin_id` - Registry id from the account configuration
    /// * `app_id` - Delivery target override; the descriptor's default otherwise
    /// * `builder` - Message builder carrying the process-wide defaults
    ///
    /// # Errors
    /// Returns an error for an unknown plugin id or an invalid default
    /// application id
    pub fn create(
        &self,
        plugin_id: &str,
        app_id: Option<ApplicationId>,
        builder: MessageBuilder,
    ) -> Result<(PluginDescriptor, Box<dyn IPlugin>)> {
        let descriptor = *self
            .descriptor(plugin_id)
            .with_context(|| format!("Unknown plugin '{plugin_id}'"))?;

        let app_id = match app_id {
            Some(id) => id,
            None => ApplicationId::new(descriptor.default_app_id)
                .context("Invalid default application id")?,
        };

        let plugin: Box<dyn IPlugin> = match descriptor.id {
            "gmail" => Box::new(GmailPlugin::new(app_id, self.gmail_client.clone(), builder)),
            other => anyhow::bail!("No constructor registered for plugin '{other}'"),
        };

        Ok((descriptor, plugin))
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
