use std::{collections::HashMap, fs};

use anyhow::Context;
use registration::DEFAULT_HANDOFF_ROUTE;
use tournament_counts::{
    source::{DEFAULT_COLLECTION, DEFAULT_STORE_URL},
    DocumentStoreConfig,
};

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub store_url: String,
    pub store_project: Option<String>,
    pub store_collection: String,
    pub store_api_key: Option<String>,
    pub handoff_route: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            store_url: DEFAULT_STORE_URL.into(),
            store_project: None,
            store_collection: DEFAULT_COLLECTION.into(),
            store_api_key: None,
            handoff_route: DEFAULT_HANDOFF_ROUTE.into(),
        }
    }
}

impl Settings {
    /// Document store settings, or `None` when no project is configured and
    /// counts should stay at their zero default.
    pub fn document_store(&self) -> Option<DocumentStoreConfig> {
        let project = self.store_project.as_deref()?.trim();
        if project.is_empty() {
            return None;
        }
        let mut config = DocumentStoreConfig::new(self.store_url.clone(), project);
        config.collection = self.store_collection.clone();
        config.api_key = self.store_api_key.clone();
        Some(config)
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw)
            .with_context(|| format!("failed to parse {SETTINGS_FILE}"))?;
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    Ok(settings)
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)?;
    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("store_url") {
        settings.store_url = v.clone();
    }
    if let Some(v) = file_cfg.get("store_project") {
        settings.store_project = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("store_collection") {
        settings.store_collection = v.clone();
    }
    if let Some(v) = file_cfg.get("store_api_key") {
        settings.store_api_key = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("handoff_route") {
        settings.handoff_route = v.clone();
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("APP__STORE_URL") {
        settings.store_url = v;
    }
    if let Some(v) = var("APP__STORE_PROJECT") {
        settings.store_project = Some(v);
    }
    if let Some(v) = var("APP__STORE_COLLECTION") {
        settings.store_collection = v;
    }
    if let Some(v) = var("APP__STORE_API_KEY") {
        settings.store_api_key = Some(v);
    }

    if let Some(v) = var("APP__HANDOFF_ROUTE") {
        settings.handoff_route = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
