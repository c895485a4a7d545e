use crate::model::{ModuleNode, PropertySetting, Switchboard};
use crate::reload::Reloader;
use crate::store::ModuleStore;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn module(id: i64, parent_id: Option<i64>, phone_key: &str, slug: &str) -> ModuleNode {
    ModuleNode {
        id,
        parent_id,
        level: if parent_id.is_some() { 2 } else { 1 },
        phone_key: phone_key.to_string(),
        slug: slug.to_string(),
    }
}

pub fn switchboard(id: i64) -> Switchboard {
    Switchboard {
        id,
        access_code: format!("{id}00"),
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub switchboards: HashMap<i64, Switchboard>,
    pub modules: HashMap<i64, Vec<ModuleNode>>,
    pub properties: HashMap<i64, Vec<PropertySetting>>,
    /// Per-module latency of the properties fetch.
    pub delays: HashMap<i64, Duration>,
    pub failing: HashSet<i64>,
    pub broken: bool,
    /// Modules whose properties are being fetched right now.
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MemoryStore {
    pub fn with_file(mut self, module_id: i64, file: &str) -> Self {
        self.properties
            .insert(module_id, vec![PropertySetting::new("file", file)]);
        self
    }

    pub fn with_delay(mut self, module_id: i64, millis: u64) -> Self {
        self.delays.insert(module_id, Duration::from_millis(millis));
        self
    }
}

#[async_trait]
impl ModuleStore for MemoryStore {
    async fn find_switchboard(&self, switchboard_id: i64) -> Result<Option<Switchboard>> {
        if self.broken {
            return Err(anyhow!("database unreachable"));
        }
        Ok(self.switchboards.get(&switchboard_id).cloned())
    }

    async fn load_modules(&self, switchboard_id: i64) -> Result<Vec<ModuleNode>> {
        if self.broken {
            return Err(anyhow!("database unreachable"));
        }
        Ok(self.modules.get(&switchboard_id).cloned().unwrap_or_default())
    }

    async fn load_module_properties(&self, module_id: i64) -> Result<Vec<PropertySetting>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&module_id) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.failing.contains(&module_id) {
            return Err(anyhow!("can't load properties of {module_id}"));
        }
        Ok(self.properties.get(&module_id).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub struct RecordingReloader {
    pub calls: Arc<Mutex<usize>>,
}

impl RecordingReloader {
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Reloader for RecordingReloader {
    async fn reload(&self) {
        *self.calls.lock().unwrap() += 1;
    }
}
