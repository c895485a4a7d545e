use crate::model::{ModuleNode, PropertySetting, Switchboard};
use anyhow::Result;
use async_trait::async_trait;

/// Source of switchboard definitions.
///
/// Every call is a fresh read; the engine never caches what it gets back.
#[async_trait]
pub trait ModuleStore: Send + Sync {
    async fn find_switchboard(&self, switchboard_id: i64) -> Result<Option<Switchboard>>;

    /// All modules of a switchboard, in the order the store returns them.
    /// That order is the order of the generated extensions.
    async fn load_modules(&self, switchboard_id: i64) -> Result<Vec<ModuleNode>>;

    async fn load_module_properties(&self, module_id: i64) -> Result<Vec<PropertySetting>>;
}
