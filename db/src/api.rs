use super::models::*;
use super::schema::*;
use anyhow::{Error, Result};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use ivr_dialplan::model::{ModuleNode, PropertySetting, Switchboard};
use ivr_dialplan::store::ModuleStore;
use std::time::Duration;
use tokio::task::spawn_blocking;

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<ConnectionManager<PgConnection>>,
}

impl Database {
    pub fn new(database_url: &str) -> Result<Database, Error> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;
        Ok(Database { pool })
    }

    pub async fn get_switchboard(&self, id: i64) -> Result<Option<SwitchboardRow>> {
        let pool = self.pool.clone();
        spawn_blocking(move || -> Result<Option<SwitchboardRow>> {
            let db_conn = pool.get()?;
            let switchboard = switchboards::table
                .filter(switchboards::id.eq(id))
                .first::<SwitchboardRow>(&db_conn)
                .optional()?;
            Ok(switchboard)
        })
        .await?
    }

    /// Modules ordered by id, which is the order they were created in.
    pub async fn get_modules(&self, switchboard_id: i64) -> Result<Vec<ModuleRow>> {
        let pool = self.pool.clone();
        spawn_blocking(move || -> Result<Vec<ModuleRow>> {
            let db_conn = pool.get()?;
            let modules = switchboard_modules::table
                .filter(switchboard_modules::switchboard_id.eq(switchboard_id))
                .order(switchboard_modules::id.asc())
                .load::<ModuleRow>(&db_conn)?;
            Ok(modules)
        })
        .await?
    }

    pub async fn get_module_settings(&self, module_id: i64) -> Result<Vec<ModuleSettingRow>> {
        let pool = self.pool.clone();
        spawn_blocking(move || -> Result<Vec<ModuleSettingRow>> {
            let db_conn = pool.get()?;
            let settings = module_settings::table
                .filter(module_settings::module_id.eq(module_id))
                .order(module_settings::id.asc())
                .load::<ModuleSettingRow>(&db_conn)?;
            Ok(settings)
        })
        .await?
    }
}

#[async_trait]
impl ModuleStore for Database {
    async fn find_switchboard(&self, switchboard_id: i64) -> Result<Option<Switchboard>> {
        Ok(self.get_switchboard(switchboard_id).await?.map(Switchboard::from))
    }

    async fn load_modules(&self, switchboard_id: i64) -> Result<Vec<ModuleNode>> {
        let rows = self.get_modules(switchboard_id).await?;
        Ok(rows.into_iter().map(ModuleNode::from).collect())
    }

    async fn load_module_properties(&self, module_id: i64) -> Result<Vec<PropertySetting>> {
        let rows = self.get_module_settings(module_id).await?;
        Ok(rows.into_iter().map(PropertySetting::from).collect())
    }
}
