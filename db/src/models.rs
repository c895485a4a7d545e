use diesel::Queryable;
use ivr_dialplan::model::{ModuleNode, PropertySetting, Switchboard};
use serde::{Deserialize, Serialize};

#[derive(Queryable, Deserialize, Serialize, Debug, Clone)]
pub struct SwitchboardRow {
    pub id: i64,
    pub access_code: String,
}

#[derive(Queryable, Deserialize, Serialize, Debug, Clone)]
pub struct ModuleRow {
    pub id: i64,
    pub switchboard_id: i64,
    pub parent_id: Option<i64>,
    pub level: i32,
    pub phone_key: String,
    pub slug: String,
}

#[derive(Queryable, Deserialize, Serialize, Debug, Clone)]
pub struct ModuleSettingRow {
    pub id: i64,
    pub module_id: i64,
    pub key: String,
    pub value: String,
}

impl From<SwitchboardRow> for Switchboard {
    fn from(row: SwitchboardRow) -> Self {
        Switchboard {
            id: row.id,
            access_code: row.access_code,
        }
    }
}

impl From<ModuleRow> for ModuleNode {
    fn from(row: ModuleRow) -> Self {
        ModuleNode {
            id: row.id,
            parent_id: row.parent_id,
            level: row.level,
            phone_key: row.phone_key,
            slug: row.slug,
        }
    }
}

impl From<ModuleSettingRow> for PropertySetting {
    fn from(row: ModuleSettingRow) -> Self {
        PropertySetting {
            key: row.key,
            value: row.value,
        }
    }
}
