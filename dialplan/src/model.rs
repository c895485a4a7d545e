use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use strum_macros::EnumString;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Switchboard {
    pub id: i64,
    /// DTMF code that routes an inbound line into this switchboard.
    pub access_code: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub level: i32,
    pub phone_key: String,
    pub slug: String,
}

impl ModuleNode {
    pub fn kind(&self) -> ModuleKind {
        ModuleKind::parse(&self.slug)
    }

    pub fn is_root_candidate(&self) -> bool {
        self.parent_id.is_none() && self.level == 1
    }

    pub fn has_children(&self, nodes: &[ModuleNode]) -> bool {
        nodes.iter().any(|n| n.parent_id == Some(self.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleKind {
    Playback,
    Read,
    Unsupported(String),
}

#[derive(EnumString, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
enum SupportedKind {
    Playback,
    Read,
}

impl ModuleKind {
    /// Never fails: anything that is not a known slug is `Unsupported`.
    pub fn parse(slug: &str) -> ModuleKind {
        match SupportedKind::from_str(slug) {
            Ok(SupportedKind::Playback) => ModuleKind::Playback,
            Ok(SupportedKind::Read) => ModuleKind::Read,
            Err(_) => ModuleKind::Unsupported(slug.to_string()),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PropertySetting {
    pub key: String,
    pub value: String,
}

impl PropertySetting {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// First setting whose key matches `name`.
pub fn find_property<'a>(name: &str, properties: &'a [PropertySetting]) -> Option<&'a str> {
    properties
        .iter()
        .find(|p| p.key == name)
        .map(|p| p.value.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub switchboard_id: i64,
    pub path: PathBuf,
    pub text: String,
}
