use crate::models::advisory_types::WasteType;
use crate::models::category::Category;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of one upload: its file name plus a SHA-256 digest of the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadId {
    name: String,
    digest: [u8; 32],
}

impl UploadId {
    pub fn new(name: &str, bytes: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            digest: Sha256::digest(bytes).into(),
        }
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@", self.name)?;
        for byte in &self.digest[..6] {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    Counted,
    /// Same upload as the last one recorded; counters left alone.
    Duplicate,
}

/// Per-session counters. Every bucket of both maps is present from creation.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SessionStats {
    pub total: u64,
    pub by_waste_type: BTreeMap<WasteType, u64>,
    pub by_category: BTreeMap<Category, u64>,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            total: 0,
            by_waste_type: WasteType::ALL.iter().map(|w| (*w, 0)).collect(),
            by_category: Category::ALL.iter().map(|c| (*c, 0)).collect(),
        }
    }
}

impl SessionStats {
    pub fn waste_type_count(&self, waste_type: WasteType) -> u64 {
        self.by_waste_type.get(&waste_type).copied().unwrap_or(0)
    }

    pub fn category_count(&self, category: Category) -> u64 {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    pub fn is_consistent(&self) -> bool {
        self.by_waste_type.values().sum::<u64>() == self.total
            && self.by_category.values().sum::<u64>() == self.total
    }
}
