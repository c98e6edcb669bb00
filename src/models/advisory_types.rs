use crate::models::category::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WasteType {
    Hazardous,
    Organic,
    Recyclable,
    Recovery,
    Landfill,
    #[serde(rename = "E-Waste")]
    EWaste,
}

impl WasteType {
    pub const ALL: [WasteType; 6] = [
        WasteType::Hazardous,
        WasteType::Organic,
        WasteType::Recyclable,
        WasteType::Recovery,
        WasteType::Landfill,
        WasteType::EWaste,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WasteType::Hazardous => "Hazardous",
            WasteType::Organic => "Organic",
            WasteType::Recyclable => "Recyclable",
            WasteType::Recovery => "Recovery",
            WasteType::Landfill => "Landfill",
            WasteType::EWaste => "E-Waste",
        }
    }
}

impl fmt::Display for WasteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AdvisoryRecord {
    pub category: Category,
    pub waste_type: WasteType,
    pub message: String,
    pub action: String,
    /// Set when the confidence override replaced the base table entry.
    pub overridden: bool,
}
