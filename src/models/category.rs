use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Waste item classes, in the exact order of the classifier's output vector.
///
/// Index `i` of the model output always belongs to `Category::ALL[i]`. The
/// trained model and this enum must agree on that order; a mismatch yields
/// wrong advisories without any error, so `model_manager::verify_labels`
/// checks it against the model's `id2label` config before the model loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Battery,
    Biological,
    Cardboard,
    Clothes,
    Glass,
    Metal,
    Paper,
    Plastic,
    Shoes,
    Trash,
}

impl Category {
    pub const COUNT: usize = 10;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Battery,
        Category::Biological,
        Category::Cardboard,
        Category::Clothes,
        Category::Glass,
        Category::Metal,
        Category::Paper,
        Category::Plastic,
        Category::Shoes,
        Category::Trash,
    ];

    pub fn from_index(index: usize) -> Option<Category> {
        Category::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Battery => "battery",
            Category::Biological => "biological",
            Category::Cardboard => "cardboard",
            Category::Clothes => "clothes",
            Category::Glass => "glass",
            Category::Metal => "metal",
            Category::Paper => "paper",
            Category::Plastic => "plastic",
            Category::Shoes => "shoes",
            Category::Trash => "trash",
        }
    }

    /// Upper-cased label shown on result cards.
    pub fn display_label(self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}
