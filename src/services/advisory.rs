use crate::error::AppError;
use crate::models::advisory_types::{AdvisoryRecord, WasteType};
use crate::models::category::Category;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_OVERRIDE_THRESHOLD: f32 = 0.85;

/// Low-confidence predictions on these labels are escalated instead of trusted.
///
/// The threshold and label set are a provisional business rule; both are
/// configurable so they can be changed without a rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverridePolicy {
    pub threshold: f32,
    pub eligible: Vec<Category>,
}

impl Default for OverridePolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_OVERRIDE_THRESHOLD,
            eligible: vec![Category::Battery, Category::Metal],
        }
    }
}

impl OverridePolicy {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AppError::Config(format!(
                "override threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Exactly the threshold counts as trusted.
    pub fn applies(&self, label: Category, confidence: f32) -> bool {
        self.eligible.contains(&label) && confidence < self.threshold
    }
}

/// Static disposal guidance for a category, before any override.
pub fn base_record(category: Category) -> AdvisoryRecord {
    let (waste_type, message, action) = match category {
        Category::Battery => (
            WasteType::Hazardous,
            "Battery is hazardous. Inform supervisor.",
            "Send to hazardous waste bin",
        ),
        Category::Biological => (
            WasteType::Organic,
            "Biodegradable waste.",
            "Send to compost unit",
        ),
        Category::Cardboard => (
            WasteType::Recyclable,
            "Cardboard detected.",
            "Send to cardboard recycling",
        ),
        Category::Clothes => (
            WasteType::Recovery,
            "Clothes can be reused or donated.",
            "Send to recovery center",
        ),
        Category::Glass => (
            WasteType::Recyclable,
            "Glass detected.",
            "Send to glass recycling",
        ),
        Category::Metal => (
            WasteType::Recovery,
            "Metal has recovery value.",
            "Send for metal recovery",
        ),
        Category::Paper => (
            WasteType::Recyclable,
            "Paper detected.",
            "Send to paper recycling",
        ),
        Category::Plastic => (
            WasteType::Recyclable,
            "Plastic detected.",
            "Send to recycling",
        ),
        Category::Shoes => (
            WasteType::Landfill,
            "Shoes are non-recyclable.",
            "Send to landfill",
        ),
        Category::Trash => (WasteType::Landfill, "General waste.", "Dispose safely"),
    };

    AdvisoryRecord {
        category,
        waste_type,
        message: message.to_string(),
        action: action.to_string(),
        overridden: false,
    }
}

pub const ESCALATION_ACTION: &str =
    "Inform supervisor: low-confidence detection, hold item for manual hazard check";

#[derive(Debug, Clone, Default)]
pub struct AdvisoryResolver {
    policy: OverridePolicy,
}

impl AdvisoryResolver {
    pub fn new(policy: OverridePolicy) -> Self {
        Self { policy }
    }

    /// Returns a fresh record on every call; the base table is never touched.
    pub fn resolve(&self, label: Category, confidence: f32) -> AdvisoryRecord {
        let mut record = base_record(label);
        if self.policy.applies(label, confidence) {
            warn!(
                "Escalating {} at {:.4} confidence (threshold {})",
                label, confidence, self.policy.threshold
            );
            record.waste_type = WasteType::EWaste;
            record.action = ESCALATION_ACTION.to_string();
            record.overridden = true;
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn battery_below_threshold_becomes_e_waste() {
        let resolver = AdvisoryResolver::default();
        let record = resolver.resolve(Category::Battery, 0.84);
        assert_eq!(record.waste_type, WasteType::EWaste);
        assert!(record.overridden);
        assert_eq!(record.action, ESCALATION_ACTION);
        assert_eq!(resolver.resolve(Category::Metal, 0.2).action, record.action);
    }

    #[test]
    fn threshold_itself_trusts_the_model() {
        let resolver = AdvisoryResolver::default();
        let record = resolver.resolve(Category::Battery, 0.85);
        assert_eq!(record, base_record(Category::Battery));
        assert_eq!(record.waste_type, WasteType::Hazardous);
    }

    #[test]
    fn ineligible_labels_pass_through() {
        let resolver = AdvisoryResolver::default();
        let record = resolver.resolve(Category::Plastic, 0.10);
        assert_eq!(record, base_record(Category::Plastic));
        assert_eq!(record.waste_type, WasteType::Recyclable);
    }

    #[test]
    fn low_confidence_metal_keeps_base_message() {
        let resolver = AdvisoryResolver::default();
        let record = resolver.resolve(Category::Metal, 0.60);
        assert_eq!(record.waste_type, WasteType::EWaste);
        assert_eq!(record.message, base_record(Category::Metal).message);
        assert_eq!(record.category, Category::Metal);
    }

    #[test]
    fn every_category_has_a_base_entry() {
        for category in Category::ALL {
            let record = base_record(category);
            assert_eq!(record.category, category);
            assert!(!record.action.is_empty());
            assert_ne!(record.waste_type, WasteType::EWaste);
        }
    }

    #[test]
    fn custom_policy_is_honoured() {
        let resolver = AdvisoryResolver::new(OverridePolicy {
            threshold: 0.5,
            eligible: vec![Category::Glass],
        });
        assert!(resolver.resolve(Category::Glass, 0.49).overridden);
        assert!(!resolver.resolve(Category::Glass, 0.5).overridden);
        assert!(!resolver.resolve(Category::Battery, 0.1).overridden);
    }

    #[test]
    fn threshold_outside_unit_range_is_rejected() {
        let policy = OverridePolicy {
            threshold: 1.5,
            ..OverridePolicy::default()
        };
        assert!(matches!(policy.validate(), Err(AppError::Config(_))));
        assert!(OverridePolicy::default().validate().is_ok());
    }

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: OverridePolicy = serde_json::from_str(r#"{"threshold": 0.7}"#).unwrap();
        assert_eq!(policy.threshold, 0.7);
        assert_eq!(policy.eligible, vec![Category::Battery, Category::Metal]);
        assert!(serde_json::from_str::<OverridePolicy>(r#"{"eligible": ["lead"]}"#).is_err());
    }
}
