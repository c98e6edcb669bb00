use crate::models::category::Category;
use crate::services::advisory::{base_record, OverridePolicy};
use std::io::Write;

pub fn render_table<W: Write>(out: &mut W, policy: &OverridePolicy) -> std::io::Result<()> {
    for category in Category::ALL {
        let record = base_record(category);
        writeln!(
            out,
            "{:<11} {:<11} {}",
            category.display_label(),
            record.waste_type,
            record.action
        )?;
    }

    let eligible: Vec<&str> = policy.eligible.iter().map(|c| c.as_str()).collect();
    writeln!(
        out,
        "\nOverride: {} below {:.2} confidence -> E-Waste, supervisor escalation",
        if eligible.is_empty() {
            "none".to_string()
        } else {
            eligible.join(", ")
        },
        policy.threshold
    )
}
