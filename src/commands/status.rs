use crate::models::classify_types::ModelStatus;
use std::io::Write;

pub fn render_status<W: Write>(out: &mut W, status: &ModelStatus) -> std::io::Result<()> {
    writeln!(out, "Model: {}", status.model_path.display())?;
    writeln!(out, "Inputs: {}", status.inputs.join(", "))?;
    writeln!(out, "Outputs: {}", status.outputs.join(", "))?;
    writeln!(
        out,
        "Labels: {}",
        if status.labels_verified {
            "verified against category order"
        } else {
            "not verified (no label config given)"
        }
    )
}
