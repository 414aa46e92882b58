use std::io::Write;

use anyhow::Result;

use roadtrip_lib::RoadTrip;

use crate::output::{render_check, CheckOutput, OutputFormat};
use crate::terminal::ColorPalette;

/// Handle the check subcommand. Returns whether the name is valid so the
/// caller can pick the exit code.
pub fn handle_check<W: Write>(
    trip: &RoadTrip,
    name: &str,
    format: OutputFormat,
    palette: &ColorPalette,
    out: &mut W,
) -> Result<bool> {
    let valid = trip.is_valid_country(name);
    render_check(
        out,
        &CheckOutput {
            name: name.trim(),
            valid,
        },
        format,
        palette,
    )?;
    if !valid && format == OutputFormat::Text {
        let suggestions = trip.valid_countries().suggestions(name, 3);
        if !suggestions.is_empty() {
            writeln!(out, "Did you mean: {}?", suggestions.join(", "))?;
        }
    }
    Ok(valid)
}
