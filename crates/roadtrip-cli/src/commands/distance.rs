//! Distance command handler: capital-to-capital lookup.

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use roadtrip_lib::RoadTrip;

use crate::output::{render_distance, DistanceOutput, OutputFormat};
use crate::terminal::ColorPalette;

/// Handle the distance subcommand.
///
/// An unknown country is an error; a missing table entry is a normal answer.
pub fn handle_distance<W: Write>(
    trip: &RoadTrip,
    from: &str,
    to: &str,
    format: OutputFormat,
    palette: &ColorPalette,
    out: &mut W,
) -> Result<()> {
    let distance_km = trip.direct_distance(from, to)?;
    debug!(from, to, ?distance_km, "distance command");
    render_distance(
        out,
        &DistanceOutput {
            from: from.trim(),
            to: to.trim(),
            distance_km,
        },
        format,
        palette,
    )?;
    Ok(())
}
