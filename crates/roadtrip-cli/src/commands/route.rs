//! Route command handler for computing overland routes between countries.

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use roadtrip_lib::RoadTrip;

use crate::output::{render_route, OutputFormat, RouteOutput};
use crate::terminal::ColorPalette;

/// Handle the route subcommand.
///
/// "No valid path found." is a successful answer; only unknown names fail.
pub fn handle_route<W: Write>(
    trip: &RoadTrip,
    from: &str,
    to: &str,
    format: OutputFormat,
    palette: &ColorPalette,
    out: &mut W,
) -> Result<()> {
    let plan = trip.shortest_route(from, to)?;
    debug!(
        from,
        to,
        hops = ?plan.as_ref().map(|plan| plan.hop_count()),
        "route command"
    );
    render_route(
        out,
        &RouteOutput {
            from: from.trim(),
            to: to.trim(),
            route: plan.as_ref(),
        },
        format,
        palette,
    )?;
    Ok(())
}
