//! Interactive prompt loop.
//!
//! Asks for two countries, prints the route between them, and repeats until
//! the user types `EXIT` or input ends.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use roadtrip_lib::RoadTrip;

use crate::output::render_route_text;
use crate::terminal::ColorPalette;

const EXIT_WORD: &str = "EXIT";

pub fn run_interactive<R: BufRead, W: Write>(
    trip: &RoadTrip,
    input: &mut R,
    out: &mut W,
    palette: &ColorPalette,
) -> Result<()> {
    loop {
        let Some(start) = ask_country(trip, "first", input, out, palette)? else {
            break;
        };
        let Some(goal) = ask_country(trip, "second", input, out, palette)? else {
            break;
        };

        let plan = trip.shortest_route(&start, &goal)?;
        render_route_text(out, &start, &goal, plan.as_ref(), palette)?;
        writeln!(out)?;
    }

    debug!("interactive session finished");
    Ok(())
}

/// Prompt until a valid country is entered. `None` means quit.
fn ask_country<R: BufRead, W: Write>(
    trip: &RoadTrip,
    ordinal: &str,
    input: &mut R,
    out: &mut W,
    palette: &ColorPalette,
) -> Result<Option<String>> {
    let mut line = String::new();
    loop {
        writeln!(
            out,
            "{}Enter the name of the {ordinal} country (type {EXIT_WORD} to quit):{}",
            palette.gray, palette.reset
        )?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let name = line.trim();
        if name.eq_ignore_ascii_case(EXIT_WORD) {
            return Ok(None);
        }
        if trip.is_valid_country(name) {
            return Ok(Some(name.to_string()));
        }

        writeln!(
            out,
            "{}Invalid country name. Please enter a valid country name.{}",
            palette.red, palette.reset
        )?;
        let suggestions = trip.valid_countries().suggestions(name, 3);
        if !suggestions.is_empty() {
            writeln!(out, "Did you mean: {}?", suggestions.join(", "))?;
        }
    }
}
