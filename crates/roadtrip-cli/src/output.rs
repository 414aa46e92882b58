//! Output formatting for query results.
//!
//! Every renderer writes to a caller-supplied writer so the same code serves
//! stdout and the tests.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use roadtrip_lib::{EdgeKind, RoutePlan};

use crate::terminal::{format_with_separators, ColorPalette};

/// Output format for one-shot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON on stdout.
    Json,
}

/// JSON shape of the `distance` command.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceOutput<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub distance_km: Option<u32>,
}

/// JSON shape of the `route` command. `route` is `null` when no path exists.
#[derive(Debug, Clone, Serialize)]
pub struct RouteOutput<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub route: Option<&'a RoutePlan>,
}

/// JSON shape of the `check` command.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput<'a> {
    pub name: &'a str,
    pub valid: bool,
}

pub fn render_distance<W: Write>(
    out: &mut W,
    result: &DistanceOutput<'_>,
    format: OutputFormat,
    palette: &ColorPalette,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => render_json(out, result),
        OutputFormat::Text => match result.distance_km {
            Some(km) => writeln!(
                out,
                "{}{}{} km{}",
                palette.white_bold,
                format_with_separators(u64::from(km)),
                palette.reset,
                capital_suffix(result, palette)
            ),
            None => writeln!(
                out,
                "{}No direct distance recorded{} between {} and {}",
                palette.red, palette.reset, result.from, result.to
            ),
        },
    }
}

fn capital_suffix(result: &DistanceOutput<'_>, palette: &ColorPalette) -> String {
    format!(
        " {}(capital of {} to capital of {}){}",
        palette.gray, result.from, result.to, palette.reset
    )
}

pub fn render_route<W: Write>(
    out: &mut W,
    result: &RouteOutput<'_>,
    format: OutputFormat,
    palette: &ColorPalette,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => render_json(out, result),
        OutputFormat::Text => render_route_text(out, result.from, result.to, result.route, palette),
    }
}

/// Render a route the way the interactive prompt shows it.
///
/// Hop lines are always exactly `* X --> Y (N km.)`. Hops weighted by a
/// fallback rule are listed in a note after the total.
pub fn render_route_text<W: Write>(
    out: &mut W,
    from: &str,
    to: &str,
    route: Option<&RoutePlan>,
    palette: &ColorPalette,
) -> io::Result<()> {
    let Some(plan) = route else {
        return writeln!(out, "{}No valid path found.{}", palette.red, palette.reset);
    };

    writeln!(
        out,
        "{}Route from {} to {}:{}",
        palette.white_bold, from, to, palette.reset
    )?;
    for hop in &plan.hops {
        writeln!(out, "* {hop}")?;
    }
    writeln!(
        out,
        "{}Total: {} km over {} border crossing{}{}",
        palette.gray,
        format_with_separators(plan.total_km),
        plan.hop_count(),
        if plan.hop_count() == 1 { "" } else { "s" },
        palette.reset
    )?;

    render_fallback_note(
        out,
        plan,
        EdgeKind::CapitalFallback,
        "Capital-to-capital distance used for",
        palette,
    )?;
    render_fallback_note(
        out,
        plan,
        EdgeKind::ZeroFallback,
        "Border length unknown, counted as 0 km",
        palette,
    )
}

fn render_fallback_note<W: Write>(
    out: &mut W,
    plan: &RoutePlan,
    kind: EdgeKind,
    label: &str,
    palette: &ColorPalette,
) -> io::Result<()> {
    let hops: Vec<String> = plan
        .hops
        .iter()
        .filter(|hop| hop.kind == kind)
        .map(|hop| format!("{} --> {}", hop.from, hop.to))
        .collect();
    if hops.is_empty() {
        return Ok(());
    }
    writeln!(
        out,
        "{}Note: {label}: {}{}",
        palette.yellow,
        hops.join(", "),
        palette.reset
    )
}

pub fn render_check<W: Write>(
    out: &mut W,
    result: &CheckOutput<'_>,
    format: OutputFormat,
    palette: &ColorPalette,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => render_json(out, result),
        OutputFormat::Text if result.valid => writeln!(
            out,
            "{}{} is a valid country{}",
            palette.green, result.name, palette.reset
        ),
        OutputFormat::Text => writeln!(
            out,
            "{}{} is not a valid country{}",
            palette.red, result.name, palette.reset
        ),
    }
}

fn render_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}
