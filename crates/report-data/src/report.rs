//! Plain-text rendering of the aggregated totals.
//!
//! Layout, per entity collection (users first, then assets):
//!
//! ```text
//! User Summary:
//!  User = alice
//!    2025-08-01 25.00% (0.50 MB)
//!    2025-08-02 75.00% (1.50 MB)
//!  User Total = 40.00% 2.00 MB
//!
//! Asset Summary:
//!  ...
//! Grand Total = 5.00 MB
//! (1 megabyte = 1000^2 = 1000000 bytes)
//! ```
//!
//! Bucket percentages are of the entity's own total; entity-total
//! percentages are of the grand total. Every value is scaled into its own
//! best unit.

use std::collections::BTreeMap;
use std::io::{self, Write};

use report_core::formatting::{magnitude_note, percentage, scale_bytes, UnitSystem};

use crate::aggregator::{EntityUsage, TrafficTotals};

/// Rendering options carried over from the CLI.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Unit system for all byte values.
    pub unit: UnitSystem,
    /// The `--user` filter, echoed in the no-data epilogue.
    pub user_filter: Option<String>,
    /// The `--asset` filter, echoed in the no-data epilogue.
    pub asset_filter: Option<String>,
}

/// Write the full report to `out`.
pub fn render<W: Write>(out: &mut W, totals: &TrafficTotals, opts: &ReportOptions) -> io::Result<()> {
    writeln!(out, "User Summary:")?;
    render_entities(out, totals.users(), "User", totals.grand_total(), opts.unit)?;

    writeln!(out, "Asset Summary:")?;
    render_entities(out, totals.assets(), "Asset", totals.grand_total(), opts.unit)?;

    if totals.grand_total() == 0 {
        // Nothing was counted; name whichever filters could be the cause.
        if let Some(user) = &opts.user_filter {
            writeln!(out, "No data for {}", user)?;
        }
        if let Some(asset) = &opts.asset_filter {
            writeln!(out, "No data for {}", asset)?;
        }
    } else {
        let scaled = scale_bytes(totals.grand_total(), opts.unit);
        writeln!(out, "Grand Total = {:.2} {}", scaled.value, scaled.symbol)?;
        if let Some(note) = magnitude_note(opts.unit, &scaled) {
            writeln!(out, "{}", note)?;
        }
    }

    Ok(())
}

/// One summary section: every entity sorted case-insensitively by name.
fn render_entities<W: Write>(
    out: &mut W,
    entities: &BTreeMap<String, EntityUsage>,
    label: &str,
    grand_total: u64,
    unit: UnitSystem,
) -> io::Result<()> {
    let mut names: Vec<&String> = entities.keys().collect();
    names.sort_by_key(|name| name.to_lowercase());

    for name in names {
        let usage = &entities[name];
        if usage.overall() == 0 {
            writeln!(out, "No data for {}", name)?;
            continue;
        }

        writeln!(out, " {} = {}", label, name)?;
        for (bucket, bytes) in usage.buckets() {
            let share = percentage(bytes as f64, usage.overall() as f64, 2);
            let scaled = scale_bytes(bytes, unit);
            writeln!(
                out,
                "   {} {:.2}% ({:.2} {})",
                bucket, share, scaled.value, scaled.symbol
            )?;
        }

        let share = percentage(usage.overall() as f64, grand_total as f64, 2);
        let scaled = scale_bytes(usage.overall(), unit);
        writeln!(
            out,
            " {} Total = {:.2}% {:.2} {}\n",
            label, share, scaled.value, scaled.symbol
        )?;
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
