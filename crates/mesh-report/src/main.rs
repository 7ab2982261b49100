mod bootstrap;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use report_core::aliases::AliasTables;
use report_core::error::ReportError;
use report_core::settings::Settings;
use report_core::time_utils;
use report_data::aggregator::fold_events;
use report_data::filter::RecordFilter;
use report_data::reader;
use report_data::report::{self, ReportOptions};

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(settings.debug)?;

    tracing::debug!("mesh-report v{} starting", env!("CARGO_PKG_VERSION"));

    let aliases = AliasTables::load_or_default(settings.aliases.as_deref());

    if settings.help_plus {
        print_help_plus(&aliases)?;
        return Ok(());
    }

    // An unknown user alias only warns; an unknown asset aborts, because
    // asset filters can only match names present in the alias tables.
    if let Some(user) = &settings.user {
        if !aliases.is_known_user(user) {
            eprintln!(
                "\"{}\" is not a known user alias. Use --help-plus to get a list of known users.",
                user
            );
            eprintln!("Continuing with user={} anyway.", user);
        }
    }
    if let Some(asset) = &settings.asset {
        if !aliases.is_known_asset(asset) {
            eprintln!("Asset names are matched to nodeids; add them to the alias file for proper recognition.");
            return Err(ReportError::UnknownAsset(asset.clone()).into());
        }
    }

    let filter = RecordFilter {
        since: settings.since_bound(),
        before: settings.before_bound(),
        user: settings.user.clone(),
        asset: settings.asset.clone(),
    };

    let mut events = Vec::new();
    for path in reader::resolve_input_files(settings.input_files()) {
        events.extend(reader::read_events(&path)?);
    }

    let totals = fold_events(&events, &filter, &aliases, settings.granularity);

    let opts = ReportOptions {
        unit: settings.unit_system(),
        user_filter: settings.user.clone(),
        asset_filter: settings.asset.clone(),
    };
    let mut out = bootstrap::open_output(settings.output.as_deref());
    report::render(&mut out, &totals, &opts)?;

    Ok(())
}

/// The `--help-plus` listing: normal help plus the known aliases and the
/// accepted date/time input formats.
fn print_help_plus(aliases: &AliasTables) -> Result<()> {
    Settings::command().print_help()?;
    println!();

    println!("\nKnown aliases:");
    let mut assets: Vec<&String> = aliases.nodeids.values().collect();
    assets.sort();
    for name in assets {
        println!("Asset: \"{}\"", name);
    }
    let mut users: Vec<&String> = aliases.userids.values().collect();
    users.sort();
    for name in users {
        println!("User: \"{}\"", name);
    }

    println!("\nValid date/time input formats (UTC):");
    for format in time_utils::TIME_FORMATS {
        println!("  {}", format);
    }

    Ok(())
}
