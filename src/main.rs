//! # News Dashboard CLI
//!
//! Loads a record snapshot, applies the reader's criteria and reveal
//! requests, prints the dashboard report as JSON and, for administrators,
//! writes the CSV spreadsheet and PDF document exports of the filtered list.
//!
//! ## Usage
//!
//! ```sh
//! news_dashboard -i noticias.json --authorized --privilege 5 -o ./exports
//! ```

use clap::Parser;
use news_dashboard::admin::{Action, AdminTable};
use news_dashboard::aggregate::DashboardAggregates;
use news_dashboard::cli::Cli;
use news_dashboard::config::load_config;
use news_dashboard::models::FilterCriteria;
use news_dashboard::outputs::save::save_payload;
use news_dashboard::report::{AdminPage, DashboardReport};
use news_dashboard::snapshot::{load_category_summary, load_records};
use news_dashboard::utils::truncate_for_log;
use news_dashboard::view::NewsView;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = load_config(args.config.as_deref())?;
    let records = load_records(&args.input).await?;
    let category_summary = match &args.category_summary {
        Some(path) => Some(load_category_summary(path).await?),
        None => None,
    };

    // ---- Reader view ----
    let mut view = NewsView::new(records, config.reveal.gate());
    view.set_authorized(args.authorized);

    let criteria = FilterCriteria {
        search_text: args.search.clone().unwrap_or_default(),
        start_date: args.start_date,
        end_date: args.end_date,
    };
    if !criteria.is_empty() && !view.set_criteria(criteria) {
        warn!("Search and date filters require a signed-in session; ignoring them");
    }

    let reveal_outcomes: Vec<_> = (0..args.more).map(|_| view.load_more()).collect();
    info!(
        total = view.records().len(),
        filtered = view.filtered().len(),
        visible = view.visible().len(),
        "View ready"
    );
    if let Some(lead) = view.lead_and_rest().0 {
        debug!(id = %lead.id, title = %truncate_for_log(&lead.title, 80), "Lead story");
    }

    // ---- Aggregates over the full snapshot ----
    let aggregates = DashboardAggregates::compute(
        view.records(),
        config.top_read,
        category_summary.as_deref(),
    );

    // ---- Admin table ----
    let privilege = args.privilege();
    let admin_page = privilege.is_admin().then(|| {
        let mut table = AdminTable::new(config.admin.items_per_page);
        table.go_to(args.admin_page, view.filtered().len());
        AdminPage::build(&table, view.filtered(), config.admin.description_preview)
    });

    let report = DashboardReport::build(&view, aggregates, reveal_outcomes, privilege, admin_page);
    println!("{}", serde_json::to_string_pretty(&report)?);

    // ---- Exports ----
    if let Some(output_dir) = &args.output_dir {
        if !privilege.allows(Action::Export) {
            warn!(privilege = privilege.0, "Export requires administrator privilege; skipping");
        } else {
            let spreadsheet = view.export_spreadsheet()?;
            let document = view.export_document(&config.document)?;
            for payload in [spreadsheet, document] {
                let filename = config.export.filename(payload.kind);
                match save_payload(&payload, output_dir, filename).await {
                    Ok(path) => info!(kind = ?payload.kind, path = %path.display(), "Export saved"),
                    Err(e) => {
                        error!(kind = ?payload.kind, error = %e, "Export failed");
                        return Err(e.into());
                    }
                }
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        millis = elapsed.as_millis() as u64,
        exported = args.output_dir.is_some() && privilege.allows(Action::Export),
        "Execution complete"
    );

    Ok(())
}
