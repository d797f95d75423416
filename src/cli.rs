//! Command-line interface definitions for the news dashboard.
//!
//! The binary loads one record snapshot, builds a reader view and the admin
//! table over it, prints a JSON report to stdout and optionally writes the
//! two export files.

use crate::admin::Privilege;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the news dashboard.
///
/// # Examples
///
/// ```sh
/// # Signed-out report over a snapshot
/// news_dashboard -i noticias.json
///
/// # Signed-in admin: filter, reveal two more pages and export
/// news_dashboard -i noticias.json --authorized --privilege 5 \
///     --search elecciones --start-date 2024-01-01 --more 2 -o ./exports
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON array of news records as returned by the backing API
    #[arg(short, long)]
    pub input: PathBuf,

    /// Optional path to a YAML dashboard config
    #[arg(short, long, env = "NEWS_DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Case-insensitive title search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Inclusive lower date bound (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Inclusive upper date bound (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Treat the session as signed in
    #[arg(short, long)]
    pub authorized: bool,

    /// Number of "load more" requests to perform
    #[arg(long, default_value_t = 0)]
    pub more: usize,

    /// Session privilege level; 5 is administrator
    #[arg(long, default_value_t = 0)]
    pub privilege: u8,

    /// Admin table page to report (1-based)
    #[arg(long, default_value_t = 1)]
    pub admin_page: usize,

    /// Optional JSON array of pre-counted category totals
    #[arg(long)]
    pub category_summary: Option<PathBuf>,

    /// Directory to write the spreadsheet and document exports into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

impl Cli {
    pub fn privilege(&self) -> Privilege {
        Privilege(self.privilege)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "news_dashboard",
            "--input",
            "./noticias.json",
            "--search",
            "liga",
            "--start-date",
            "2024-01-01",
            "--authorized",
            "--more",
            "2",
        ]);

        assert_eq!(cli.input, PathBuf::from("./noticias.json"));
        assert_eq!(cli.search.as_deref(), Some("liga"));
        assert_eq!(cli.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(cli.end_date, None);
        assert!(cli.authorized);
        assert_eq!(cli.more, 2);
        assert_eq!(cli.admin_page, 1);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "news_dashboard",
            "-i",
            "/tmp/noticias.json",
            "-o",
            "/tmp/exports",
            "-a",
        ]);

        assert_eq!(cli.input, PathBuf::from("/tmp/noticias.json"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/exports")));
        assert!(cli.authorized);
        assert!(!cli.privilege().is_admin());
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        let result = Cli::try_parse_from(["news_dashboard", "-i", "x.json", "--start-date", "ayer"]);
        assert!(result.is_err());
    }
}
