//! CLI argument parsing

use clap::Parser;

/// Load the Jaffle Shop API (customers, orders, products) into DuckDB
#[derive(Parser, Debug)]
#[command(name = "jaffle-ingest")]
#[command(author, version, about)]
#[command(after_help = "\
Environment:
  JAFFLE_CONFIG        YAML file with pipeline settings
  JAFFLE_API_BASE      API base URL
  JAFFLE_PAGE_SIZE     Records per page (default 100)
  JAFFLE_WORKING_DIR   Directory for the database and staging files (default .)
  EXTRACT__WORKERS     Resources extracted concurrently (default 3)
  NORMALIZE__WORKERS   Pages normalized concurrently (default: CPU count)
  LOAD__WORKERS        Tables loaded concurrently (default 5)
  RUST_LOG             Log filter (default info)")]
pub struct Cli {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_accepts_no_arguments() {
        assert!(Cli::try_parse_from(["jaffle-ingest"]).is_ok());
    }

    #[test]
    fn test_cli_rejects_unknown_arguments() {
        assert!(Cli::try_parse_from(["jaffle-ingest", "--page-size", "10"]).is_err());
        assert!(Cli::try_parse_from(["jaffle-ingest", "customers"]).is_err());
    }

    #[test]
    fn test_cli_version_flag() {
        let err = Cli::try_parse_from(["jaffle-ingest", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
