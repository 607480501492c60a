use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::record::RecordKind;

#[derive(Parser)]
#[command(name = "driverwatch")]
#[command(about = "Watches a vendor support page for driver and BIOS updates")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./driverwatch.toml, then the user config dir)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Show debug logging
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scrape the listings, report changes and update the snapshots
    Check(CheckArgs),

    /// Print a stored snapshot
    Show(ShowArgs),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Listing {
    Drivers,
    Bios,
}

impl From<Listing> for RecordKind {
    fn from(listing: Listing) -> Self {
        match listing {
            Listing::Drivers => RecordKind::Driver,
            Listing::Bios => RecordKind::Firmware,
        }
    }
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Print notifications to stdout instead of pushing them
    #[arg(long, default_value_t = false)]
    pub console: bool,

    /// Read list URLs as local files instead of opening a browser
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Only check one listing
    #[arg(long, value_enum)]
    pub only: Option<Listing>,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Which snapshot to print
    #[arg(value_enum)]
    pub listing: Listing,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_flags() {
        let cli = Cli::try_parse_from(["driverwatch", "check", "--console", "--only", "bios"]).unwrap();
        let Command::Check(args) = cli.command else { panic!("expected check") };
        assert!(args.console);
        assert!(!args.offline);
        assert!(args.only == Some(Listing::Bios));
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["driverwatch", "show", "drivers", "-c", "alt.toml", "--json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        let Command::Show(args) = cli.command else { panic!("expected show") };
        assert_eq!(RecordKind::from(args.listing), RecordKind::Driver);
        assert!(args.json);
    }

    #[test]
    fn unknown_listing_rejected() {
        assert!(Cli::try_parse_from(["driverwatch", "show", "firmware"]).is_err());
    }
}
