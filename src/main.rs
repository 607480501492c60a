use std::process::ExitCode;

use clap::Parser;
use driverwatch::cli::{CheckArgs, Cli, Command, ShowArgs};
use driverwatch::config::{Config, NotifierKind};
use driverwatch::fetch::{FileFetcher, PageFetcher, WebDriverFetcher};
use driverwatch::monitor::Monitor;
use driverwatch::record::{DriverRecord, FirmwareRecord, RecordKind};
use driverwatch::{logging, notify, report, store};

fn load_config(cli: &Cli) -> Option<Config> {
    match Config::load(cli.config.as_deref()) {
        Ok(config) => Some(config),
        Err(e) => {
            // no notifier without a config, so this only goes to the terminal
            eprintln!("Error loading config: {e}");
            None
        }
    }
}

async fn check(config: Config, args: &CheckArgs) -> ExitCode {
    let config = if args.console {
        match config.with_notifier(NotifierKind::Console) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        config
    };

    let kinds = match config.select_kinds(args.only.map(RecordKind::from)) {
        Ok(kinds) => kinds,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let notifier = match notify::from_config(&config) {
        Ok(notifier) => notifier,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let fetcher: Box<dyn PageFetcher> = if args.offline {
        Box::new(FileFetcher)
    } else {
        Box::new(WebDriverFetcher::from_config(&config))
    };

    let monitor = Monitor::new(config, fetcher, notifier);
    match monitor.run(&kinds).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            monitor.report_failure(&e).await;
            ExitCode::FAILURE
        }
    }
}

fn show(config: &Config, args: &ShowArgs) -> ExitCode {
    let kind = RecordKind::from(args.listing);
    let Some(target) = config.target(kind) else {
        eprintln!("No {} listing configured.", kind.noun());
        return ExitCode::FAILURE;
    };

    match kind {
        RecordKind::Driver => {
            let records = store::load::<DriverRecord>(&target.info_path);
            report::print(records.as_deref(), args.json);
        }
        RecordKind::Firmware => {
            let records = store::load::<FirmwareRecord>(&target.info_path);
            report::print(records.as_deref(), args.json);
        }
    }
    ExitCode::SUCCESS
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let Some(config) = load_config(&cli) else {
        return ExitCode::FAILURE;
    };

    match &cli.command {
        Command::Check(args) => check(config, args).await,
        Command::Show(args) => show(&config, args),
    }
}
