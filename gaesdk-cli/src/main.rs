//! gaesdk CLI - install or update the Google App Engine Go SDK.
//!
//! ```text
//! gaesdk                          # update ./go_appengine to the latest release
//! gaesdk --install /opt/google    # same, in another directory
//! gaesdk --version 1.9.91         # install a specific release
//! gaesdk --list-remote            # show releases available for download
//! ```

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gaesdk::config::{config_file_path, ConfigFile};
use gaesdk::logging::{init_logging, LoggingOptions};
use tracing::{error, info};

use commands::common::DownloaderArg;
use commands::update::UpdateArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "gaesdk")]
#[command(about = "Keeps a local Google App Engine Go SDK installation up to date", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// SDK version to install, or "latest"
    #[arg(long, value_name = "VERSION")]
    version: Option<String>,

    /// Directory holding go_appengine (default: config value, else current directory)
    #[arg(long, value_name = "DIR")]
    install: Option<PathBuf>,

    /// Reinstall even if the requested version is already installed
    #[arg(long = "override")]
    force: bool,

    /// List SDK versions available for download and exit
    #[arg(long)]
    list_remote: bool,

    /// Check a requested version against the remote listing before installing
    #[arg(long)]
    check_available: bool,

    /// How to download and unpack the archive
    #[arg(long, value_enum)]
    downloader: Option<DownloaderArg>,

    /// Keep the downloaded archive in the staging directory
    #[arg(long)]
    keep_archive: bool,

    /// Configuration file (default: <config dir>/gaesdk/config.ini)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }

    fn update_args(&self) -> UpdateArgs {
        UpdateArgs {
            version: self.version.clone(),
            install: self.install.clone(),
            force: self.force,
            check_available: self.check_available,
            downloader: self.downloader,
            keep_archive: self.keep_archive,
        }
    }
}

fn run(cli: &Cli, config: &ConfigFile) -> Result<(), CliError> {
    if cli.list_remote {
        commands::list::run(cli.install.clone(), config)
    } else {
        commands::update::run(cli.update_args(), config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging needs the config file's log path, so load it first and report
    // a bad file once the subscriber is up.
    let config = ConfigFile::load_from(&cli.config_path());
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.as_ref().ok().and_then(|c| c.logging.file.clone()));

    let _guard = match init_logging(&LoggingOptions {
        verbose: cli.verbose,
        file: log_file,
    }) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", CliError::from(e));
            return ExitCode::FAILURE;
        }
    };

    let result = config
        .map_err(CliError::from)
        .and_then(|config| run(&cli, &config));

    match result {
        Ok(()) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["gaesdk"]).unwrap();
        assert!(cli.version.is_none());
        assert!(cli.install.is_none());
        assert!(!cli.force);
        assert!(!cli.list_remote);
        assert!(cli.downloader.is_none());
    }

    #[test]
    fn test_version_selects_sdk_release() {
        let cli = Cli::try_parse_from(["gaesdk", "--version", "1.9.91"]).unwrap();
        assert_eq!(cli.version.as_deref(), Some("1.9.91"));
    }

    #[test]
    fn test_override_and_install() {
        let cli =
            Cli::try_parse_from(["gaesdk", "--override", "--install", "/opt/google"]).unwrap();
        let args = cli.update_args();

        assert!(args.force);
        assert_eq!(args.install, Some(PathBuf::from("/opt/google")));
    }

    #[test]
    fn test_downloader_values() {
        let cli = Cli::try_parse_from(["gaesdk", "--downloader", "wget"]).unwrap();
        assert_eq!(cli.downloader, Some(DownloaderArg::Wget));

        assert!(Cli::try_parse_from(["gaesdk", "--downloader", "aria2"]).is_err());
    }

    #[test]
    fn test_logging_flags() {
        let cli = Cli::try_parse_from(["gaesdk", "-v", "--log-file", "/tmp/gaesdk.log"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/gaesdk.log")));
    }

    #[test]
    fn test_explicit_config_path() {
        let cli = Cli::try_parse_from(["gaesdk", "--config", "/etc/gaesdk.ini"]).unwrap();
        assert_eq!(cli.config_path(), PathBuf::from("/etc/gaesdk.ini"));
    }

    #[test]
    fn test_list_remote_with_unknown_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing.ini");
        let cli = Cli::try_parse_from([
            "gaesdk",
            "--list-remote",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();

        assert!(cli.list_remote);
        assert_eq!(ConfigFile::load_from(&cli.config_path()).unwrap(), ConfigFile::default());
    }
}
