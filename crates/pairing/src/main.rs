//! adb-pair
//!
//! Terminal pairing screen for Android wireless debugging.

use anyhow::{Context, Result};
use clap::Parser;
use common::{AddressJoin, setup_logging};
use pairing::config::PairingConfig;
use pairing::theme::ThemeMode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "adb-pair")]
#[command(author, version, about = "adb-pair - Pair with a device over wireless debugging")]
#[command(long_about = "
A terminal pairing screen for Android wireless debugging.
Enter the pairing IP address, port and six-digit code shown by the
device, then press Enter.

EXAMPLES:
    # Run with default config
    adb-pair

    # Run with custom config
    adb-pair --config /path/to/config.toml

    # Pin the dark theme and log at debug level
    adb-pair --theme dark --log-level debug

CONFIGURATION:
    The configuration file is looked up in the following order:
    1. Path specified with --config
    2. ~/.config/adb-pair/config.toml
    3. /etc/adb-pair/config.toml
    4. Built-in defaults
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Theme: follow the OS, or pin dark/light
    #[arg(long, value_enum, value_name = "MODE")]
    theme: Option<ThemeMode>,

    /// Join IP and port without a separator
    #[arg(long)]
    literal_address: bool,

    /// Submit fields without validating them
    #[arg(long)]
    no_validate: bool,
}

impl Args {
    /// Fold command line overrides into the loaded configuration
    fn apply_to(&self, config: &mut PairingConfig) {
        if let Some(level) = &self.log_level {
            config.ui.log_level = level.clone();
        }
        if let Some(mode) = self.theme {
            config.theme.mode = mode;
        }
        if self.literal_address {
            config.pairing.address_join = AddressJoin::Literal;
        }
        if self.no_validate {
            config.pairing.validate = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --save-config flag early (before loading config)
    if args.save_config {
        let config = PairingConfig::default();
        let path = PairingConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    let mut config = if let Some(ref path) = args.config {
        PairingConfig::load(Some(path.clone())).context("Failed to load configuration")?
    } else {
        PairingConfig::load_or_default()
    };
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    let log_file = config.ui.log_file_path();
    setup_logging(&config.ui.log_level, log_file.as_deref())
        .context("Failed to setup logging")?;

    info!("adb-pair v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Log level: {}, theme: {:?}, address join: {:?}",
        config.ui.log_level, config.theme.mode, config.pairing.address_join
    );

    let result = pairing::tui::run(&config).await;

    info!("adb-pair shutting down...");
    result
}
