use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub display: DisplayConfig,
    pub layout: LayoutConfig,
    pub status: StatusConfig,
    pub cycle: CycleConfig,
    pub daemon: DaemonConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            display: DisplayConfig::default(),
            layout: LayoutConfig::default(),
            status: StatusConfig::default(),
            cycle: CycleConfig::default(),
            daemon: DaemonConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub driver: DriverKind,
    pub i2c: I2cConfig,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub rotate_deg: Option<u16>,
    pub invert: Option<bool>,
    pub brightness: Option<u8>,     // 0-255
    pub font: FontChoice,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            driver: DriverKind::Ssd1306,
            i2c: I2cConfig::default(),
            width: None,
            height: None,
            rotate_deg: None,
            invert: None,
            brightness: None,
            font: FontChoice::Font6x10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I2cConfig {
    pub bus: String,        // e.g. "/dev/i2c-1"
    pub address: u8,        // 7-bit, e.g. 0x3C
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self { bus: i2c_bus_path(1), address: 0x3C }
    }
}

/// Pixel geometry of the status page. Bar length is derived from the panel width at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// left and right screen margins
    pub padding: u32,
    /// space given to the numeric labels on either side of the bars
    pub text_margin: u32,
    pub bar_width: u32,
    /// y-coordinates of the five rows, top to bottom
    pub rows: [u32; 5],
    pub uat_indent: u32,
    pub es_indent: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 2,
            text_margin: 25,
            bar_width: 6,
            rows: [0, 14, 24, 34, 45],
            uat_indent: 50,
            es_indent: 44,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            timeout_ms: 3000,
            connect_timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// seconds between status checks
    pub check_period_secs: u64,
    pub logo_path: PathBuf,
    /// how long the logo stays up
    pub logo_secs: u64,
    pub splash: bool,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            check_period_secs: 1,
            logo_path: PathBuf::from("/etc/stratux-screen/stratux-logo-64x64.bmp"),
            logo_secs: 5,
            splash: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub pidfile: Option<PathBuf>,
    pub pidfile_timeout_secs: u64,
    /// append log output here rather than stderr
    pub log_file: Option<PathBuf>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            pidfile: Some(PathBuf::from("/var/run/stratux-screen.pid")),
            pidfile_timeout_secs: 5,
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Ssd1306,
    Sh1106,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FontChoice {
    #[serde(rename = "5x8")]
    Font5x8,
    #[serde(rename = "6x10")]
    Font6x10,
    #[serde(rename = "6x12")]
    Font6x12,
    #[serde(rename = "6x13")]
    Font6x13,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "stratux-screen", version, about = "Stratux Screen.", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Display type used
    #[arg(short = 'd', long, value_enum)]
    pub display_type: Option<DriverKind>,
    /// I2C port, integer
    #[arg(short = 'p', long)]
    pub i2c_port: Option<u8>,
    /// I2C address, hexadecimal
    #[arg(short = 'a', long, value_parser = parse_hex_u8)]
    pub i2c_address: Option<u8>,
    /// How long to wait between data checks, in seconds
    #[arg(short = 'c', long)]
    pub check_period: Option<u64>,
    /// Path to PID file
    #[arg(short = 'f', long, value_hint = ValueHint::FilePath)]
    pub pidfile: Option<PathBuf>,
    /// PID file timeout, in seconds
    #[arg(short = 't', long)]
    pub pidfile_timeout: Option<u64>,
    /// Append log output to this file
    #[arg(short = 'o', long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
    /// Skip the startup logo
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_splash: bool,
    /// Enable debug log level
    #[arg(short = 'v', long, alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Accepts "0x3c", "0X3C" or bare "3c".
pub fn parse_hex_u8(s: &str) -> Result<u8, String> {
    let digits = s.trim().trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(digits, 16).map_err(|e| format!("invalid hex address '{}': {}", s, e))
}

pub fn i2c_bus_path(port: u8) -> String {
    format!("/dev/i2c-{}", port)
}

/// Public entry point: read YAML, apply CLI overrides, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    let mut cfg = match cli.config.as_ref() {
        Some(p) if p.exists() => read_yaml(p)?,
        Some(p) => {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
        None => match find_config_file() {
            Some(p) => read_yaml(&p)?,
            None => Config::default(),
        },
    };

    apply_cli_overrides(&mut cfg, cli);
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    if let Some(home) = home_dir() {
        let p = home.join(".config/stratux-screen/config.yaml");
        if p.exists() { return Some(p) }
    }
    for candidate in &["/etc/stratux-screen/config.yaml", "stratux-screen.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    // an empty file is a valid, all-defaults config
    if s.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(s)?)
}

pub fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if let Some(kind) = cli.display_type       { cfg.display.driver = kind; }
    if let Some(port) = cli.i2c_port           { cfg.display.i2c.bus = i2c_bus_path(port); }
    if let Some(address) = cli.i2c_address     { cfg.display.i2c.address = address; }
    if let Some(period) = cli.check_period     { cfg.cycle.check_period_secs = period; }
    if cli.pidfile.is_some()                   { cfg.daemon.pidfile = cli.pidfile.clone(); }
    if let Some(timeout) = cli.pidfile_timeout { cfg.daemon.pidfile_timeout_secs = timeout; }
    if cli.log_file.is_some()                  { cfg.daemon.log_file = cli.log_file.clone(); }
    if cli.no_splash                           { cfg.cycle.splash = false; }
    if cli.debug                               { cfg.log_level = "debug".to_string(); }
}

/// Put any invariants here (required fields, ranges, etc.)
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.cycle.check_period_secs == 0 {
        return Err(ConfigError::Validation("check period must be at least one second".into()));
    }
    if cfg.display.i2c.address > 0x77 {
        return Err(ConfigError::Validation(format!(
            "I2C address 0x{:02X} is outside the 7-bit range", cfg.display.i2c.address
        )));
    }
    if cfg.display.i2c.bus.trim().is_empty() {
        return Err(ConfigError::Validation("I2C bus path is empty".into()));
    }
    if cfg.display.width == Some(0) || cfg.display.height == Some(0) {
        return Err(ConfigError::Validation("display width/height must be > 0".into()));
    }
    if let Some(rot) = cfg.display.rotate_deg {
        match rot {
            0 | 90 | 180 | 270 => {},
            _ => return Err(ConfigError::Validation("display rotate_deg must be 0|90|180|270".into()))
        }
    }
    if cfg.layout.rows.windows(2).any(|w| w[0] > w[1]) {
        return Err(ConfigError::Validation("layout rows must run top to bottom".into()));
    }
    let url = cfg.status.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Validation(format!(
            "status base_url must be an http(s) URL, got '{}'", url
        )));
    }
    if cfg.status.timeout_ms == 0 {
        return Err(ConfigError::Validation("status timeout must be > 0".into()));
    }
    if cfg.status.connect_timeout_ms == 0 {
        return Err(ConfigError::Validation("status connect timeout must be > 0".into()));
    }
    Ok(())
}
