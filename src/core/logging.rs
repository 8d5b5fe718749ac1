//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Cookies configuration validation and logging

use anyhow::Result;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs cookies configuration at application startup
///
/// Sign-in-gated extraction fails without a valid cookies file, so surface
/// the configuration state up front rather than in the middle of a job.
pub fn log_cookies_configuration() {
    if let Some(ref cookies_file) = *config::YTDL_COOKIES_FILE {
        let expanded = shellexpand::tilde(cookies_file).to_string();
        if std::path::Path::new(&expanded).exists() {
            log::info!("Using cookies file: {}", expanded);
        } else {
            log::error!(
                "YTDL_COOKIES_FILE is set but the file does not exist: {}",
                expanded
            );
            log::error!("Sign-in-gated downloads will fail until a valid cookies file is provided");
        }
    } else {
        log::warn!("No cookies file configured (YTDL_COOKIES_FILE) - downloads may be limited");
    }
}
