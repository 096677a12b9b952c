// Switchboard - An accessibility-first Mastodon client
// Copyright (C) 2025 Switchboard Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Logging system for Switchboard
//!
//! Provides structured logging with console and rolling JSON file output and
//! configurable verbosity levels.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::CoreConfig;

/// Logger configuration
pub struct LoggerConfig {
    /// Log directory path
    pub log_dir: PathBuf,
    /// Log file prefix
    pub file_prefix: String,
    /// Maximum log level
    pub level: Level,
    /// Whether to log to console
    pub console_output: bool,
    /// Whether to log to file
    pub file_output: bool,
    /// Log rotation strategy
    pub rotation: Rotation,
}

impl LoggerConfig {
    /// Build the logger configuration from the core configuration
    pub fn from_core(config: &CoreConfig) -> Self {
        Self {
            log_dir: config.log_dir(),
            file_prefix: config.log.file_prefix.clone(),
            level: Level::from_str(&config.log.level).unwrap_or(Level::INFO),
            console_output: config.log.console_output,
            file_output: config.log.file_output,
            rotation: Rotation::DAILY,
        }
    }

    /// Filter used when `RUST_LOG` is not set
    fn default_filter(&self) -> String {
        // the domain macros log under their own targets
        ["switchboard_core", "ipc", "intent", "fetch"]
            .iter()
            .map(|target| format!("{}={}", target, self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Main logger struct
pub struct Logger;

impl Logger {
    /// Initialize the logging system from the core configuration
    pub fn init(config: &CoreConfig) -> Result<()> {
        Self::init_with_config(LoggerConfig::from_core(config))
    }

    /// Initialize the logging system with custom configuration
    pub fn init_with_config(config: LoggerConfig) -> Result<()> {
        // Ensure log directory exists
        if config.file_output {
            std::fs::create_dir_all(&config.log_dir).with_context(|| {
                format!("Failed to create log directory {}", config.log_dir.display())
            })?;
        }

        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(config.default_filter())
                .context("Invalid default log filter")?,
        };

        let subscriber = tracing_subscriber::registry().with(env_filter);

        let file_layer = config.file_output.then(|| {
            let file_appender = RollingFileAppender::new(
                config.rotation.clone(),
                &config.log_dir,
                &config.file_prefix,
            );

            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .json()
        });

        let console_layer = config.console_output.then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_span_events(FmtSpan::CLOSE)
        });

        subscriber
            .with(file_layer)
            .with(console_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;

        Ok(())
    }
}

/// Macro for logging IPC messages
#[macro_export]
macro_rules! log_ipc {
    (request, $method:expr, $id:expr) => {
        tracing::debug!(
            target: "ipc",
            direction = "request",
            method = $method,
            id = $id,
            "IPC request received"
        )
    };
    (response, $method:expr, $id:expr, $success:expr) => {
        tracing::debug!(
            target: "ipc",
            direction = "response",
            method = $method,
            id = $id,
            success = $success,
            "IPC response sent"
        )
    };
    (event, $event:expr) => {
        tracing::debug!(
            target: "ipc",
            direction = "event",
            event = $event,
            "IPC event sent"
        )
    };
}

/// Macro for logging dispatched intents
#[macro_export]
macro_rules! log_intent {
    ($intent:expr) => {
        tracing::debug!(
            target: "intent",
            intent = $intent.name(),
            "Intent dispatched"
        )
    };
}

/// Macro for logging profile fetches
#[macro_export]
macro_rules! log_fetch {
    (started, $account:expr) => {
        tracing::info!(
            target: "fetch",
            event = "started",
            app_account = $account,
            "Profile fetch started"
        )
    };
    (loaded, $account:expr) => {
        tracing::info!(
            target: "fetch",
            event = "loaded",
            app_account = $account,
            "Profile fetch completed"
        )
    };
    (failed, $account:expr, $reason:expr) => {
        tracing::warn!(
            target: "fetch",
            event = "failed",
            app_account = $account,
            reason = $reason,
            "Profile fetch failed"
        )
    };
}
