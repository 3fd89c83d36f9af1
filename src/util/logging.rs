// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use env_logger::Logger;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// Rewrites the level of records whose target starts with `prefix`.
#[derive(Debug, Clone)]
pub struct DemotionRule {
    pub prefix: &'static str,
    pub from: Level,
    pub to: Level,
}

/// HTTP client internals are chatty at debug; push them down to trace.
pub fn default_demotions() -> Vec<DemotionRule> {
    ["hyper", "hyper_util", "reqwest", "rustls", "h2"]
        .into_iter()
        .map(|prefix| DemotionRule {
            prefix,
            from: Level::Debug,
            to: Level::Trace,
        })
        .collect()
}

struct DemotingLogger {
    inner: Logger,
    rules: Vec<DemotionRule>,
}

impl DemotingLogger {
    fn level_for(&self, target: &str, level: Level) -> Level {
        self.rules
            .iter()
            .find(|rule| rule.from == level && target.starts_with(rule.prefix))
            .map(|rule| rule.to)
            .unwrap_or(level)
    }
}

impl Log for DemotingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let adjusted = Metadata::builder()
            .level(self.level_for(metadata.target(), metadata.level()))
            .target(metadata.target())
            .build();
        self.inner.enabled(&adjusted)
    }

    fn log(&self, record: &Record) {
        let adjusted = Record::builder()
            .level(self.level_for(record.target(), record.level()))
            .target(record.target())
            .args(*record.args())
            .module_path(record.module_path())
            .file(record.file())
            .line(record.line())
            .build();
        self.inner.log(&adjusted);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

pub fn parse_level_filter(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Installs the process logger: env_logger to stdout with a stable UTC format,
/// wrapped so dependency noise can be demoted.
pub fn init_logging(level: &str, rules: Vec<DemotionRule>) -> Result<(), SetLoggerError> {
    let logger = env_logger::Builder::from_default_env()
        .filter_level(parse_level_filter(level))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build();

    log::set_boxed_logger(Box::new(DemotingLogger {
        inner: logger,
        rules,
    }))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_defaults_to_info() {
        assert_eq!(parse_level_filter("loud"), LevelFilter::Info);
        assert_eq!(parse_level_filter(" DEBUG "), LevelFilter::Debug);
    }

    #[test]
    fn demotes_only_matching_targets_and_levels() {
        let logger = DemotingLogger {
            inner: env_logger::Builder::new().build(),
            rules: default_demotions(),
        };
        assert_eq!(logger.level_for("hyper::proto", Level::Debug), Level::Trace);
        assert_eq!(logger.level_for("hyper::proto", Level::Warn), Level::Warn);
        assert_eq!(
            logger.level_for("campaign_launcher::crm", Level::Debug),
            Level::Debug
        );
    }
}
