// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_WORKERS: u16 = 4;

pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let root_path = normalize_root(root)?;
    let config_path = root_path.join("config.yaml");

    if config_path.exists() {
        return Ok(false);
    }

    let contents = default_config_yaml();

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!(
        "created config.yaml (http {}); set CRM_API_KEY before launching campaigns",
        DEFAULT_PORT
    ));

    Ok(true)
}

fn normalize_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    };

    if root_path.exists() {
        if !root_path.is_dir() {
            return Err(BootstrapError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Runtime root is not a directory: {}", root_path.display()),
            )));
        }
        return Ok(root_path);
    }

    fs::create_dir_all(&root_path)?;
    log_action(format!(
        "created runtime root directory {}",
        root_path.display()
    ));
    Ok(root_path)
}

fn default_config_yaml() -> String {
    format!(
        "server:\n  host: \"0.0.0.0\"\n  port: {port}\n  workers: {workers}\n\nlogging:\n  level: \"info\"\n\napp:\n  name: \"Campaign Launcher\"\n  description: \"Tag CRM contacts and publish campaign messages in paced batches\"\n\ncrm:\n  base_url: \"https://services.leadconnectorhq.com\"\n  api_version: \"2021-07-28\"\n  # default_location_id: \"your-location-id\"\n  page_size: 20\n  timeout_seconds: 30\n  custom_value_name: \"Booster Shot Message\"\n\ncampaign:\n  batch_size: 100\n  batch_interval_ms: 10000\n  call_timeout_seconds: 15\n\nai:\n  base_url: \"https://api.openai.com/v1\"\n  model: \"gpt-4o-mini\"\n  timeout_seconds: 30\n\noffers:\n  # webhook_url: \"https://hooks.example.com/offers\"\n",
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
    )
}
