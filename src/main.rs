// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use campaign_launcher::api;
use campaign_launcher::app_state::AppState;
use campaign_launcher::bootstrap::{self, BootstrapResult};
use campaign_launcher::config::{Credentials, ValidatedConfig};
use campaign_launcher::util::{default_demotions, init_logging};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if matches!(parsed_args.mode, RunMode::Help) {
        print!("{}", help_text());
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    match System::new().block_on(run_server(bootstrap, &parsed_args.runtime_root)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(bootstrap: BootstrapResult, runtime_root: &Path) -> std::io::Result<()> {
    let validated_config = Arc::new(bootstrap.validated_config);

    init_logging(&validated_config.logging.level, default_demotions()).map_err(|error| {
        eprintln!("❌ Failed to initialize logger: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    log_startup_info(&validated_config, &bootstrap.config_file, runtime_root);

    let credentials = Credentials::from_env();
    log_credential_status(&credentials);

    let app_state = match AppState::new(validated_config.clone(), &credentials) {
        Ok(state) => Arc::new(state),
        Err(error) => {
            eprintln!("❌ Failed to initialize HTTP client: {}", error);
            return Err(std::io::Error::other(error.to_string()));
        }
    };
    info!("✅ CRM client initialized successfully");
    info!(
        "✅ Batch tagger ready: {} contacts per chunk, {} ms between chunks",
        app_state.tagger.policy().batch_size,
        validated_config.campaign.batch_interval_ms
    );

    let bind_address = (
        validated_config.server.host.clone(),
        validated_config.server.port,
    );
    info!(
        "🚀 Listening on http://{}:{}",
        bind_address.0, bind_address.1
    );

    let state = web::Data::from(app_state);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::configure)
            .default_service(web::route().to(api::not_found))
    })
    .workers(validated_config.server.workers)
    .bind(bind_address)?
    .run()
    .await
}

fn log_startup_info(config: &ValidatedConfig, config_file: &Path, runtime_root: &Path) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Workers: {}", config.server.workers);
    info!("CRM base URL: {}", config.crm.base_url);
    match &config.crm.default_location_id {
        Some(location_id) => info!("Default location: {}", location_id),
        None => info!("Default location: none (resolved per request)"),
    }
    info!(
        "Campaign pacing: batch size {}, interval {} ms, call timeout {} s",
        config.campaign.batch_size,
        config.campaign.batch_interval_ms,
        config.campaign.call_timeout_seconds
    );
    if let Some(url) = &config.offers.webhook_url {
        info!("Offer web-hook: {}", url);
    }
    info!("Config file: {}", config_file.display());
    info!("Runtime root: {}", runtime_root.display());

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {}", current_dir.display());
    }
}

fn log_credential_status(credentials: &Credentials) {
    if credentials.crm_api_key.is_some() {
        info!("✅ CRM credential loaded from environment");
    } else {
        warn!("CRM credential is not set; contact and campaign routes will answer 500");
    }
    if credentials.ai_api_key.is_some() {
        info!("✅ AI credential loaded from environment");
    } else {
        warn!("AI credential is not set; /api/optimize-sms will answer 500");
    }
}

fn help_text() -> &'static str {
    "Usage: campaign-launcher [-C <root>] [help]\n\n  -C <root>    Runtime directory holding config.yaml (default: .)\n  -h, --help   Show this help\n\nEnvironment:\n  CRM_API_KEY | CRM_API_TOKEN | CRM_ACCESS_TOKEN   CRM bearer token\n  OPENAI_API_KEY | AI_API_KEY                      SMS optimizer key\n  RUST_LOG                                         Extra log filters\n"
}

#[derive(Debug)]
enum RunMode {
    Serve,
    Help,
}

#[derive(Debug)]
struct ParsedArgs {
    runtime_root: PathBuf,
    mode: RunMode,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            runtime_root: PathBuf::from("."),
            mode: RunMode::Help,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");
    let mut extra = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--" {
            continue;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = PathBuf::from(value);
        } else {
            extra.push(arg);
        }
    }

    if extra.len() == 1 && extra[0].eq_ignore_ascii_case("help") {
        return Ok(ParsedArgs {
            runtime_root,
            mode: RunMode::Help,
        });
    }

    if let Some(unexpected) = extra.first() {
        return Err(format!("Unexpected argument '{}'", unexpected));
    }

    Ok(ParsedArgs {
        runtime_root: make_runtime_root_absolute(runtime_root)?,
        mode: RunMode::Serve,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
