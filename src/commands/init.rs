//! `cairn init` - create the data dir and a default config
//!
//! Idempotent: an existing config is left untouched.

use std::fs;

use serde_json::json;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::print_json;
use cairn_core::config::CairnConfig;
use cairn_core::error::{CairnError, Result};

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let data_dir = ctx.data_dir();
    fs::create_dir_all(data_dir)
        .map_err(|e| CairnError::io_operation("create directory", data_dir.display(), e))?;

    let config_path = ctx.config_path();
    let created = !config_path.exists();
    if created {
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| CairnError::io_operation("create directory", parent.display(), e))?;
        }
        CairnConfig::default().save(&config_path)?;
    } else {
        // refuse to report success over a broken config
        CairnConfig::load(&config_path)?;
    }
    tracing::info!(data_dir = %data_dir.display(), created, "init");

    output_by_format!(ctx.cli.format,
        json => print_json(&json!({
            "status": "ok",
            "data_dir": data_dir.display().to_string(),
            "config": config_path.display().to_string(),
            "created": created,
        })),
        human => {
            if !ctx.cli.quiet {
                if created {
                    println!("Initialized cairn data dir at {}", data_dir.display());
                } else {
                    println!("Cairn data dir already initialized at {}", data_dir.display());
                }
            }
        }
    )
}
