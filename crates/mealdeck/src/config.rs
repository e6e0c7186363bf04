//! CLI-side configuration: flag overrides on top of `mealdeck-config`.
//!
//! Core never sees these types -- it receives a pre-built `StorefrontConfig`.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use mealdeck_config::Config;
use mealdeck_core::StorefrontConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, RenderOpts};

/// Config file path: `--config` / `MEALDECK_CONFIG`, else the platform default.
pub fn resolve_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(mealdeck_config::config_path)
}

/// File + environment configuration.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(mealdeck_config::load_from_path(&resolve_path(global))?)
}

/// Build the storefront configuration, applying `--base-url` and
/// `--timeout`. A storefront without a base URL is rejected here.
pub fn storefront_config(cfg: &Config, global: &GlobalOpts) -> Result<StorefrontConfig, CliError> {
    let mut runtime = cfg.to_storefront_config();

    if let Some(ref url) = global.base_url {
        mealdeck_config::validate_base_url(url)?;
        runtime.base_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        runtime.timeout = Duration::from_secs(timeout);
    }

    if runtime.base_url.is_empty() {
        return Err(CliError::NoBaseUrl {
            path: resolve_path(global).display().to_string(),
        });
    }
    Ok(runtime)
}

/// Output settings: flags first, then the config file's `[defaults]`.
pub fn render_opts(cfg: &Config, global: &GlobalOpts) -> RenderOpts {
    let format = global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table);
    let color = global
        .color
        .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto);

    RenderOpts {
        format,
        color: output::should_color(color),
        quiet: global.quiet,
        yes: global.yes,
    }
}
