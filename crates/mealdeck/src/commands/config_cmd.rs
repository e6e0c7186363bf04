//! Config subcommand handlers.

use std::io::IsTerminal;

use dialoguer::{Input, Select};

use mealdeck_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const OUTPUT_CHOICES: &[&str] = &["table", "json", "yaml", "plain"];

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            let path = config::resolve_path(global);

            if path.exists()
                && !util::confirm(
                    &format!("Overwrite existing config at {}?", path.display()),
                    "config init",
                    global.yes,
                )?
            {
                return Ok(());
            }

            let mut cfg = Config::default();
            match global.base_url.as_deref() {
                // Non-interactive: everything else keeps its default
                Some(url) => cfg.set("api.base_url", url)?,
                None => {
                    if !std::io::stdin().is_terminal() {
                        return Err(CliError::Validation {
                            field: "api.base_url".into(),
                            reason: "pass --base-url when running without a terminal".into(),
                        });
                    }
                    prompt_settings(&mut cfg, &path)?;
                }
            }

            mealdeck_config::save_to_path(&cfg, &path)?;

            if !global.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
                eprintln!("  Test it: mealdeck meals list");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let opts = config::render_opts(&cfg, global);
            let text = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                opts.format,
                &cfg,
                |_| text.trim_end().to_owned(),
                |_| text.trim_end().to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::resolve_path(global).display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let path = config::resolve_path(global);
            let mut cfg = mealdeck_config::load_file_only(&path)?;
            cfg.set(&key, &value)?;
            mealdeck_config::save_to_path(&cfg, &path)?;

            if !global.quiet {
                eprintln!("✓ Set {key} = {value}");
            }
            Ok(())
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn prompt_settings(cfg: &mut Config, path: &std::path::Path) -> Result<(), CliError> {
    eprintln!("mealdeck configuration");
    eprintln!("   Config path: {}\n", path.display());

    let base_url: String = Input::new()
        .with_prompt("Food API base URL")
        .default(DEFAULT_BASE_URL.into())
        .validate_with(|input: &String| {
            mealdeck_config::validate_base_url(input).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;
    cfg.set("api.base_url", &base_url)?;

    let selection = Select::new()
        .with_prompt("Default output format")
        .items(OUTPUT_CHOICES)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    cfg.set("defaults.output", OUTPUT_CHOICES[selection])?;

    Ok(())
}
