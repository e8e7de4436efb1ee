//! Configuration view and validation commands for `autocoder config`.

use anyhow::{Context, Result};

use super::super::ConfigCommands;

pub fn cmd_config(project_dir: &std::path::Path, command: Option<ConfigCommands>) -> Result<()> {
    use autocoder::config::{AutocoderConfig, AutocoderToml, CONFIG_DIR, CONFIG_FILE};

    let config_dir = project_dir.join(CONFIG_DIR);
    let config_path = config_dir.join(CONFIG_FILE);

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Autocoder Configuration");
            println!("=======================");
            println!();

            let toml = if config_path.exists() {
                println!("Config file: {}", config_path.display());
                AutocoderToml::load(&config_path)?
            } else {
                println!("No autocoder.toml found at {}", config_path.display());
                println!("Using default configuration.");
                AutocoderToml::default()
            };
            println!();

            println!("[model]");
            println!("  name = \"{}\"", toml.model.name);
            println!("  api_key_env = \"{}\"", toml.model.api_key_env);
            println!("  base_url = \"{}\"", toml.model.base_url);
            println!("  temperature = {}", toml.model.temperature);
            println!("  max_output_tokens = {}", toml.model.max_output_tokens);
            println!("  timeout_secs = {}", toml.model.timeout_secs);
            println!();
            println!("[pipeline]");
            println!(
                "  error_reset_delay_secs = {}",
                toml.pipeline.error_reset_delay_secs
            );
            println!();
            println!("[deploy]");
            println!("  provider = \"{}\"", toml.deploy.provider);
            println!("  output_dir = \"{}\"", toml.deploy.output_dir.display());
            println!();

            // Effective values (including env overrides)
            println!("Effective values (with env/CLI overrides):");
            let config = AutocoderConfig::new(project_dir.to_path_buf())?;
            println!("  model = \"{}\"", config.model_name());
            println!("  output_dir = \"{}\"", config.output_dir().display());
            println!(
                "  api_key = {}",
                if config.api_key().is_some() {
                    "set"
                } else {
                    "not set (runs offline)"
                }
            );
            println!();
            if !config_path.exists() {
                println!("Run 'autocoder config init' to create an autocoder.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No autocoder.toml found. Using defaults (valid).");
                return Ok(());
            }

            let toml = AutocoderToml::load(&config_path)?;
            let warnings = toml.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("autocoder.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            std::fs::create_dir_all(&config_dir).with_context(|| {
                format!("Failed to create config directory: {}", config_dir.display())
            })?;

            AutocoderToml::default().save(&config_path)?;

            println!("Created autocoder.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [model] name, api_key_env, temperature, max_output_tokens");
            println!("  - [pipeline] error_reset_delay_secs");
            println!("  - [deploy] provider, output_dir");
            println!();
        }
    }

    Ok(())
}
