use anyhow::Context;
use clap::Parser;
use schemock::adapters::field_generator::FieldGenerator;
use schemock::cli::{render_generated, render_resolutions, render_rules, Cli, Command};
use schemock::config::Settings;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(cli.log_level()).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::new_with_cli(&cli)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    match &cli.command {
        Command::Resolve {
            fields,
            explain,
            json,
        } => {
            print!(
                "{}",
                render_resolutions(&settings.resolver()?, fields, *explain, *json)?
            );
            Ok(())
        }
        Command::Generate { fields, json } => {
            let mut generator = FieldGenerator::from_settings(&settings)?;
            print!("{}", render_generated(&mut generator, fields, *json)?);
            Ok(())
        }
        Command::Rules => {
            print!("{}", render_rules(&settings.resolver()?)?);
            Ok(())
        }
        Command::Methods => {
            let generator = FieldGenerator::from_settings(&settings)?;
            for method in generator.provider().methods() {
                println!("{}", method);
            }
            Ok(())
        }
        Command::Check => {
            let resolver = settings.resolver()?;
            info!("Configuration is valid");
            println!(
                "OK: {} rules, fallback {}, locale {}",
                resolver.table().len(),
                resolver.fallback().method,
                settings.locale.tags().join(", ")
            );
            Ok(())
        }
    }
}
