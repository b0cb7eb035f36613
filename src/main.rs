use clap::Parser;
use record_convert::utils::{logger, validation::Validate};
use record_convert::{CliConfig, Converter, LocalStorage, Registry};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }

    let registry = Registry::with_defaults();
    if config.list_formats {
        println!(
            "The following extensions are supported: {}",
            registry.supported_extensions().join(", ")
        );
        return Ok(());
    }

    let input_path = config.input_path();
    let output_path = config.output_path();
    let converter = Converter::new(registry, LocalStorage::default());

    let result = if config.dry_run {
        tracing::info!("Dry run: {} will not be written", output_path);
        converter.preview(input_path, output_path).map(|conversion| {
            println!("{}", conversion.output);
            conversion.record
        })
    } else {
        converter.convert(input_path, output_path)
    };

    match result {
        Ok(record) => {
            tracing::info!("Converted {} rows", record.len());
            if !config.dry_run {
                println!("Converted {} to {}", input_path, output_path);
            }
        }
        Err(e) => {
            tracing::error!(
                "Conversion failed: {} (Category: {:?})",
                e,
                e.category()
            );
            tracing::debug!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!(
                "Failed to convert {} to {}: {}",
                input_path, output_path, e
            );
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
