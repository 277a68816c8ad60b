use anyhow::Context;
use clap::Parser;
use json_mapper::utils::{logger, validation::Validate};
use json_mapper::{CliConfig, CodecConfig, Command, JsonFiles, JsonError};

fn run(cli: &CliConfig, config: &CodecConfig) -> Result<(), JsonError> {
    let files = JsonFiles::new(config);

    match &cli.command {
        Command::Show { file, pretty } => {
            let json = files.load(file)?;
            let view = config.clone().with_pretty(*pretty || config.pretty);
            let text = JsonFiles::new(&view).render(&json)?;
            println!("{}", String::from_utf8_lossy(&text));
        }
        Command::Rewrite { source, target } => {
            let json = files.load(source)?;
            files.save(&json, target)?;
            tracing::info!("Rewrote {} -> {}", source, target);
            println!("✅ {} -> {}", source, target);
        }
        Command::Check { file } => {
            let json = files.load(file)?;
            println!("✅ {}: JSON object with {} top-level keys", file, json.len());
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    // 驗證參數與配置，失敗時以結束碼 1 離開
    cli.validate().context("invalid arguments")?;
    let config = cli.codec_config().context("failed to load codec config")?;
    tracing::debug!("Codec config: {:?}", config);

    if let Err(e) = run(&cli, &config) {
        tracing::error!("❌ {} (kind: {:?})", e, e.kind());
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}
