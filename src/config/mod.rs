pub mod toml_config;

pub use toml_config::CodecConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "json-mapper")]
#[command(about = "Inspect and rewrite JSON object files")]
pub struct CliConfig {
    /// Path to a TOML file with a [codec] table
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load a file and print the object
    Show {
        file: String,

        /// Print indented output
        #[arg(long)]
        pretty: bool,
    },
    /// Load a file and save it again with the active codec settings
    Rewrite { source: String, target: String },
    /// Load a file and report how many top-level keys it holds
    Check { file: String },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 codec 配置，未指定檔案時使用預設值
    pub fn codec_config(&self) -> crate::Result<CodecConfig> {
        match &self.config {
            Some(path) => CodecConfig::from_file(path),
            None => Ok(CodecConfig::default()),
        }
    }

    pub fn paths(&self) -> Vec<(&'static str, &str)> {
        match &self.command {
            Command::Show { file, .. } | Command::Check { file } => vec![("file", file.as_str())],
            Command::Rewrite { source, target } => {
                vec![("source", source.as_str()), ("target", target.as_str())]
            }
        }
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::Result<()> {
        if let Some(path) = &self.config {
            crate::utils::validation::validate_path("config", path)?;
        }
        for (field, path) in self.paths() {
            crate::utils::validation::validate_path(field, path)?;
        }
        Ok(())
    }
}
