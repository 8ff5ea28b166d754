//! # MH5 Logo 合成工具 — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与退出码。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use logo_compositor::error::AppError;
use logo_compositor::font::FontChain;
use logo_compositor::settings::{self, Settings};
use logo_compositor::{assets, batch};

#[derive(Debug, Parser)]
#[command(name = "logo-compositor", version, about = "MH5 Logo 合成工具")]
struct Cli {
    /// 设置文件（JSON）；不存在或无效时使用默认设置
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 按设计规格把 Logo 合成到源图上
    Apply {
        #[arg(long)]
        specs: Option<PathBuf>,
        #[arg(long)]
        source_dir: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// 现成 Logo PNG，替代文字 Logo
        #[arg(long)]
        logo: Option<PathBuf>,
        #[arg(long)]
        text: Option<String>,
    },
    /// 生成 800×800 透明底文字 Logo
    CreateLogo {
        #[arg(long, default_value = assets::DEFAULT_LOGO_OUTPUT)]
        output: PathBuf,
        #[arg(long)]
        text: Option<String>,
    },
    /// 生成 512×512 方形图标
    CreateIcon {
        #[arg(long, default_value = assets::DEFAULT_ICON_OUTPUT)]
        output: PathBuf,
        #[arg(long, default_value = assets::DEFAULT_ICON_LETTER)]
        letter: String,
    },
    /// 写出默认设置文件
    InitConfig {
        #[arg(long, default_value = "logo-compositor.json")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = cli
        .config
        .as_deref()
        .map(settings::load_settings_from_path)
        .unwrap_or_default();

    match run(cli.command, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, mut settings: Settings) -> Result<(), AppError> {
    match command {
        Command::Apply {
            specs,
            source_dir,
            output_dir,
            logo,
            text,
        } => {
            if let Some(specs) = specs {
                settings.specs_file = specs;
            }
            if let Some(source_dir) = source_dir {
                settings.source_dir = source_dir;
            }
            if let Some(output_dir) = output_dir {
                settings.output_dir = output_dir;
            }
            if logo.is_some() {
                settings.logo_file = logo;
            }
            if let Some(text) = text {
                settings.logo_text = text;
            }

            batch::run_apply(&settings)?;
            Ok(())
        }
        Command::CreateLogo { output, text } => {
            let text = text.unwrap_or_else(|| settings.logo_text.clone());
            let fonts = FontChain::from_settings(&settings.fonts);
            assets::create_logo_asset(&fonts, &output, &text)?;
            Ok(())
        }
        Command::CreateIcon { output, letter } => {
            let fonts = FontChain::from_settings(&settings.fonts);
            assets::create_icon_asset(&fonts, &output, &letter)?;
            Ok(())
        }
        Command::InitConfig { output } => {
            if output.exists() {
                return Err(AppError::Storage(format!(
                    "设置文件已存在，不会覆盖: {}",
                    output.display()
                )));
            }
            settings::save_settings_to_path(&output, &Settings::default())?;
            log::info!("⚙️ 已写出默认设置: {}", output.display());
            Ok(())
        }
    }
}
