//! # 优惠码选择器 — 应用入口
//!
//! 本文件仅负责参数解析、会话组装与终端交互。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use promo_code_picker::clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
use promo_code_picker::config::{self, PickerConfig};
use promo_code_picker::error::{AppError, ConfigError};
use promo_code_picker::{Session, pool, selector, view};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_CONFIG_FILE: &str = "promo-picker.json";

#[derive(Parser, Debug)]
#[command(name = "promo-code-picker", version, about = "随机抽取一个优惠码并复制到剪贴板")]
struct Args {
    /// JSON 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// 资源位置（本地路径、http(s):// URL 或 inline:<csv>）
    #[arg(short, long)]
    source: Option<String>,
    /// 码值所在列的表头名
    #[arg(long)]
    column: Option<String>,
    /// 等待加载完成后抽取并复制一次，然后退出
    #[arg(long, default_value_t = false)]
    once: bool,
    /// `--once` 时以 JSON 输出结果
    #[arg(long, default_value_t = false)]
    json: bool,
    /// 不写系统剪贴板（无图形环境）
    #[arg(long, default_value_t = false)]
    no_clipboard: bool,
}

#[derive(Serialize)]
struct OnceReport {
    code: Option<String>,
    copied: bool,
    error: Option<AppError>,
}

fn build_config(args: &Args) -> Result<PickerConfig, ConfigError> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = config::load_config_from_path(&path)?;

    if let Some(source) = &args.source {
        config.source = source.clone();
    }
    if let Some(column) = &args.column {
        config.code_column = column.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn run_once(session: Arc<Session>, json: bool) -> ExitCode {
    if let Err(err) = pool::spawn_startup_load(Arc::clone(&session)).await {
        log::error!("加载任务异常退出: {}", err);
    }

    let mut report = OnceReport {
        code: None,
        copied: false,
        error: None,
    };

    match selector::draw(&session) {
        Ok(Some(code)) => {
            report.code = Some(code);
            match selector::copy(&session).await {
                Ok(()) => report.copied = true,
                Err(err) => report.error = Some(err.into()),
            }
        }
        Ok(None) => {}
        Err(err) => report.error = Some(err.into()),
    }

    if json {
        match serde_json::to_string(&report) {
            Ok(line) => println!("{}", line),
            Err(err) => log::error!("序列化结果失败: {}", err),
        }
    } else {
        match (&report.code, &report.error) {
            (Some(_), _) => {
                if let Some(text) = view::render_selection(&session) {
                    print!("{}", text);
                }
                if let Some(err) = &report.error {
                    eprintln!("{}", err);
                }
            }
            (None, Some(err)) => eprintln!("{}", err),
            (None, None) => eprintln!("抽到的行缺少优惠码，请重试"),
        }
    }

    if report.code.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run_interactive(session: Arc<Session>) -> ExitCode {
    // 后台加载，不阻塞交互；加载完成前抽取会得到空池
    let _loader = pool::spawn_startup_load(Arc::clone(&session));

    println!("{}", view::TITLE);
    println!("{}", view::help_text());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                log::error!("读取输入失败: {}", err);
                break;
            }
        };

        match line.trim() {
            "g" | "generate" => match selector::draw(&session) {
                Ok(_) => match view::render_selection(&session) {
                    Some(text) => print!("{}", text),
                    None => println!("抽到的行缺少优惠码，请重试"),
                },
                Err(err) => println!("{}", err),
            },
            "c" | "copy" => {
                let result = selector::copy(&session).await;
                println!(
                    "{}",
                    view::copy_notice(&result, session.is_copy_feedback_active())
                );
            }
            "s" | "status" => {
                println!(
                    "已加载：{}  码池：{} 项",
                    session.is_loaded(),
                    session.pool().len()
                );
                if let Some(text) = view::render_selection(&session) {
                    print!("{}", text);
                }
            }
            "h" | "help" => println!("{}", view::help_text()),
            "q" | "quit" | "exit" => break,
            "" => {}
            other => println!("未知命令：{}（{}）", other, view::help_text()),
        }
    }

    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match build_config(&args) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    // --once 写入后进程即退出，需等待其他程序接管剪贴板
    let clipboard: Arc<dyn ClipboardSink> = if args.no_clipboard {
        Arc::new(MemoryClipboard::new())
    } else if args.once {
        Arc::new(SystemClipboard::with_handover(config.clipboard_handover()))
    } else {
        Arc::new(SystemClipboard::new())
    };
    let session = Arc::new(Session::new(config, clipboard));

    if args.once {
        run_once(session, args.json).await
    } else {
        run_interactive(session).await
    }
}
