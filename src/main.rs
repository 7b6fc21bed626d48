use clap::{Parser, Subcommand};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use skywise::error::SkywiseError;
use skywise::prelude::*;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 天气问答助手
#[derive(Parser, Debug)]
#[command(name = "skywise", version, about)]
struct Cli {
    /// YAML 配置文件；不指定时读取环境变量 / .env
    #[arg(long, global = true, env = "SKYWISE_CONFIG")]
    config: Option<String>,

    /// 覆盖配置中的单位（metric / imperial）
    #[arg(long, global = true)]
    unit: Option<Unit>,

    /// 回答末尾不追加 emoji
    #[arg(long, global = true)]
    no_emoji: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 回答单个问题
    Ask { question: String },
    /// 交互式对话，整个会话共享同一段历史
    Chat,
    /// 从文本中提取城市名
    Cities { text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skywise=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    if let Some(unit) = cli.unit {
        config.unit = unit;
    }
    if cli.no_emoji {
        config.use_emojis = false;
    }

    let http = Arc::new(config.http_client()?);
    let model: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::from_config(http.clone(), &config));
    info!(model = %config.model, unit = %config.unit, "🌦️ skywise 已启动");

    match cli.command {
        Command::Ask { question } => {
            let provider = Arc::new(OpenWeatherClient::from_config(http, &config));
            let mut assistant =
                WeatherAssistant::new(AssistantConfig::from_config(&config), model, provider);
            println!("{}", assistant.ask(&question).await?);
        }
        Command::Chat => {
            let provider = Arc::new(OpenWeatherClient::from_config(http, &config));
            let mut assistant =
                WeatherAssistant::new(AssistantConfig::from_config(&config), model, provider);
            run_repl(&mut assistant).await?;
        }
        Command::Cities { text } => {
            let cities = CityExtractor::new(model).extract_cities(&text).await?;
            for city in cities {
                println!("{}", city);
            }
        }
    }

    Ok(())
}

async fn run_repl(assistant: &mut WeatherAssistant) -> Result<()> {
    let mut editor =
        DefaultEditor::new().map_err(|e| SkywiseError::Other(format!("readline: {}", e)))?;

    println!("🌤️ Ask me about the weather. Type 'exit' to quit.");
    println!("   /unit <metric|imperial> switches units, /emoji <on|off> toggles emojis.");
    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if matches!(question, "exit" | "quit") {
                    break;
                }
                let _ = editor.add_history_entry(question);

                if let Some(notice) = apply_setting(assistant, question) {
                    println!("skywise> {}\n", notice);
                    continue;
                }

                match assistant.ask(question).await {
                    Ok(answer) => println!("skywise> {}\n", answer),
                    // 单个问题失败不结束会话
                    Err(e) => eprintln!("❌ {}", e),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(SkywiseError::Other(format!("readline: {}", e))),
        }
    }
    Ok(())
}

/// 处理 `/unit`、`/emoji` 设置命令，返回提示文本；普通问题返回 `None`
fn apply_setting(assistant: &mut WeatherAssistant, line: &str) -> Option<String> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    let value = parts.next();

    match (command, value) {
        ("/unit", None) => Some(format!("current unit: {}", assistant.unit())),
        ("/unit", Some(value)) => Some(match value.parse::<Unit>() {
            Ok(unit) => {
                assistant.set_unit(unit);
                format!("unit set to {}", assistant.unit())
            }
            Err(e) => e,
        }),
        ("/emoji", Some("on")) => {
            assistant.set_use_emojis(true);
            Some("emojis on".to_string())
        }
        ("/emoji", Some("off")) => {
            assistant.set_use_emojis(false);
            Some("emojis off".to_string())
        }
        ("/emoji", _) => Some("usage: /emoji <on|off>".to_string()),
        _ => None,
    }
}
