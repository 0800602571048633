use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use reedline::{DefaultCompleter, DefaultHinter, DefaultPrompt, Reedline, Signal};

use crate::api::{ApiClient, Services};
use crate::app::Explorer;
use crate::config::Config;
use crate::logging;
use crate::store::{AuthResult, FileStorage, SessionStore};
use crate::types::{ChatSession, Coordinates};

/// 打印帮助信息
fn print_help() {
    println!("🗺️  placechat - 地点历史问答客户端");
    println!();
    println!("用法：placechat [命令]");
    println!();
    println!("命令:");
    println!("  repl                      进入交互模式（默认）");
    println!("  login <用户名> <密码>     登录");
    println!("  register <用户名> <密码>  注册");
    println!("  logout                    登出并清除本地身份");
    println!("  whoami                    显示当前用户");
    println!("  chats                     列出已记录的会话");
    println!("  onboard                   初始化配置");
    println!("  help                      显示此帮助信息");
    println!();
    print_repl_help();
    println!("环境变量:");
    println!("  PLACECHAT_API_URL  后端地址（覆盖配置文件）");
    println!("  RUST_LOG           日志过滤规则");
}

fn print_repl_help() {
    println!("交互模式命令:");
    println!("  /login <用户名> <密码>      登录");
    println!("  /register <用户名> <密码>   注册");
    println!("  /logout                     登出");
    println!("  /whoami                     当前用户");
    println!("  /passwd <旧密码> <新密码>   修改密码");
    println!("  /explore <纬度> <经度> <半径>  探索一个地点");
    println!("  /chats                      列出已记录的会话");
    println!("  /open <会话ID>              回到已记录的地点");
    println!("  /history <地点名>           查看该地点的问答记录");
    println!("  /clear                      清除当前地点的对话");
    println!("  /quit                       退出");
    println!("  其他输入                    向当前地点提问");
    println!();
}

fn build_explorer(config: &Config) -> Result<Explorer> {
    let client = ApiClient::http(&config.api.base_url).context("创建 HTTP 客户端失败")?;
    let services = Services::new(client);
    let storage = Arc::new(FileStorage::new(config.storage.path.clone()));
    let session = SessionStore::new(services.auth.clone(), storage);
    Ok(Explorer::new(services, session))
}

fn report_auth(action: &str, result: &AuthResult, explorer: &Explorer) {
    if result.success {
        let name = explorer.session().username().unwrap_or("?");
        println!("✅ {}成功：{}", action, name);
    } else {
        println!(
            "❌ {}失败：{}",
            action,
            result.error.as_deref().unwrap_or("未知错误")
        );
    }
}

fn print_whoami(explorer: &Explorer) {
    match explorer.session().user() {
        Some(user) => println!("👤 {} ({})", user.username, user.user_id),
        None => println!("👤 未登录"),
    }
}

fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn print_chats(chats: &[ChatSession]) {
    if chats.is_empty() {
        println!("📭 暂无会话");
        return;
    }

    println!("📋 会话列表:");
    println!();
    for chat in chats {
        println!("{} - {}", chat.session_id, chat.main_location);
        println!(
            "   位置：{} | 半径：{} 米 | 时间：{}",
            chat.location,
            chat.radius,
            format_timestamp(&chat.timestamp)
        );
        println!();
    }
}

fn parse_explore_args(parts: &[&str]) -> Result<(Coordinates, f64)> {
    if parts.len() != 3 {
        anyhow::bail!("用法：/explore <纬度> <经度> <半径>");
    }

    let lat: f64 = parts[0].parse().with_context(|| format!("无效的纬度：{}", parts[0]))?;
    let lng: f64 = parts[1].parse().with_context(|| format!("无效的经度：{}", parts[1]))?;
    let radius: f64 = parts[2].parse().with_context(|| format!("无效的半径：{}", parts[2]))?;

    // NaN / inf 会被序列化成 null
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        anyhow::bail!("纬度必须在 -90 到 90 之间：{}", parts[0]);
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        anyhow::bail!("经度必须在 -180 到 180 之间：{}", parts[1]);
    }
    if !radius.is_finite() || radius <= 0.0 {
        anyhow::bail!("半径必须是正数：{}", parts[2]);
    }

    Ok((Coordinates::new(lat, lng), radius))
}

fn print_transcript(entries: &[serde_json::Value]) {
    for entry in entries {
        match entry.as_str() {
            Some(text) => println!("- {}", text),
            None => println!("- {}", entry),
        }
    }
}

/// 写出配置文件；不带环境变量覆盖，避免一次性的 PLACECHAT_API_URL 被固化
fn write_onboard_config(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    config.save(path).context("保存配置文件失败")?;
    Ok(config)
}

/// Onboard 命令 - 写出默认配置
fn run_onboard() -> Result<()> {
    println!("🚀 初始化 placechat 配置...\n");

    let path = Config::default_path();
    let config = write_onboard_config(&path)?;

    println!("✅ 保存配置：{}", path.display());
    println!("   后端地址：{}", config.api.base_url);
    println!("   本地存储：{}", config.storage.path.display());
    println!();
    println!("🎉 初始化完成！运行 'placechat' 开始探索");

    Ok(())
}

/// 单次命令，不进入交互模式
async fn run_command(config: &Config, command: &str, args: &[String]) -> Result<()> {
    let mut explorer = build_explorer(config)?;

    match command {
        "login" | "register" => {
            if args.len() < 2 {
                eprintln!("❌ 用法：placechat {} <用户名> <密码>", command);
                std::process::exit(1);
            }
            let (action, result) = if command == "login" {
                ("登录", explorer.session_mut().login(&args[0], &args[1]).await)
            } else {
                ("注册", explorer.session_mut().register(&args[0], &args[1]).await)
            };
            report_auth(action, &result, &explorer);
            if !result.success {
                std::process::exit(1);
            }
        }
        "logout" => {
            explorer.logout();
            println!("👋 已登出");
        }
        "whoami" => print_whoami(&explorer),
        "chats" => print_chats(&explorer.chats().await?),
        _ => anyhow::bail!("未知命令：{}", command),
    }

    Ok(())
}

/// 处理一条斜杠命令，返回 false 表示退出
async fn handle_slash(explorer: &mut Explorer, input: &str) -> Result<bool> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let cmd = parts.first().map(|s| s.to_lowercase()).unwrap_or_default();
    let rest = &parts[1..];

    match cmd.as_str() {
        "/quit" | "/exit" => {
            println!("👋 再见！");
            return Ok(false);
        }
        "/login" | "/register" => {
            if rest.len() < 2 {
                println!("用法：{} <用户名> <密码>\n", cmd);
                return Ok(true);
            }
            let (action, result) = if cmd == "/login" {
                ("登录", explorer.session_mut().login(rest[0], rest[1]).await)
            } else {
                ("注册", explorer.session_mut().register(rest[0], rest[1]).await)
            };
            report_auth(action, &result, explorer);
            println!();
        }
        "/logout" => {
            explorer.logout();
            println!("👋 已登出\n");
        }
        "/whoami" => {
            print_whoami(explorer);
            println!();
        }
        "/passwd" => {
            if rest.len() < 2 {
                println!("用法：/passwd <旧密码> <新密码>\n");
                return Ok(true);
            }
            let result = explorer.session().change_password(rest[0], rest[1]).await;
            report_auth("修改密码", &result, explorer);
            println!();
        }
        "/explore" => {
            let (location, radius) = parse_explore_args(rest)?;
            println!("🔍 正在探索 {}，半径 {} 米...", location, radius);
            let exploration = explorer.explore(location, radius).await?;
            println!("📍 {}\n", exploration.main_location());
            println!("{}\n", exploration.context.context);
        }
        "/chats" => print_chats(&explorer.chats().await?),
        "/open" => {
            let Some(session_id) = rest.first() else {
                println!("用法：/open <会话ID>\n");
                return Ok(true);
            };
            let exploration = explorer.open(session_id).await?;
            println!("📍 {} ({})\n", exploration.main_location(), exploration.session_id());
            if exploration.transcript.is_empty() {
                println!("📭 暂无问答记录\n");
            } else {
                print_transcript(&exploration.transcript);
                println!();
            }
        }
        "/history" => {
            if rest.is_empty() {
                println!("用法：/history <地点名>\n");
                return Ok(true);
            }
            let main_location = rest.join(" ");
            let entries = explorer.history(&main_location).await?;
            if entries.is_empty() {
                println!("📭 {} 暂无问答记录\n", main_location);
            }
            print_transcript(&entries);
            println!();
        }
        "/clear" => {
            explorer.clear().await?;
            println!("✅ 已清除当前地点的对话\n");
        }
        "/help" | "/h" => print_repl_help(),
        _ => {
            println!("❌ 未知命令：{}", input);
            println!("输入 /help 查看帮助\n");
        }
    }

    Ok(true)
}

/// 交互模式
async fn run_repl(config: &Config) -> Result<()> {
    println!("🗺️  placechat - 地点历史问答");
    println!("后端：{}", config.api.base_url);
    println!("输入 /help 查看命令，/quit 退出\n");

    let mut explorer = build_explorer(config)?;
    print_whoami(&explorer);
    println!();

    let completer = DefaultCompleter::default();
    let hinter = DefaultHinter::default();
    let prompt = DefaultPrompt::default();

    let mut line_editor = Reedline::create()
        .with_hinter(Box::new(hinter))
        .with_completer(Box::new(completer));

    loop {
        let sig = line_editor.read_line(&prompt)?;

        match sig {
            Signal::Success(buffer) => {
                let input = buffer.trim();

                if input.is_empty() {
                    continue;
                }

                if input.starts_with('/') {
                    match handle_slash(&mut explorer, input).await {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => println!("❌ 错误：{:#}\n", e),
                    }
                    continue;
                }

                match explorer.ask(input).await {
                    Ok(answer) => println!("📜 {}\n", answer),
                    Err(e) => println!("❌ 错误：{:#}\n", e),
                }
            }
            Signal::CtrlD => {
                println!("\n👋 再见！");
                break;
            }
            Signal::CtrlC => {
                println!("\n输入 /quit 退出，或继续提问");
            }
        }
    }

    Ok(())
}

/// 主入口函数
pub async fn run_cli() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let config = Config::load_default()?;
    logging::init(&config.log.filter);

    let command = args.get(1).map(|s| s.to_lowercase()).unwrap_or_else(|| "repl".to_string());

    match command.as_str() {
        "repl" | "r" => run_repl(&config).await,
        "login" | "register" | "logout" | "whoami" | "chats" => {
            run_command(&config, &command, &args[2..]).await
        }
        "onboard" => run_onboard(),
        "help" | "-h" | "--help" | "h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("❌ 未知命令：{}", command);
            eprintln!();
            eprintln!("运行 'placechat help' 查看帮助信息");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explore_args() {
        let (location, radius) = parse_explore_args(&["41.8902", "12.4922", "500"]).unwrap();
        assert_eq!(location, Coordinates::new(41.8902, 12.4922));
        assert_eq!(radius, 500.0);

        assert!(parse_explore_args(&["41.8902", "12.4922"]).is_err());
        assert!(parse_explore_args(&["north", "12.4922", "500"]).is_err());
    }

    #[test]
    fn test_parse_explore_args_rejects_non_finite_and_out_of_range() {
        assert!(parse_explore_args(&["nan", "0", "100"]).is_err());
        assert!(parse_explore_args(&["0", "inf", "100"]).is_err());
        assert!(parse_explore_args(&["0", "0", "infinity"]).is_err());
        assert!(parse_explore_args(&["90.5", "0", "100"]).is_err());
        assert!(parse_explore_args(&["0", "-180.1", "100"]).is_err());
        assert!(parse_explore_args(&["0", "0", "0"]).is_err());
        assert!(parse_explore_args(&["0", "0", "-5"]).is_err());

        let (edge, _) = parse_explore_args(&["-90", "180", "1"]).unwrap();
        assert_eq!(edge, Coordinates::new(-90.0, 180.0));
    }

    #[test]
    fn test_onboard_does_not_persist_env_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://from-file/api\"\n").unwrap();
        std::env::set_var(crate::config::API_URL_ENV, "http://one-off/api");

        let written = write_onboard_config(&path).unwrap();
        std::env::remove_var(crate::config::API_URL_ENV);

        assert_eq!(written.api.base_url, "http://from-file/api");
        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.api.base_url, "http://from-file/api");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2025-11-02T10:15:00Z"), "2025-11-02 10:15");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
