// main.rs - 程序入口
// 负责初始化日志与异步运行时、解析命令行参数、分发子命令

mod cli;

// 初始化多语言支持，嵌入 locales 目录下的所有翻译
rust_i18n::i18n!("locales");

use clap::{CommandFactory, Parser}; // Parser 提供 parse(); CommandFactory 用于生成补全脚本
use clap_complete::generate;
use cli::{Cli, Commands, ConfigAction};
use mudspike_screensaver::config::{AppConfig, ConfigKeyError};
use mudspike_screensaver::{Discovery, DiscourseClient, DiscoveryError, DiscoveryResult, ImageFinder};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_i18n::t;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 自动检测系统语言并设置
    let locale = std::env::var("LANG").unwrap_or_else(|_| "en".to_string());
    if locale.starts_with("zh") {
        rust_i18n::set_locale("zh-CN");
    } else {
        rust_i18n::set_locale("en");
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::new();

    match &cli.command {
        Commands::Find { query, json } => {
            if !*json {
                println!("{}", t!("search_start", query => query_or_default(&config, query)));
            }
            let (finder, discovery) = discover(&config, query.as_deref()).await?;
            print_result(
                discovery.result(),
                fallback_reason(&discovery),
                finder.source().base_url(),
                *json,
            )?;
        }

        Commands::Default { json } => {
            let result = DiscoveryResult::default_result();
            print_result(&result, None, &config.forum.base_url, *json)?;
        }

        Commands::Fetch { query } => {
            config.ensure_dirs()?;
            handle_fetch(&config, query.as_deref()).await?;
        }

        Commands::Open { query } => {
            println!("{}", t!("search_start", query => query_or_default(&config, query)));
            let (finder, discovery) = discover(&config, query.as_deref()).await?;
            let forum_base = finder.source().base_url();
            print_result(discovery.result(), fallback_reason(&discovery), forum_base, false)?;

            let url = discovery.result().topic_url(forum_base);
            println!("{}", t!("opening_browser", url => url));
            open::that(&url)?;
        }

        Commands::Completions { shell } => {
            generate(
                *shell,
                &mut Cli::command(),
                "mudspike-screensaver",
                &mut std::io::stdout(),
            );
        }

        Commands::Config { action } => {
            handle_config(&mut config, action)?;
        }

        Commands::Clean => {
            handle_clean(&config)?;
        }
    }

    Ok(())
}

/// 初始化 tracing 日志，输出到 stderr，不干扰 stdout 上的结果
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mudspike_screensaver=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 根据配置创建发现器
fn build_finder(config: &AppConfig) -> Result<ImageFinder<DiscourseClient>, DiscoveryError> {
    let client = DiscourseClient::new(config.forum.base_url.as_str(), config.timeout())?;
    Ok(ImageFinder::new(client).with_category(config.search.category.as_str()))
}

/// 运行一次图片发现；发现失败会得到默认图片，只有客户端创建失败才会报错
async fn discover(
    config: &AppConfig,
    query: Option<&str>,
) -> Result<(ImageFinder<DiscourseClient>, Discovery), DiscoveryError> {
    let finder = build_finder(config)?;
    let query = query.unwrap_or(&config.search.query);

    let mut rng = StdRng::from_entropy();
    let discovery = finder.discover(query, &mut rng).await;
    Ok((finder, discovery))
}

fn fallback_reason(discovery: &Discovery) -> Option<&DiscoveryError> {
    match discovery {
        Discovery::Found(_) => None,
        Discovery::Fallback { reason, .. } => Some(reason),
    }
}

/// 命令行未指定关键词时使用配置中的关键词
fn query_or_default<'a>(config: &'a AppConfig, query: &'a Option<String>) -> &'a str {
    query.as_deref().unwrap_or(&config.search.query)
}

/// 打印发现结果；`fallback` 为 Some 时先提示退回默认图片的原因
fn print_result(
    result: &DiscoveryResult,
    fallback: Option<&DiscoveryError>,
    forum_base: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    for line in summary_lines(result, fallback, forum_base) {
        println!("{}", line);
    }
    Ok(())
}

/// 结果的文本形式，每项一行
fn summary_lines(
    result: &DiscoveryResult,
    fallback: Option<&DiscoveryError>,
    forum_base: &str,
) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(reason) = fallback {
        lines.push(t!("fallback_notice", reason => reason).to_string());
    }

    lines.push(t!("result_image", url => result.image_url).to_string());
    lines.push(t!("result_author", author => result.author).to_string());
    lines.push(t!("result_topic", topic => result.topic_slug).to_string());
    lines.push(t!("result_date", date => result.date()).to_string());
    lines.push(t!("result_caption", caption => result.caption()).to_string());
    lines.push(t!("result_link", url => result.topic_url(forum_base)).to_string());
    lines
}

/// 处理 fetch 子命令：发现并下载图片
async fn handle_fetch(
    config: &AppConfig,
    query: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let finder = build_finder(config)?;
    let query = query.unwrap_or(&config.search.query);

    println!("{}", t!("search_start", query => query));

    let mut rng = StdRng::from_entropy();
    let discovery = finder.discover(query, &mut rng).await;
    print_result(
        discovery.result(),
        fallback_reason(&discovery),
        finder.source().base_url(),
        false,
    )?;

    let save_path = finder
        .source()
        .download(&discovery.result().image_url, &config.image_dir)
        .await?;
    println!("{}", t!("save_path", path => save_path.display()));

    Ok(())
}

/// 处理 clean 子命令：清理所有以 mudspike- 开头的文件
fn handle_clean(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dir = &config.image_dir;
    let mut deleted_count = 0;

    if dir.exists() {
        println!("{}", t!("cleaning_dir", path => dir.display()));

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                if filename.starts_with("mudspike-") {
                    std::fs::remove_file(&path)?;
                    deleted_count += 1;
                    println!("  {} {}", t!("deleted"), filename);
                }
            }
        }
    }

    println!("{}", t!("clean_done", count => deleted_count));
    Ok(())
}

/// 处理 config 子命令：查看或修改配置
fn handle_config(
    config: &mut AppConfig,
    action: &ConfigAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            println!("{}", t!("config_title"));
            println!("{}", t!("config_path", path => config.config_path.display()));
            println!("{}", t!("config_image_dir", path => config.image_dir.display()));
            println!("{}", t!("config_forum", url => config.forum.base_url));
            println!("{}", t!("config_timeout", secs => config.forum.timeout_secs));
            println!("{}", t!("config_query", query => config.search.query));
            println!("{}", t!("config_category", category => config.search.category));
        }
        ConfigAction::Schema => {
            println!("{}", AppConfig::get_schema()?);
        }
        ConfigAction::Dump => {
            println!("{}", config.to_toml());
        }
        ConfigAction::Set { key, value } => {
            config.set(key, value).map_err(|e| match e {
                ConfigKeyError::UnknownKey(_) => t!("config_error_unknown_key", key => key),
                ConfigKeyError::InvalidValue(_) => t!("config_error_invalid_value", key => key),
            })?;
            config.save()?;
            println!("{}", t!("config_updated", key => key, value => value));
        }
    }
    Ok(())
}
