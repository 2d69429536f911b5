// cli.rs - 命令行接口定义模块
// 使用 clap 的 derive 模式定义所有子命令和参数

use clap::{Parser, Subcommand}; // Parser: 解析命令行参数的 trait; Subcommand: 定义子命令的 trait
use clap_complete::Shell; // Shell 枚举：Bash, Zsh, Fish, Elvish, PowerShell

/// Mudspike 屏保图片发现工具
///
/// 从 Mudspike 论坛随机挑选一张社区截图，
/// 输出图片地址与署名，供屏保或其他展示程序使用。
#[derive(Parser)]
#[command(name = "mudspike-screensaver")]
#[command(version)] // 自动从 Cargo.toml 读取 version 字段
#[command(about = "Mudspike 屏保图片发现工具：从论坛随机获取一张截图及其署名")]
pub struct Cli {
    /// 输出调试日志（等价于 RUST_LOG=debug）
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 从论坛随机发现一张图片并打印结果
    ///
    /// 用法示例:
    ///   mudspike-screensaver find
    ///   mudspike-screensaver find -q "@PaulRix"
    ///   mudspike-screensaver find --json
    Find {
        /// 搜索关键词（不指定则使用配置中的 query，默认 "screens"）
        #[arg(short, long)]
        query: Option<String>,

        /// 以 JSON 格式输出
        #[arg(long)]
        json: bool,
    },

    /// 打印默认图片（论坛 Logo）的信息
    ///
    /// 用法示例:
    ///   mudspike-screensaver default --json
    Default {
        /// 以 JSON 格式输出
        #[arg(long)]
        json: bool,
    },

    /// 发现一张图片并下载到本地图片目录
    ///
    /// 用法示例:
    ///   mudspike-screensaver fetch -q dcs
    Fetch {
        /// 搜索关键词
        #[arg(short, long)]
        query: Option<String>,
    },

    /// 发现一张图片并在浏览器中打开其所在话题
    ///
    /// 用法示例:
    ///   mudspike-screensaver open
    Open {
        /// 搜索关键词
        #[arg(short, long)]
        query: Option<String>,
    },

    /// 生成 shell 补全脚本（支持 bash, zsh, fish, elvish, powershell）
    ///
    /// 用法示例：
    ///   mudspike-screensaver completions zsh > ~/.zsh/completions/_mudspike-screensaver
    Completions {
        /// 目标 shell 类型
        shell: Shell,
    },

    /// 配置管理操作
    ///
    /// 用法示例:
    ///   mudspike-screensaver config show
    ///   mudspike-screensaver config set query "x-plane"
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// 清理所有带有 mudspike- 前缀的下载文件
    Clean,
}

/// 配置管理操作
#[derive(Subcommand)]
pub enum ConfigAction {
    /// 查看当前所有配置简报
    Show,
    /// 生成配置文件对应的 JSON Schema
    Schema,
    /// 以 TOML 格式打印当前完整配置内容
    Dump,
    /// 设置配置项的值 (支持: query, category, forum_url, timeout)
    Set {
        /// 要设置的键
        key: String,
        /// 要设置的值
        value: String,
    },
}
