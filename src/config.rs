// config.rs - 配置管理模块
// 遵循 Unix 风格：优先从 ~/.config/mudspike-screensaver/config.toml 读取配置

use crate::finder::{DEFAULT_CATEGORY, DEFAULT_QUERY};
use crate::source::discourse::DEFAULT_FORUM_URL;
use schemars::JsonSchema; // 引入用于生成 JSON Schema 的 trait
use serde::{Deserialize, Serialize}; // 引入序列化与反序列化 trait
use shellexpand::tilde; // 用于展开 ~ 和环境变量
use std::env; // 环境变量模块
use std::fs; // 文件系统模块
use std::path::{Path, PathBuf}; // 路径处理类型
use std::time::Duration;

/// 应用名，同时用作配置目录名
const APP_NAME: &str = "mudspike-screensaver";

/// 展开路径中的 ~ 和环境变量 ($HOME 等)
fn expand_path(path_str: &str) -> PathBuf {
    let expanded = tilde(path_str).into_owned();
    PathBuf::from(expanded)
}

/// 映射 config.toml 文件内容的嵌套结构体
#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct ConfigFile {
    #[serde(default)]
    common: CommonConfig,
    #[serde(default)]
    search: SearchDefaults,
    #[serde(default)]
    forum: ForumConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct CommonConfig {
    /// 图片下载目录 (支持 ~、$HOME 等环境变量，相对路径则相对于 $HOME)
    /// 不配置则默认为 $HOME/Pictures/mudspike
    image_dir: Option<String>,
}

/// 默认搜索参数
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SearchDefaults {
    /// 搜索关键词
    #[serde(default = "default_query")]
    pub query: String,
    /// 附加在搜索短语末尾的分类标签
    #[serde(default = "default_category")]
    pub category: String,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            query: default_query(),
            category: default_category(),
        }
    }
}

/// 论坛连接参数
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ForumConfig {
    /// 论坛根地址
    #[serde(default = "default_forum_url")]
    pub base_url: String,
    /// 单个请求的超时秒数
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            base_url: default_forum_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_query() -> String {
    DEFAULT_QUERY.to_string()
}
fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}
fn default_forum_url() -> String {
    DEFAULT_FORUM_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    20
}

/// 应用全局配置项
#[derive(Debug)]
pub struct AppConfig {
    /// 图片下载目录
    pub image_dir: PathBuf,
    /// 配置文件所在路径
    pub config_path: PathBuf,
    /// 默认搜索参数 (关键词优先级：ENV > TOML)
    pub search: SearchDefaults,
    /// 论坛连接参数 (地址优先级：ENV > TOML)
    pub forum: ForumConfig,
}

impl AppConfig {
    /// 初始化配置
    pub fn new() -> Self {
        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir());

        let mut config = Self::load(&home);

        // 优先级：环境变量 > 配置文件内容
        if let Ok(url) = env::var("MUDSPIKE_FORUM_URL") {
            config.forum.base_url = url;
        }
        if let Ok(query) = env::var("MUDSPIKE_QUERY") {
            config.search.query = query;
        }

        config
    }

    /// 以给定目录作为 $HOME 读取配置，不读取环境变量
    pub fn load(home: &Path) -> Self {
        let config_path = home.join(".config").join(APP_NAME).join("config.toml");
        let config_file = Self::load_config_from_file(&config_path).unwrap_or_default();

        // 下载目录：
        // 1. 如果配置了路径：展开 ~ 和环境变量，相对路径则相对于 $HOME
        // 2. 如果未配置：默认使用 $HOME/Pictures/mudspike
        let image_dir = match config_file.common.image_dir {
            Some(dir_str) => {
                let p = expand_path(&dir_str);
                if p.is_absolute() { p } else { home.join(p) }
            }
            None => home.join("Pictures").join("mudspike"),
        };

        Self {
            image_dir,
            config_path,
            search: config_file.search,
            forum: config_file.forum,
        }
    }

    /// 辅助函数：解析 TOML 配置文件
    /// 文件不存在或格式错误时返回 None，由调用方使用默认值
    fn load_config_from_file(path: &Path) -> Option<ConfigFile> {
        let content = fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// 请求超时时间
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.forum.timeout_secs.max(1))
    }

    /// 确保配置目录和下载目录存在
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&self.image_dir)
    }

    fn to_file(&self) -> ConfigFile {
        ConfigFile {
            common: CommonConfig {
                image_dir: Some(self.image_dir.to_string_lossy().to_string()),
            },
            search: self.search.clone(),
            forum: self.forum.clone(),
        }
    }

    /// 将配置保存回文件
    pub fn save(&self) -> std::io::Result<()> {
        let toml_str = toml::to_string_pretty(&self.to_file()).map_err(std::io::Error::other)?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, toml_str)
    }

    /// 修改单个配置项，支持 query, category, forum_url, timeout
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigKeyError> {
        match key {
            "query" => self.search.query = value.to_string(),
            "category" => self.search.category = value.to_string(),
            "forum_url" | "url" => self.forum.base_url = value.to_string(),
            "timeout" | "timeout_secs" => {
                self.forum.timeout_secs = value
                    .parse()
                    .map_err(|_| ConfigKeyError::InvalidValue(key.to_string()))?
            }
            _ => return Err(ConfigKeyError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// 获取配置文件的 JSON Schema
    pub fn get_schema() -> Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(ConfigFile);
        serde_json::to_string_pretty(&schema)
    }

    /// 将当前配置转换为 TOML 字符串
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(&self.to_file())
            .unwrap_or_else(|_| "# Error serializing config".to_string())
    }
}

/// `config set` 的键值错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigKeyError {
    #[error("未知配置项: {0}")]
    UnknownKey(String),
    #[error("配置项 {0} 的值无效")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let home = tempfile::tempdir().unwrap();
        let config = AppConfig::load(home.path());

        assert_eq!(config.search.query, "screens");
        assert_eq!(config.search.category, "#screens-aars");
        assert_eq!(config.forum.base_url, "https://forums.mudspike.com");
        assert_eq!(config.timeout(), Duration::from_secs(20));
        assert_eq!(config.image_dir, home.path().join("Pictures").join("mudspike"));
        assert_eq!(
            config.config_path,
            home.path().join(".config/mudspike-screensaver/config.toml")
        );
    }

    #[test]
    fn reads_partial_file() {
        let home = tempfile::tempdir().unwrap();
        let dir = home.path().join(".config/mudspike-screensaver");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.toml"),
            "[common]\nimage_dir = \"shots\"\n\n[search]\nquery = \"dcs\"\n",
        )
        .unwrap();

        let config = AppConfig::load(home.path());
        assert_eq!(config.search.query, "dcs");
        assert_eq!(config.search.category, "#screens-aars");
        assert_eq!(config.image_dir, home.path().join("shots"));
        assert_eq!(config.forum.timeout_secs, 20);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let home = tempfile::tempdir().unwrap();
        let dir = home.path().join(".config/mudspike-screensaver");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "this is = = not toml").unwrap();

        let config = AppConfig::load(home.path());
        assert_eq!(config.search.query, "screens");
    }

    #[test]
    fn set_and_save_round_trip() {
        let home = tempfile::tempdir().unwrap();
        let mut config = AppConfig::load(home.path());

        config.set("query", "x-plane").unwrap();
        config.set("timeout", "5").unwrap();
        config.set("forum_url", "http://localhost:9999").unwrap();
        config.save().unwrap();

        let reloaded = AppConfig::load(home.path());
        assert_eq!(reloaded.search.query, "x-plane");
        assert_eq!(reloaded.timeout(), Duration::from_secs(5));
        assert_eq!(reloaded.forum.base_url, "http://localhost:9999");
    }

    #[test]
    fn set_rejects_bad_input() {
        let home = tempfile::tempdir().unwrap();
        let mut config = AppConfig::load(home.path());

        assert!(matches!(config.set("colour", "red"), Err(ConfigKeyError::UnknownKey(_))));
        assert!(matches!(
            config.set("timeout", "soon"),
            Err(ConfigKeyError::InvalidValue(_))
        ));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let home = tempfile::tempdir().unwrap();
        let mut config = AppConfig::load(home.path());
        config.set("timeout", "0").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn schema_mentions_sections() {
        let schema = AppConfig::get_schema().unwrap();
        assert!(schema.contains("forum"));
        assert!(schema.contains("search"));
    }
}
