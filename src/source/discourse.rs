// discourse.rs - Discourse 论坛 API 异步客户端模块
// 负责与论坛交互：搜索帖子、读取帖子详情、下载图片
//
// 接口文档：https://docs.discourse.org/#tag/Search

use super::{ForumSource, PostDetail, SearchResponse};
use crate::error::DiscoveryError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File; // tokio 提供的异步文件操作
use tokio::io::AsyncWriteExt; // 异步写入 trait，提供 write_all() 等方法
use tracing::debug;

/// Mudspike 论坛地址
pub const DEFAULT_FORUM_URL: &str = "https://forums.mudspike.com";

/// Discourse API 异步客户端
///
/// 封装了 reqwest::Client 和论坛地址。请求超时在客户端层统一设置，
/// 避免论坛卡住时调用方无限等待。
pub struct DiscourseClient {
    /// HTTP 客户端（内部有连接池，应复用）
    client: reqwest::Client,

    /// 论坛根地址，不带末尾的 '/'
    base_url: String,
}

impl DiscourseClient {
    /// 创建新的 Discourse 客户端
    ///
    /// # 参数
    /// - `base_url`: 论坛根地址，如 `https://forums.mudspike.com`
    /// - `timeout`: 单个请求的超时时间
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DiscoveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DiscoveryError::Client)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 发送请求并把响应体解析为 JSON
    /// 非 2xx 状态码按请求失败处理
    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DiscoveryError> {
        let body = request.send().await?.error_for_status()?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// 下载图片到指定目录，返回保存后的完整路径
    ///
    /// 文件名取 URL 最后一段并加上 `mudspike-` 前缀，方便 clean 命令识别。
    pub async fn download(
        &self,
        url: &str,
        save_dir: &Path,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let save_path = save_dir.join(download_file_name(url));

        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let mut file = File::create(&save_path).await?;
        file.write_all(&bytes).await?;
        // tokio 的 File 在后台线程写入，flush 之后内容才确定落盘
        file.flush().await?;

        Ok(save_path)
    }
}

#[async_trait]
impl ForumSource for DiscourseClient {
    async fn search_post_ids(&self, phrase: &str) -> Result<Vec<u64>, DiscoveryError> {
        let url = format!("{}/search.json", self.base_url);
        debug!(url = %url, q = phrase, "searching forum");

        let response: SearchResponse = self
            .get_json(self.client.get(&url).query(&[("q", phrase)]))
            .await?;

        let grouped = response
            .grouped_search_result
            .ok_or(DiscoveryError::NoResults)?;

        Ok(grouped.post_ids)
    }

    async fn post(&self, post_id: u64) -> Result<PostDetail, DiscoveryError> {
        let url = format!("{}/posts/{}.json", self.base_url, post_id);
        debug!(url = %url, "fetching post");

        self.get_json(self.client.get(&url)).await
    }
}

/// 由图片 URL 生成本地文件名，去掉查询串和片段
fn download_file_name(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let name = without_query.rsplit('/').next().unwrap_or("");

    if name.is_empty() {
        "mudspike-image.jpg".to_string()
    } else {
        format!("mudspike-{}", name)
    }
}
