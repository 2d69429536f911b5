// source/mod.rs - 论坛数据源模块入口
pub mod discourse;

// 定义 finder 需要的两个远程操作：搜索帖子 ID、获取帖子详情
// 抽象成 Trait 以便在测试中替换成内存实现

use crate::error::DiscoveryError;
use async_trait::async_trait;
use serde::Deserialize;

/// 搜索接口响应的顶层结构
/// GET /search.json 返回的 JSON 根对象，只关心分组结果
#[derive(Deserialize, Debug)]
pub struct SearchResponse {
    /// 没有命中时论坛返回 null，或者干脆没有这个字段
    #[serde(default)]
    pub grouped_search_result: Option<GroupedSearchResult>,
}

#[derive(Deserialize, Debug)]
pub struct GroupedSearchResult {
    #[serde(default)]
    pub post_ids: Vec<u64>,
}

/// 帖子详情中 finder 会用到的字段
///
/// 全部是 Option：字段缺失不应该变成笼统的 JSON 错误，
/// 而是在 finder 里报告具体缺了哪一个。
#[derive(Deserialize, Debug, Default, Clone)]
pub struct PostDetail {
    /// 渲染后的 HTML 正文
    #[serde(default)]
    pub cooked: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_username: Option<String>,
    #[serde(default)]
    pub topic_slug: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl PostDetail {
    /// 作者名：优先 username，其次 display_username
    pub fn author(&self) -> Option<&str> {
        non_empty(&self.username).or_else(|| non_empty(&self.display_username))
    }
}

fn non_empty(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|n| !n.is_empty())
}

/// 论坛数据源的抽象 Trait
#[async_trait]
pub trait ForumSource {
    /// 用完整的搜索短语搜索，返回按相关度排好序的帖子 ID
    ///
    /// 分组结果缺失时返回 `DiscoveryError::NoResults`。
    async fn search_post_ids(&self, phrase: &str) -> Result<Vec<u64>, DiscoveryError>;

    /// 获取单个帖子的详情
    async fn post(&self, post_id: u64) -> Result<PostDetail, DiscoveryError>;
}
