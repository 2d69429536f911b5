// finder.rs - 图片发现
// 搜索论坛 -> 随机挑一个帖子 -> 读取详情 -> 从正文里挑一张图片
// 任何一步失败都退回默认图片，错误不会越过这个模块

use crate::error::DiscoveryError;
use crate::extract::{ImageExtractor, UploadLinkExtractor};
use crate::query::{BeforeDate, search_phrase};
use crate::source::ForumSource;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info, warn};

/// 默认搜索关键词
pub const DEFAULT_QUERY: &str = "screens";

/// 默认分类标签
pub const DEFAULT_CATEGORY: &str = "#screens-aars";

/// 一次图片发现的结果
///
/// 四个字段总是有值：要么来自论坛，要么来自 [`DiscoveryResult::default_result`]。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryResult {
    pub image_url: String,
    pub author: String,
    pub topic_slug: String,
    pub created_at: String,
}

impl DiscoveryResult {
    /// 论坛 Logo，发现失败或没有结果时展示
    pub fn default_result() -> Self {
        Self {
            image_url: "https://forums.mudspike.com/uploads/default/original/2X/c/c9aad5dd351c0ab3dc1750a8957f73c67fb91b91.jpg".to_string(),
            author: "fearlessfrog".to_string(),
            topic_slug: "mudspike-screensaver".to_string(),
            created_at: "2023-01-13T22:00:10".to_string(),
        }
    }

    /// `created_at` 的日期部分
    pub fn date(&self) -> &str {
        self.created_at.split('T').next().unwrap_or_default()
    }

    /// 屏保底部的署名文字，如 `alice - cool-shots 2022-05-01`
    pub fn caption(&self) -> String {
        format!("{} - {} {}", self.author, self.topic_slug, self.date())
    }

    /// 原帖所在话题的浏览地址
    pub fn topic_url(&self, forum_base: &str) -> String {
        format!("{}/t/{}", forum_base.trim_end_matches('/'), self.topic_slug)
    }
}

/// 发现过程的内部结果
///
/// 对外仍然只暴露 [`DiscoveryResult`]，这里保留失败原因用于日志和 CLI 提示。
#[derive(Debug)]
pub enum Discovery {
    Found(DiscoveryResult),
    Fallback {
        result: DiscoveryResult,
        reason: DiscoveryError,
    },
}

impl Discovery {
    pub fn result(&self) -> &DiscoveryResult {
        match self {
            Discovery::Found(result) | Discovery::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> DiscoveryResult {
        match self {
            Discovery::Found(result) | Discovery::Fallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Discovery::Fallback { .. })
    }
}

/// 图片发现器
///
/// 数据源和提取器都可以替换；随机数源由调用方传入，测试时可以用固定种子。
pub struct ImageFinder<S, E = UploadLinkExtractor> {
    source: S,
    extractor: E,
    category: String,
}

impl<S: ForumSource> ImageFinder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            extractor: UploadLinkExtractor,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl<S: ForumSource, E: ImageExtractor> ImageFinder<S, E> {
    /// 替换图片提取器
    pub fn with_extractor<E2: ImageExtractor>(self, extractor: E2) -> ImageFinder<S, E2> {
        ImageFinder {
            source: self.source,
            extractor,
            category: self.category,
        }
    }

    /// 设置搜索时附带的分类标签
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 找一张图片；失败时返回默认结果，永远不会报错
    pub async fn find_candidate_image<R: Rng + ?Sized>(
        &self,
        query: &str,
        rng: &mut R,
    ) -> DiscoveryResult {
        self.discover(query, rng).await.into_result()
    }

    /// 同 [`find_candidate_image`](Self::find_candidate_image)，但保留失败原因
    pub async fn discover<R: Rng + ?Sized>(&self, query: &str, rng: &mut R) -> Discovery {
        match self.try_discover(query, rng).await {
            Ok(result) => Discovery::Found(result),
            Err(reason) => {
                warn!(query, error = %reason, "image discovery failed, using default image");
                Discovery::Fallback {
                    result: DiscoveryResult::default_result(),
                    reason,
                }
            }
        }
    }

    /// 真正的发现流程，任何一步失败都直接返回错误
    pub async fn try_discover<R: Rng + ?Sized>(
        &self,
        query: &str,
        rng: &mut R,
    ) -> Result<DiscoveryResult, DiscoveryError> {
        let phrase = search_phrase(BeforeDate::random(rng), query, &self.category);
        info!(phrase = %phrase, "searching for an image");

        let post_ids = self.source.search_post_ids(&phrase).await?;
        debug!(count = post_ids.len(), "posts matched");

        let post_id = pick_post_id(&post_ids, rng).ok_or(DiscoveryError::EmptyPostIds)?;
        debug!(post_id, "post chosen");

        let post = self.source.post(post_id).await?;

        let author = post
            .author()
            .ok_or(DiscoveryError::MissingField("username"))?
            .to_string();
        let topic_slug = post
            .topic_slug
            .ok_or(DiscoveryError::MissingField("topic_slug"))?;
        let created_at = post
            .created_at
            .ok_or(DiscoveryError::MissingField("created_at"))?;
        let cooked = post.cooked.ok_or(DiscoveryError::MissingField("cooked"))?;

        let image_url = self
            .extractor
            .extract(&cooked)
            .choose(rng)
            .cloned()
            .ok_or(DiscoveryError::NoImage { post_id })?;
        info!(post_id, image_url = %image_url, topic_slug = %topic_slug, "image found");

        Ok(DiscoveryResult {
            image_url,
            author,
            topic_slug,
            created_at,
        })
    }
}

/// 只在前一半结果中随机挑选，偏向相关度更高的帖子
///
/// 只有一个结果时直接选它；列表为空时返回 None。
pub fn pick_post_id<R: Rng + ?Sized>(post_ids: &[u64], rng: &mut R) -> Option<u64> {
    if post_ids.is_empty() {
        return None;
    }
    let half = post_ids.len() / 2;
    let index = if half == 0 { 0 } else { rng.gen_range(0..half) };
    post_ids.get(index).copied()
}
