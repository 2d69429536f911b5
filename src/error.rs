// error.rs - 图片发现过程中的错误类型
// 所有错误在 finder 边界处统一转换为默认结果，这里只负责描述失败原因

use thiserror::Error;

/// 一次图片发现失败的原因
///
/// 对调用方而言所有失败都等价于“发现不可用”，
/// 区分种类只是为了日志里能看出到底哪一步出了问题。
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// 网络不可达、超时或非 2xx 响应
    #[error("请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// 响应体不是合法 JSON，或结构与预期不符
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// grouped_search_result 缺失或为 null
    #[error("搜索没有返回结果")]
    NoResults,

    /// post_ids 为空列表
    #[error("搜索结果中没有帖子")]
    EmptyPostIds,

    /// 帖子详情缺少必需字段
    #[error("帖子缺少字段: {0}")]
    MissingField(&'static str),

    /// 帖子正文中没有匹配上传地址的图片链接
    #[error("帖子 {post_id} 中没有找到图片")]
    NoImage { post_id: u64 },

    /// HTTP 客户端构建失败（如 TLS 后端初始化失败）
    #[error("无法创建 HTTP 客户端: {0}")]
    Client(reqwest::Error),
}
