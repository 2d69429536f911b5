// extract.rs - 从帖子渲染后的 HTML 中提取图片地址
// Discourse 没有直接返回帖子图片的字段，只能在 cooked 里找上传链接

use regex::Regex;
use std::sync::LazyLock;

/// 匹配 `href="https://uploads..."`，URL 在第一个空白或引号处结束
static UPLOAD_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href="(https://uploads[^"\s]*)"#).expect("valid upload href regex")
});

/// 图片地址提取器
///
/// 以后换成真正的 HTML 解析器时只需要换一个实现，finder 不用动。
pub trait ImageExtractor {
    /// 返回 HTML 中所有候选图片地址（可能为空）
    fn extract(&self, html: &str) -> Vec<String>;
}

/// 基于正则的默认实现，只认论坛上传域名下的链接
#[derive(Debug, Default, Clone, Copy)]
pub struct UploadLinkExtractor;

impl ImageExtractor for UploadLinkExtractor {
    fn extract(&self, html: &str) -> Vec<String> {
        UPLOAD_HREF
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|url| url.len() > "https://uploads".len())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_href_prefix_and_trailing_space_quote() {
        let html = r#"<p><a href="https://uploads.example.com/a.png ">a</a>
            <a href="https://uploads.example.com/b.jpg ">b</a></p>"#;
        assert_eq!(
            UploadLinkExtractor.extract(html),
            vec![
                "https://uploads.example.com/a.png".to_string(),
                "https://uploads.example.com/b.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn handles_discourse_lightbox_markup() {
        let html = r#"<div class="lightbox-wrapper"><a class="lightbox" href="https://uploads.mudspike.com/original/3X/f/f00.jpeg" data-download-href="/uploads/short-url/x.jpeg" title="shot"><img src="https://uploads.mudspike.com/optimized/3X/f/f00_2_690x388.jpeg"></a></div>"#;
        assert_eq!(
            UploadLinkExtractor.extract(html),
            vec!["https://uploads.mudspike.com/original/3X/f/f00.jpeg".to_string()]
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let html = r#"<A HREF="https://uploads.example.com/c.png" >c</A>"#;
        assert_eq!(
            UploadLinkExtractor.extract(html),
            vec!["https://uploads.example.com/c.png".to_string()]
        );
    }

    #[test]
    fn ignores_other_hosts_and_src_attributes() {
        let html = r#"<a href="https://example.com/x.png">x</a><img src="https://uploads.example.com/y.png">"#;
        assert!(UploadLinkExtractor.extract(html).is_empty());
    }

    #[test]
    fn empty_html_yields_nothing() {
        assert!(UploadLinkExtractor.extract("").is_empty());
    }
}
