//! Mudspike 论坛屏保的图片发现
//!
//! 从论坛搜索接口随机挑出一张社区截图及其署名；任何失败都退回默认的论坛 Logo。
//!
//! ```no_run
//! use mudspike_screensaver::{DiscourseClient, ImageFinder};
//! use rand::SeedableRng;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), mudspike_screensaver::DiscoveryError> {
//! let client = DiscourseClient::new("https://forums.mudspike.com", Duration::from_secs(20))?;
//! let finder = ImageFinder::new(client);
//! let mut rng = rand::rngs::StdRng::from_entropy();
//! let result = finder.find_candidate_image("screens", &mut rng).await;
//! println!("{}", result.caption());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod finder;
pub mod query;
pub mod source;

pub use error::DiscoveryError;
pub use finder::{Discovery, DiscoveryResult, ImageFinder};
pub use source::discourse::DiscourseClient;
