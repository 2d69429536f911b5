// query.rs - Discourse 搜索短语构建
// 把日期、图片、排序等 facet 与用户关键词拼成一个 q 参数

use rand::Rng;
use std::fmt;

/// 随机年份的取值范围（左闭右开）
pub const YEAR_RANGE: std::ops::Range<u16> = 2017..2023;

/// `before:` facet 的日期下界，日总是 01
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeforeDate {
    pub year: u16,
    pub month: u8,
}

impl BeforeDate {
    /// 随机挑选年份和月份，让每次搜索落在不同的时间段
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            year: rng.gen_range(YEAR_RANGE),
            month: rng.gen_range(1..=12),
        }
    }
}

impl fmt::Display for BeforeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-01", self.year, self.month)
    }
}

/// 拼接完整的搜索短语
///
/// 结果形如 `before:2019-04-01 with:images order:likes screens #screens-aars`
pub fn search_phrase(before: BeforeDate, query: &str, category: &str) -> String {
    format!("before:{before} with:images order:likes {query} {category}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_date_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let date = BeforeDate::random(&mut rng);
            assert!((2017..2023).contains(&date.year), "year {}", date.year);
            assert!((1..=12).contains(&date.month), "month {}", date.month);
        }
    }

    #[test]
    fn random_date_reaches_both_month_edges() {
        let mut rng = StdRng::seed_from_u64(11);
        let months: Vec<u8> = (0..2000).map(|_| BeforeDate::random(&mut rng).month).collect();
        assert!(months.contains(&1));
        assert!(months.contains(&12));
    }

    #[test]
    fn date_is_zero_padded() {
        let date = BeforeDate { year: 2018, month: 3 };
        assert_eq!(date.to_string(), "2018-03-01");
    }

    #[test]
    fn phrase_contains_all_facets_in_order() {
        let date = BeforeDate { year: 2021, month: 11 };
        assert_eq!(
            search_phrase(date, "screens", "#screens-aars"),
            "before:2021-11-01 with:images order:likes screens #screens-aars"
        );
    }
}
