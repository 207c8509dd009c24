//! 年份识别服务 - 业务能力层
//!
//! 从自由文本日期（"1980-81 Season"、"March 12, 1995"）中推断演出年份

use crate::models::YearLabel;
use once_cell::sync::Lazy;
use regex::Regex;

/// 独立的四位年份 19xx / 20xx（仅 ASCII 数字）
static PLAIN_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19|20)[0-9]{2}\b").expect("年份正则无效"));

/// 年份区间 "1980-81" / "1980–81"
static YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b((?:19|20)[0-9]{2})[-–][0-9]{2}\b").expect("年份区间正则无效"));

/// 推断年份标签
///
/// 顺序：
/// 1. 空字符串 → `Unknown`
/// 2. 最左侧的独立四位年份
/// 3. 年份区间的起始年份
/// 4. 其余 → `Unknown`
///
/// 独立年份的查找总是先于区间，因此 "1999 (revived from 1980-81)" 得到 1999。
pub fn classify_year(dates: &str) -> YearLabel {
    if dates.is_empty() {
        return YearLabel::Unknown;
    }

    if let Some(m) = PLAIN_YEAR.find(dates) {
        return parse_label(m.as_str());
    }

    if let Some(year) = YEAR_RANGE.captures(dates).and_then(|caps| caps.get(1)) {
        return parse_label(year.as_str());
    }

    YearLabel::Unknown
}

fn parse_label(digits: &str) -> YearLabel {
    digits
        .parse()
        .map(YearLabel::Year)
        .unwrap_or(YearLabel::Unknown)
}
