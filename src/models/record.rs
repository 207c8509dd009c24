use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// 年份分组中"未知"哨兵值的显示文本
pub const UNKNOWN_LABEL: &str = "Unknown";

/// 工作表名称最大长度（xlsx 格式限制）
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// 一条演员-角色记录
///
/// 由抽取器从文档中的一个角色条目生成，生成后不再修改。
/// `role` 和 `artist` 始终非空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    pub show: String,
    pub dates: String,
    pub role: String,
    pub artist: String,
    pub other: String,
    /// 来源文件名（报表中的 FILENAME 列）
    pub source_file: String,
}

/// 年份标签
///
/// 变体顺序即工作表顺序：`Unknown` 等价于 "0000"，排在所有真实年份之前。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum YearLabel {
    Unknown,
    Year(u16),
}

impl YearLabel {
    /// 对应的工作表名称（已按长度限制截断）
    pub fn sheet_name(&self) -> String {
        let name = match self {
            YearLabel::Unknown => "Unknown_Year".to_string(),
            YearLabel::Year(year) => format!("Year_{}", year),
        };
        truncate_sheet_name(&name)
    }
}

impl fmt::Display for YearLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearLabel::Unknown => write!(f, "{}", UNKNOWN_LABEL),
            YearLabel::Year(year) => write!(f, "{:04}", year),
        }
    }
}

/// 按字符截断工作表名称
pub fn truncate_sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME_LEN).collect()
}

/// 跨文件聚合结果
///
/// 桶按 `YearLabel` 排序存放；桶内顺序即处理顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateResult {
    pub buckets: BTreeMap<YearLabel, Vec<FlatRecord>>,
    /// 至少产出一条记录的来源文件
    pub processed_files: Vec<String>,
}

impl AggregateResult {
    /// 所有桶是否都为空
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(|records| records.is_empty())
    }

    /// 记录总数
    pub fn total_records(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// 按工作表顺序遍历非空桶
    pub fn non_empty_buckets(&self) -> impl Iterator<Item = (&YearLabel, &Vec<FlatRecord>)> {
        self.buckets.iter().filter(|(_, records)| !records.is_empty())
    }

    /// 按工作表顺序遍历所有记录
    pub fn records(&self) -> impl Iterator<Item = &FlatRecord> {
        self.buckets.values().flatten()
    }
}

/// Summary 工作表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub year: String,
    /// 去重排序后的剧目名，以 ", " 连接
    pub shows: String,
    pub total_roles: usize,
    pub unique_shows: usize,
    pub sheet_name: String,
}

impl SummaryRow {
    /// 从一个年份桶计算汇总行
    pub fn from_bucket(label: &YearLabel, records: &[FlatRecord]) -> Self {
        let shows: BTreeSet<&str> = records.iter().map(|r| r.show.as_str()).collect();

        Self {
            year: label.to_string(),
            shows: shows.iter().copied().collect::<Vec<_>>().join(", "),
            total_roles: records.len(),
            unique_shows: shows.len(),
            sheet_name: label.sheet_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(show: &str) -> FlatRecord {
        FlatRecord {
            show: show.to_string(),
            dates: "1985".to_string(),
            role: "Don José".to_string(),
            artist: "Someone".to_string(),
            other: String::new(),
            source_file: "a.json".to_string(),
        }
    }

    #[test]
    fn test_unknown_sorts_before_real_years() {
        let mut labels = vec![YearLabel::Year(2001), YearLabel::Unknown, YearLabel::Year(1978)];
        labels.sort();
        assert_eq!(
            labels,
            vec![YearLabel::Unknown, YearLabel::Year(1978), YearLabel::Year(2001)]
        );
    }

    #[test]
    fn test_sheet_names() {
        assert_eq!(YearLabel::Unknown.sheet_name(), "Unknown_Year");
        assert_eq!(YearLabel::Year(1985).sheet_name(), "Year_1985");
        assert_eq!(YearLabel::Year(1985).to_string(), "1985");
        assert_eq!(YearLabel::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_truncate_sheet_name() {
        let long = "x".repeat(40);
        assert_eq!(truncate_sheet_name(&long).chars().count(), MAX_SHEET_NAME_LEN);
        assert_eq!(truncate_sheet_name("Summary"), "Summary");
    }

    #[test]
    fn test_summary_row_sorted_unique_shows() {
        let records = vec![record("Carmen"), record("Aida"), record("Carmen")];
        let row = SummaryRow::from_bucket(&YearLabel::Year(1985), &records);

        assert_eq!(row.year, "1985");
        assert_eq!(row.shows, "Aida, Carmen");
        assert_eq!(row.total_roles, 3);
        assert_eq!(row.unique_shows, 2);
        assert_eq!(row.sheet_name, "Year_1985");
    }

    #[test]
    fn test_aggregate_is_empty_with_empty_buckets() {
        let mut aggregate = AggregateResult::default();
        assert!(aggregate.is_empty());

        aggregate.buckets.insert(YearLabel::Unknown, Vec::new());
        assert!(aggregate.is_empty());

        aggregate.buckets.insert(YearLabel::Year(1990), vec![record("Tosca")]);
        assert!(!aggregate.is_empty());
        assert_eq!(aggregate.total_records(), 1);
        assert_eq!(aggregate.non_empty_buckets().count(), 1);
    }
}
