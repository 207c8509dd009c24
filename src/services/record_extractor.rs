//! 记录抽取服务 - 业务能力层
//!
//! 只负责"把一个分析结果 JSON 拆成扁平记录"，不关心文件和批次
//!
//! 文档结构：
//!
//! ```text
//! result.contents[].fields
//!     SHOW.valueString
//!     DATES.valueString | DATE.valueDate
//!     ROLES.valueArray[].valueObject
//!         ROLE.valueString / ARTIST.valueString / OTHER.valueString
//! ```
//!
//! 任何一层缺失或类型不符都视为"不存在"，取空字符串，从不报错。

use crate::models::FlatRecord;
use serde_json::Value;

/// 读取 `obj[key][leaf]` 字符串，缺失或类型不符时返回 `None`
fn leaf_str<'a>(obj: &'a Value, key: &str, leaf: &str) -> Option<&'a str> {
    obj.get(key)?.get(leaf)?.as_str()
}

/// 同 [`leaf_str`]，缺失时取空字符串
fn leaf_or_empty(obj: &Value, key: &str, leaf: &str) -> String {
    leaf_str(obj, key, leaf).unwrap_or_default().to_string()
}

/// 按路径取数组，缺失或类型不符时视为空数组
fn array_at<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// 演出日期：DATES.valueString 优先，其次 DATE.valueDate
///
/// 以"是否存在"判断优先级，空的 DATES.valueString 同样优先。
fn dates_of(fields: &Value) -> String {
    leaf_str(fields, "DATES", "valueString")
        .or_else(|| leaf_str(fields, "DATE", "valueDate"))
        .unwrap_or_default()
        .to_string()
}

/// 从一个分析结果文档中抽取全部记录
///
/// # 参数
/// - `document`: 分析服务返回的 JSON
/// - `source_file`: 来源文件名，写入每条记录的 `source_file`
///
/// # 返回
/// 按文档顺序排列的记录；`role` 或 `artist` 为空的条目被丢弃
pub fn extract_records(document: &Value, source_file: &str) -> Vec<FlatRecord> {
    let mut records = Vec::new();

    for content in array_at(document, &["result", "contents"]) {
        let Some(fields) = content.get("fields") else {
            continue;
        };

        let show = leaf_or_empty(fields, "SHOW", "valueString");
        let dates = dates_of(fields);

        for entry in array_at(fields, &["ROLES", "valueArray"]) {
            let Some(role_obj) = entry.get("valueObject") else {
                continue;
            };

            let role = leaf_or_empty(role_obj, "ROLE", "valueString");
            let artist = leaf_or_empty(role_obj, "ARTIST", "valueString");
            if role.is_empty() || artist.is_empty() {
                continue;
            }

            records.push(FlatRecord {
                show: show.clone(),
                dates: dates.clone(),
                role,
                artist,
                other: leaf_or_empty(role_obj, "OTHER", "valueString"),
                source_file: source_file.to_string(),
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn role(role: Option<&str>, artist: Option<&str>, other: Option<&str>) -> Value {
        let mut obj = serde_json::Map::new();
        if let Some(r) = role {
            obj.insert("ROLE".into(), json!({ "valueString": r }));
        }
        if let Some(a) = artist {
            obj.insert("ARTIST".into(), json!({ "valueString": a }));
        }
        if let Some(o) = other {
            obj.insert("OTHER".into(), json!({ "valueString": o }));
        }
        json!({ "valueObject": Value::Object(obj) })
    }

    #[test]
    fn test_carmen_two_roles_one_missing_other() {
        let doc = json!({
            "result": {
                "contents": [{
                    "fields": {
                        "SHOW": { "valueString": "Carmen" },
                        "DATES": { "valueString": "1985-86" },
                        "ROLES": { "valueArray": [
                            role(Some("Carmen"), Some("Stefania Toczyska"), Some("debut")),
                            role(Some("Don José"), Some("Jacque Trussel"), None),
                        ]}
                    }
                }]
            }
        });

        let records = extract_records(&doc, "carmen_result.json");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].show, "Carmen");
        assert_eq!(records[0].dates, "1985-86");
        assert_eq!(records[0].other, "debut");
        assert_eq!(records[1].role, "Don José");
        assert_eq!(records[1].other, "");
        assert!(records.iter().all(|r| r.source_file == "carmen_result.json"));
    }

    #[test]
    fn test_missing_result_or_contents_yields_nothing() {
        assert!(extract_records(&json!({}), "a.json").is_empty());
        assert!(extract_records(&json!({ "result": {} }), "a.json").is_empty());
        assert!(extract_records(&json!({ "result": { "contents": [] } }), "a.json").is_empty());
        assert!(extract_records(&json!([1, 2, 3]), "a.json").is_empty());
    }

    #[test]
    fn test_entries_missing_role_or_artist_are_dropped() {
        let doc = json!({
            "result": { "contents": [{
                "fields": {
                    "SHOW": { "valueString": "Aida" },
                    "ROLES": { "valueArray": [
                        role(None, Some("Leontyne Price"), None),
                        role(Some("Radamès"), None, None),
                        role(Some(""), Some("Nobody"), None),
                        { "noValueObject": true },
                        role(Some("Amneris"), Some("Fiorenza Cossotto"), None),
                    ]}
                }
            }]}
        });

        let records = extract_records(&doc, "aida.json");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].role, "Amneris");
        assert_eq!(records[0].dates, "");
    }

    #[test]
    fn test_dates_fallback_to_value_date() {
        let doc = json!({
            "result": { "contents": [
                { "fields": {
                    "DATE": { "valueDate": "1995-03-12" },
                    "ROLES": { "valueArray": [role(Some("Tosca"), Some("A"), None)] }
                }},
                { "fields": {
                    "DATES": { "valueString": "" },
                    "DATE": { "valueDate": "1996-01-01" },
                    "ROLES": { "valueArray": [role(Some("Tosca"), Some("B"), None)] }
                }}
            ]}
        });

        let records = extract_records(&doc, "tosca.json");

        assert_eq!(records[0].dates, "1995-03-12");
        // 存在但为空的 DATES 依然优先
        assert_eq!(records[1].dates, "");
    }

    #[test]
    fn test_wrong_typed_levels_are_treated_as_absent() {
        let doc = json!({
            "result": { "contents": [
                "not an object",
                { "fields": "not an object" },
                { "fields": {
                    "SHOW": { "valueString": 42 },
                    "ROLES": { "valueArray": { "not": "an array" } }
                }},
                { "fields": {
                    "SHOW": "plain string",
                    "ROLES": { "valueArray": [
                        { "valueObject": { "ROLE": { "valueString": "Mimì" }, "ARTIST": "no wrapper" } },
                        { "valueObject": { "ROLE": { "valueString": "Rodolfo" }, "ARTIST": { "valueString": "Luciano" } } }
                    ]}
                }}
            ]}
        });

        let records = extract_records(&doc, "boheme.json");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].show, "");
        assert_eq!(records[0].role, "Rodolfo");
    }
}
