use serde_json::{Map, Value};

/// 以點號分隔的路徑取得巢狀欄位，例如 `Results.BillItems`
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            _ => None,
        })
}

/// 從物件本身開始解析路徑
pub fn lookup_in<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };

    let value = map.get(head)?;
    match rest {
        Some(rest) => lookup(value, rest),
        None => Some(value),
    }
}

/// 與 `lookup` 相同，但把 JSON null 視為不存在
pub fn lookup_non_null<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    lookup(value, path).filter(|v| !v.is_null())
}

/// 欄位的文字形式：字串取原值，其餘使用 JSON 表示
pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
