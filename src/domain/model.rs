use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 回應 payload 的形狀，由操作決定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadShape {
    Single,
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Single(Map<String, Value>),
    List(Vec<Map<String, Value>>),
    Absent,
}

impl Payload {
    /// 依照預期形狀轉換 JSON 值；形狀不符時視為不存在
    pub fn from_value(value: Option<&Value>, shape: PayloadShape) -> Self {
        match (shape, value) {
            (PayloadShape::Single, Some(Value::Object(map))) => Payload::Single(map.clone()),
            (PayloadShape::List, Some(Value::Array(items))) => Payload::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(map) => map.clone(),
                        // 非物件元素以空物件表示，讓欄位檢查失敗
                        _ => Map::new(),
                    })
                    .collect(),
            ),
            _ => Payload::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Payload::Absent)
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::Single(_) => 1,
            Payload::List(items) => items.len(),
            Payload::Absent => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 一次 API 呼叫的標準化結果
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub raw_body: String,
    pub body: Value,
    pub status_code: u16,
    pub domain_status: Option<String>,
    pub payload: Payload,
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn pretty_body(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.raw_body.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestBody {
    Json(Value),
    Raw(String),
}
