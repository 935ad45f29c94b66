//! 原始碼稽核：從檔案中擷取指定方法的內容，確認必要的函式呼叫都有出現。
//!
//! 方法邊界以逐行計算大括號決定，字串或註解中的大括號可能造成誤判。

use crate::utils::error::Result;
use regex::Regex;
use std::path::Path;

/// 可辨識的方法回傳型別
const SIGNATURE_RETURN_TYPES: [&str; 3] = ["CustomResponse", "String", "Response"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub method: String,
    pub method_found: bool,
    pub missing: Vec<String>,
}

impl AuditReport {
    pub fn passed(&self) -> bool {
        self.method_found && self.missing.is_empty()
    }
}

/// 讀取檔案並稽核指定方法；檔案讀取失敗會直接回傳錯誤
pub fn audit_file<P: AsRef<Path>>(
    path: P,
    method_name: &str,
    required_tokens: &[String],
) -> Result<AuditReport> {
    let source = std::fs::read_to_string(&path)?;
    tracing::debug!(
        "🔎 Auditing {} in {}",
        method_name,
        path.as_ref().display()
    );
    Ok(audit_source(&source, method_name, required_tokens))
}

pub fn audit_source(source: &str, method_name: &str, required_tokens: &[String]) -> AuditReport {
    let Some(body) = extract_method_body(source, method_name) else {
        tracing::warn!("❌ Method {} not found in the file.", method_name);
        return AuditReport {
            method: method_name.to_string(),
            method_found: false,
            missing: required_tokens.to_vec(),
        };
    };

    let missing: Vec<String> = required_tokens
        .iter()
        .filter(|token| !contains_call(&body, token))
        .cloned()
        .collect();

    for token in &missing {
        tracing::warn!("❌ '{}()' is missing in the method {}.", token, method_name);
    }

    AuditReport {
        method: method_name.to_string(),
        method_found: true,
        missing,
    }
}

/// 擷取方法內容：從簽章行開始，計算 `{` 與 `}` 直到配對結束
pub fn extract_method_body(source: &str, method_name: &str) -> Option<String> {
    let signature = signature_regex(method_name)?;
    let lines = source.lines().skip_while(|line| !signature.is_match(line));

    let mut body = String::new();
    let mut depth: i64 = 0;
    let mut in_body = false;

    // 簽章行本身也要納入掃描
    for line in lines {
        let opens = line.matches('{').count() as i64;
        let closes = line.matches('}').count() as i64;

        if opens > 0 {
            in_body = true;
        }

        if in_body {
            body.push_str(line);
            body.push('\n');
            depth += opens - closes;

            if depth <= 0 {
                return Some(body);
            }
        }
    }

    // 找到簽章但大括號未閉合時，回傳已擷取的部分
    in_body.then_some(body)
}

fn signature_regex(method_name: &str) -> Option<Regex> {
    let pattern = format!(
        r"public\s+(?:{})\s+{}\s*\(",
        SIGNATURE_RETURN_TYPES.join("|"),
        regex::escape(method_name)
    );
    Regex::new(&pattern).ok()
}

fn contains_call(body: &str, token: &str) -> bool {
    let pattern = format!(r"\b{}\s*\(", regex::escape(token));
    Regex::new(&pattern)
        .map(|re| re.is_match(body))
        .unwrap_or(false)
}
