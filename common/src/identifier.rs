//! EAN抽出モジュール
//!
//! スプレッドシートの1列分のセル値からEAN文字列の列を作る。
//! 数値として保存されたEANは `1234567890123.0` のような小数部を持つため、
//! 最初の `.` 以降を切り捨てて正規化する。

use std::fmt;

/// セル値（欠損はOptionのNoneで表す）
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}

impl CellValue {
    /// 欠損扱いの値か（NaNは空セルと同じ扱い）
    fn is_missing(&self) -> bool {
        matches!(self, CellValue::Float(x) if x.is_nan())
    }
}

/// 文字列表現を最初の `.` の手前で切り詰める
pub fn normalize_identifier(raw: &str) -> &str {
    match raw.find('.') {
        Some(pos) => &raw[..pos],
        None => raw,
    }
}

/// セル値の列からEAN文字列の列を抽出
///
/// - 欠損値は除外（空文字列にはしない）
/// - 順序は保持、重複除去・大文字小文字変換・空白除去は行わない
pub fn extract_identifiers(values: &[Option<CellValue>]) -> Vec<String> {
    let identifiers: Vec<String> = values
        .iter()
        .flatten()
        .filter(|v| !v.is_missing())
        .map(|v| normalize_identifier(&v.to_string()).to_string())
        .collect();

    let empty = identifiers.iter().filter(|id| id.is_empty()).count();
    if empty > 0 {
        log::warn!("空のEANが{}件あります（パターンのみのファイル名で照合されます）", empty);
    }

    identifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_mixed_values() {
        let values = vec![
            Some(CellValue::from("1234567890123.0")),
            Some(CellValue::from("ABC")),
            None,
            Some(CellValue::from(42i64)),
        ];
        assert_eq!(
            extract_identifiers(&values),
            vec!["1234567890123", "ABC", "42"]
        );
    }

    #[test]
    fn test_extract_float_cells() {
        let values = vec![
            Some(CellValue::Float(3401234567890.0)),
            Some(CellValue::Float(12.75)),
        ];
        assert_eq!(extract_identifiers(&values), vec!["3401234567890", "12"]);
    }

    #[test]
    fn test_extract_keeps_order_and_duplicates() {
        let values = vec![
            Some(CellValue::from("222")),
            Some(CellValue::from("111")),
            Some(CellValue::from("222")),
        ];
        assert_eq!(extract_identifiers(&values), vec!["222", "111", "222"]);
    }

    #[test]
    fn test_extract_no_trimming_or_case_change() {
        let values = vec![Some(CellValue::from(" abc ")), Some(CellValue::from("XyZ"))];
        assert_eq!(extract_identifiers(&values), vec![" abc ", "XyZ"]);
    }

    #[test]
    fn test_extract_nan_is_missing() {
        let values = vec![Some(CellValue::Float(f64::NAN)), Some(CellValue::from(7i64))];
        assert_eq!(extract_identifiers(&values), vec!["7"]);
    }

    #[test]
    fn test_extract_bool_cells() {
        let values = vec![Some(CellValue::Bool(true)), Some(CellValue::Bool(false))];
        assert_eq!(extract_identifiers(&values), vec!["True", "False"]);
    }

    #[test]
    fn test_extract_dot_only_gives_empty_identifier() {
        let values = vec![Some(CellValue::from("."))];
        assert_eq!(extract_identifiers(&values), vec![""]);
    }

    #[test]
    fn test_extract_never_exceeds_present_values_and_has_no_dot() {
        let values = vec![
            None,
            Some(CellValue::from("1.2.3")),
            Some(CellValue::Float(0.5)),
            None,
            Some(CellValue::from("no-dot")),
            Some(CellValue::Integer(-12)),
            Some(CellValue::from("")),
        ];
        let present = values.iter().filter(|v| v.is_some()).count();
        let identifiers = extract_identifiers(&values);

        assert!(identifiers.len() <= present);
        assert!(identifiers.iter().all(|id| !id.contains('.')));
        assert_eq!(identifiers, vec!["1", "0", "no-dot", "-12", ""]);
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("1234567890123.0"), "1234567890123");
        assert_eq!(normalize_identifier("abc"), "abc");
        assert_eq!(normalize_identifier(".png"), "");
    }
}
