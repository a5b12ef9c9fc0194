//! Excel読み込みモジュール
//!
//! 1行目を見出しとして扱い、EAN列のセル値を取り出す。

use crate::error::{EanMatchError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use ean_match_common::{extract_identifiers, CellValue};
use std::path::Path;

/// 読み込んだEAN列
#[derive(Debug, Clone)]
pub struct EanColumn {
    pub sheet: String,
    /// 選択された列の見出し
    pub header: String,
    /// シートの全見出し
    pub headers: Vec<String>,
    /// 見出し行を除くセル値（空セルはNone）
    pub values: Vec<Option<CellValue>>,
}

impl EanColumn {
    /// 正規化済みのEAN列
    pub fn identifiers(&self) -> Vec<String> {
        extract_identifiers(&self.values)
    }

    /// 空でない先頭n件のセル値（表示用）
    pub fn preview(&self, n: usize) -> Vec<String> {
        self.values
            .iter()
            .flatten()
            .take(n)
            .map(|v| v.to_string())
            .collect()
    }

    pub fn non_empty_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(EanMatchError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// シート名の一覧
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    ensure_exists(path)?;
    let workbook = open_workbook_auto(path)
        .map_err(|e| EanMatchError::Spreadsheet(format!("{}: {}", path.display(), e)))?;
    Ok(workbook.sheet_names().to_vec())
}

/// EAN列を読み込む
///
/// 列の選択順: `column` 指定 → `default_column` の見出し → 先頭列。
/// シート未指定時は先頭シート。
pub fn read_ean_column(
    path: &Path,
    sheet: Option<&str>,
    column: Option<&str>,
    default_column: &str,
) -> Result<EanColumn> {
    ensure_exists(path)?;
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| EanMatchError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let sheets = workbook.sheet_names().to_vec();
    let sheet = match sheet {
        Some(name) => {
            if !sheets.iter().any(|s| s == name) {
                return Err(EanMatchError::SheetNotFound(format!(
                    "{} (利用可能: {})",
                    name,
                    sheets.join(", ")
                )));
            }
            name.to_string()
        }
        None => sheets
            .first()
            .cloned()
            .ok_or_else(|| EanMatchError::Spreadsheet("シートがありません".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| EanMatchError::Spreadsheet(format!("{}: {}", sheet, e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().enumerate().map(|(i, c)| header_text(i, c)).collect())
        .unwrap_or_default();

    if headers.is_empty() {
        return Err(EanMatchError::ColumnNotFound(format!("シート「{}」が空です", sheet)));
    }

    let col = select_column(&headers, column, default_column)?;
    let values = rows.map(|row| row.get(col).and_then(to_cell_value)).collect();

    log::debug!("シート「{}」の列「{}」を読み込み", sheet, headers[col]);

    Ok(EanColumn {
        sheet,
        header: headers[col].clone(),
        headers,
        values,
    })
}

fn select_column(headers: &[String], column: Option<&str>, default_column: &str) -> Result<usize> {
    if let Some(name) = column {
        return headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                EanMatchError::ColumnNotFound(format!("{} (利用可能: {})", name, headers.join(", ")))
            });
    }
    Ok(headers.iter().position(|h| h == default_column).unwrap_or(0))
}

fn header_text(index: usize, cell: &Data) -> String {
    match cell {
        Data::Empty => format!("Unnamed: {}", index),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// セル値の変換（空セル・空文字列・エラーセルは欠損）
fn to_cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Int(n) => Some(CellValue::Integer(*n)),
        Data::Float(x) => Some(CellValue::Float(*x)),
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(_) | Data::Empty => None,
    }
}
