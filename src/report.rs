//! 実行結果レポート

use crate::error::Result;
use chrono::{DateTime, Utc};
use ean_match_common::{MatchRecord, MatchReport};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub spreadsheet: PathBuf,
    pub sheet: String,
    pub column: String,
    pub archive: PathBuf,
    pub output: PathBuf,
    pub patterns: Vec<String>,
    /// 処理したEAN数
    pub processed: usize,
    /// 一致件数
    pub match_count: usize,
    /// 出力ZIPのエントリ数
    pub entry_count: usize,
    pub output_sha256: String,
    pub matches: Vec<MatchRecord>,
}

/// 実行時の入力情報
pub struct RunInputs<'a> {
    pub spreadsheet: &'a Path,
    pub sheet: &'a str,
    pub column: &'a str,
    pub archive: &'a Path,
    pub output: &'a Path,
    pub patterns: Vec<String>,
}

impl RunReport {
    pub fn new(inputs: RunInputs<'_>, result: MatchReport) -> Result<Self> {
        Ok(Self {
            generated_at: Utc::now(),
            spreadsheet: inputs.spreadsheet.to_path_buf(),
            sheet: inputs.sheet.to_string(),
            column: inputs.column.to_string(),
            archive: inputs.archive.to_path_buf(),
            output: inputs.output.to_path_buf(),
            patterns: inputs.patterns,
            processed: result.processed,
            match_count: result.match_count,
            entry_count: result.entry_count,
            output_sha256: sha256_file(inputs.output)?,
            matches: result.matches,
        })
    }

    /// 一致しなかったEANの数
    pub fn unmatched(&self) -> usize {
        self.processed - self.match_count
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// ファイルのSHA-256（16進）
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
