//! ZIP照合・再梱包モジュール
//!
//! ## 処理フロー
//! 1. 入力ZIPから画像エントリ（.png/.jpg/.jpeg）を列挙
//! 2. EANごとにパターンを優先順に試し、ファイル名が `{EAN}{パターン}` と一致する最初の画像を探す
//! 3. 一致した画像の元バイト列をファイル名のみで出力ZIPに格納
//! 4. 出力ZIPを確定して一致件数を返す
//!
//! 同名のエントリは後から書いたものが残る（入力側の索引・出力側の両方で同じ規則）。

use crate::error::{Error, Result};
use crate::pattern::PatternSet;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Read, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// 画像ファイルのパスか（拡張子の大文字小文字は区別しない）
pub fn is_image_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// ディレクトリ部分を除いたファイル名
pub fn base_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// 入力ZIP内の画像エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// ZIP内のインデックス
    pub index: usize,
    /// ZIP内のパス
    pub path: String,
    /// ファイル名（ディレクトリ除去後）
    pub file_name: String,
}

/// ZIPエントリの一覧（件数確認用）
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveListing {
    /// ディレクトリを除く全ファイル数
    pub total_files: usize,
    /// 画像ファイルのパス（列挙順）
    pub image_paths: Vec<String>,
    /// `image_paths` と同じ並びのZIP内インデックス
    #[serde(skip)]
    image_indices: Vec<usize>,
}

impl ArchiveListing {
    pub fn from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Self> {
        let mut listing = Self::default();
        for (i, path) in enumerate_files(archive)? {
            listing.total_files += 1;
            if is_image_path(&path) {
                listing.image_indices.push(i);
                listing.image_paths.push(path);
            }
        }
        Ok(listing)
    }

    /// ZIPを読み直さずに画像索引を作る
    pub fn image_index(&self) -> Result<ImageIndex> {
        ImageIndex::from_paths(
            self.image_indices
                .iter()
                .copied()
                .zip(self.image_paths.iter().cloned()),
        )
    }
}

fn enumerate_files<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<(usize, String)>> {
    let mut files = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| Error::input(&format!("エントリ{}を列挙できません", i), e))?;
        if entry.is_dir() {
            continue;
        }
        files.push((i, entry.name().to_string()));
    }
    Ok(files)
}

/// ファイル名で引ける画像エントリの索引
///
/// 同じファイル名のエントリが複数ある場合は、列挙順で後のものが
/// 最初に現れた位置を置き換える。
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    entries: Vec<ImageEntry>,
    by_name: HashMap<String, usize>,
}

impl ImageIndex {
    /// (インデックス, パス) の列から索引を作る。画像以外は無視する。
    pub fn from_paths<I>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, String)>,
    {
        let mut index = Self::default();
        for (i, path) in paths {
            if !is_image_path(&path) {
                continue;
            }
            let file_name = base_name(&path).to_string();
            let entry = ImageEntry {
                index: i,
                path,
                file_name: file_name.clone(),
            };
            match index.by_name.get(&file_name) {
                Some(&slot) => {
                    log::debug!(
                        "同名の画像を置き換え: {} -> {}",
                        index.entries[slot].path,
                        entry.path
                    );
                    index.entries[slot] = entry;
                }
                None => {
                    index.by_name.insert(file_name, index.entries.len());
                    index.entries.push(entry);
                }
            }
        }

        if index.entries.is_empty() {
            return Err(Error::Config("ZIP内に画像ファイルが見つかりません".into()));
        }
        Ok(index)
    }

    pub fn from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Self> {
        Self::from_paths(enumerate_files(archive)?)
    }

    /// パターンを優先順に試し、最初に一致した画像を返す
    pub fn find_match<'a, 'p>(
        &'a self,
        identifier: &str,
        patterns: &'p PatternSet,
    ) -> Option<(&'p str, &'a ImageEntry)> {
        patterns.iter().find_map(|pattern| {
            let target = format!("{}{}", identifier, pattern);
            self.by_name
                .get(&target)
                .map(|&slot| (pattern, &self.entries[slot]))
        })
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 出力ZIPに書き出す前のエントリ列
///
/// 同名のエントリは最初の位置を保ったまま内容を後勝ちで上書きする。
#[derive(Debug, Default)]
pub struct OutputArchive {
    entries: Vec<(String, Vec<u8>)>,
    by_name: HashMap<String, usize>,
}

impl OutputArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, bytes: Vec<u8>) {
        match self.by_name.get(name) {
            Some(&slot) => {
                log::debug!("出力エントリを上書き: {}", name);
                self.entries[slot].1 = bytes;
            }
            None => {
                self.by_name.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), bytes));
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deflate圧縮で書き出して確定する
    ///
    /// タイムスタンプは固定値にするため、同じ入力からは同じバイト列になる。
    pub fn write_to<W: Write + Seek>(self, writer: W) -> Result<W> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(writer);
        for (name, bytes) in &self.entries {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::output(&format!("{}を追加できません", name), e))?;
            zip.write_all(bytes)
                .map_err(|e| Error::output(&format!("{}を書き込めません", name), e))?;
        }
        zip.finish().map_err(|e| Error::output("出力ZIPの確定に失敗", e))
    }
}

/// 1件の照合結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub identifier: String,
    pub pattern: String,
    /// 入力ZIP内のパス
    pub entry_path: String,
    /// 出力ZIP内のファイル名
    pub file_name: String,
}

/// 照合・再梱包の結果
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    /// 処理したEAN数
    pub processed: usize,
    /// 一致件数
    pub match_count: usize,
    /// 出力ZIPのエントリ数（同名の上書き後）
    pub entry_count: usize,
    pub matches: Vec<MatchRecord>,
}

/// EAN1件ごとの進捗通知
#[derive(Debug, Clone, Copy)]
pub struct MatchProgress<'a> {
    /// 0始まり
    pub index: usize,
    pub total: usize,
    pub identifier: &'a str,
    /// 一致したファイル名
    pub matched: Option<&'a str>,
}

/// EAN列とパターン列で入力ZIPを照合し、一致した画像だけを出力ZIPに書き出す
///
/// 画像が1枚もない場合は出力に何も書かずに設定エラーを返す。
/// `on_progress` はEAN1件の処理が終わるたびに1回呼ばれる。
pub fn match_and_repackage<R, W, F>(
    identifiers: &[String],
    patterns: &PatternSet,
    source: &mut ZipArchive<R>,
    output: W,
    on_progress: F,
) -> Result<(MatchReport, W)>
where
    R: Read + Seek,
    W: Write + Seek,
    F: FnMut(MatchProgress<'_>),
{
    let index = ImageIndex::from_archive(source)?;
    match_with_index(identifiers, patterns, &index, source, output, on_progress)
}

/// 作成済みの索引で照合する（`index` は `source` から作ったものであること）
pub fn match_with_index<R, W, F>(
    identifiers: &[String],
    patterns: &PatternSet,
    index: &ImageIndex,
    source: &mut ZipArchive<R>,
    output: W,
    mut on_progress: F,
) -> Result<(MatchReport, W)>
where
    R: Read + Seek,
    W: Write + Seek,
    F: FnMut(MatchProgress<'_>),
{
    log::info!(
        "照合開始: EAN {}件, 画像 {}枚, パターン {}",
        identifiers.len(),
        index.len(),
        patterns.iter().collect::<Vec<_>>().join(", ")
    );

    let mut output_archive = OutputArchive::new();
    let mut report = MatchReport::default();
    let total = identifiers.len();

    for (i, identifier) in identifiers.iter().enumerate() {
        let record = match index.find_match(identifier, patterns) {
            Some((pattern, entry)) => {
                let bytes = read_entry(source, entry)?;
                output_archive.insert(&entry.file_name, bytes);
                log::debug!("一致: {} -> {}", identifier, entry.path);
                Some(MatchRecord {
                    identifier: identifier.clone(),
                    pattern: pattern.to_string(),
                    entry_path: entry.path.clone(),
                    file_name: entry.file_name.clone(),
                })
            }
            None => None,
        };

        report.processed += 1;
        on_progress(MatchProgress {
            index: i,
            total,
            identifier: identifier.as_str(),
            matched: record.as_ref().map(|r| r.file_name.as_str()),
        });

        if let Some(record) = record {
            report.match_count += 1;
            report.matches.push(record);
        }
    }

    report.entry_count = output_archive.len();
    let writer = output_archive.write_to(output)?;
    log::info!("照合完了: {}件一致", report.match_count);

    Ok((report, writer))
}

fn read_entry<R: Read + Seek>(source: &mut ZipArchive<R>, entry: &ImageEntry) -> Result<Vec<u8>> {
    let mut file = source
        .by_index(entry.index)
        .map_err(|e| Error::input(&format!("{}を開けません", entry.path), e))?;
    // 宣言サイズは信用しない
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| Error::input(&format!("{}を読み込めません", entry.path), e))?;
    Ok(bytes)
}
