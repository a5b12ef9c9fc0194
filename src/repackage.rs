//! ZIPファイル入出力モジュール
//!
//! コアの照合処理をファイルに対して実行する。出力は同じフォルダの一時ファイルに書き、
//! ZIPの確定後にリネームして公開する。途中で失敗した場合は一時ファイルごと破棄される。

use crate::error::{EanMatchError, Result};
use ean_match_common::{
    match_with_index, ArchiveListing, Error as CoreError, MatchProgress, MatchReport, PatternSet,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

pub type SourceArchive = ZipArchive<BufReader<File>>;

/// 入力ZIPを開く
pub fn open_archive(path: &Path) -> Result<SourceArchive> {
    if !path.exists() {
        return Err(EanMatchError::FileNotFound(path.display().to_string()));
    }
    let file = File::open(path).map_err(|e| CoreError::input(&path.display().to_string(), e))?;
    let archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| CoreError::input(&format!("{}を開けません", path.display()), e))?;
    Ok(archive)
}

/// 開いた入力ZIPとエントリ一覧
///
/// 一覧は開いたときに1度だけ作り、件数表示と照合の両方で使い回す。
pub struct SourceZip {
    path: PathBuf,
    archive: SourceArchive,
    listing: ArchiveListing,
}

impl SourceZip {
    pub fn open(path: &Path) -> Result<Self> {
        let mut archive = open_archive(path)?;
        let listing = ArchiveListing::from_archive(&mut archive)?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
            listing,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn listing(&self) -> &ArchiveListing {
        &self.listing
    }
}

/// ファイル数・画像数の確認
pub fn summarize_archive(path: &Path) -> Result<ArchiveListing> {
    Ok(SourceZip::open(path)?.listing)
}

/// 照合して一致した画像だけのZIPを `output_path` に作成
pub fn repackage_to_file<F>(
    identifiers: &[String],
    patterns: &PatternSet,
    source_path: &Path,
    output_path: &Path,
    on_progress: F,
) -> Result<MatchReport>
where
    F: FnMut(MatchProgress<'_>),
{
    let mut source = SourceZip::open(source_path)?;
    repackage_source(identifiers, patterns, &mut source, output_path, on_progress)
}

/// 開いた入力ZIPに対して照合・出力する
pub fn repackage_source<F>(
    identifiers: &[String],
    patterns: &PatternSet,
    source: &mut SourceZip,
    output_path: &Path,
    on_progress: F,
) -> Result<MatchReport>
where
    F: FnMut(MatchProgress<'_>),
{
    check_output_path(&source.path, output_path)?;

    // 画像がなければここで設定エラーになり、出力先には何も作らない
    let index = source.listing.image_index()?;

    let dir = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| CoreError::output(&format!("{}を作成できません", dir.display()), e))?;

    let temp = tempfile::Builder::new()
        .prefix(".ean-match-")
        .suffix(".zip.part")
        .tempfile_in(dir)
        .map_err(|e| CoreError::output("一時ファイルを作成できません", e))?;
    log::debug!("一時ファイル: {}", temp.path().display());

    let (report, temp) = match_with_index(
        identifiers,
        patterns,
        &index,
        &mut source.archive,
        temp,
        on_progress,
    )?;

    temp.as_file()
        .sync_all()
        .map_err(|e| CoreError::output("出力ZIPの書き込みに失敗", e))?;
    // 失敗時は一時ファイルが削除される
    temp.persist(output_path)
        .map_err(|e| CoreError::output(&output_path.display().to_string(), e.error))?;

    log::info!("出力ZIP: {}", output_path.display());
    Ok(report)
}

fn check_output_path(source_path: &Path, output_path: &Path) -> Result<()> {
    if same_file(source_path, output_path) {
        return Err(EanMatchError::Config(format!(
            "出力先が入力ZIPと同じです: {}",
            output_path.display()
        )));
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
