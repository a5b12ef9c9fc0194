//! EAN Match Common Library
//!
//! EAN抽出・照合パターン生成・ZIP照合/再梱包のコア処理。
//! UIやファイル入出力を持たず、CLIなど各フロントエンドから共有される。

pub mod archive;
pub mod error;
pub mod identifier;
pub mod pattern;

pub use archive::{
    base_name, is_image_path, match_and_repackage, match_with_index, ArchiveListing, ImageEntry,
    ImageIndex, MatchProgress, MatchRecord, MatchReport, OutputArchive,
};
pub use error::{Error, Result};
pub use identifier::{extract_identifiers, normalize_identifier, CellValue};
pub use pattern::{build_patterns, MatchOptions, PatternSet};
