//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 照合パターン未選択・画像なし等、実行前に検出できる設定の問題
    #[error("Config error: {0}")]
    Config(String),

    /// 入力アーカイブが開けない・エントリが読めない
    #[error("Input read error: {0}")]
    InputRead(String),

    /// 出力アーカイブの作成・書き込み・確定に失敗
    #[error("Output write error: {0}")]
    OutputWrite(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 入力側のZIPエラーを変換
    pub fn input(context: &str, err: impl std::fmt::Display) -> Self {
        Error::InputRead(format!("{}: {}", context, err))
    }

    /// 出力側のZIPエラーを変換
    pub fn output(context: &str, err: impl std::fmt::Display) -> Self {
        Error::OutputWrite(format!("{}: {}", context, err))
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("照合パターンが選択されていません".to_string());
        let display = format!("{}", error);
        assert_eq!(display, "Config error: 照合パターンが選択されていません");
    }

    #[test]
    fn test_error_input_helper() {
        let error = Error::input("ZIPを開けません", "invalid Zip archive");
        assert!(matches!(error, Error::InputRead(_)));
        assert!(format!("{}", error).contains("invalid Zip archive"));
    }

    #[test]
    fn test_error_output_helper() {
        let error = Error::output("ZIPの確定に失敗", "disk full");
        assert!(matches!(error, Error::OutputWrite(_)));
        assert_eq!(format!("{}", error), "Output write error: ZIPの確定に失敗: disk full");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Config("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Config"));
        assert!(debug.contains("テスト"));
    }
}
