use thiserror::Error;

#[derive(Error, Debug)]
pub enum EanMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("Excel読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("列が見つかりません: {0}")]
    ColumnNotFound(String),


    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] ean_match_common::Error),
}

pub type Result<T> = std::result::Result<T, EanMatchError>;
