use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrCompareError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("アーカイブ展開エラー: {0}")]
    Archive(String),

    #[error("ワークブック読み込みエラー: {0}")]
    Workbook(String),

    #[error("OCR実行エラー: {0}")]
    Recognition(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OcrCompareError>;
