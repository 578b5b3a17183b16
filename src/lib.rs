//! Excel埋め込み画像OCR比較ツール
//!
//! 2バッチのワークブックからアンカー画像を取り出し、OCR結果を
//! 突き合わせて一致/不一致をレポートする。

pub mod archive;
pub mod batch;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod extract;
pub mod languages;
pub mod names;
pub mod pipeline;
pub mod recognizer;
pub mod report;
pub mod workbook;
pub mod workspace;

pub use batch::BatchResult;
pub use config::Config;
pub use error::{OcrCompareError, Result};
pub use recognizer::{TesseractCli, TextRecognizer};
pub use report::{ComparisonPair, ComparisonReport};
