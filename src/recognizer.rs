//! テキスト認識エンジン連携
//!
//! OCRエンジンは外部コマンドとして呼び出す。パイプライン側は
//! TextRecognizerトレイト経由でのみエンジンに触れるため、
//! テストでは決定的なフェイクを注入できる。

use std::path::Path;
use std::process::Command;

use crate::error::{OcrCompareError, Result};

/// テキスト認識capability
pub trait TextRecognizer {
    /// 画像1枚を認識してテキストを返す
    fn recognize(&self, image: &Path, language: &str) -> Result<String>;
}

/// Tesseract CLI連携
///
/// `tesseract <image> stdout -l <lang>` を実行し、標準出力の行を
/// 空白1つで連結したものを認識テキストとする。
pub struct TesseractCli {
    command: String,
}

impl TesseractCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &Path, language: &str) -> Result<String> {
        let output = Command::new(&self.command)
            .arg(image)
            .arg("stdout")
            .args(["-l", language])
            .output()
            .map_err(|e| {
                OcrCompareError::Recognition(format!("{} 実行エラー: {}", self.command, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrCompareError::Recognition(format!(
                "{} failed (code {:?}): {}",
                self.command,
                output.status.code(),
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(join_lines(&text))
    }
}

/// 行区切りの出力を空白1つで連結する
fn join_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_lines() {
        assert_eq!(join_lines("hello\nworld\n"), "hello world");
        assert_eq!(join_lines("  hello  \n\n  world  "), "hello world");
        assert_eq!(join_lines(""), "");
    }

    #[test]
    fn test_missing_command_is_recognition_error() {
        let recognizer = TesseractCli::new("no-such-ocr-command-12345");
        let result = recognizer.recognize(Path::new("x.png"), "eng");
        assert!(matches!(
            result,
            Err(OcrCompareError::Recognition(_))
        ));
    }
}
