use crate::error::{OcrCompareError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 参考画像が配置される列（0始まり、既定はC列）
    pub picture_column: u32,
    /// 画像名が記載される列（0始まり、既定はA列）
    pub name_column: u32,
    /// データ領域の前にあるヘッダ行数
    pub header_rows: u32,
    /// 保存対象とする画像名の拡張子
    pub image_extension: String,
    /// OCRエンジンのコマンド名
    pub ocr_command: String,
    /// 既定の言語コード
    pub default_language: String,
    /// 作業ディレクトリのルート（省略時はシステムの一時領域）
    pub workspace_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            picture_column: 2,
            name_column: 0,
            header_rows: 8,
            image_extension: ".png".into(),
            ocr_command: "tesseract".into(),
            default_language: "eng".into(),
            workspace_root: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OcrCompareError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ocr-compare").join("config.json"))
    }

    /// 作業ディレクトリのルートを解決
    pub fn workspace_root(&self) -> PathBuf {
        self.workspace_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("ocr-compare"))
    }

    pub fn set_ocr_command(&mut self, command: String) -> Result<()> {
        self.ocr_command = command;
        self.save()
    }
}
