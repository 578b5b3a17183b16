//! アーカイブ受け入れ
//!
//! アップロードされたZIPを作業ディレクトリへ展開し、中の
//! ワークブックを探索する。バッチのラベルはワークブックの
//! メタデータセル（C5）から決める。

use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{OcrCompareError, Result};
use crate::workbook::{SheetReader, XlsxWorkbook};

/// ラベルセルの位置（C5、0始まり）
const LABEL_CELL: (u32, u32) = (4, 2);

/// ラベルが決められない場合の既定値
pub const DEFAULT_FOLDER_NAME: &str = "default_folder";

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// ZIPアーカイブを展開する
///
/// アーカイブ自体が開けない場合だけが実行全体の失敗になる。
pub fn extract_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    if !archive_path.exists() {
        return Err(OcrCompareError::FileNotFound(
            archive_path.display().to_string(),
        ));
    }

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| OcrCompareError::Archive(format!("{}: {}", archive_path.display(), e)))?;

    std::fs::create_dir_all(dest)?;
    archive
        .extract(dest)
        .map_err(|e| OcrCompareError::Archive(format!("{}: {}", archive_path.display(), e)))?;

    Ok(())
}

/// 展開先からワークブックを再帰探索する（パス順）
pub fn find_spreadsheets(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|path| {
            path.extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy().to_lowercase();
                    SPREADSHEET_EXTENSIONS.iter().any(|&e| e == ext)
                })
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    files
}

/// バッチのグルーピング名をメタデータセルから読む
///
/// セルが読めない・空の場合は既定名に落とす（実行は止めない）。
pub fn batch_label(spreadsheet: &Path) -> String {
    let label = XlsxWorkbook::open(spreadsheet)
        .ok()
        .and_then(|workbook| workbook.cell_value(LABEL_CELL.0, LABEL_CELL.1))
        .map(|value| sanitize_label(&value))
        .unwrap_or_default();

    if label.is_empty() {
        DEFAULT_FOLDER_NAME.to_string()
    } else {
        label
    }
}

/// ラベルをパス・表示に安全な形へ整える
fn sanitize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| match ch {
            '\\' | '/' | ' ' | '\t' => '_',
            _ => ch,
        })
        .collect()
}
