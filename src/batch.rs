//! バッチ解決
//!
//! 比較の片側（AまたはB）に属するワークブック群から、
//! 画像の抽出と名前シーケンスの連結を行い、BatchResultを作る。

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::extract::{self, ExtractWarning};
use crate::names;
use crate::workbook::XlsxWorkbook;

/// 片側バッチの解決結果
///
/// `ordered_identifiers` はファイル順・行順を保った連結。
/// 保存画像の探索は比較時に1件ずつ行う（`locate`）ため、
/// ファイルが無い場合の失敗はペア単位に留まる。
#[derive(Debug)]
pub struct BatchResult {
    pub ordered_identifiers: Vec<String>,
    pub image_root: PathBuf,
}

impl BatchResult {
    /// 保存済み画像を名前で探す（再帰・大文字小文字は無視）
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        for entry in WalkDir::new(&self.image_root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if file_name.eq_ignore_ascii_case(name) {
                return Some(entry.path().to_path_buf());
            }
        }
        None
    }
}

/// バッチ1側分のワークブック群を解決する
///
/// ワークブックはパス順に処理する（探索順を決定的にするため）。
/// 個々のワークブックが開けない場合もバッチ全体は止めない。
pub fn resolve_batch(
    spreadsheets: &[PathBuf],
    output_dir: &Path,
    config: &Config,
) -> (BatchResult, Vec<ExtractWarning>) {
    let mut ordered_identifiers = Vec::new();
    let mut warnings = Vec::new();

    let mut files: Vec<&PathBuf> = spreadsheets.iter().collect();
    files.sort();

    for path in files {
        let workbook = match XlsxWorkbook::open(path) {
            Ok(workbook) => workbook,
            Err(e) => {
                eprintln!("⚠️  {} をスキップ: {}", path.display(), e);
                continue;
            }
        };

        let outcome = extract::extract_images(
            &workbook,
            config.picture_column,
            config.name_column,
            &config.image_extension,
            output_dir,
        );
        warnings.extend(outcome.warnings);

        ordered_identifiers.extend(names::read_identifiers(
            &workbook,
            config.name_column,
            config.header_rows,
            &config.image_extension,
        ));
    }

    (
        BatchResult {
            ordered_identifiers,
            image_root: output_dir.to_path_buf(),
        },
        warnings,
    )
}
