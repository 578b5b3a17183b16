//! アンカー画像の抽出
//!
//! 描画レイヤの埋め込み画像のうち、参考画像列にアンカーされた
//! ものだけを取り出し、同じ行の名前列から決めたファイル名で
//! 保存する。1件ごとの失敗は警告として収集し、処理は続行する。

use std::fmt;
use std::path::{Path, PathBuf};

use crate::names::normalize_identifier;
use crate::workbook::SheetReader;

/// 抽出中に発生した1件単位の警告
#[derive(Debug, Clone)]
pub enum ExtractWarning {
    /// アンカー位置を解決できない画像
    MissingAnchor,
    /// アンカー行に名前がない
    MissingName { row: u32 },
    /// 名前が画像拡張子で終わらない
    NotAnImageName { row: u32, name: String },
    /// 画像バイト列をデコード・保存できない
    SaveFailed { row: u32, name: String, reason: String },
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractWarning::MissingAnchor => {
                write!(f, "アンカー位置を特定できない画像をスキップ")
            }
            ExtractWarning::MissingName { row } => {
                write!(f, "行{}: 画像名が見つかりません", row + 1)
            }
            ExtractWarning::NotAnImageName { row, name } => {
                write!(f, "行{}: 画像名ではないためスキップ: {}", row + 1, name)
            }
            ExtractWarning::SaveFailed { row, name, reason } => {
                write!(f, "行{}: {} の保存に失敗: {}", row + 1, name, reason)
            }
        }
    }
}

/// 抽出結果: 保存済み (名前, パス) の列と警告列
#[derive(Debug, Default)]
pub struct ExtractOutcome {
    pub saved: Vec<(String, PathBuf)>,
    pub warnings: Vec<ExtractWarning>,
}

/// 1ワークブックからアンカー画像を抽出して保存する
///
/// 保存順は描画レイヤ上の定義順。picture_column 以外に
/// アンカーされた画像は対象外（警告も出さない）。
pub fn extract_images(
    sheet: &dyn SheetReader,
    picture_column: u32,
    name_column: u32,
    image_extension: &str,
    output_dir: &Path,
) -> ExtractOutcome {
    let mut outcome = ExtractOutcome::default();

    for image in sheet.anchored_images() {
        let Some(anchor) = image.anchor else {
            outcome.warnings.push(ExtractWarning::MissingAnchor);
            continue;
        };

        if anchor.col != picture_column {
            continue;
        }

        let name = sheet
            .cell_value(anchor.row, name_column)
            .map(|raw| normalize_identifier(&raw))
            .unwrap_or_default();
        if name.is_empty() {
            outcome
                .warnings
                .push(ExtractWarning::MissingName { row: anchor.row });
            continue;
        }

        if !name.ends_with(image_extension) {
            outcome.warnings.push(ExtractWarning::NotAnImageName {
                row: anchor.row,
                name,
            });
            continue;
        }

        let save_path = output_dir.join(&name);
        match save_image(&image.data, &save_path) {
            Ok(()) => outcome.saved.push((name, save_path)),
            Err(reason) => outcome.warnings.push(ExtractWarning::SaveFailed {
                row: anchor.row,
                name,
                reason,
            }),
        }
    }

    outcome
}

/// バイト列をラスタ画像としてデコードし、パス先へ保存する
fn save_image(data: &[u8], path: &Path) -> std::result::Result<(), String> {
    let image = image::load_from_memory(data).map_err(|e| e.to_string())?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    image.save(path).map_err(|e| e.to_string())
}
