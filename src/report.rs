//! 比較レポートとExcel出力
//!
//! レポートはフロントエンドへ渡せるようserde対応。Excel出力は
//! 不一致行のステータスセルだけを強調表示する。

use rust_xlsxwriter::{Color, Format, Workbook};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{OcrCompareError, Result};

pub const MATCH_LABEL: &str = "Match";
pub const MISMATCH_LABEL: &str = "Mismatch";

const HEADERS: [&str; 4] = ["Image Name", "Text 1", "Text 2", "Match Status"];

/// ペア1件の比較結果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPair {
    pub image_name: String,
    pub text_1: String,
    pub text_2: String,
    pub matched: bool,
}

impl ComparisonPair {
    pub fn status_label(&self) -> &'static str {
        if self.matched {
            MATCH_LABEL
        } else {
            MISMATCH_LABEL
        }
    }
}

/// 比較1回分のレポート
///
/// `pairs` の順序は突き合わせ順のまま保持される。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub folder_name: String,
    pub pairs: Vec<ComparisonPair>,
}

impl ComparisonReport {
    pub fn new(folder_name: impl Into<String>, pairs: Vec<ComparisonPair>) -> Self {
        Self {
            folder_name: folder_name.into(),
            pairs,
        }
    }

    pub fn matched_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.matched).count()
    }

    pub fn mismatched_count(&self) -> usize {
        self.pairs.len() - self.matched_count()
    }
}

/// レポートをExcelワークブックのバイト列にする
///
/// 単体のワークブックとして再オープンできる形式で返す。
pub fn to_excel_buffer(report: &ComparisonReport) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("OCR Comparison")
        .map_err(|e| OcrCompareError::ExcelGeneration(format!("シート名設定エラー: {}", e)))?;

    let header_format = Format::new().set_bold();

    // 不一致の強調（薄い赤地に濃い赤文字）
    let mismatch_format = Format::new()
        .set_background_color(Color::RGB(0xFFC7CE))
        .set_font_color(Color::RGB(0x9C0006));

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| OcrCompareError::ExcelGeneration(format!("ヘッダ書き込みエラー: {}", e)))?;
    }

    for (index, pair) in report.pairs.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet
            .write_string(row, 0, &pair.image_name)
            .and_then(|ws| ws.write_string(row, 1, &pair.text_1))
            .and_then(|ws| ws.write_string(row, 2, &pair.text_2))
            .map_err(|e| OcrCompareError::ExcelGeneration(format!("行書き込みエラー: {}", e)))?;

        if pair.matched {
            worksheet
                .write_string(row, 3, pair.status_label())
                .map_err(|e| {
                    OcrCompareError::ExcelGeneration(format!("行書き込みエラー: {}", e))
                })?;
        } else {
            worksheet
                .write_string_with_format(row, 3, pair.status_label(), &mismatch_format)
                .map_err(|e| {
                    OcrCompareError::ExcelGeneration(format!("行書き込みエラー: {}", e))
                })?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| OcrCompareError::ExcelGeneration(format!("Excel保存エラー: {}", e)))
}

/// レポートをExcelファイルとして書き出す
pub fn write_excel(report: &ComparisonReport, path: &Path) -> Result<()> {
    let buffer = to_excel_buffer(report)?;
    std::fs::write(path, buffer)?;
    Ok(())
}
