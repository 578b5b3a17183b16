//! ワークブック読み取り
//!
//! セル値と描画レイヤ（埋め込み画像）へのアクセスを1つの
//! capabilityとしてまとめる。パイプラインはトレイト経由でのみ
//! ワークブックに触れるため、テストではフェイク実装を注入できる。

mod drawing;

pub use drawing::{AnchoredImage, CellAnchor};

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use zip::ZipArchive;

use crate::error::{OcrCompareError, Result};

/// スプレッドシート読み取りcapability
pub trait SheetReader {
    /// 描画レイヤの埋め込み画像（描画レイヤ上の定義順）
    fn anchored_images(&self) -> &[AnchoredImage];

    /// セル値（0始まりの行・列）。空セルは None
    fn cell_value(&self, row: u32, col: u32) -> Option<String>;

    /// データ領域の行数（最終行 + 1）
    fn row_count(&self) -> u32;
}

/// XLSXファイルの先頭シートを読むSheetReader実装
///
/// セル値はcalamine、描画レイヤはコンテナZIPを直接読む。
/// どちらもオープン時に読み切るため、以後の操作は失敗しない。
pub struct XlsxWorkbook {
    cells: Range<Data>,
    images: Vec<AnchoredImage>,
}

impl XlsxWorkbook {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(OcrCompareError::FileNotFound(path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| OcrCompareError::Workbook(format!("{}: {}", path.display(), e)))?;
        let cells = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                OcrCompareError::Workbook(format!("シートがありません: {}", path.display()))
            })?
            .map_err(|e| OcrCompareError::Workbook(format!("{}: {}", path.display(), e)))?;

        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| OcrCompareError::Workbook(format!("{}: {}", path.display(), e)))?;
        let images = drawing::read_anchored_images(&mut archive, 0)?;

        Ok(Self { cells, images })
    }
}

impl SheetReader for XlsxWorkbook {
    fn anchored_images(&self) -> &[AnchoredImage] {
        &self.images
    }

    fn cell_value(&self, row: u32, col: u32) -> Option<String> {
        match self.cells.get_value((row, col)) {
            None | Some(Data::Empty) | Some(Data::Error(_)) => None,
            Some(value) => Some(value.to_string()),
        }
    }

    fn row_count(&self) -> u32 {
        self.cells.end().map_or(0, |(row, _)| row + 1)
    }
}
