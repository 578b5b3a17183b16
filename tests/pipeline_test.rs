//! パイプラインの統合テスト
//!
//! rust_xlsxwriterで画像を埋め込んだ実ワークブックを組み立て、
//! 抽出 → 名前読み取り → バッチ解決 → 比較 → 出力の一連を
//! フェイクOCRエンジンで検証する。

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use ocr_compare_rust::batch;
use ocr_compare_rust::compare::compare_batches;
use ocr_compare_rust::config::Config;
use ocr_compare_rust::error::Result;
use ocr_compare_rust::extract;
use ocr_compare_rust::names;
use ocr_compare_rust::pipeline;
use ocr_compare_rust::recognizer::TextRecognizer;
use ocr_compare_rust::report::{to_excel_buffer, MISMATCH_LABEL};
use ocr_compare_rust::workbook::{SheetReader, XlsxWorkbook};
use tempfile::TempDir;

/// 小さなPNGのバイト列を作る
fn png_bytes(shade: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([shade, shade, shade]));
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// 画像入りのワークブックを組み立てる
///
/// `rows` は (行, 名前セルの生の値, 画像を置く列)。名前はA列、
/// メタデータラベルはC5に入れる。
fn build_workbook(path: &Path, label: &str, rows: &[(u32, &str, u16)]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.write_string(4, 2, label).unwrap();

    for (index, &(row, name, image_col)) in rows.iter().enumerate() {
        if !name.is_empty() {
            worksheet.write_string(row, 0, name).unwrap();
        }
        let data = png_bytes(50 + index as u8 * 20);
        let img = rust_xlsxwriter::Image::new_from_buffer(&data).unwrap();
        worksheet.insert_image(row, image_col, &img).unwrap();
    }

    workbook.save(path).unwrap();
}

/// ワークブック1つをZIPアーカイブに詰める
fn zip_workbook(workbook_path: &Path, zip_path: &Path) {
    let file = std::fs::File::create(zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer
        .start_file("book.xlsx", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer
        .write_all(&std::fs::read(workbook_path).unwrap())
        .unwrap();
    writer.finish().unwrap();
}

/// (親ディレクトリ名, ファイル名) でテキストを引くフェイク
struct FakeRecognizer {
    texts: HashMap<(String, String), String>,
}

impl FakeRecognizer {
    fn new(entries: &[(&str, &str, &str)]) -> Self {
        let texts = entries
            .iter()
            .map(|&(side, file, text)| ((side.to_string(), file.to_string()), text.to_string()))
            .collect();
        Self { texts }
    }
}

impl TextRecognizer for FakeRecognizer {
    fn recognize(&self, image: &Path, _language: &str) -> Result<String> {
        let file = image.file_name().unwrap().to_string_lossy().to_string();
        let side = image
            .parent()
            .and_then(|p| p.file_name())
            .unwrap()
            .to_string_lossy()
            .to_string();
        Ok(self.texts.get(&(side, file)).cloned().unwrap_or_default())
    }
}

/// 抽出: 参考画像列のアンカーだけが対象になり、名前は正規化される
#[test]
fn test_extract_from_real_workbook() {
    let dir = TempDir::new().unwrap();
    let book = dir.path().join("book.xlsx");
    build_workbook(
        &book,
        "Sample Folder",
        &[
            (8, "#a.png", 2),
            (9, "b b.png", 2),
            (10, "notes.txt", 2),
            // E列にアンカーされた画像は無視される
            (11, "e.png", 4),
        ],
    );

    let workbook = XlsxWorkbook::open(&book).unwrap();
    assert_eq!(workbook.anchored_images().len(), 4);

    let out = dir.path().join("out");
    let outcome = extract::extract_images(&workbook, 2, 0, ".png", &out);

    let saved_names: Vec<&str> = outcome.saved.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(saved_names, vec!["a.png", "b_b.png"]);
    assert!(out.join("a.png").exists());
    assert!(out.join("b_b.png").exists());
    assert!(!out.join("notes.txt").exists());
    assert!(!out.join("e.png").exists());

    // notes.txt は拡張子ゲートの警告になる
    assert_eq!(outcome.warnings.len(), 1);
}

/// 名前シーケンス: ヘッダ領域を飛ばし、拡張子ゲートを通す
#[test]
fn test_read_identifiers_from_real_workbook() {
    let dir = TempDir::new().unwrap();
    let book = dir.path().join("book.xlsx");
    build_workbook(
        &book,
        "Sample Folder",
        &[(8, "#a.png", 2), (9, "b b.png", 2), (10, "notes.txt", 2)],
    );

    let workbook = XlsxWorkbook::open(&book).unwrap();
    let identifiers = names::read_identifiers(&workbook, 0, 8, ".png");
    assert_eq!(identifiers, vec!["a.png", "b_b.png"]);
}

/// バッチ解決 + 比較: §の基本シナリオ
#[test]
fn test_resolve_and_compare_scenario() {
    let dir = TempDir::new().unwrap();
    let book_a = dir.path().join("a.xlsx");
    let book_b = dir.path().join("b.xlsx");
    build_workbook(&book_a, "Sample Folder", &[(8, "a.png", 2), (9, "b.png", 2)]);
    build_workbook(&book_b, "Sample Folder", &[(8, "a.png", 2), (9, "b.png", 2)]);

    let config = Config::default();
    let dir_a = dir.path().join("1");
    let dir_b = dir.path().join("2");
    let (batch_a, warn_a) = batch::resolve_batch(&[book_a], &dir_a, &config);
    let (batch_b, warn_b) = batch::resolve_batch(&[book_b], &dir_b, &config);

    assert!(warn_a.is_empty());
    assert!(warn_b.is_empty());
    assert_eq!(batch_a.ordered_identifiers, vec!["a.png", "b.png"]);
    assert_eq!(batch_b.ordered_identifiers, vec!["a.png", "b.png"]);

    let recognizer = FakeRecognizer::new(&[
        ("1", "a.png", "123"),
        ("1", "b.png", "456"),
        ("2", "a.png", "123"),
        ("2", "b.png", "999"),
    ]);

    let (pairs, warnings) = compare_batches(&batch_a, &batch_b, &recognizer, "eng");

    assert!(warnings.is_empty());
    assert_eq!(pairs.len(), 2);
    assert!(pairs[0].matched);
    assert_eq!(pairs[0].text_1, "123");
    assert!(!pairs[1].matched);
    assert_eq!(pairs[1].text_1, "456");
    assert_eq!(pairs[1].text_2, "999");

    // エクスポートはデータ2行、2行目のステータスが不一致ラベル
    let report = ocr_compare_rust::report::ComparisonReport::new("scenario", pairs);
    let buffer = to_excel_buffer(&report).unwrap();

    use calamine::Reader;
    let mut reopened = calamine::Xlsx::new(Cursor::new(buffer)).unwrap();
    let range = reopened.worksheet_range("OCR Comparison").unwrap();
    assert_eq!(range.height(), 3);
    assert_eq!(
        range.get_value((2, 3)),
        Some(&calamine::Data::String(MISMATCH_LABEL.to_string()))
    );
}

/// ZIP受け入れからレポートまでの一連（§6の呼び出し契約）
#[test]
fn test_run_comparison_end_to_end() {
    let dir = TempDir::new().unwrap();
    let book_a = dir.path().join("a.xlsx");
    let book_b = dir.path().join("b.xlsx");
    build_workbook(&book_a, "Site A", &[(8, "a.png", 2), (9, "b.png", 2)]);
    build_workbook(&book_b, "Site B", &[(8, "a.png", 2), (9, "b.png", 2)]);

    let zip_a = dir.path().join("a.zip");
    let zip_b = dir.path().join("b.zip");
    zip_workbook(&book_a, &zip_a);
    zip_workbook(&book_b, &zip_b);

    let config = Config {
        workspace_root: Some(dir.path().join("work")),
        ..Config::default()
    };

    let recognizer = FakeRecognizer::new(&[
        ("1", "a.png", "123"),
        ("1", "b.png", "456"),
        ("2", "a.png", "123"),
        ("2", "b.png", "999"),
    ]);

    let outcome =
        pipeline::run_comparison(&zip_a, &zip_b, "eng", &recognizer, &config, false).unwrap();

    // ラベルはバッチA側のC5から（空白は_に）
    assert_eq!(outcome.report.folder_name, "Site_A");
    assert_eq!(outcome.report.pairs.len(), 2);
    assert_eq!(outcome.report.matched_count(), 1);
    assert_eq!(outcome.report.mismatched_count(), 1);
    assert!(outcome.workspace_path.is_none());

    // 作業ディレクトリは実行ごとに作られ、終了時に消える
    let leftover: Vec<PathBuf> = std::fs::read_dir(dir.path().join("work"))
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default();
    assert!(leftover.is_empty(), "作業ディレクトリが残っている: {:?}", leftover);
}

/// アーカイブにワークブックが無い場合: 空のレポートが正常に返る
#[test]
fn test_run_comparison_with_empty_archives() {
    let dir = TempDir::new().unwrap();

    let make_empty_zip = |path: &Path| {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("readme.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"nothing here").unwrap();
        writer.finish().unwrap();
    };

    let zip_a = dir.path().join("a.zip");
    let zip_b = dir.path().join("b.zip");
    make_empty_zip(&zip_a);
    make_empty_zip(&zip_b);

    let config = Config {
        workspace_root: Some(dir.path().join("work")),
        ..Config::default()
    };

    let recognizer = FakeRecognizer::new(&[]);
    let outcome =
        pipeline::run_comparison(&zip_a, &zip_b, "eng", &recognizer, &config, false).unwrap();

    assert_eq!(outcome.report.folder_name, "default_folder");
    assert!(outcome.report.pairs.is_empty());
}
