//! 画像名の正規化とシーケンス読み取り
//!
//! 抽出側と一覧側が同じ正規化を通ることが比較の前提になるため、
//! 正規化はこのモジュールの1関数に集約する。

use crate::workbook::SheetReader;

/// セル値を画像名に正規化する
///
/// 前後の空白を落とし、予約マーカー `#` を除去し、名前内部の
/// 空白・タブの連続を1つの `_` に置き換える。
pub fn normalize_identifier(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut normalized = String::with_capacity(trimmed.len());
    let mut pending_separator = false;

    for ch in trimmed.chars() {
        match ch {
            '#' => {}
            ' ' | '\t' => pending_separator = !normalized.is_empty(),
            _ => {
                if pending_separator {
                    normalized.push('_');
                    pending_separator = false;
                }
                normalized.push(ch);
            }
        }
    }

    normalized
}

/// ヘッダ領域の後から画像名列を読み、正規化済みの名前列を返す
///
/// 期待する拡張子で終わらない名前はシーケンスから除外される
/// （位置を詰める。プレースホルダは置かない）。
pub fn read_identifiers(
    sheet: &dyn SheetReader,
    name_column: u32,
    header_rows: u32,
    image_extension: &str,
) -> Vec<String> {
    let mut identifiers = Vec::new();

    for row in header_rows..sheet.row_count() {
        let Some(raw) = sheet.cell_value(row, name_column) else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }

        let name = normalize_identifier(&raw);
        if name.ends_with(image_extension) {
            identifiers.push(name);
        }
    }

    identifiers
}
