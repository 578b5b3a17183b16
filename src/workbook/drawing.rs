//! 描画レイヤの解析
//!
//! XLSXの埋め込み画像は以下の3箇所に分かれて格納される:
//! - xl/drawings/drawingN.xml: アンカー座標とリレーションID
//! - xl/drawings/_rels/drawingN.xml.rels: リレーションID → 画像パス
//! - xl/media/: 画像の実体

use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

use crate::error::{OcrCompareError, Result};

/// 画像がアンカーされたセル位置（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAnchor {
    pub row: u32,
    pub col: u32,
}

/// 描画レイヤから取り出した埋め込み画像1件
///
/// アンカーを解決できなかった画像は `anchor: None` のまま保持し、
/// 呼び出し側がスキップ判断する。
#[derive(Debug, Clone)]
pub struct AnchoredImage {
    pub anchor: Option<CellAnchor>,
    pub data: Vec<u8>,
}

/// 先頭シートの描画レイヤを読み取る
///
/// 描画ファイルが存在しないワークブックは画像なしとして空を返す。
pub fn read_anchored_images<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    sheet_index: usize,
) -> Result<Vec<AnchoredImage>> {
    let drawing_num = sheet_index + 1;
    let drawing_path = format!("xl/drawings/drawing{}.xml", drawing_num);

    let Ok(drawing_xml) = read_zip_entry(archive, &drawing_path) else {
        return Ok(Vec::new());
    };

    let picture_refs = parse_drawing_pictures(&drawing_xml)?;
    if picture_refs.is_empty() {
        return Ok(Vec::new());
    }

    let rels_path = format!("xl/drawings/_rels/drawing{}.xml.rels", drawing_num);
    let rels_xml = read_zip_entry(archive, &rels_path)
        .map_err(|e| OcrCompareError::Workbook(format!("リレーション読み込み失敗: {}", e)))?;
    let relationships = parse_relationships(&rels_xml)?;

    let mut images = Vec::new();
    for picture in picture_refs {
        let Some(target) = relationships.get(&picture.rel_id) else {
            continue;
        };
        let data = read_zip_entry_bytes(archive, &media_path(target))?;
        images.push(AnchoredImage {
            anchor: picture.anchor,
            data,
        });
    }

    Ok(images)
}

struct PictureRef {
    rel_id: String,
    anchor: Option<CellAnchor>,
}

/// drawingN.xml から <xdr:pic> のリレーションIDとアンカーを抜き出す
///
/// oneCellAnchor / twoCellAnchor は <xdr:from> の col/row を採用。
/// absoluteAnchor はセル座標を持たないため anchor は None になる。
fn parse_drawing_pictures(xml: &str) -> Result<Vec<PictureRef>> {
    let mut pictures = Vec::new();
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut in_from = false;
    let mut in_from_col = false;
    let mut in_from_row = false;

    let mut current_anchor: Option<(Option<u32>, Option<u32>)> = None;
    let mut current_rel_id: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => match local_name(e.name().as_ref()) {
                b"oneCellAnchor" | b"twoCellAnchor" | b"absoluteAnchor" => {
                    current_anchor = Some((None, None));
                    current_rel_id = None;
                }
                b"from" => in_from = true,
                b"col" if in_from => in_from_col = true,
                b"row" if in_from => in_from_row = true,
                b"blip" => {
                    for attr in e.attributes().filter_map(std::result::Result::ok) {
                        let key = attr.key;
                        if key.as_ref() == b"r:embed" || key.as_ref() == b"embed" {
                            if let Ok(value) = attr.decode_and_unescape_value(&reader) {
                                current_rel_id = Some(value.to_string());
                            }
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Ok(text) = e.unescape() {
                    let value = text.trim().parse::<u32>().ok();
                    if let Some((col, row)) = current_anchor.as_mut() {
                        if in_from_col {
                            *col = value;
                        } else if in_from_row {
                            *row = value;
                        }
                    }
                }
            }
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"oneCellAnchor" | b"twoCellAnchor" | b"absoluteAnchor" => {
                    if let Some(rel_id) = current_rel_id.take() {
                        let anchor = current_anchor.and_then(|(col, row)| {
                            Some(CellAnchor {
                                row: row?,
                                col: col?,
                            })
                        });
                        pictures.push(PictureRef { rel_id, anchor });
                    }
                    current_anchor = None;
                }
                b"from" => in_from = false,
                b"col" if in_from => in_from_col = false,
                b"row" if in_from => in_from_row = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(OcrCompareError::Workbook(format!(
                    "描画XMLの解析に失敗: {}",
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(pictures)
}

/// .rels からリレーションID → ターゲットパスの対応表を作る
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut relationships = HashMap::new();
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e) | Event::Start(e)) => {
                if e.name().as_ref() == b"Relationship" {
                    let mut id = None;
                    let mut target = None;

                    for attr in e.attributes().filter_map(std::result::Result::ok) {
                        match attr.key.as_ref() {
                            b"Id" => {
                                if let Ok(value) = attr.decode_and_unescape_value(&reader) {
                                    id = Some(value.to_string());
                                }
                            }
                            b"Target" => {
                                if let Ok(value) = attr.decode_and_unescape_value(&reader) {
                                    target = Some(value.to_string());
                                }
                            }
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target)) = (id, target) {
                        relationships.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(OcrCompareError::Workbook(format!(
                    "リレーションXMLの解析に失敗: {}",
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// 相対パス "../media/image1.png" を "xl/media/image1.png" に解決
fn media_path(target: &str) -> String {
    target
        .strip_prefix("../")
        .map_or_else(|| format!("xl/{}", target), |suffix| format!("xl/{}", suffix))
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

fn read_zip_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let bytes = read_zip_entry_bytes(archive, path)?;
    String::from_utf8(bytes)
        .map_err(|e| OcrCompareError::Workbook(format!("{} がUTF-8でない: {}", path, e)))
}

fn read_zip_entry_bytes<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Vec<u8>> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| OcrCompareError::Workbook(format!("{} が開けません: {}", path, e)))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}
