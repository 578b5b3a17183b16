//! バッチ間比較
//!
//! 2つのバッチの名前シーケンスを位置で突き合わせ、各ペアの
//! 画像をOCRしてテキストを比較する。突き合わせは名前の一致では
//! なく位置（i番目どうし）で行う。

use std::fmt;

use indicatif::ProgressBar;

use crate::batch::BatchResult;
use crate::recognizer::TextRecognizer;
use crate::report::ComparisonPair;

/// 認識に失敗した側へ入れる代替テキストの接頭辞
pub const OCR_FAILURE_PREFIX: &str = "OCR Failed";

/// ペア単位の警告（ペアはレポートに含まれない）
#[derive(Debug, Clone)]
pub enum PairWarning {
    /// どちらかの側で保存画像が見つからない
    Unresolved { name_a: String, name_b: String },
}

impl fmt::Display for PairWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairWarning::Unresolved { name_a, name_b } => {
                write!(f, "画像が見つからないペアをスキップ: {} / {}", name_a, name_b)
            }
        }
    }
}

/// 2バッチを位置で突き合わせて比較する
///
/// 短い側の長さで打ち切り、余った名前は報告しない。出力順は
/// 突き合わせ順（バッチA側の元の順序）で、実行順に依存しない。
pub fn compare_batches(
    batch_a: &BatchResult,
    batch_b: &BatchResult,
    recognizer: &dyn TextRecognizer,
    language: &str,
) -> (Vec<ComparisonPair>, Vec<PairWarning>) {
    let pair_count = batch_a
        .ordered_identifiers
        .len()
        .min(batch_b.ordered_identifiers.len());

    let mut pairs = Vec::with_capacity(pair_count);
    let mut warnings = Vec::new();
    let progress = ProgressBar::new(pair_count as u64);

    for (name_a, name_b) in batch_a
        .ordered_identifiers
        .iter()
        .zip(batch_b.ordered_identifiers.iter())
    {
        progress.inc(1);

        let (Some(path_a), Some(path_b)) = (batch_a.locate(name_a), batch_b.locate(name_b))
        else {
            warnings.push(PairWarning::Unresolved {
                name_a: name_a.clone(),
                name_b: name_b.clone(),
            });
            continue;
        };

        let result_a = recognizer.recognize(&path_a, language);
        let result_b = recognizer.recognize(&path_b, language);

        // 認識に失敗したペアは残すが、一致とは判定しない
        let recognized = result_a.is_ok() && result_b.is_ok();
        let text_1 = result_a.unwrap_or_else(|e| format!("{}: {}", OCR_FAILURE_PREFIX, e));
        let text_2 = result_b.unwrap_or_else(|e| format!("{}: {}", OCR_FAILURE_PREFIX, e));
        let matched = recognized && text_1.trim() == text_2.trim();

        pairs.push(ComparisonPair {
            image_name: name_a.clone(),
            text_1,
            text_2,
            matched,
        });
    }

    progress.finish_and_clear();
    (pairs, warnings)
}
