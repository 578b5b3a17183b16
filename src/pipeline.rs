//! 比較パイプライン
//!
//! フロントエンドから呼ばれる入口。2つのZIPアーカイブと
//! 言語コードを受け取り、レポートを返す。ダウンロード用の
//! Excel変換は `report::to_excel_buffer`、作業領域の掃除は
//! `clear_workspaces` が担う。

use std::path::Path;

use crate::archive;
use crate::batch;
use crate::compare::{self, PairWarning};
use crate::config::Config;
use crate::error::Result;
use crate::extract::ExtractWarning;
use crate::recognizer::TextRecognizer;
use crate::report::ComparisonReport;
use crate::workspace::{self, RunWorkspace, Side};

/// 比較1回分の実行結果（レポートと各段階の警告）
#[derive(Debug)]
pub struct RunOutcome {
    pub report: ComparisonReport,
    pub extract_warnings: Vec<ExtractWarning>,
    pub pair_warnings: Vec<PairWarning>,
    /// `keep_workspace` 指定時のみ Some
    pub workspace_path: Option<std::path::PathBuf>,
}

/// 2つのアーカイブを比較してレポートを作る
///
/// アーカイブが開けない場合だけが Err になる。ワークブックが
/// 1つも見つからないバッチは空として扱い、ペア0件のレポートも
/// 正常な結果として返す。
pub fn run_comparison(
    zip_a: &Path,
    zip_b: &Path,
    language: &str,
    recognizer: &dyn TextRecognizer,
    config: &Config,
    keep_workspace: bool,
) -> Result<RunOutcome> {
    let workspace = RunWorkspace::create(&config.workspace_root())?;

    archive::extract_zip(zip_a, &workspace.upload_dir(Side::A))?;
    archive::extract_zip(zip_b, &workspace.upload_dir(Side::B))?;

    let sheets_a = archive::find_spreadsheets(&workspace.upload_dir(Side::A));
    let sheets_b = archive::find_spreadsheets(&workspace.upload_dir(Side::B));

    // グルーピング名はバッチA先頭のワークブックから
    let label = sheets_a
        .first()
        .map(|path| archive::batch_label(path))
        .unwrap_or_else(|| archive::DEFAULT_FOLDER_NAME.to_string());

    let (batch_a, warnings_a) =
        batch::resolve_batch(&sheets_a, &workspace.image_dir(Side::A), config);
    let (batch_b, warnings_b) =
        batch::resolve_batch(&sheets_b, &workspace.image_dir(Side::B), config);

    let (pairs, pair_warnings) = compare::compare_batches(&batch_a, &batch_b, recognizer, language);

    let mut extract_warnings = warnings_a;
    extract_warnings.extend(warnings_b);

    let workspace_path = keep_workspace.then(|| workspace.keep());

    Ok(RunOutcome {
        report: ComparisonReport::new(label, pairs),
        extract_warnings,
        pair_warnings,
        workspace_path,
    })
}

/// 作業ルートを空の状態に戻す（メンテナンス入口）
pub fn clear_workspaces(config: &Config) -> Result<()> {
    workspace::clear_root(&config.workspace_root())
}
