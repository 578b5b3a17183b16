use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ocr-compare")]
#[command(about = "Excel埋め込み画像OCR比較ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 2つのZIPバッチを比較してレポートを出力
    Compare {
        /// バッチAのZIPアーカイブ
        #[arg(required = true)]
        batch_a: PathBuf,

        /// バッチBのZIPアーカイブ
        #[arg(required = true)]
        batch_b: PathBuf,

        /// OCR言語コード（`languages` で一覧表示）
        #[arg(short, long)]
        language: Option<String>,

        /// 出力Excelファイル（デフォルト: ocr_results.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// レポートをJSONでも保存
        #[arg(long)]
        json: Option<PathBuf>,

        /// 作業ディレクトリを削除せず残す
        #[arg(long)]
        keep_workspace: bool,
    },

    /// 1つのワークブックからアンカー画像を抽出
    Extract {
        /// 対象のExcelファイル
        #[arg(required = true)]
        excel: PathBuf,

        /// 画像の保存先ディレクトリ
        #[arg(short, long)]
        output: PathBuf,
    },

    /// 1つのワークブックの画像名シーケンスを表示
    Names {
        /// 対象のExcelファイル
        #[arg(required = true)]
        excel: PathBuf,
    },

    /// 利用可能なOCR言語の一覧を表示
    Languages {
        /// カタログファイル（省略時はバンドル版）
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// 作業ディレクトリを空にする
    Cleanup,

    /// 設定を表示/編集
    Config {
        /// OCRコマンドを設定
        #[arg(long)]
        set_ocr_command: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
