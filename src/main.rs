use clap::Parser;
use ocr_compare_rust::{cli, config, error, extract, languages, names, pipeline, report};
use ocr_compare_rust::recognizer::TesseractCli;
use ocr_compare_rust::workbook::XlsxWorkbook;
use cli::{Cli, Commands};
use config::Config;
use error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Compare { batch_a, batch_b, language, output, json, keep_workspace } => {
            println!("🔍 ocr-compare - バッチ比較\n");

            let language = language.unwrap_or_else(|| config.default_language.clone());
            let recognizer = TesseractCli::new(config.ocr_command.clone());

            // 1. 展開・抽出・OCR比較
            println!("[1/2] 比較を実行中... (言語: {})", language);
            let outcome = pipeline::run_comparison(
                &batch_a,
                &batch_b,
                &language,
                &recognizer,
                &config,
                keep_workspace,
            )?;

            for warning in &outcome.extract_warnings {
                println!("  ⚠️  {}", warning);
            }
            for warning in &outcome.pair_warnings {
                println!("  ⚠️  {}", warning);
            }

            let report = &outcome.report;
            println!(
                "✔ 比較完了: {}ペア (一致 {} / 不一致 {})\n",
                report.pairs.len(),
                report.matched_count(),
                report.mismatched_count()
            );

            if cli.verbose {
                for pair in &report.pairs {
                    println!("  {} {}", if pair.matched { "✅" } else { "❌" }, pair.image_name);
                }
            }

            // 2. エクスポート
            println!("[2/2] 結果を保存中...");
            let output = output.unwrap_or_else(|| std::path::PathBuf::from("ocr_results.xlsx"));
            report::write_excel(report, &output)?;
            println!("✔ Excelを保存: {}", output.display());

            if let Some(json_path) = json {
                std::fs::write(&json_path, serde_json::to_string_pretty(report)?)?;
                println!("✔ JSONを保存: {}", json_path.display());
            }

            if let Some(path) = &outcome.workspace_path {
                println!("  作業ディレクトリを保持: {}", path.display());
            }

            println!("\n✅ 完了 ({})", report.folder_name);
        }

        Commands::Extract { excel, output } => {
            println!("🖼  ocr-compare - 画像抽出\n");

            let workbook = XlsxWorkbook::open(&excel)?;
            let outcome = extract::extract_images(
                &workbook,
                config.picture_column,
                config.name_column,
                &config.image_extension,
                &output,
            );

            for warning in &outcome.warnings {
                println!("  ⚠️  {}", warning);
            }
            for (name, path) in &outcome.saved {
                println!("  ✔ {} -> {}", name, path.display());
            }

            if outcome.saved.is_empty() {
                println!("\n⚠️  保存対象の画像が見つかりませんでした");
            } else {
                println!("\n✅ {}枚を保存: {}", outcome.saved.len(), output.display());
            }
        }

        Commands::Names { excel } => {
            let workbook = XlsxWorkbook::open(&excel)?;
            let identifiers = names::read_identifiers(
                &workbook,
                config.name_column,
                config.header_rows,
                &config.image_extension,
            );

            for name in &identifiers {
                println!("{}", name);
            }
            eprintln!("計{}件", identifiers.len());
        }

        Commands::Languages { file } => {
            let catalog = match file {
                Some(path) => languages::load_catalog(&path)?,
                None => languages::bundled_catalog(),
            };

            for language in &catalog {
                println!("{}\t{}", language.code, language.name);
            }
        }

        Commands::Cleanup => {
            pipeline::clear_workspaces(&config)?;
            println!("✔ 作業ディレクトリを初期化しました: {}", config.workspace_root().display());
        }

        Commands::Config { set_ocr_command, show } => {
            let mut config = config;

            if let Some(command) = set_ocr_command {
                config.set_ocr_command(command)?;
                println!("✔ OCRコマンドを設定しました");
            }

            if show {
                println!("設定:");
                println!("  画像列: {}", config.picture_column);
                println!("  名前列: {}", config.name_column);
                println!("  ヘッダ行数: {}", config.header_rows);
                println!("  画像拡張子: {}", config.image_extension);
                println!("  OCRコマンド: {}", config.ocr_command);
                println!("  既定言語: {}", config.default_language);
                println!("  作業ルート: {}", config.workspace_root().display());
            }
        }
    }

    Ok(())
}
