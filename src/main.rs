use clap::Parser;
use ean_image_matcher::{cli, config, error, progress, repackage, report, spreadsheet};
use cli::{Cli, Commands};
use config::Config;
use ean_match_common::{build_patterns, PatternSet};
use error::Result;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Run { excel, zip, sheet, column, output, patterns, report: report_path, quiet } => {
            println!("🔍 ean-match - EAN画像照合\n");

            // 1. EAN読み込み
            println!("[1/4] Excelを読み込み中...");
            let ean_column = spreadsheet::read_ean_column(
                &excel,
                sheet.as_deref(),
                column.as_deref(),
                &config.ean_column,
            )?;
            let identifiers = ean_column.identifiers();
            println!(
                "✔ {}件のEANを検出 (シート: {}, 列: {})",
                identifiers.len(),
                ean_column.sheet,
                ean_column.header
            );
            if cli.verbose {
                println!("  例: {}", ean_column.preview(5).join(", "));
            }
            println!();

            // 照合パターンはZIPを開く前に検証
            let options = patterns
                .as_deref()
                .map(cli::options_from_kinds)
                .unwrap_or(config.match_options);
            let pattern_set = PatternSet::from_options(&options)?;

            // 2. ZIPスキャン
            println!("[2/4] ZIPをスキャン中...");
            let mut source = repackage::SourceZip::open(&zip)?;
            println!(
                "✔ ファイル {}件 / 画像 {}枚\n",
                source.listing().total_files,
                source.listing().image_paths.len()
            );

            // 3. 照合
            println!(
                "[3/4] 照合中... (パターン: {})",
                pattern_set.iter().collect::<Vec<_>>().join(", ")
            );
            let output_path = output.unwrap_or_else(|| PathBuf::from(&config.output_name));
            let mut bar = progress::MatchProgressBar::new(identifiers.len(), quiet);
            let result = repackage::repackage_source(
                &identifiers,
                &pattern_set,
                &mut source,
                &output_path,
                |p| bar.update(p),
            )?;
            bar.finish();
            println!("✔ 照合完了\n");

            // 4. 結果
            println!("[4/4] 結果を集計中...");
            let run_report = report::RunReport::new(
                report::RunInputs {
                    spreadsheet: &excel,
                    sheet: &ean_column.sheet,
                    column: &ean_column.header,
                    archive: &zip,
                    output: &output_path,
                    patterns: pattern_set.iter().map(String::from).collect(),
                },
                result,
            )?;

            println!("  処理したEAN: {}", run_report.processed);
            println!("  一致: {}", run_report.match_count);
            println!("  不一致: {}", run_report.unmatched());
            println!("  出力ZIP: {} ({}件)", output_path.display(), run_report.entry_count);
            println!("  SHA-256: {}", run_report.output_sha256);

            if let Some(path) = report_path {
                run_report.save(&path)?;
                println!("✔ レポートを保存: {}", path.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Inspect { excel, sheet, column } => {
            println!("📄 ean-match - Excel確認\n");

            let sheets = spreadsheet::sheet_names(&excel)?;
            println!("シート: {}", sheets.join(", "));

            let ean_column = spreadsheet::read_ean_column(
                &excel,
                sheet.as_deref(),
                column.as_deref(),
                &config.ean_column,
            )?;
            println!("列: {}", ean_column.headers.join(", "));
            println!(
                "\n列「{}」のEAN例 ({}件中):",
                ean_column.header,
                ean_column.non_empty_count()
            );
            for value in ean_column.preview(5) {
                println!("  {}", value);
            }
        }

        Commands::Scan { zip } => {
            println!("📦 ean-match - ZIP確認\n");

            let listing = repackage::summarize_archive(&zip)?;
            println!("ファイル数: {}", listing.total_files);
            println!("画像数: {}", listing.image_paths.len());

            if listing.image_paths.is_empty() {
                println!("⚠ ZIP内に画像が見つかりません");
            } else {
                println!("\n画像の例:");
                for path in listing.image_paths.iter().take(5) {
                    println!("  {}", path);
                }
            }
        }

        Commands::Config { show, column, patterns, output_name } => {
            let mut config = config;
            let mut changed = false;

            if let Some(column) = column {
                config.ean_column = column;
                changed = true;
            }

            if let Some(kinds) = patterns {
                let options = cli::options_from_kinds(&kinds);
                PatternSet::from_options(&options)?;
                config.match_options = options;
                changed = true;
            }

            if let Some(name) = output_name {
                config.output_name = name;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  EAN列: {}", config.ean_column);
                println!("  照合パターン: {}", build_patterns(&config.match_options).join(", "));
                println!("  出力ファイル名: {}", config.output_name);
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}
