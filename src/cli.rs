use clap::{Parser, Subcommand, ValueEnum};
use ean_match_common::MatchOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ean-match")]
#[command(about = "EANコードと商品画像の照合・ZIP再梱包ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ExcelのEAN列とZIPの画像を照合し、一致した画像だけのZIPを作成
    Run {
        /// EANを含むExcelファイル (.xlsx/.xls)
        #[arg(required = true)]
        excel: PathBuf,

        /// 画像を含むZIPファイル
        #[arg(required = true)]
        zip: PathBuf,

        /// シート名（デフォルト: 先頭シート）
        #[arg(short, long)]
        sheet: Option<String>,

        /// EAN列の見出し（デフォルト: 設定値、なければ先頭列）
        #[arg(short, long)]
        column: Option<String>,

        /// 出力ZIP（デフォルト: 設定のファイル名をカレントに作成）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 照合パターン（カンマ区切り、適用順は常に suffixed-png → suffixed-jpg → bare-png → bare-jpg）
        #[arg(short, long, value_enum, value_delimiter = ',')]
        patterns: Option<Vec<PatternKind>>,

        /// 実行結果をJSONで保存
        #[arg(long)]
        report: Option<PathBuf>,

        /// プログレスバーを表示しない
        #[arg(short, long)]
        quiet: bool,
    },

    /// Excelのシート・列・EANの例を表示
    Inspect {
        /// Excelファイル
        #[arg(required = true)]
        excel: PathBuf,

        /// シート名
        #[arg(short, long)]
        sheet: Option<String>,

        /// EAN列の見出し
        #[arg(short, long)]
        column: Option<String>,
    },

    /// ZIP内のファイル数・画像数を表示
    Scan {
        /// ZIPファイル
        #[arg(required = true)]
        zip: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定のEAN列見出し
        #[arg(long)]
        column: Option<String>,

        /// 既定の照合パターン（カンマ区切り）
        #[arg(long, value_enum, value_delimiter = ',')]
        patterns: Option<Vec<PatternKind>>,

        /// 既定の出力ファイル名
        #[arg(long)]
        output_name: Option<String>,
    },
}

/// 照合パターンの種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PatternKind {
    /// {EAN}_1.png
    SuffixedPng,
    /// {EAN}_1.jpg
    SuffixedJpg,
    /// {EAN}.png
    BarePng,
    /// {EAN}.jpg
    BareJpg,
}

/// 指定された種類だけを有効にした設定
pub fn options_from_kinds(kinds: &[PatternKind]) -> MatchOptions {
    MatchOptions {
        suffixed_png: kinds.contains(&PatternKind::SuffixedPng),
        suffixed_jpg: kinds.contains(&PatternKind::SuffixedJpg),
        bare_png: kinds.contains(&PatternKind::BarePng),
        bare_jpg: kinds.contains(&PatternKind::BareJpg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_options_from_kinds_ignores_order() {
        let options = options_from_kinds(&[PatternKind::BareJpg, PatternKind::SuffixedPng]);
        assert!(options.suffixed_png);
        assert!(!options.suffixed_jpg);
        assert!(!options.bare_png);
        assert!(options.bare_jpg);
    }

    #[test]
    fn test_parse_run_patterns() {
        let cli = Cli::parse_from([
            "ean-match",
            "run",
            "eans.xlsx",
            "images.zip",
            "--patterns",
            "bare-png,suffixed-jpg",
        ]);
        match cli.command {
            Commands::Run { patterns, quiet, .. } => {
                assert_eq!(
                    patterns,
                    Some(vec![PatternKind::BarePng, PatternKind::SuffixedJpg])
                );
                assert!(!quiet);
            }
            _ => panic!("run以外が解析された"),
        }
    }
}
