//! 進捗表示

use ean_match_common::MatchProgress;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// EAN1件ごとに進むプログレスバー
pub struct MatchProgressBar {
    bar: ProgressBar,
    matched: usize,
}

impl MatchProgressBar {
    pub fn new(total: usize, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar, matched: 0 }
    }

    pub fn update(&mut self, progress: MatchProgress<'_>) {
        if progress.matched.is_some() {
            self.matched += 1;
        }
        self.bar.set_position((progress.index + 1) as u64);
        self.bar.set_message(format!(
            "EAN {}/{}: {} (一致 {})",
            progress.index + 1,
            progress.total,
            progress.identifier,
            self.matched
        ));
    }

    pub fn finish(&self) {
        self.bar
            .finish_with_message(format!("処理完了: {}件一致", self.matched));
    }

    pub fn matched(&self) -> usize {
        self.matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_matches() {
        let mut bar = MatchProgressBar::new(3, true);
        for (i, matched) in [Some("1_1.png"), None, Some("3_1.png")].into_iter().enumerate() {
            bar.update(MatchProgress {
                index: i,
                total: 3,
                identifier: "x",
                matched,
            });
        }
        bar.finish();
        assert_eq!(bar.matched(), 2);
    }
}
