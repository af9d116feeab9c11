//! Pure formatting helpers and the terminal view.
//!
//! Display formats here are contract, not decoration: duration `125` renders
//! `02:05`, `1000` views render `1,000 回視聴`, a 2 MiB/s transfer renders
//! `2.00 MB/s`, an ETA of 75 seconds renders `1分15秒 残り`. User-facing
//! strings are Japanese, matching the server's web frontend.

use std::io::{self, Write};

use chrono::NaiveDateTime;
use url::Url;

use crate::api::{download_file_url, HistoryEntry, VideoInfo};
use crate::core::validation::sanitize_filename;
use crate::session::{CompletedFile, ProgressUpdate, View};

/// Formats a duration in seconds as `MM:SS` (or `H:MM:SS` from one hour up).
pub fn format_duration(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

/// Formats a view count with thousands separators and the 回視聴 suffix.
pub fn format_view_count(count: u64) -> String {
    format!("{} 回視聴", group_thousands(count))
}

/// 1234567 -> "1,234,567"
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a transfer speed given in bytes per second.
pub fn format_speed(bytes_per_sec: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    if bytes_per_sec >= MB {
        format!("{:.2} MB/s", bytes_per_sec / MB)
    } else if bytes_per_sec >= KB {
        format!("{:.1} KB/s", bytes_per_sec / KB)
    } else {
        format!("{:.0} B/s", bytes_per_sec)
    }
}

/// Formats an estimated time remaining, in seconds.
pub fn format_eta(eta_secs: f64) -> String {
    let total = eta_secs.max(0.0).floor() as u64;
    let minutes = total / 60;
    let seconds = total % 60;
    if minutes > 0 {
        format!("{}分{}秒 残り", minutes, seconds)
    } else {
        format!("{}秒 残り", seconds)
    }
}

/// Rounds a raw percentage to the whole percent shown on the bar.
pub fn progress_percent(progress: f64) -> u8 {
    progress.round().clamp(0.0, 100.0) as u8
}

/// Creates a visual progress bar.
pub fn create_progress_bar(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = (percent / 10) as usize;
    let empty = 10 - filled;

    let filled_blocks = "█".repeat(filled);
    let empty_blocks = "░".repeat(empty);

    format!("[{}{}]", filled_blocks, empty_blocks)
}

/// Formats a backend ISO-8601 timestamp for display (`YYYY/MM/DD HH:MM`).
/// Unparseable input is shown as-is.
pub fn format_completed_at(raw: &str) -> String {
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"));
    match parsed {
        Ok(dt) => dt.format("%Y/%m/%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Line-oriented terminal implementation of [`View`].
///
/// Progress frames redraw a single line with a carriage return; every other
/// section prints on its own lines. All output goes to stdout; logs go to
/// stderr/file, so the two never interleave on the progress line.
pub struct ConsoleView {
    base: Url,
    /// True while a progress line is on screen and unterminated.
    progress_line_open: bool,
}

impl ConsoleView {
    pub fn new(base: Url) -> Self {
        Self { base, progress_line_open: false }
    }

    /// Terminates a pending progress line before printing block output.
    fn close_progress_line(&mut self) {
        if self.progress_line_open {
            println!();
            self.progress_line_open = false;
        }
    }
}

impl View for ConsoleView {
    fn set_loading(&mut self, on: bool) {
        if on {
            println!("⏳ 動画情報を取得中...");
        }
    }

    fn show_preview(&mut self, info: &VideoInfo) {
        self.close_progress_line();
        println!();
        println!("🎬 {}", info.title);
        println!("   👤 {}", info.uploader);
        println!(
            "   ⏱  {}   👁  {}",
            format_duration(info.duration),
            format_view_count(info.view_count)
        );
        if let Some(thumbnail) = info.thumbnail.as_deref().filter(|t| !t.is_empty()) {
            println!("   🖼  {}", thumbnail);
        }
        if let Some(description) = info.description.as_deref().filter(|d| !d.is_empty()) {
            println!("   📝 {}", description);
        }
        println!();
    }

    fn show_progress(&mut self, update: &ProgressUpdate) {
        let percent = progress_percent(update.progress);
        print!(
            "\r📥 {} {:>3}%  ⚡ {}  ⏱ {}   ",
            create_progress_bar(percent),
            percent,
            format_speed(update.speed_bps),
            format_eta(update.eta_secs),
        );
        let _ = io::stdout().flush();
        self.progress_line_open = true;
    }

    fn show_processing(&mut self, message: &str) {
        self.close_progress_line();
        println!("⚙️  {}", message);
    }

    fn show_completed(&mut self, file: &CompletedFile) {
        self.close_progress_line();
        println!("✅ ダウンロード完了: {}", file.title);
        // Backend filenames are echoed as a local save suggestion; strip
        // anything filesystem-unsafe first.
        println!("   💾 {}", sanitize_filename(&file.filename));
        println!("   🔗 {}", file.file_url);
    }

    fn show_error(&mut self, message: &str) {
        self.close_progress_line();
        println!("❌ エラー: {}", message);
    }

    fn show_history(&mut self, entries: &[HistoryEntry]) {
        self.close_progress_line();
        println!();
        println!("📚 ダウンロード履歴");
        if entries.is_empty() {
            println!("   まだダウンロード履歴はありません");
            return;
        }
        for (idx, entry) in entries.iter().enumerate() {
            let format_emoji = match entry.format_type.as_deref() {
                Some("audio") => "🎵",
                _ => "🎬",
            };
            let date = entry
                .completed_at
                .as_deref()
                .map(format_completed_at)
                .unwrap_or_default();
            println!("{:>3}. {} {}  📅 {}", idx + 1, format_emoji, entry.title, date);
            println!("     🔗 {}", download_file_url(&self.base, &entry.id));
        }
    }
}
