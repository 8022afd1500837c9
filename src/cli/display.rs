//! Display utilities for the TinyTimer CLI.
//!
//! This module provides formatted output for:
//! - Countdown status lines with a progress bar
//! - The completion celebration
//! - Delivered notifications
//! - Theme listing and error messages
//!
//! Rendering is split into `render_*` functions that return strings, so the
//! formatting can be tested without capturing stdout.

use std::io::{IsTerminal, Write};

use anyhow::{Context, Result};

use crate::live::LiveUpdate;
use crate::notification::NotificationContent;
use crate::types::{
    format_time, AnimationOption, CountdownSnapshot, MusicOption, TimerState,
};

// ============================================================================
// Constants
// ============================================================================

/// Width of the progress bar in cells.
const PROGRESS_WIDTH: usize = 20;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Confetti line drawn around the celebrating character.
const CONFETTI: &str = "🎊 ✨ 🎉 ✨ 🎊 ✨ 🎉 ✨ 🎊";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the key bindings of an interactive session.
    pub fn show_key_help() {
        println!("操作: [p] 一時停止  [r] 再開  [s] 停止  [n] やり直し  [x] お祝いを止める");
        println!("      [b] バックグラウンド  [f] フォアグラウンド  [a] 通知から停止  [q] 終了");
    }

    /// Shows that a countdown started.
    pub fn show_started(snapshot: &CountdownSnapshot) {
        println!("▶ タイマーを開始しました ({})", snapshot.display_time);
        println!(
            "  キャラクター: {} {}  音楽: {}",
            snapshot.animation.emoji(),
            snapshot.animation.display_name(),
            snapshot.music.display_name()
        );
    }

    /// Shows the per-second status line.
    pub fn show_status(snapshot: &CountdownSnapshot) {
        println!("{}", Self::render_status_line(snapshot));
    }

    pub fn show_paused(remaining_seconds: u32) {
        println!("⏸ 一時停止しました  残り時間: {}", format_time(remaining_seconds));
    }

    pub fn show_resumed(remaining_seconds: u32) {
        println!("▶ 再開しました  残り時間: {}", format_time(remaining_seconds));
    }

    pub fn show_stopped(snapshot: &CountdownSnapshot) {
        println!("⏹ タイマーを停止しました ({} に戻しました)", snapshot.display_time);
    }

    pub fn show_backgrounded() {
        println!("… バックグラウンドに移動しました");
    }

    pub fn show_foregrounded(snapshot: &CountdownSnapshot) {
        println!(
            "↩ フォアグラウンドに戻りました  {}",
            Self::render_status_line(snapshot)
        );
    }

    /// Shows the completion celebration.
    pub fn show_celebration(animation: AnimationOption, music: MusicOption) {
        println!("{}", Self::render_celebration(animation, music));
    }

    pub fn show_celebration_dismissed() {
        println!("お祝いを止めました");
    }

    /// Shows a delivered notification, ringing the terminal bell if asked.
    pub fn show_notification(content: &NotificationContent, bell: bool) {
        if bell {
            print!("\x07");
        }
        println!("{}", Self::render_notification(content));
    }

    /// Mirrors a live status update into the terminal title.
    ///
    /// Does nothing when stdout is not a terminal.
    pub fn show_live(update: &LiveUpdate) {
        let mut stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return;
        }
        let title = update.content().map(|c| c.title()).unwrap_or_default();
        let _ = write!(stdout, "\x1b]0;{}\x07", title);
        let _ = stdout.flush();
    }

    /// Lists the available completion music and characters.
    pub fn show_themes() {
        println!("{}", Self::render_themes());
    }

    /// Prints a snapshot as pretty JSON.
    pub fn show_snapshot_json(snapshot: &CountdownSnapshot) -> Result<()> {
        let json =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
        println!("{}", json);
        Ok(())
    }

    /// Shows a message when leaving a session.
    pub fn show_goodbye(snapshot: &CountdownSnapshot) {
        println!("終了します ({}: {})", Self::state_label(snapshot.state), snapshot.display_time);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Shows a warning message.
    pub fn show_warning(message: &str) {
        eprintln!("警告: {}", message);
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Japanese label for a state.
    pub fn state_label(state: TimerState) -> &'static str {
        match state {
            TimerState::Idle => "待機中",
            TimerState::Running => "実行中",
            TimerState::Paused => "一時停止中",
            TimerState::Finished => "完了",
        }
    }

    /// Renders a progress bar, e.g. `[██████░░░░░░░░░░░░░░]  33%`.
    pub fn render_progress_bar(progress: f64, width: usize) -> String {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let filled = ((progress * width as f64).round() as usize).min(width);
        format!(
            "[{}{}] {:>3}%",
            FILLED.to_string().repeat(filled),
            EMPTY.to_string().repeat(width - filled),
            (progress * 100.0).round() as u32
        )
    }

    /// Renders the status line, e.g. `🦕 1:00 [██████░░░░░░░░░░░░░░]  33% 実行中`.
    pub fn render_status_line(snapshot: &CountdownSnapshot) -> String {
        format!(
            "{} {} {} {}",
            snapshot.animation.emoji(),
            snapshot.display_time,
            Self::render_progress_bar(snapshot.smooth_progress, PROGRESS_WIDTH),
            Self::state_label(snapshot.state)
        )
    }

    pub fn render_celebration(animation: AnimationOption, music: MusicOption) -> String {
        format!(
            "{confetti}\n\n        {emoji}  タイムアップ！  {emoji}\n\n{confetti}\n♪ {music} ♪",
            confetti = CONFETTI,
            emoji = animation.emoji(),
            music = music.display_name()
        )
    }

    pub fn render_notification(content: &NotificationContent) -> String {
        let mut text = format!("[通知] {}", content.title);
        if let Some(subtitle) = &content.subtitle {
            text.push_str(&format!(" - {}", subtitle));
        }
        if !content.body.is_empty() {
            text.push_str(&format!("\n       {}", content.body));
        }
        text
    }

    pub fn render_themes() -> String {
        let mut lines = vec!["音楽:".to_string()];
        for music in MusicOption::ALL {
            let marker = if music == MusicOption::default() { " (デフォルト)" } else { "" };
            lines.push(format!("  {:<12} {}{}", music.id(), music.display_name(), marker));
        }
        lines.push("キャラクター:".to_string());
        for animation in AnimationOption::ALL {
            let marker = if animation == AnimationOption::default() {
                " (デフォルト)"
            } else {
                ""
            };
            lines.push(format!(
                "  {:<12} {} {}{}",
                animation.id(),
                animation.emoji(),
                animation.display_name(),
                marker
            ));
        }
        lines.join("\n")
    }
}

// ============================================================================
// Tests
// ============================================================================
