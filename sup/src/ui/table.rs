//! PR table rendering.
//!
//! [`build_lines`] turns a session snapshot into styled lines and never
//! touches the session, so tests can assert on plain strings without a
//! terminal.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use sup_core::session::{InputMode, Session};
use sup_core::types::Record;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::Theme;

const COL_STATUS: usize = 12;
const COL_REPO: usize = 28;
const COL_NUM: usize = 6;
const COL_TITLE: usize = 32;
const COL_AUTHOR: usize = 14;
const COL_REVIEWER: usize = 14;
const COL_BRANCH: usize = 20;

/// Width of the `+/-` column in the separator rule.
const COL_STATS: usize = 10;

/// Rows taken by chrome around the table.
const CHROME_ROWS: usize = 8;
/// Window used when the terminal is too short to fit at least this many rows.
const MIN_WINDOW: usize = 5;
const FALLBACK_WINDOW: usize = 15;

const ELLIPSIS: &str = "...";

pub const HELP: &str = "  j/k ↑/↓: navigate • g/G: top/bottom • /: filter • o: open • enter: checkout • r: refresh • q/esc: quit";

/// Builds every line of the dashboard for a terminal `height` rows tall.
pub fn build_lines(session: &Session, theme: &Theme, height: u16) -> Vec<Line<'static>> {
    let dim = Style::default().fg(theme.header);
    let mut lines = vec![Line::default()];

    match session.input_mode() {
        InputMode::FilterEditing => {
            lines.push(Line::styled(
                format!("  / {}█", session.filter_query()),
                theme.filter_style(),
            ));
            lines.push(Line::default());
        }
        InputMode::Browsing if !session.filter_query().is_empty() => {
            lines.push(Line::styled(
                format!("  Filter: {}", session.filter_query()),
                theme.filter_style(),
            ));
            lines.push(Line::default());
        }
        InputMode::Browsing => {}
    }

    lines.push(Line::styled(header(), dim));
    lines.push(Line::styled(format!("  {}", "─".repeat(rule_width())), dim));

    if session.records().is_empty() {
        if let Some(failure) = session.failure() {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("  Error: {failure}"),
                Style::default().fg(theme.error),
            ));
            lines.push(Line::default());
            lines.push(Line::styled("  Press r to retry or q to quit.", theme.help_style()));
            return lines;
        }
        if session.is_loading() {
            lines.push(Line::styled(
                format!("  {} Loading...", session.spinner()),
                Style::default().fg(theme.loading),
            ));
            return lines;
        }
    }

    if session.visible_len() == 0 {
        lines.push(Line::raw("  No PRs found."));
    } else {
        let (start, end) = window(session, height);
        for i in start..end {
            if let Some(record) = session.visible_at(i) {
                lines.push(row(record, i == session.cursor(), theme));
            }
        }
    }

    if !session.records().is_empty() {
        lines.push(Line::default());
        lines.push(footer(session, theme));
    }

    lines.push(Line::default());
    lines.push(Line::styled(HELP, theme.help_style()));
    lines
}

/// Half-open range of visible rows to draw: enough to keep the cursor on
/// screen, cut short by the reveal animation.
fn window(session: &Session, height: u16) -> (usize, usize) {
    let mut rows = usize::from(height).saturating_sub(CHROME_ROWS);
    if rows < MIN_WINDOW {
        rows = FALLBACK_WINDOW;
    }
    let cursor = session.cursor();
    let start = if cursor >= rows { cursor + 1 - rows } else { 0 };
    let end = (start + rows)
        .min(session.visible_len())
        .min(session.reveal_count());
    (start, end.max(start))
}

fn header() -> String {
    [
        pad("STATUS", COL_STATUS),
        pad("REPO", COL_REPO),
        pad("#", COL_NUM),
        pad("TITLE", COL_TITLE),
        pad("AUTHOR", COL_AUTHOR),
        pad("REVIEWER", COL_REVIEWER),
        pad("BRANCH", COL_BRANCH),
        "+/-".to_owned(),
    ]
    .iter()
    .fold("  ".to_owned(), |acc, col| acc + col)
}

fn rule_width() -> usize {
    COL_STATUS + COL_REPO + COL_NUM + COL_TITLE + COL_AUTHOR + COL_REVIEWER + COL_BRANCH + COL_STATS
}

fn row(record: &Record, selected: bool, theme: &Theme) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    let badge = record.badge();
    let status = pad(badge.label(), COL_STATUS);
    let repo = column(&record.repo, COL_REPO);
    let num = pad(&format!("#{}", record.number), COL_NUM);
    let title = column(&record.title, COL_TITLE);
    let author = column(&record.author, COL_AUTHOR);
    let reviewer = column(record.relevant_reviewer(), COL_REVIEWER);
    let branch = column(&record.branch, COL_BRANCH);
    let adds = format!("+{}", record.additions);
    let dels = format!("-{}", record.deletions);

    if selected {
        let text = format!(
            "{marker}{status}{repo}{num}{title}{author}{reviewer}{branch}{adds} {dels}"
        );
        return Line::styled(text, theme.selected_style());
    }

    Line::from(vec![
        Span::raw(marker),
        Span::styled(status, theme.badge_style(badge)),
        Span::raw(repo),
        Span::raw(num),
        Span::raw(title),
        Span::styled(author, Style::default().fg(theme.header)),
        Span::styled(reviewer, Style::default().fg(theme.badge_review)),
        Span::styled(branch, Style::default().fg(theme.branch)),
        Span::styled(adds, Style::default().fg(theme.additions)),
        Span::raw(" "),
        Span::styled(dels, Style::default().fg(theme.deletions)),
    ])
}

fn footer(session: &Session, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::raw(format!(
        "  {}/{} PRs",
        session.visible_len(),
        session.records().len()
    ))];
    if session.is_refreshing() {
        spans.push(Span::styled(
            format!("  {} Refreshing", session.spinner()),
            Style::default().fg(theme.loading),
        ));
    }
    if let Some(failure) = session.failure() {
        spans.push(Span::styled(
            format!("  Refresh failed: {failure}"),
            Style::default().fg(theme.error),
        ));
    }
    Line::from(spans)
}

/// Truncates to one less than `width` so adjacent columns never touch, then
/// pads to `width`.
fn column(text: &str, width: usize) -> String {
    pad(&truncate(text, width - 1), width)
}

/// Shortens `text` to at most `max` display columns, marking the cut with
/// `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_owned();
    }
    let budget = max.saturating_sub(ELLIPSIS.len());
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}

/// Right-pads `text` with spaces to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let w = text.width();
    if w >= width {
        return text.to_owned();
    }
    format!("{text}{}", " ".repeat(width - w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sup_core::session::{KeyInput, SessionEvent};
    use sup_core::source::demo_records;
    use sup_core::FetchError;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn render(session: &Session, height: u16) -> Vec<String> {
        build_lines(session, &Theme::dark(), height).iter().map(text).collect()
    }

    fn demo_session() -> Session {
        let mut s = Session::new(Some(demo_records()));
        s.handle(SessionEvent::Started);
        s.handle(SessionEvent::FetchCompleted(Ok(demo_records())));
        s
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("feature/rate-limit-v2", 10), "feature...");
        // Each CJK character is two columns wide.
        assert_eq!(truncate("日本語のタイトル", 9), "日本語...");
        assert_eq!(truncate("abcdef", 2), "...");
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad("#7", 6), "#7    ");
        assert_eq!(pad("日本", 6).width(), 6);
        assert_eq!(pad("toolong", 3), "toolong");
    }

    #[test]
    fn loading_screen_shows_spinner_only() {
        let mut s = Session::new(None);
        s.handle(SessionEvent::Started);
        let lines = render(&s, 40);
        assert!(lines[1].starts_with("  STATUS"));
        assert_eq!(lines.last().map(String::as_str), Some("  ⠋ Loading..."));
    }

    #[test]
    fn failure_with_nothing_to_show_is_the_only_content() {
        let mut s = Session::new(None);
        s.handle(SessionEvent::Started);
        s.handle(SessionEvent::FetchCompleted(Err(FetchError::new("gh: not logged in"))));
        let lines = render(&s, 40);
        assert!(lines.contains(&"  Error: gh: not logged in".to_owned()));
        assert!(!lines.iter().any(|l| l.contains("PRs")));
    }

    #[test]
    fn failure_over_records_shows_in_footer() {
        let mut s = Session::new(Some(demo_records()));
        s.handle(SessionEvent::Started);
        s.handle(SessionEvent::FetchCompleted(Err(FetchError::new("timeout"))));
        let lines = render(&s, 40);
        assert!(lines.iter().any(|l| l == "  8/8 PRs  Refresh failed: timeout"));
    }

    #[test]
    fn rows_show_badge_number_and_stats() {
        let lines = render(&demo_session(), 40);
        let first = &lines[3];
        assert!(first.starts_with("> [Review]    web-app"), "{first}");
        assert!(first.contains("#78   "));
        assert!(first.ends_with("+567 -234"));
        assert!(lines[4].starts_with("  [Review]    web-app"));
        assert!(lines[5].starts_with("  [Approved]  backend-api"));
        assert!(lines.contains(&"  8/8 PRs".to_owned()));
        assert_eq!(lines.last().map(String::as_str), Some(HELP));
    }

    #[test]
    fn columns_line_up() {
        let lines = render(&demo_session(), 40);
        let offsets: Vec<usize> = lines[3..11]
            .iter()
            .map(|l| {
                let byte = l.find('#').unwrap_or(0);
                l[..byte].width()
            })
            .collect();
        assert!(offsets.windows(2).all(|w| w[0] == w[1]), "{offsets:?}");
    }

    #[test]
    fn filter_prompt_reflects_mode() {
        let mut s = demo_session();
        s.handle(SessionEvent::Key(KeyInput::Char('/')));
        s.handle(SessionEvent::Key(KeyInput::Char('a')));
        assert_eq!(render(&s, 40)[1], "  / a█");

        s.handle(SessionEvent::Key(KeyInput::Enter));
        assert_eq!(render(&s, 40)[1], "  Filter: a");
    }

    #[test]
    fn no_matches_message() {
        let mut s = demo_session();
        s.handle(SessionEvent::Key(KeyInput::Char('/')));
        for c in "zzz".chars() {
            s.handle(SessionEvent::Key(KeyInput::Char(c)));
        }
        let lines = render(&s, 40);
        assert!(lines.contains(&"  No PRs found.".to_owned()));
        assert!(lines.contains(&"  0/8 PRs".to_owned()));
    }

    #[test]
    fn reveal_limits_rows() {
        let mut s = Session::new(None);
        s.handle(SessionEvent::Started);
        s.handle(SessionEvent::FetchCompleted(Ok(demo_records())));
        let rows = |s: &Session| {
            render(s, 40)
                .iter()
                .filter(|l| l.starts_with("> [") || l.starts_with("  ["))
                .count()
        };
        assert_eq!(rows(&s), 0);
        s.handle(SessionEvent::AnimationTick);
        assert_eq!(rows(&s), 2);
    }

    #[test]
    fn window_follows_cursor() {
        let mut s = demo_session();
        s.handle(SessionEvent::Key(KeyInput::End));
        // 13 rows tall leaves a five-row window.
        assert_eq!(window(&s, 13), (3, 8));
        // Too short for five rows: fall back to fifteen.
        assert_eq!(window(&s, 10), (0, 8));
    }
}
