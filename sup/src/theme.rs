//! Color theme system for sup.
//!
//! A `Theme` holds one `ratatui::style::Color` per UI surface plus a
//! [`Theme::badge_style`] lookup from status badge to style, which is all the
//! renderer needs. Three built-in themes are provided:
//!
//! - `dark` — ANSI 16 colors; works on any terminal.
//! - `classic` — the xterm 256-color palette.
//! - `catppuccin_mocha` — Catppuccin Mocha in RGB; requires truecolor.

use ratatui::style::{Color, Modifier, Style};
use sup_core::types::Badge;

/// Name used when neither the command line nor the config picks a theme.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// All color values used across sup's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Status badges
    pub badge_draft: Color,
    pub badge_approved: Color,
    pub badge_denied: Color,
    pub badge_commented: Color,
    pub badge_review: Color,
    pub badge_open: Color,

    // Table
    /// Foreground of the cursor row.
    pub selected_fg: Color,
    /// Background of the cursor row.
    pub selected_bg: Color,
    /// Column header and separator rule.
    pub header: Color,
    pub branch: Color,
    pub additions: Color,
    pub deletions: Color,

    // Chrome
    /// Filter prompt.
    pub filter: Color,
    /// Key legend and footer counts.
    pub help: Color,
    /// Spinner and loading text.
    pub loading: Color,
    pub error: Color,
}

impl Theme {
    /// Built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            badge_draft: Color::DarkGray,
            badge_approved: Color::Green,
            badge_denied: Color::Red,
            badge_commented: Color::LightCyan,
            badge_review: Color::Yellow,
            badge_open: Color::Blue,

            selected_fg: Color::White,
            selected_bg: Color::Magenta,
            header: Color::Gray,
            branch: Color::LightMagenta,
            additions: Color::Green,
            deletions: Color::Red,

            filter: Color::LightMagenta,
            help: Color::DarkGray,
            loading: Color::Yellow,
            error: Color::Red,
        }
    }

    /// xterm 256-color palette.
    pub fn classic() -> Self {
        Self {
            badge_draft: Color::Indexed(241),
            badge_approved: Color::Indexed(78),
            badge_denied: Color::Indexed(196),
            badge_commented: Color::Indexed(117),
            badge_review: Color::Indexed(214),
            badge_open: Color::Indexed(39),

            selected_fg: Color::Indexed(229),
            selected_bg: Color::Indexed(57),
            header: Color::Indexed(240),
            branch: Color::Indexed(141),
            additions: Color::Indexed(78),
            deletions: Color::Indexed(196),

            filter: Color::Indexed(205),
            help: Color::Indexed(241),
            loading: Color::Indexed(214),
            error: Color::Indexed(196),
        }
    }

    /// Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let sky = Color::Rgb(137, 220, 235); // #89dceb
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7
        let pink = Color::Rgb(245, 194, 231); // #f5c2e7
        let peach = Color::Rgb(250, 179, 135); // #fab387
        let overlay0 = Color::Rgb(108, 112, 134); // #6c7086
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let text = Color::Rgb(205, 214, 244); // #cdd6f4

        Self {
            badge_draft: overlay0,
            badge_approved: green,
            badge_denied: red,
            badge_commented: sky,
            badge_review: peach,
            badge_open: blue,

            selected_fg: text,
            selected_bg: surface1,
            header: overlay1,
            branch: mauve,
            additions: green,
            deletions: red,

            filter: pink,
            help: overlay0,
            loading: yellow,
            error: red,
        }
    }

    /// Resolves a theme name to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup; the fallback is logged.
    ///
    /// # Arguments
    ///
    /// * `name` — theme name, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "classic" => Self::classic(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    /// Style for a status badge.
    pub fn badge_style(&self, badge: Badge) -> Style {
        let color = match badge {
            Badge::Draft => self.badge_draft,
            Badge::Approved => self.badge_approved,
            Badge::Denied => self.badge_denied,
            Badge::Commented => self.badge_commented,
            Badge::Review => self.badge_review,
            Badge::Open => self.badge_open,
        };
        Style::default().fg(color)
    }

    /// Style applied across the whole cursor row.
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn filter_style(&self) -> Style {
        Style::default().fg(self.filter).add_modifier(Modifier::BOLD)
    }

    pub fn help_style(&self) -> Style {
        Style::default().fg(self.help)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert_eq!(Theme::from_name("classic").badge_open, Color::Indexed(39));
        assert_eq!(Theme::from_name("dark").badge_open, Color::Blue);
        assert_eq!(
            Theme::from_name(DEFAULT_THEME).badge_open,
            Theme::catppuccin_mocha().badge_open
        );
    }

    #[test]
    fn unknown_name_falls_back_to_dark() {
        assert_eq!(Theme::from_name("solarized").badge_approved, Color::Green);
    }

    #[test]
    fn every_badge_has_a_distinct_color() {
        let theme = Theme::dark();
        let badges = [
            Badge::Draft,
            Badge::Approved,
            Badge::Denied,
            Badge::Commented,
            Badge::Review,
            Badge::Open,
        ];
        let colors: std::collections::HashSet<_> =
            badges.iter().map(|b| theme.badge_style(*b).fg).collect();
        assert_eq!(colors.len(), badges.len());
    }
}
