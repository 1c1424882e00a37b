//! UI Theme Module - Consistent color palette and style helpers
//!
//! Provides a centralized theme for the terminal front end:
//! - Palette tokens (not hard-coded colors)
//! - StyleKit helpers for common states
//! - Dark defaults close to the libadwaita dark style

use ratatui::style::{Color, Modifier, Style};

use dusky_core::dispatch::DispatchOutcome;

/// Color palette tokens for the theme
#[derive(Clone, Debug)]
pub struct Palette {
    /// Panel border color
    pub panel_border: Color,
    /// Primary text color
    pub text: Color,
    /// Dimmed text (descriptions)
    pub text_dim: Color,
    /// Muted text (group headers, disabled)
    pub text_muted: Color,
    /// Accent color (highlights, focus)
    pub accent: Color,
    /// Success state (launched)
    pub success: Color,
    /// Warning state (nothing to run)
    pub warn: Color,
    /// Error state (launch failed)
    pub error: Color,
    /// Selection background
    pub selection_bg: Color,
    /// Selection foreground
    pub selection_fg: Color,
    /// Key hint text
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            panel_border: Color::Rgb(60, 60, 60),
            text: Color::Rgb(222, 221, 218),
            text_dim: Color::Rgb(154, 153, 150),
            text_muted: Color::Rgb(119, 118, 123),
            accent: Color::Rgb(120, 174, 237), // Adwaita blue
            success: Color::Rgb(143, 240, 164),
            warn: Color::Rgb(248, 228, 92),
            error: Color::Rgb(246, 97, 81),
            selection_bg: Color::Rgb(53, 132, 228),
            selection_fg: Color::White,
            key_hint: Color::Rgb(255, 163, 72),
        }
    }
}

/// Theme configuration
#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    // ========== StyleKit Helper Functions ==========

    /// Style for the last dispatch result in the status line
    pub fn outcome_style(&self, outcome: &DispatchOutcome) -> Style {
        let color = match outcome {
            DispatchOutcome::Spawned(_) => self.palette.success,
            DispatchOutcome::Skipped => self.palette.warn,
            DispatchOutcome::Failed(_) => self.palette.error,
        };
        Style::default().fg(color)
    }

    /// Icon for the last dispatch result
    pub fn outcome_icon(&self, outcome: &DispatchOutcome) -> &'static str {
        match outcome {
            DispatchOutcome::Spawned(_) => "●",
            DispatchOutcome::Skipped => "○",
            DispatchOutcome::Failed(_) => "✗",
        }
    }

    /// Style for tab/page labels
    pub fn tab_style(&self, active: bool) -> Style {
        if active {
            Style::default()
                .fg(self.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.text_dim)
        }
    }

    /// Style for key hints in footer
    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }

    /// Style for subtle borders
    pub fn subtle_border_style(&self) -> Style {
        Style::default().fg(self.palette.panel_border)
    }

    /// Style for focused borders
    pub fn focused_border_style(&self) -> Style {
        Style::default().fg(self.palette.accent)
    }

    /// Style for selected items
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.palette.selection_bg)
            .fg(self.palette.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    pub fn text_dim_style(&self) -> Style {
        Style::default().fg(self.palette.text_dim)
    }

    pub fn text_muted_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    /// Style for section (group) headers
    pub fn section_header_style(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }
}

static DEFAULT_THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Get the default theme
pub fn theme() -> &'static Theme {
    DEFAULT_THEME.get_or_init(Theme::default)
}

/// Convenience re-exports for common use cases
pub mod styles {
    use super::*;

    pub fn outcome(outcome: &DispatchOutcome) -> Style {
        theme().outcome_style(outcome)
    }

    pub fn outcome_icon(outcome: &DispatchOutcome) -> &'static str {
        theme().outcome_icon(outcome)
    }

    pub fn tab(active: bool) -> Style {
        theme().tab_style(active)
    }

    pub fn key_hint() -> Style {
        theme().key_hint_style()
    }

    pub fn border_subtle() -> Style {
        theme().subtle_border_style()
    }

    pub fn border_focused() -> Style {
        theme().focused_border_style()
    }

    pub fn selection() -> Style {
        theme().selection_style()
    }

    pub fn text() -> Style {
        theme().text_style()
    }

    pub fn text_dim() -> Style {
        theme().text_dim_style()
    }

    pub fn text_muted() -> Style {
        theme().text_muted_style()
    }

    pub fn section_header() -> Style {
        theme().section_header_style()
    }
}
