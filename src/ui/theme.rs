use ratatui::style::{Color, Modifier, Style};

use crate::models::Theme;

/// Colours for one UI theme. Dark is Catppuccin Mocha, light is Latte.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    pub(crate) header_bg: Color,
    pub(crate) header_fg: Color,
    pub(crate) accent: Color,
    pub(crate) green: Color,
    pub(crate) red: Color,
    pub(crate) yellow: Color,
    pub(crate) surface: Color,
    pub(crate) text: Color,
    pub(crate) text_dim: Color,
    pub(crate) overlay: Color,
    pub(crate) command_bg: Color,
}

pub(crate) const MOCHA: Palette = Palette {
    header_bg: Color::Rgb(30, 30, 46),
    header_fg: Color::Rgb(205, 214, 244),
    accent: Color::Rgb(137, 180, 250),
    green: Color::Rgb(166, 227, 161),
    red: Color::Rgb(243, 139, 168),
    yellow: Color::Rgb(249, 226, 175),
    surface: Color::Rgb(49, 50, 68),
    text: Color::Rgb(205, 214, 244),
    text_dim: Color::Rgb(127, 132, 156),
    overlay: Color::Rgb(69, 71, 90),
    command_bg: Color::Rgb(24, 24, 37),
};

pub(crate) const LATTE: Palette = Palette {
    header_bg: Color::Rgb(239, 241, 245),
    header_fg: Color::Rgb(76, 79, 105),
    accent: Color::Rgb(30, 102, 245),
    green: Color::Rgb(64, 160, 43),
    red: Color::Rgb(210, 15, 57),
    yellow: Color::Rgb(223, 142, 29),
    surface: Color::Rgb(204, 208, 218),
    text: Color::Rgb(76, 79, 105),
    text_dim: Color::Rgb(124, 127, 147),
    overlay: Color::Rgb(156, 160, 176),
    command_bg: Color::Rgb(230, 233, 239),
};

impl Palette {
    pub(crate) fn for_theme(theme: Theme) -> &'static Palette {
        match theme {
            Theme::Light => &LATTE,
            Theme::Dark => &MOCHA,
        }
    }

    pub(crate) fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn selected_style(&self) -> Style {
        Style::default().fg(self.header_bg).bg(self.accent)
    }

    pub(crate) fn normal_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub(crate) fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub(crate) fn income_style(&self) -> Style {
        Style::default().fg(self.green)
    }

    pub(crate) fn expense_style(&self) -> Style {
        Style::default().fg(self.red)
    }

    pub(crate) fn title_style(&self) -> Style {
        Style::default()
            .fg(self.text_dim)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn card_header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.surface)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn completed_style(&self) -> Style {
        Style::default()
            .fg(self.text_dim)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub(crate) fn command_bar_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.command_bg)
    }

    pub(crate) fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text_dim).bg(self.surface)
    }

    pub(crate) fn background_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.header_bg)
    }
}
