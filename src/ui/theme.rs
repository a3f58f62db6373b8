use ratatui::style::{Color, Modifier, Style};

use crate::vim::VimMode;
use crate::wizard::PrimaryColor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub foreground: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub muted: Color,
    /// The contract's primary color, used where the document is previewed
    pub brand: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Yellow,
            secondary: Color::Cyan,
            background: Color::Reset,
            foreground: Color::White,
            error: Color::Red,
            success: Color::Green,
            border: Color::DarkGray,
            muted: Color::DarkGray,
            brand: brand_color(&PrimaryColor::default()),
        }
    }
}

pub fn brand_color(color: &PrimaryColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

impl Theme {
    /// Same palette with the brand swapped for `color`
    pub fn branded(&self, color: &PrimaryColor) -> Theme {
        Theme {
            brand: brand_color(color),
            ..self.clone()
        }
    }

    pub fn style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn primary_style(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn secondary_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn brand_style(&self) -> Style {
        Style::default().fg(self.brand)
    }

    pub fn mode_style(&self, mode: VimMode) -> Style {
        let color = match mode {
            VimMode::Normal => self.secondary,
            VimMode::Insert => self.success,
            VimMode::Command => self.primary,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
