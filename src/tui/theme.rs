use ratatui::style::{Color, Modifier, Style};

/// Color scheme for the viewer
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI colors
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub header_fg: Color,

    // Heatmap colors, interpolated by count
    pub heat_low: (u8, u8, u8),
    pub heat_high: (u8, u8, u8),
    pub cursor_fg: Color,
    pub cursor_bg: Color,

    /// Solid color the translucent histogram is composited over.
    pub histogram_bg: (u8, u8, u8),

    // Status colors
    pub error: Color,
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Default Dark".to_string(),
            background: Color::Reset,
            foreground: Color::Gray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            header_fg: Color::Cyan,
            heat_low: (20, 20, 60),
            heat_high: (250, 180, 30),
            cursor_fg: Color::Black,
            cursor_bg: Color::Yellow,
            histogram_bg: (24, 24, 32),
            error: Color::Red,
            info: Color::Blue,
        }
    }
}

impl Theme {
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Style for the hovered bucket
    pub fn cursor_style(&self) -> Style {
        Style::default()
            .fg(self.cursor_fg)
            .bg(self.cursor_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Cell color for a count at `fraction` of the column maximum (clamped to 0..=1).
    pub fn heat_color(&self, fraction: f64) -> Color {
        let t = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        let (lo, hi) = (self.heat_low, self.heat_high);
        Color::Rgb(mix(lo.0, hi.0), mix(lo.1, hi.1), mix(lo.2, hi.2))
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_color_endpoints() {
        let theme = Theme::default();
        assert_eq!(theme.heat_color(0.0), Color::Rgb(20, 20, 60));
        assert_eq!(theme.heat_color(1.0), Color::Rgb(250, 180, 30));
        assert_eq!(theme.heat_color(7.0), theme.heat_color(1.0));
        assert_eq!(theme.heat_color(f64::NAN), theme.heat_color(0.0));
    }

    #[test]
    fn test_style_helpers() {
        let theme = Theme::default();
        assert!(theme.header_style().add_modifier.contains(Modifier::BOLD));
        assert_eq!(theme.cursor_style().bg, Some(theme.cursor_bg));
        assert_ne!(theme.border_style(true), theme.border_style(false));
    }
}
