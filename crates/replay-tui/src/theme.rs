use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Grid border color
    pub border: Color,
    /// Box border color (thicker 3x3 separators)
    pub box_border: Color,
    /// Given (puzzle) cell color
    pub given: Color,
    /// Digit written by a replayed step
    pub placed: Color,
    /// Background of the cell the current step just wrote
    pub step_bg: Color,
    /// Cursor cell background while editing
    pub cursor_bg: Color,
    /// Failure message color
    pub error: Color,
    /// Success message color
    pub success: Color,
    /// Info panel text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            box_border: Color::Rgb { r: 130, g: 140, b: 170 },
            given: Color::Rgb { r: 255, g: 255, b: 255 },
            placed: Color::Rgb { r: 80, g: 180, b: 255 },
            step_bg: Color::Rgb { r: 200, g: 40, b: 40 },
            cursor_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            box_border: Color::Rgb { r: 60, g: 60, b: 80 },
            given: Color::Rgb { r: 0, g: 0, b: 0 },
            placed: Color::Rgb { r: 30, g: 100, b: 200 },
            step_bg: Color::Rgb { r: 235, g: 120, b: 120 },
            cursor_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            border: Color::Grey,
            box_border: Color::White,
            given: Color::Yellow,
            placed: Color::Cyan,
            step_bg: Color::Red,
            cursor_bg: Color::Blue,
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
        }
    }
}
