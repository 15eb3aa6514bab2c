use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub bar_bg: Color,
    pub scope_name: Color,
    pub value: Color,
    pub owned: Color,     // Bytes backing a binding
    pub temporary: Color, // Bytes of an unswept temporary
    pub free: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),
    bar_bg: Color::Rgb(50, 50, 70),
    scope_name: Color::Rgb(249, 226, 175),
    value: Color::Rgb(250, 179, 135),
    owned: Color::Rgb(148, 226, 213),
    temporary: Color::Rgb(245, 194, 231),
    free: Color::Rgb(69, 71, 90),
};
