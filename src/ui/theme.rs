use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub warning: Color,   // Yellow
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub comparing: Color,
    pub swapping: Color,
    pub shifting: Color,
    pub pivot: Color,
    pub sorted: Color,
    pub disk: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    warning: Color::Rgb(249, 226, 175),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for status bar
    comparing: Color::Rgb(249, 226, 175),      // Yellow while two values are compared
    swapping: Color::Rgb(243, 139, 168),       // Red for exchanged values
    shifting: Color::Rgb(250, 179, 135),       // Orange for shifted values
    pivot: Color::Rgb(245, 194, 231),          // Pink for the quick sort pivot
    sorted: Color::Rgb(166, 227, 161),         // Green once in final position
    disk: Color::Rgb(148, 226, 213),           // Teal for Hanoi disks
};
