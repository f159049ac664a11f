use ratatui::style::Color;

// Dark grays with a teal accent; semantic colors stay few.
pub const BAR_BG: Color = Color::Rgb(14, 18, 24);
pub const SURFACE: Color = Color::Rgb(17, 21, 27);
pub const ROW_ALT: Color = Color::Rgb(23, 28, 36);

pub const FG: Color = Color::Rgb(229, 231, 235);
pub const MUTED: Color = Color::Rgb(156, 163, 175);
pub const DIM: Color = Color::Rgb(107, 114, 128);
pub const BORDER: Color = Color::Rgb(55, 65, 81);

pub const ACCENT: Color = Color::Rgb(45, 212, 191);
pub const ACCENT_BG: Color = Color::Rgb(17, 48, 46);

pub const SUCCESS: Color = Color::Rgb(134, 239, 172); // last load time
pub const ERROR: Color = Color::Rgb(248, 113, 113); // stored fetch error
