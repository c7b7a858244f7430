use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const EMPTY: Color = Color::BrightBlack;

pub const EMAIL: Color = Color::BrightBlue;
pub const PHONE: Color = Color::Cyan;
pub const COMPANY: Color = Color::Yellow;
pub const GROUP: Color = Color::Magenta;

pub const OLD_VALUE: Color = Color::Red;
pub const NEW_VALUE: Color = Color::Green;
