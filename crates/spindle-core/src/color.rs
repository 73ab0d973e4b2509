#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0, 255);

    /// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`. Malformed input
    /// yields opaque black.
    pub fn from_hex(hex: &str) -> Self {
        parse_hex(hex.trim_start_matches('#')).unwrap_or(Color::BLACK)
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Color(self.0, self.1, self.2, a)
    }

    /// `#rrggbb` when opaque, `rgba(...)` otherwise.
    pub fn to_css(self) -> String {
        if self.3 == 255 {
            format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
        } else {
            let alpha = f64::from(self.3) / 255.0;
            format!(
                "rgba({}, {}, {}, {})",
                self.0,
                self.1,
                self.2,
                crate::style::css_number((alpha * 1000.0).round() / 1000.0)
            )
        }
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    if !s.is_ascii() {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&s[i..i + 1], 16).ok().map(|d| d * 17);
    let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
    match s.len() {
        3 => Some(Color(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        4 => Some(Color(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}
