use ratatui::style::Color;
use sitefx_core::notify::ToastKind;

/// Runtime theme for the terminal preview
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Palette colors
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub blue: Color,

    // Semantic colors
    pub accent: Color,
    pub hidden: Color,
    pub heading: Color,
    pub stat: Color,
    pub active_link: Color,
    pub info: Color,
    pub success: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Dark slate with the construction gold accent
        Self {
            bg0: Color::Rgb(0x1a, 0x20, 0x2c),
            bg1: Color::Rgb(0x2d, 0x37, 0x48),
            bg2: Color::Rgb(0x4a, 0x55, 0x68),
            fg0: Color::Rgb(0xe2, 0xe8, 0xf0),
            fg1: Color::Rgb(0xf7, 0xfa, 0xfc),
            grey0: Color::Rgb(0x4a, 0x55, 0x68),
            grey1: Color::Rgb(0xa0, 0xae, 0xc0),
            red: Color::Rgb(0xef, 0x44, 0x44),
            yellow: Color::Rgb(0xd6, 0x9e, 0x2e),
            green: Color::Rgb(0x10, 0xb9, 0x81),
            blue: Color::Rgb(0x3b, 0x82, 0xf6),
            accent: Color::Rgb(0xd6, 0x9e, 0x2e),
            hidden: Color::Rgb(0x4a, 0x55, 0x68),
            heading: Color::Rgb(0xf7, 0xfa, 0xfc),
            stat: Color::Rgb(0xd6, 0x9e, 0x2e),
            active_link: Color::Rgb(0xd6, 0x9e, 0x2e),
            info: Color::Rgb(0x3b, 0x82, 0xf6),
            success: Color::Rgb(0x10, 0xb9, 0x81),
            error: Color::Rgb(0xef, 0x44, 0x44),
        }
    }
}

impl Theme {
    pub fn toast(&self, kind: ToastKind) -> Color {
        match kind {
            ToastKind::Info => self.info,
            ToastKind::Success => self.success,
            ToastKind::Error => self.error,
        }
    }
}

/// Parse a `#rrggbb` or `#rgb` color
pub fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

/// Blend `color` toward `background` by `opacity` (0 = background, 1 = color)
pub fn blend(color: Color, background: Color, opacity: f64) -> Color {
    match (color, background) {
        (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => {
            let t = opacity.clamp(0.0, 1.0);
            let mix = |c: u8, b: u8| (b as f64 + (c as f64 - b as f64) * t).round() as u8;
            Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
        }
        _ => color,
    }
}
