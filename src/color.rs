pub const LIGHT_TEXT: &str = "#ffffff";
pub const DARK_TEXT: &str = "#000000";

/// `#rrggbb` or `rrggbb`, anything after the sixth digit is ignored
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let digits = color.strip_prefix('#').unwrap_or(color);
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
    };

    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn relative_luminance((r, g, b): (u8, u8, u8)) -> f64 {
    let linear = |channel: u8| {
        let channel = f64::from(channel) / 255.0;
        if channel <= 0.03928 {
            channel / 12.92
        } else {
            ((channel + 0.055) / 1.055).powf(2.4)
        }
    };

    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Text color that stays readable on a tag painted with `background`
pub fn pick_text_color<'a>(background: Option<&str>, light: &'a str, dark: &'a str) -> &'a str {
    match background.and_then(parse_hex) {
        Some(rgb) if relative_luminance(rgb) <= 0.179 => light,
        _ => dark,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(parse_hex("#0055a4"), Some((0x00, 0x55, 0xa4)));
        assert_eq!(parse_hex("ff8000"), Some((0xff, 0x80, 0x00)));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }

    #[test]
    fn dark_backgrounds_get_light_text() {
        assert_eq!(pick_text_color(Some("#000000"), LIGHT_TEXT, DARK_TEXT), LIGHT_TEXT);
        assert_eq!(pick_text_color(Some("#0055a4"), LIGHT_TEXT, DARK_TEXT), LIGHT_TEXT);
        assert_eq!(pick_text_color(Some("#eeeeee"), LIGHT_TEXT, DARK_TEXT), DARK_TEXT);
        assert_eq!(pick_text_color(Some("#ffff00"), LIGHT_TEXT, DARK_TEXT), DARK_TEXT);
    }

    #[test]
    fn missing_or_broken_background_gets_dark_text() {
        assert_eq!(pick_text_color(None, LIGHT_TEXT, DARK_TEXT), DARK_TEXT);
        assert_eq!(pick_text_color(Some("blue"), LIGHT_TEXT, DARK_TEXT), DARK_TEXT);
    }
}
