//! Custom widget components

mod device_menu;
mod header;
mod status_bar;

use unicode_width::UnicodeWidthChar;

pub use device_menu::DeviceMenu;
pub use header::TitleBar;
pub use status_bar::StatusBar;

/// Cut `text` to at most `width` terminal columns and pad it with spaces to
/// exactly `width`.
pub fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width_pads_short_text() {
        assert_eq!(fit_width("abc", 5), "abc  ");
    }

    #[test]
    fn test_fit_width_truncates_long_text() {
        assert_eq!(fit_width("abcdef", 4), "abcd");
    }

    #[test]
    fn test_fit_width_counts_wide_characters() {
        // each CJK character takes two columns
        assert_eq!(fit_width("音声出力", 5), "音声 ");
    }

    #[test]
    fn test_fit_width_zero() {
        assert_eq!(fit_width("abc", 0), "");
    }
}
