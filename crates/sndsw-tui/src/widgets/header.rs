//! Title bar widget

use ratatui::{buffer::Buffer, layout::Rect, text::Line, widgets::Widget};

use crate::theme::styles;

use super::fit_width;

/// One-line bar across the top of the screen
pub struct TitleBar<'a> {
    title: &'a str,
}

impl<'a> TitleBar<'a> {
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }
}

impl Widget for TitleBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, styles::bar());
        let text = fit_width(self.title, area.width as usize);
        Line::from(text).style(styles::bar()).render(area, buf);
    }
}
