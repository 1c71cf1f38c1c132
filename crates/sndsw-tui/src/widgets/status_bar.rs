//! Status bar widget
//!
//! Shows which device the server currently uses as its default.

use ratatui::{buffer::Buffer, layout::Rect, text::Line, widgets::Widget};
use sndsw_core::Device;

use crate::theme::styles;

use super::fit_width;

pub struct StatusBar<'a> {
    current: Option<&'a Device>,
}

impl<'a> StatusBar<'a> {
    pub fn new(current: Option<&'a Device>) -> Self {
        Self { current }
    }

    fn text(&self) -> String {
        let label = self.current.map(|d| d.display_label()).unwrap_or("none");
        format!("Currently selected device: {}", label)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, styles::bar());
        let text = fit_width(&self.text(), area.width as usize);
        Line::from(text).style(styles::bar()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use sndsw_core::DeviceAddr;

    #[test]
    fn test_status_bar_shows_current_device() {
        let device = Device::new(DeviceAddr(2), "1", "snd/1").current();
        let mut term = TestTerminal::with_size(60, 1);
        term.render_widget(StatusBar::new(Some(&device)), term.area());
        assert!(term.buffer_contains("Currently selected device: snd/1"));
    }

    #[test]
    fn test_status_bar_without_current_device() {
        let mut term = TestTerminal::with_size(60, 1);
        term.render_widget(StatusBar::new(None), term.area());
        assert!(term.buffer_contains("Currently selected device: none"));
    }
}
