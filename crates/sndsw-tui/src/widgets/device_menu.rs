//! Device menu widget
//!
//! A centered list of devices, one row each, `COLS - 4` wide. The row of
//! the device the server currently uses is marked with `*`.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use sndsw_app::MenuView;

use crate::theme::styles;

use super::fit_width;

/// Columns kept free on the left and right of the menu, in total
const MENU_MARGIN: u16 = 4;

const CURRENT_MARKER: &str = "* ";
const PLAIN_MARKER: &str = "  ";

pub struct DeviceMenu<'a> {
    view: &'a MenuView<'a>,
}

impl<'a> DeviceMenu<'a> {
    pub fn new(view: &'a MenuView<'a>) -> Self {
        Self { view }
    }

    fn render_waiting(area: Rect, buf: &mut Buffer) {
        let [row] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);
        Paragraph::new("Waiting for audio devices...")
            .style(styles::text_muted())
            .alignment(Alignment::Center)
            .render(row, buf);
    }
}

impl Widget for DeviceMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        if self.view.is_empty() {
            Self::render_waiting(area, buf);
            return;
        }

        let width = area.width.saturating_sub(MENU_MARGIN).max(1);
        let height = (self.view.entries.len() as u16).min(area.height);
        let menu_area = center_rect(width, height, area);
        let text_width = (width as usize).saturating_sub(CURRENT_MARKER.len());

        let items: Vec<ListItem> = self
            .view
            .entries
            .iter()
            .map(|entry| {
                let marker = if entry.device.is_current {
                    CURRENT_MARKER
                } else {
                    PLAIN_MARKER
                };
                let label = fit_width(entry.device.display_label(), text_width);
                ListItem::new(format!("{}{}", marker, label))
            })
            .collect();

        let list = List::new(items)
            .style(styles::menu_row())
            .highlight_style(styles::menu_highlight());
        let mut state = ListState::default().with_selected(self.view.cursor);
        StatefulWidget::render(list, menu_area, buf, &mut state);
    }
}

/// Center a rectangle within another rectangle
fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
