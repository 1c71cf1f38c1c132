//! Full-screen rendering

use ratatui::{
    backend::Backend,
    layout::{Constraint, Layout},
    Frame, Terminal,
};
use sndsw_app::{MenuRenderer, MenuView};
use sndsw_core::prelude::*;

use crate::widgets::{DeviceMenu, StatusBar, TitleBar};

/// Draw the whole screen: title bar, device menu, status bar
pub fn view(frame: &mut Frame, title: &str, menu: &MenuView<'_>) {
    let [title_area, menu_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(TitleBar::new(title), title_area);
    frame.render_widget(DeviceMenu::new(menu), menu_area);
    frame.render_widget(StatusBar::new(menu.current), status_area);
}

/// [`MenuRenderer`] drawing into a ratatui terminal
pub struct TuiRenderer<B: Backend> {
    terminal: Terminal<B>,
    title: String,
}

impl<B: Backend> TuiRenderer<B> {
    pub fn new(terminal: Terminal<B>, title: impl Into<String>) -> Self {
        Self {
            terminal,
            title: title.into(),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> MenuRenderer for TuiRenderer<B> {
    fn render(&mut self, menu: &MenuView<'_>) -> Result<()> {
        let title = &self.title;
        self.terminal
            .draw(|frame| view(frame, title, menu))
            .map_err(|e| Error::terminal(e.to_string()))?;
        Ok(())
    }
}
