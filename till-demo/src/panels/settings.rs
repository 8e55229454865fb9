//! Register settings. Deliberately has no controller: the router's default
//! no-op lifecycle path covers it.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use till_nav::{Content, Navigator};

use crate::model::SharedStore;
use crate::panels::{Panel, PanelCommand, PanelView};

struct SettingsPanel {
    store: SharedStore,
}

pub fn settings_factory(
    store: SharedStore,
) -> impl Fn(Navigator<PanelView>) -> Content<PanelView> + Send + Sync {
    move |_nav| {
        Content::new(Box::new(SettingsPanel {
            store: store.clone(),
        }) as PanelView)
    }
}

impl Panel for SettingsPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let tax_rate_bp = self.store.lock().expect("store lock poisoned").tax_rate_bp;
        let body = Paragraph::new(vec![
            Line::from(""),
            Line::from(format!("Tax rate: {}.{:02}%", tax_rate_bp / 100, tax_rate_bp % 100)),
            Line::from(""),
            Line::styled(
                "+/- adjust · Esc back",
                Style::default().fg(Color::DarkGray),
            ),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().title("Settings").borders(Borders::ALL));
        frame.render_widget(body, area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> PanelCommand {
        match key.code {
            KeyCode::Char('+') => {
                let mut store = self.store.lock().expect("store lock poisoned");
                store.tax_rate_bp = (store.tax_rate_bp + 25).min(2500);
                PanelCommand::None
            }
            KeyCode::Char('-') => {
                let mut store = self.store.lock().expect("store lock poisoned");
                store.tax_rate_bp = store.tax_rate_bp.saturating_sub(25);
                PanelCommand::None
            }
            KeyCode::Esc | KeyCode::Backspace => PanelCommand::Back,
            _ => PanelCommand::None,
        }
    }
}
