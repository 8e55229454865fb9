//! Stock list with a restock shortcut. The cursor survives back navigation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;
use till_nav::{Content, ContentController, HookError, Navigator, StateMap};

use crate::model::{money, SharedStore};
use crate::panels::{Panel, PanelCommand, PanelView};

struct InventoryPanel {
    store: SharedStore,
    cursor: Arc<Mutex<usize>>,
}

struct InventoryController {
    cursor: Arc<Mutex<usize>>,
}

pub fn inventory_factory(
    store: SharedStore,
) -> impl Fn(Navigator<PanelView>) -> Content<PanelView> + Send + Sync {
    move |_nav| {
        let cursor = Arc::new(Mutex::new(0));
        let panel = InventoryPanel {
            store: store.clone(),
            cursor: Arc::clone(&cursor),
        };
        Content::new(Box::new(panel) as PanelView).with_controller(InventoryController { cursor })
    }
}

#[async_trait]
impl ContentController for InventoryController {
    async fn initialize(&mut self, parameters: StateMap) -> Result<(), HookError> {
        if let Some(saved) = parameters.get_i64("cursor") {
            *self.cursor.lock().expect("cursor lock poisoned") = saved.max(0) as usize;
        }
        Ok(())
    }

    fn state(&self) -> StateMap {
        let cursor = *self.cursor.lock().expect("cursor lock poisoned");
        StateMap::new().with("cursor", cursor as i64)
    }
}

impl Panel for InventoryPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let cursor = *self.cursor.lock().expect("cursor lock poisoned");
        let store = self.store.lock().expect("store lock poisoned");

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(area);

        let items: Vec<ListItem> = store
            .products
            .iter()
            .enumerate()
            .map(|(index, product)| {
                let style = if index == cursor {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else if product.stock <= 20 {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                ListItem::new(Line::styled(
                    format!(
                        " {:<8} {:<16} {:>8}   {:>3} on hand",
                        product.sku,
                        product.name,
                        money(product.price_cents),
                        product.stock
                    ),
                    style,
                ))
            })
            .collect();
        let list = List::new(items).block(Block::default().title("Inventory").borders(Borders::ALL));
        frame.render_widget(list, chunks[0]);

        let help = Paragraph::new("↑/↓ move · r restock +10 · Esc back")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[1]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> PanelCommand {
        let mut cursor = self.cursor.lock().expect("cursor lock poisoned");
        match key.code {
            KeyCode::Up => *cursor = cursor.saturating_sub(1),
            KeyCode::Down => {
                let count = self.store.lock().expect("store lock poisoned").products.len();
                if *cursor + 1 < count {
                    *cursor += 1;
                }
            }
            KeyCode::Char('r') => {
                let mut store = self.store.lock().expect("store lock poisoned");
                let index = *cursor;
                if let Some(product) = store.products.get_mut(index) {
                    product.stock += 10;
                }
            }
            KeyCode::Esc | KeyCode::Backspace => return PanelCommand::Back,
            _ => {}
        }
        PanelCommand::None
    }
}
