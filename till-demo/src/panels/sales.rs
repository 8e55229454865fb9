//! Ring-up panel: pick a product, set a quantity, record the sale.
//!
//! The draft (cursor + quantity) lives in a form shared between the panel
//! and its controller, so it survives navigating away and back.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;
use till_nav::{Content, ContentController, HookError, Navigator, StateMap};

use crate::model::{money, SharedStore};
use crate::panels::{Panel, PanelCommand, PanelView};

#[derive(Debug, Default)]
struct SalesForm {
    selected: usize,
    qty: u32,
    receipt: Option<String>,
}

struct SalesPanel {
    store: SharedStore,
    form: Arc<Mutex<SalesForm>>,
}

struct SalesController {
    form: Arc<Mutex<SalesForm>>,
}

pub fn sales_factory(
    store: SharedStore,
) -> impl Fn(Navigator<PanelView>) -> Content<PanelView> + Send + Sync {
    move |_nav| {
        let form = Arc::new(Mutex::new(SalesForm {
            qty: 1,
            ..SalesForm::default()
        }));
        let panel = SalesPanel {
            store: store.clone(),
            form: Arc::clone(&form),
        };
        Content::new(Box::new(panel) as PanelView).with_controller(SalesController { form })
    }
}

#[async_trait]
impl ContentController for SalesController {
    async fn initialize(&mut self, parameters: StateMap) -> Result<(), HookError> {
        let mut form = self.form.lock().expect("form lock poisoned");
        if let Some(selected) = parameters.get_i64("selected") {
            form.selected = selected.max(0) as usize;
        }
        if let Some(qty) = parameters.get_i64("qty") {
            form.qty = qty.clamp(1, 999) as u32;
        }
        Ok(())
    }

    fn state(&self) -> StateMap {
        let form = self.form.lock().expect("form lock poisoned");
        StateMap::new()
            .with("selected", form.selected as i64)
            .with("qty", i64::from(form.qty))
    }
}

impl Panel for SalesPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let form = self.form.lock().expect("form lock poisoned");
        let store = self.store.lock().expect("store lock poisoned");

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3), Constraint::Length(2)])
            .split(area);

        let items: Vec<ListItem> = store
            .products
            .iter()
            .enumerate()
            .map(|(index, product)| {
                let style = if index == form.selected {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![Span::styled(
                    format!(
                        " {:<8} {:<16} {:>8}   stock {:>3}",
                        product.sku,
                        product.name,
                        money(product.price_cents),
                        product.stock
                    ),
                    style,
                )]))
            })
            .collect();
        let list = List::new(items).block(Block::default().title("Catalogue").borders(Borders::ALL));
        frame.render_widget(list, chunks[0]);

        let receipt = form.receipt.clone().unwrap_or_else(|| "-".to_string());
        let draft = Paragraph::new(format!("qty: {}    last receipt: {}", form.qty, receipt))
            .block(Block::default().title("Draft").borders(Borders::ALL));
        frame.render_widget(draft, chunks[1]);

        let help = Paragraph::new("↑/↓ product · +/- qty · Enter ring up · Esc back")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> PanelCommand {
        let mut form = self.form.lock().expect("form lock poisoned");
        match key.code {
            KeyCode::Up => form.selected = form.selected.saturating_sub(1),
            KeyCode::Down => {
                let count = self.store.lock().expect("store lock poisoned").products.len();
                if form.selected + 1 < count {
                    form.selected += 1;
                }
            }
            KeyCode::Char('+') => form.qty = (form.qty + 1).min(999),
            KeyCode::Char('-') => form.qty = form.qty.saturating_sub(1).max(1),
            KeyCode::Enter => {
                let mut store = self.store.lock().expect("store lock poisoned");
                let selected = form.selected;
                let qty = form.qty;
                form.receipt = match store.record_sale(selected, qty) {
                    Some(line) => Some(format!("{} x{} = {}", line.sku, line.qty, money(line.total_cents))),
                    None => Some("rejected (stock?)".to_string()),
                };
            }
            KeyCode::Esc | KeyCode::Backspace => return PanelCommand::Back,
            _ => {}
        }
        PanelCommand::None
    }
}
