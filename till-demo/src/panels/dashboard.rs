//! Revenue dashboard with a background refresh task.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use till_nav::{Content, ContentController, HookError, Navigator, StateMap, WorkSet};

use crate::model::{money, SharedStore};
use crate::panels::{Panel, PanelCommand, PanelView};
use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Default, Clone)]
struct DashboardStats {
    ticks: u64,
    revenue_cents: i64,
    sale_count: usize,
}

struct DashboardPanel {
    store: SharedStore,
    stats: Arc<Mutex<DashboardStats>>,
}

struct DashboardController {
    store: SharedStore,
    stats: Arc<Mutex<DashboardStats>>,
    work: WorkSet,
}

pub fn dashboard_factory(
    store: SharedStore,
) -> impl Fn(Navigator<PanelView>) -> Content<PanelView> + Send + Sync {
    move |_nav| {
        let stats = Arc::new(Mutex::new(DashboardStats::default()));
        let panel = DashboardPanel {
            store: store.clone(),
            stats: Arc::clone(&stats),
        };
        Content::new(Box::new(panel) as PanelView).with_controller(DashboardController {
            store: store.clone(),
            stats,
            work: WorkSet::new(),
        })
    }
}

#[async_trait]
impl ContentController for DashboardController {
    async fn initialize(&mut self, _parameters: StateMap) -> Result<(), HookError> {
        let store = self.store.clone();
        let stats = Arc::clone(&self.stats);
        self.work.spawn(async move {
            loop {
                {
                    let snapshot = store.lock().expect("store lock poisoned");
                    let mut stats = stats.lock().expect("stats lock poisoned");
                    stats.ticks += 1;
                    stats.revenue_cents = snapshot.revenue_cents();
                    stats.sale_count = snapshot.sales.len();
                }
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        });
        Ok(())
    }

    async fn prepare_for_exit(&mut self) -> Result<(), HookError> {
        // Nothing may keep ticking against a view that left the surface.
        self.work.abort_all();
        Ok(())
    }
}

impl Panel for DashboardPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let stats = self.stats.lock().expect("stats lock poisoned").clone();
        let low = {
            let store = self.store.lock().expect("store lock poisoned");
            store
                .low_stock(20)
                .iter()
                .map(|product| format!("{}: {} left", product.name, product.stock))
                .collect::<Vec<_>>()
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);
        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(rows[0]);

        let tile = |title: &str, value: String| {
            Paragraph::new(Line::styled(
                value,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
            .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        };
        frame.render_widget(tile("Revenue", money(stats.revenue_cents)), tiles[0]);
        frame.render_widget(tile("Sales", stats.sale_count.to_string()), tiles[1]);
        frame.render_widget(tile("Refreshes", stats.ticks.to_string()), tiles[2]);

        let mut lines: Vec<Line> = low.into_iter().map(Line::from).collect();
        if lines.is_empty() {
            lines.push(Line::styled("all stocked", Style::default().fg(Color::Green)));
        }
        let alerts = Paragraph::new(lines).block(
            Block::default()
                .title("Reorder alerts (≤ 20)")
                .borders(Borders::ALL),
        );
        frame.render_widget(alerts, rows[1]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> PanelCommand {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => PanelCommand::Back,
            _ => PanelCommand::None,
        }
    }
}
