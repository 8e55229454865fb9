//! Console shell: router wiring, terminal lifecycle, event loop.

use std::io::{self, stdout};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use till_nav::{
    register_contents, Container, ContentRouter, Error, RouterObserver, SharedView, StateMap,
};

use crate::model::shared_store;
use crate::panels::{
    dashboard_factory, inventory_factory, menu_factory, sales_factory, settings_factory,
    PanelCommand, PanelView,
};

type Slot = Arc<Mutex<Option<(String, SharedView<PanelView>)>>>;

/// The display surface the router attaches views to. The render loop draws
/// whatever occupies the slot.
struct PanelSurface {
    slot: Slot,
}

impl Container<PanelView> for PanelSurface {
    fn attach(&mut self, id: &str, view: &SharedView<PanelView>) {
        *self.slot.lock().expect("surface lock poisoned") =
            Some((id.to_string(), Arc::clone(view)));
    }

    fn release(&mut self, id: &str, _view: &SharedView<PanelView>) {
        let mut slot = self.slot.lock().expect("surface lock poisoned");
        if slot.as_ref().map_or(false, |(current, _)| current == id) {
            *slot = None;
        }
    }
}

/// Mirrors navigation events into the footer status line.
struct StatusObserver {
    line: Arc<Mutex<String>>,
}

impl RouterObserver<PanelView> for StatusObserver {
    fn content_changing(&mut self, from: Option<&str>, to: &str) {
        tracing::info!(from = from.unwrap_or("-"), to, "navigation");
    }

    fn content_changed(&mut self, id: &str, _view: &SharedView<PanelView>) {
        *self.line.lock().expect("status lock poisoned") = format!("showing {id}");
    }

    fn navigation_error(&mut self, error: &Error) {
        *self.line.lock().expect("status lock poisoned") = error.to_string();
    }
}

pub struct Console {
    router: ContentRouter<PanelView>,
    slot: Slot,
    status: Arc<Mutex<String>>,
}

impl Console {
    pub fn new() -> Self {
        let slot: Slot = Arc::new(Mutex::new(None));
        let status = Arc::new(Mutex::new(String::from("ready")));

        let router = ContentRouter::new(PanelSurface {
            slot: Arc::clone(&slot),
        });
        router.add_observer(StatusObserver {
            line: Arc::clone(&status),
        });

        let store = shared_store();
        register_contents! { router,
            "menu" => menu_factory,
            "settings" => settings_factory(store.clone()),
        }
        router.register_with_metadata(
            "dashboard",
            dashboard_factory(store.clone()),
            StateMap::new().with("title", "Dashboard"),
        );
        router.register_with_metadata(
            "sales",
            sales_factory(store.clone()),
            StateMap::new().with("title", "Sales"),
        );
        router.register_with_metadata(
            "inventory",
            inventory_factory(store),
            StateMap::new().with("title", "Inventory"),
        );

        Self {
            router,
            slot,
            status,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(out);
        let mut terminal = Terminal::new(backend)?;

        self.router.show_content("menu", true, StateMap::new()).await;
        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            let command = match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    match self.router.current_view() {
                        Some(view) => {
                            let mut view =
                                view.lock().map_err(|_| anyhow!("view lock poisoned"))?;
                            view.handle_key(key)
                        }
                        // Idle (e.g. after a failed swap): only quit keys work.
                        None if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) => {
                            PanelCommand::Quit
                        }
                        None => PanelCommand::None,
                    }
                }
                _ => PanelCommand::None,
            };

            match command {
                PanelCommand::None => {}
                PanelCommand::Navigate(id) => {
                    self.router.show_content(&id, true, StateMap::new()).await;
                }
                PanelCommand::Back => {
                    self.router.navigate_back().await;
                }
                PanelCommand::Quit => break,
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let title = self
            .router
            .current_id()
            .map(|id| {
                self.router
                    .metadata(&id)
                    .and_then(|meta| meta.get_str("title").map(str::to_string))
                    .unwrap_or(id)
            })
            .unwrap_or_else(|| "idle".to_string());
        let header = Paragraph::new(format!(" till · {title}")).style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(header, chunks[0]);

        match self.slot.lock().expect("surface lock poisoned").as_ref() {
            Some((_, view)) => {
                view.lock().expect("view lock poisoned").render(frame, chunks[1]);
            }
            None => {
                let placeholder = Paragraph::new("no panel on display (q quits)")
                    .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(placeholder, chunks[1]);
            }
        }

        let status = self.status.lock().expect("status lock poisoned").clone();
        let footer = Paragraph::new(format!(
            " {status} · history {}",
            self.router.history_len()
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(footer, chunks[2]);
    }
}
