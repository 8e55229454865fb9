//! Landing menu listing every registered panel.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph};
use ratatui::Frame;
use till_nav::{Content, Navigator};

use crate::panels::{Panel, PanelCommand, PanelView};

pub struct MenuPanel {
    entries: Vec<(String, String)>,
    selected: usize,
}

/// Builds the menu from the live registry: every id except the menu itself,
/// titled by registration metadata when present.
pub fn menu_factory(nav: Navigator<PanelView>) -> Content<PanelView> {
    let entries = nav
        .upgrade()
        .map(|router| {
            router
                .registered_ids()
                .into_iter()
                .filter(|id| id != "menu")
                .map(|id| {
                    let title = router
                        .metadata(&id)
                        .and_then(|meta| meta.get_str("title").map(str::to_string))
                        .unwrap_or_else(|| id.clone());
                    (id, title)
                })
                .collect()
        })
        .unwrap_or_default();

    Content::new(Box::new(MenuPanel {
        entries,
        selected: 0,
    }) as PanelView)
}

impl Panel for MenuPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(2)])
            .split(area);

        let banner = Paragraph::new(vec![
            Line::from(""),
            Line::styled(
                "TILL · back office",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(banner, chunks[0]);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, (id, title))| {
                let style = if index == self.selected {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("  {title:<20}"), style),
                    Span::styled(format!("({id})"), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .title("Panels")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
        frame.render_widget(list, chunks[1]);

        let help = Paragraph::new("↑/↓ select · Enter open · q quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> PanelCommand {
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                PanelCommand::None
            }
            KeyCode::Down => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
                PanelCommand::None
            }
            KeyCode::Enter => match self.entries.get(self.selected) {
                Some((id, _)) => PanelCommand::Navigate(id.clone()),
                None => PanelCommand::None,
            },
            KeyCode::Char('q') | KeyCode::Esc => PanelCommand::Quit,
            _ => PanelCommand::None,
        }
    }
}
