//! Console panels displayed through the content router.

pub mod dashboard;
pub mod inventory;
pub mod menu;
pub mod sales;
pub mod settings;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

pub use dashboard::dashboard_factory;
pub use inventory::inventory_factory;
pub use menu::menu_factory;
pub use sales::sales_factory;
pub use settings::settings_factory;

/// What a panel wants the console to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum PanelCommand {
    None,
    Navigate(String),
    Back,
    Quit,
}

/// A navigable unit of UI. Rendering and input stay in the demo; the router
/// only sees the boxed trait object.
pub trait Panel: Send {
    fn render(&mut self, frame: &mut Frame, area: Rect);

    fn handle_key(&mut self, key: KeyEvent) -> PanelCommand {
        let _ = key;
        PanelCommand::None
    }
}

/// The view type the router is instantiated with.
pub type PanelView = Box<dyn Panel>;
