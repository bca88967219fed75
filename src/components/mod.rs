use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::host::Host;
use crate::ui::UiFrame;

pub mod auto_height;

pub use auto_height::{AutoHeight, AutoHeightState};

pub use crate::component_context::ComponentContext;

pub trait Component {
    fn resize(&mut self, _area: Rect, _host: &mut Host) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _host: &mut Host, _ctx: &ComponentContext) -> bool {
        false
    }
}
