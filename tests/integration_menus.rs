use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use term_ctxmenu::components::{Component, ComponentContext};
use term_ctxmenu::config::Metrics;
use term_ctxmenu::host::{EventTarget, Host, ListenerKind, WakeupSink};
use term_ctxmenu::layout::{Bounds, Point, Viewport};
use term_ctxmenu::menu::{ClickForMenu, ContextMenuHandler, HoverState, MenuEntry, Panel};

fn host() -> Host {
    Host::new(Viewport::new(80, 24)).with_metrics(Metrics::terminal())
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn right_click(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Down(MouseButton::Right), column, row)
}

fn left_click(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}

#[test]
fn reopening_during_grace_keeps_the_panel_mounted() {
    let mut host = host();
    let ctx = ComponentContext::default();
    let mut handler = ContextMenuHandler::new(vec![MenuEntry::text("Copy")]);
    handler.set_region(Bounds::new(0, 80, 0, 24));

    handler.handle_event(&right_click(3, 3), &mut host, &ctx);
    host.advance(&mut handler, ms(1));
    assert!(handler.is_visible());

    handler.close(&mut host);
    assert!(!handler.is_visible());
    assert!(handler.is_mounted());

    host.advance(&mut handler, ms(150));
    handler.handle_event(&right_click(10, 6), &mut host, &ctx);
    host.advance(&mut handler, ms(1));
    assert!(handler.is_visible());
    assert!(handler.is_mounted());
    assert_eq!(handler.panel_state().anchor, Point::new(10, 6));

    // the old grace timer was aborted, not merely outlived
    host.advance(&mut handler, ms(1000));
    assert!(handler.is_mounted());
    assert!(handler.is_visible());
}

#[test]
fn outside_press_closes_then_detaches() {
    let mut host = host();
    let mut handler = ContextMenuHandler::new(vec![MenuEntry::text("Copy")]);
    handler.set_region(Bounds::new(0, 40, 0, 12));
    handler.open_at(Point::new(2, 2), &mut host);
    host.advance(&mut handler, ms(1));
    assert_eq!(host.document.listener_count(ListenerKind::PointerDownCapture), 1);

    let target = EventTarget::Cell(Point::new(70, 20));
    assert!(handler.dismiss_outside(&target, &mut host));
    assert!(!handler.is_visible());
    assert_eq!(host.document.listener_count(ListenerKind::PointerDownCapture), 0);

    host.advance(&mut handler, ms(299));
    assert!(handler.is_mounted());
    host.advance(&mut handler, ms(1));
    assert!(!handler.is_mounted());
    assert_eq!(host.scheduler.pending_timers(), 0);
}

#[test]
fn press_inside_the_panel_is_not_outside() {
    let mut host = host();
    let mut handler = ContextMenuHandler::new(vec![MenuEntry::text("Copy")]);
    handler.set_region(Bounds::new(0, 80, 0, 24));
    handler.open_at(Point::new(2, 2), &mut host);
    host.advance(&mut handler, ms(1));
    assert!(!handler.dismiss_outside(&EventTarget::Cell(Point::new(4, 3)), &mut host));
    assert!(handler.is_visible());
}

#[test]
fn detached_target_counts_as_outside() {
    let mut host = host();
    let mut handler = ContextMenuHandler::new(vec![MenuEntry::text("Copy")]);
    handler.set_region(Bounds::new(0, 80, 0, 24));
    handler.open_at(Point::new(2, 2), &mut host);
    host.advance(&mut handler, ms(1));
    assert!(handler.dismiss_outside(&EventTarget::Detached, &mut host));
    assert!(!handler.is_visible());
}

#[test]
fn closed_menu_ignores_outside_presses() {
    let mut host = host();
    let mut handler = ContextMenuHandler::new(vec![MenuEntry::text("Copy")]);
    assert!(!handler.dismiss_outside(&EventTarget::Detached, &mut host));
    assert_eq!(handler.state(), HoverState::Idle);
    assert_eq!(host.scheduler.pending_timers(), 0);
}

#[test]
fn hover_submenu_survives_the_trip_to_the_child() {
    let mut host = host();
    let ctx = ComponentContext::default();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let mut handler = ContextMenuHandler::new(vec![
        MenuEntry::text("Copy"),
        MenuEntry::text("More").with_group(vec![
            MenuEntry::text("Deep").with_action(move |_, _| h.set(h.get() + 1)),
        ]),
    ]);
    handler.set_region(Bounds::new(0, 80, 0, 24));
    handler.open_at(Point::new(0, 0), &mut host);
    host.advance(&mut handler, ms(1));

    // the panel is nudged to (1, 1) by the margin, so "More" sits on row 3
    handler.handle_event(&mouse(MouseEventKind::Moved, 4, 3), &mut host, &ctx);
    host.advance(&mut handler, ms(1));
    let Some(Panel::Anchored(menu)) = handler.panel() else {
        panic!("anchored panel expected");
    };
    let child_origin = menu
        .submenu(1)
        .and_then(|slot| slot.child())
        .map(|child| child.origin())
        .expect("submenu should be open");

    let row = child_origin.y + 1;
    let column = child_origin.x + 2;
    handler.handle_event(
        &mouse(MouseEventKind::Moved, column as u16, row as u16),
        &mut host,
        &ctx,
    );
    host.advance(&mut handler, ms(500));
    let Some(Panel::Anchored(menu)) = handler.panel() else {
        panic!("anchored panel expected");
    };
    assert!(menu.submenu(1).is_some_and(|slot| slot.is_visible()));

    assert!(handler.handle_event(&left_click(column as u16, row as u16), &mut host, &ctx));
    assert_eq!(hits.get(), 1);
    assert!(!handler.is_visible());
}

#[test]
fn click_menu_and_context_menu_live_side_by_side() {
    let mut host = host();
    let ctx = ComponentContext::default();
    let mut button = ClickForMenu::new(vec![MenuEntry::text("Rename")]);
    button.set_region(Bounds::new(40, 50, 2, 3));
    let mut handler = ContextMenuHandler::new(vec![MenuEntry::text("Copy")]);
    handler.set_region(Bounds::new(0, 80, 0, 24));

    handler.handle_event(&right_click(5, 5), &mut host, &ctx);
    {
        let mut sinks: [&mut dyn WakeupSink; 2] = [&mut button, &mut handler];
        host.advance(&mut sinks[..], ms(1));
    }
    assert!(handler.is_visible());

    // the press on the button first reaches every outside listener
    let press = left_click(42, 2);
    let Event::Mouse(raw) = &press else { unreachable!() };
    let target = EventTarget::from_mouse(raw);
    handler.dismiss_outside(&target, &mut host);
    button.dismiss_outside(&target, &mut host);
    assert!(button.handle_event(&press, &mut host, &ctx));
    {
        let mut sinks: [&mut dyn WakeupSink; 2] = [&mut button, &mut handler];
        host.advance(&mut sinks[..], ms(1));
    }
    assert!(!handler.is_visible());
    assert!(button.is_visible());
    assert_eq!(host.document.listener_count(ListenerKind::PointerDownCapture), 1);
}

#[test]
fn unmount_releases_everything() {
    let mut host = host();
    let mut handler = ContextMenuHandler::low(vec![
        MenuEntry::text("Bold"),
        MenuEntry::text("Heading").with_group(vec![MenuEntry::text("H1")]),
    ]);
    handler.set_region(Bounds::new(10, 40, 5, 8));
    handler.open_at(Point::new(12, 6), &mut host);
    host.advance(&mut handler, ms(1));
    assert!(matches!(handler.panel(), Some(Panel::Low(_))));
    handler.unmount(&mut host);
    assert!(handler.panel().is_none());
    assert_eq!(host.document.total_listeners(), 0);
    assert_eq!(host.scheduler.pending_timers(), 0);
}

#[test]
fn open_menu_draws_through_a_terminal() {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use term_ctxmenu::ui::UiFrame;

    let mut host = host();
    let mut handler = ContextMenuHandler::new(vec![
        MenuEntry::text("Copy"),
        MenuEntry::divider(),
        MenuEntry::text("More").with_group(vec![MenuEntry::text("Deep")]),
    ]);
    handler.set_region(Bounds::new(0, 80, 0, 24));
    handler.open_at(Point::new(5, 5), &mut host);
    host.advance(&mut handler, ms(1));

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("test backend");
    terminal
        .draw(|frame| {
            let area = frame.area();
            let mut ui = UiFrame::new(frame);
            handler.render(&mut ui, area, &ComponentContext::default());
        })
        .expect("draw");
    let buffer = terminal.backend().buffer();
    let row = |y: u16| -> String { (0..80u16).map(|x| buffer[(x, y)].symbol()).collect() };
    assert!(row(6).contains("Copy"));
    assert!(row(8).contains("More"));
    assert!(row(8).contains('▸'));
}
