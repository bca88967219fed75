use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{Event, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use term_ctxmenu::components::{AutoHeight, Component, ComponentContext};
use term_ctxmenu::config::Metrics;
use term_ctxmenu::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_ctxmenu::drivers::OutputDriver;
use term_ctxmenu::event_loop::{ControlFlow, EventLoop};
use term_ctxmenu::host::{EventTarget, Host, Wakeup, WakeupSink};
use term_ctxmenu::keybindings::{Action, KeyBindings};
use term_ctxmenu::layout::{Bounds, Point, Size, Viewport};
use term_ctxmenu::menu::{ClickForMenu, ContextMenuHandler, MenuEntry, SelectionTarget};
use term_ctxmenu::ui::UiFrame;
use term_ctxmenu::window::{FloatingWindow, WindowEvent, WindowStack};

#[derive(Parser, Debug)]
#[command(
    name = "term-ctxmenu",
    version = env!("CARGO_PKG_VERSION"),
    about = "Demo of context menus, floating windows and auto-height panels"
)]
struct Cli {
    /// Append debug logs to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Input poll interval; timers and frames advance at this granularity.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = 16)]
    tick_ms: u64,
}

#[derive(Debug, Clone)]
enum Command {
    OpenWindow(usize, Point),
    ToggleDetails,
    Status(String),
    Quit,
}

type Commands = Rc<RefCell<VecDeque<Command>>>;

fn push(commands: &Commands, command: Command) {
    commands.borrow_mut().push_back(command);
}

/// Plain text body used inside windows and the details panel.
#[derive(Debug)]
struct Note {
    text: String,
}

impl Component for Note {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let style = if ctx.dimmed() {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(self.text.as_str()).style(style).wrap(Wrap { trim: true }), area);
    }
}

struct Widgets {
    root: ContextMenuHandler,
    inner: ContextMenuHandler,
    low: ContextMenuHandler,
    button: ClickForMenu,
    details: AutoHeight,
    details_hidden: bool,
    windows: Vec<FloatingWindow>,
}

impl WakeupSink for Widgets {
    fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
        let mut handled = false;
        handled |= self.root.on_wakeup(wakeup, host);
        handled |= self.inner.on_wakeup(wakeup, host);
        handled |= self.low.on_wakeup(wakeup, host);
        handled |= self.button.on_wakeup(wakeup, host);
        handled |= self.details.on_wakeup(wakeup, host);
        for window in self.windows.iter_mut() {
            handled |= window.on_wakeup(wakeup, host);
        }
        handled
    }
}

struct App {
    host: Host,
    widgets: Widgets,
    commands: Commands,
    keys: KeyBindings,
    status: String,
}

const INNER: Rect = Rect::new(2, 3, 40, 8);
const LOW: Rect = Rect::new(2, 13, 40, 3);
const BUTTON: Rect = Rect::new(46, 3, 14, 1);
const DETAILS: Rect = Rect::new(46, 6, 30, 6);

fn window_entry(label: &str, index: usize, commands: &Commands) -> MenuEntry {
    let commands = commands.clone();
    MenuEntry::text(label).with_action(move |_, event| {
        let at = match event {
            Some(Event::Mouse(mouse)) => Point::from_cell(mouse.column, mouse.row),
            _ => Point::new(4, 4),
        };
        push(&commands, Command::OpenWindow(index, at));
    })
}

fn status_entry(label: &str, commands: &Commands) -> MenuEntry {
    let commands = commands.clone();
    let message = label.to_string();
    MenuEntry::text(label).with_action(move |target: Option<&SelectionTarget>, _| {
        let message = match target {
            Some(selection) => format!("{message} ({})", selection.text()),
            None => message.clone(),
        };
        push(&commands, Command::Status(message));
    })
}

impl App {
    fn new(viewport: Viewport) -> Self {
        let commands: Commands = Rc::new(RefCell::new(VecDeque::new()));
        let quit = {
            let commands = commands.clone();
            MenuEntry::text("Quit").with_action(move |_, _| push(&commands, Command::Quit))
        };
        let toggle = {
            let commands = commands.clone();
            MenuEntry::text("Toggle details").with_action(move |_, _| push(&commands, Command::ToggleDetails))
        };
        let root = ContextMenuHandler::new(vec![
            window_entry("Open notes", 0, &commands),
            window_entry("Open help", 1, &commands),
            toggle,
            MenuEntry::divider(),
            quit,
        ]);
        let mut inner = ContextMenuHandler::new(vec![
            status_entry("Copy", &commands),
            status_entry("Paste", &commands).disabled(true),
            MenuEntry::text("Colour").with_group(vec![
                status_entry("Red", &commands),
                status_entry("Green", &commands),
                status_entry("Blue", &commands),
            ]),
        ]);
        inner.set_selection(Some(SelectionTarget("demo text".to_string())));
        let low = ContextMenuHandler::low(vec![
            status_entry("Bold", &commands),
            status_entry("Italic", &commands),
            MenuEntry::text("Heading").with_group(vec![
                status_entry("H1", &commands),
                status_entry("H2", &commands),
            ]),
        ]);
        let button = ClickForMenu::new(vec![
            status_entry("Rename", &commands),
            status_entry("Delete", &commands).disabled(true),
        ]);
        let stack = WindowStack::handle();
        let mut notes = FloatingWindow::new("notes", "Notes")
            .with_stack(stack.clone())
            .with_content(Note {
                text: "Drag the title bar to move this window. Click a window to raise it.".into(),
            });
        notes.set_size(Size::new(34, 8));
        let mut help = FloatingWindow::new("help", "Help")
            .with_stack(stack)
            .with_content(Note {
                text: "Right-click for menus, hover the lower box for the low menu, Ctrl-q quits.".into(),
            });
        help.set_size(Size::new(30, 9));
        let details = AutoHeight::new(true, DETAILS.height).with_content(Note {
            text: "Details open over two frames and close after the transition.".into(),
        });
        let keys = KeyBindings::default();
        let status = format!("right-click anywhere, {} quits", keys.combos_for(Action::Quit).join(" or "));
        Self {
            host: Host::new(viewport).with_metrics(Metrics::terminal()),
            widgets: Widgets {
                root,
                inner,
                low,
                button,
                details,
                details_hidden: true,
                windows: vec![notes, help],
            },
            commands,
            keys,
            status,
        }
    }

    fn layout(&mut self) {
        let w = &mut self.widgets;
        w.root.set_region(self.host.viewport().bounds());
        w.inner.set_region(INNER.into());
        w.low.set_region(LOW.into());
        w.button.set_region(BUTTON.into());
        let outer = w.root.effective_entries();
        w.inner.set_outer_entries(Some(outer));
    }

    fn tick(&mut self, elapsed: Duration) -> bool {
        self.host.advance(&mut self.widgets, elapsed);
        self.host.frame(&mut self.widgets);
        self.run_commands()
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if let Event::Key(key) = event
            && self.keys.matches(Action::Quit, key)
        {
            return true;
        }
        if let Event::Resize(width, height) = event {
            self.host.set_viewport(Viewport::new(i32::from(*width), i32::from(*height)));
            self.layout();
        }
        self.dispatch(event);
        self.run_commands()
    }

    fn dispatch(&mut self, event: &Event) {
        let host = &mut self.host;
        let w = &mut self.widgets;
        let ctx = ComponentContext::new(true);

        if let Event::Mouse(mouse) = event
            && matches!(mouse.kind, MouseEventKind::Down(_))
        {
            let target = EventTarget::from_mouse(mouse);
            w.root.dismiss_outside(&target, host);
            w.inner.dismiss_outside(&target, host);
            w.low.dismiss_outside(&target, host);
            w.button.dismiss_outside(&target, host);
        }

        // hover tracking and drags see every move
        if let Event::Mouse(mouse) = event
            && matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_))
        {
            w.button.handle_event(event, host, &ctx);
            w.low.handle_event(event, host, &ctx);
            w.inner.handle_event(event, host, &ctx);
            w.root.handle_event(event, host, &ctx);
            for window in w.windows.iter_mut() {
                window.handle_event(event, host, &ctx);
            }
            return;
        }

        if let Some(window) = w.windows.iter_mut().find(|window| window.is_moving())
            && window.handle_event(event, host, &ctx)
        {
            return;
        }

        // open menus sit above everything, innermost first
        if w.button.handle_event(event, host, &ctx)
            || w.low.handle_event(event, host, &ctx)
            || w.inner.handle_event(event, host, &ctx)
        {
            return;
        }
        let mut order: Vec<usize> = (0..w.windows.len()).collect();
        order.sort_by_key(|i| std::cmp::Reverse(w.windows[*i].z_index()));
        for i in order {
            if w.windows[i].handle_event(event, host, &ctx) {
                return;
            }
        }
        w.root.handle_event(event, host, &ctx);
    }

    fn run_commands(&mut self) -> bool {
        for (index, window) in self.widgets.windows.iter_mut().enumerate() {
            for event in window.take_events() {
                match event {
                    WindowEvent::Opened => self.status = format!("window {index} opened"),
                    WindowEvent::CloseRequested => window.set_visible(false, Bounds::default(), &mut self.host),
                }
            }
        }
        loop {
            let Some(command) = self.commands.borrow_mut().pop_front() else {
                break;
            };
            match command {
                Command::Quit => return true,
                Command::Status(message) => self.status = message,
                Command::ToggleDetails => {
                    let w = &mut self.widgets;
                    w.details_hidden = !w.details_hidden;
                    w.details.set_hide(w.details_hidden, &mut self.host);
                }
                Command::OpenWindow(index, at) => {
                    if let Some(window) = self.widgets.windows.get_mut(index) {
                        let trigger = Bounds::from_origin_size(at, Size::new(1, 1));
                        window.set_visible(true, trigger, &mut self.host);
                    }
                }
            }
        }
        false
    }

    fn render(&mut self, mut frame: UiFrame<'_>) {
        let area = frame.area();
        let ctx = ComponentContext::new(true);
        frame.render_widget(
            Paragraph::new(format!(" term-ctxmenu | {}", self.status)).style(Style::default().add_modifier(Modifier::REVERSED)),
            Rect::new(area.x, area.y, area.width, 1),
        );
        let boxes = [
            (INNER, "nested menu: right-click"),
            (LOW, "hover for the low menu"),
        ];
        for (rect, title) in boxes {
            frame.render_widget(Block::default().borders(Borders::ALL).title(title), rect);
        }
        frame.render_widget(Paragraph::new("[ click me ]"), BUTTON);

        let w = &mut self.widgets;
        w.details.render(&mut frame, DETAILS, &ctx);

        let mut order: Vec<usize> = (0..w.windows.len()).collect();
        order.sort_by_key(|i| w.windows[*i].z_index());
        for i in order {
            w.windows[i].render(&mut frame, &self.host, &ctx);
        }

        w.root.render(&mut frame, area, &ctx);
        w.inner.render(&mut frame, area, &ctx);
        w.low.render(&mut frame, area, &ctx);
        w.button.render(&mut frame, area, &ctx);
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = cli.log_file.as_deref() {
        term_ctxmenu::tracing_sub::set_log_file(path)?;
    }
    term_ctxmenu::tracing_sub::init_default();

    let mut output = ConsoleOutputDriver::new()?;
    let (width, height) = output.size()?;
    let mut app = App::new(Viewport::new(i32::from(width), i32::from(height)));
    app.layout();
    output.enter()?;

    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), Duration::from_millis(cli.tick_ms.max(1)));
    let result = event_loop.run(|_driver, event, elapsed| {
        if app.tick(elapsed) {
            return Ok(ControlFlow::Quit);
        }
        if let Some(event) = event {
            if app.handle_event(&event) {
                return Ok(ControlFlow::Quit);
            }
            return Ok(ControlFlow::Continue);
        }
        output.draw(|frame| app.render(frame))?;
        Ok(ControlFlow::Continue)
    });

    output.exit()?;
    result
}
