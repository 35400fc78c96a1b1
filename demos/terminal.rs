//! Terminal demo - scene tree rendered through the crossterm sink
//!
//! Demonstrates the full pipeline against a real terminal:
//! - Building a tree of bordered boxes and text runs
//! - Diffed commits (only changed cells are rewritten each frame)
//! - Mouse hit-testing with click, hover enter/leave and bubbling
//!
//! Run with: cargo run --example terminal
//! Click the counter box; press 'q' to quit.

use std::cell::Cell;
use std::io;
use std::rc::Rc;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};

use gridscene::{
    Attribute, BorderStyle, Color, NodeKind, PointerEventKind, PointerHandlers, Rect, Scene,
    SceneConfig, TerminalSink,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut scene = Scene::with_config(SceneConfig {
        width: 60,
        height: 16,
        ..SceneConfig::default()
    });
    let root = scene.root();

    // Outer frame
    let frame = scene.create_node_at(NodeKind::boxed(), Rect::new(0, 0, 60, 16));
    scene.set_attribute(frame, Attribute::Border(BorderStyle::Single));
    scene.set_attribute(frame, Attribute::ForegroundColor(Color::AQUA));
    scene.append_child(root, frame)?;

    let title = scene.create_node_at(NodeKind::text("gridscene demo"), Rect::new(2, 1, 0, 0));
    scene.set_attribute(title, Attribute::ForegroundColor(Color::YELLOW));
    scene.append_child(frame, title)?;

    let counter_text = scene.create_node_at(NodeKind::text("Clicks: 0"), Rect::new(2, 3, 0, 0));
    scene.append_child(frame, counter_text)?;

    // Clickable box
    let button = scene.create_node_at(NodeKind::boxed(), Rect::new(2, 5, 16, 3));
    scene.set_attribute(button, Attribute::Border(BorderStyle::Single));
    scene.set_attribute(button, Attribute::ForegroundColor(Color::GREEN));
    scene.append_child(frame, button)?;

    let label = scene.create_node_at(NodeKind::text("Click me!"), Rect::new(3, 1, 0, 0));
    scene.set_attribute(label, Attribute::ForegroundColor(Color::GREEN));
    scene.append_child(button, label)?;

    let hint = scene.create_node_at(
        NodeKind::text("Hover the button, click it, press 'q' to quit"),
        Rect::new(2, 13, 0, 0),
    );
    scene.set_attribute(hint, Attribute::ForegroundColor(Color::GRAY));
    scene.append_child(frame, hint)?;

    let clicks = Rc::new(Cell::new(0u32));
    let hovering = Rc::new(Cell::new(false));
    scene.set_pointer_handlers(
        button,
        PointerHandlers {
            on_click: Some(Rc::new({
                let clicks = clicks.clone();
                move |_event| clicks.set(clicks.get() + 1)
            })),
            on_mouse_enter: Some(Rc::new({
                let hovering = hovering.clone();
                move |_event| hovering.set(true)
            })),
            on_mouse_leave: Some(Rc::new({
                let hovering = hovering.clone();
                move |_event| hovering.set(false)
            })),
            ..Default::default()
        },
    );

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
    let result = run(&mut scene, counter_text, button, &clicks, &hovering);
    execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result?;
    Ok(())
}

fn run(
    scene: &mut Scene,
    counter_text: gridscene::NodeId,
    button: gridscene::NodeId,
    clicks: &Rc<Cell<u32>>,
    hovering: &Rc<Cell<bool>>,
) -> io::Result<()> {
    let mut sink = TerminalSink::stdout();
    scene.render(&mut sink);
    sink.flush()?;

    loop {
        match event::read()? {
            Event::Key(key) if key.code == KeyCode::Char('q') => break,
            Event::Mouse(mouse) => {
                let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));
                match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        scene.on_pointer_event(PointerEventKind::Move, x, y);
                    }
                    MouseEventKind::Down(MouseButton::Left) => {
                        scene.on_pointer_event(PointerEventKind::Down, x, y);
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        scene.on_pointer_event(PointerEventKind::Up, x, y);
                        scene.on_pointer_event(PointerEventKind::Click, x, y);
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        // Reflect handler state back into the tree, then diff-commit
        scene.set_attribute(
            counter_text,
            Attribute::TextContent(format!("Clicks: {}", clicks.get())),
        );
        let highlight = if hovering.get() {
            Color::YELLOW
        } else {
            Color::GREEN
        };
        scene.set_attribute(button, Attribute::ForegroundColor(highlight));

        scene.render(&mut sink);
        sink.flush()?;
    }

    Ok(())
}
