mod farm;
mod host;
mod input;
mod log;
mod time;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use farm::storage::LocalStorage;
use farm::FarmGame;
use host::TelegramHost;
use input::InputEvent;
use time::SystemClock;

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let host = Rc::new(TelegramHost::connect());
    let game = Rc::new(RefCell::new(FarmGame::new(LocalStorage::new(), SystemClock)));

    let host_name = if host.is_available() {
        host.user_first_name()
    } else {
        None
    };
    game.borrow_mut().start(host_name.as_deref());

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        let host = host.clone();
        move |key_event| {
            let Some(event) = InputEvent::from_key_code(&key_event.code) else {
                return;
            };
            let mut game = game.borrow_mut();
            game.handle_input(&event);
            for cue in game.drain_haptics() {
                host.play(cue);
            }
        }
    });

    terminal.draw_web(move |f| {
        let mut game = game.borrow_mut();
        game.frame();
        for cue in game.drain_haptics() {
            host.play(cue);
        }
        let area = f.area();
        game.render(f, area);
    });

    log::info("ready");
    Ok(())
}
