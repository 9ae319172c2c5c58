mod config;
mod fetch;
mod keys;
mod render;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use rider_dash_core::{Dashboard, FetchRequest};
use wasm_bindgen_futures::spawn_local;

type Shared = Rc<RefCell<Dashboard>>;

/// Sends every request on its own future; answers go back into the
/// dashboard and whatever they ask for next is sent the same way.
fn dispatch(dashboard: &Shared, base: &Rc<str>, requests: Vec<FetchRequest>) {
    for request in requests {
        let dashboard = dashboard.clone();
        let base = base.clone();
        spawn_local(async move {
            let outcome = fetch::execute(&base, &request).await;
            let follow_up = dashboard.borrow_mut().on_response(&request.ticket, outcome);
            dispatch(&dashboard, &base, follow_up);
        });
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Info);

    let config = config::load();
    log::info!("rider dash using {}", config.api_base);
    let base: Rc<str> = Rc::from(config.api_base.as_str());
    let dashboard: Shared = Rc::new(RefCell::new(Dashboard::new(config)));

    let initial = dashboard.borrow_mut().start();
    dispatch(&dashboard, &base, initial);

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let dashboard = dashboard.clone();
        let base = base.clone();
        move |event| {
            let Some(command) = keys::command_for(&event.code) else {
                return;
            };
            let requests = keys::perform(&mut dashboard.borrow_mut(), command);
            dispatch(&dashboard, &base, requests);
        }
    });

    terminal.draw_web(move |f| {
        render::render_dashboard(&dashboard.borrow(), f);
    });

    Ok(())
}
