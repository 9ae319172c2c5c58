use ratzilla::event::KeyCode;
use rider_dash_core::{Dashboard, FetchRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextTab,
    PrevTab,
    NextCity,
    PrevCity,
    NextStore,
    PrevStore,
    Trigger(usize),
    Reload,
}

pub fn command_for(code: &KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Right | KeyCode::Tab => Command::NextTab,
        KeyCode::Left => Command::PrevTab,
        KeyCode::Down => Command::NextCity,
        KeyCode::Up => Command::PrevCity,
        KeyCode::Char(']') => Command::NextStore,
        KeyCode::Char('[') => Command::PrevStore,
        KeyCode::Char(c @ '1'..='4') => Command::Trigger(*c as usize - '1' as usize),
        KeyCode::Char('r') => Command::Reload,
        _ => return None,
    };
    Some(command)
}

pub fn perform(dashboard: &mut Dashboard, command: Command) -> Vec<FetchRequest> {
    match command {
        Command::NextTab => dashboard.next_tab(),
        Command::PrevTab => dashboard.prev_tab(),
        Command::NextCity => dashboard.cycle_city(1),
        Command::PrevCity => dashboard.cycle_city(-1),
        Command::NextStore => dashboard.cycle_store(1),
        Command::PrevStore => dashboard.cycle_store(-1),
        Command::Trigger(index) => dashboard.trigger(index),
        Command::Reload => dashboard.reload(),
    }
}
