use crossterm::event::KeyCode;
use rider_dash_core::{Dashboard, FetchRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextTab,
    PrevTab,
    NextCity,
    PrevCity,
    NextStore,
    PrevStore,
    Trigger(usize),
    Reload,
    ToggleHelp,
    Quit,
}

pub const fn action_for(key: KeyCode) -> Option<Action> {
    let action = match key {
        KeyCode::Right | KeyCode::Tab => Action::NextTab,
        KeyCode::Left | KeyCode::BackTab => Action::PrevTab,
        KeyCode::Down => Action::NextCity,
        KeyCode::Up => Action::PrevCity,
        KeyCode::Char(']') => Action::NextStore,
        KeyCode::Char('[') => Action::PrevStore,
        KeyCode::Char(c @ '1'..='4') => Action::Trigger(c as usize - '1' as usize),
        KeyCode::Char('r') => Action::Reload,
        KeyCode::F(1) | KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Applies a dashboard action and returns the requests it issued. Help and
/// quit are UI-only and issue nothing.
pub fn perform(dashboard: &mut Dashboard, action: Action) -> Vec<FetchRequest> {
    match action {
        Action::NextTab => dashboard.next_tab(),
        Action::PrevTab => dashboard.prev_tab(),
        Action::NextCity => dashboard.cycle_city(1),
        Action::PrevCity => dashboard.cycle_city(-1),
        Action::NextStore => dashboard.cycle_store(1),
        Action::PrevStore => dashboard.cycle_store(-1),
        Action::Trigger(index) => dashboard.trigger(index),
        Action::Reload => dashboard.reload(),
        Action::ToggleHelp | Action::Quit => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rider_dash_core::{DashboardConfig, TabId};

    #[test]
    fn maps_navigation_keys() {
        assert_eq!(action_for(KeyCode::Tab), Some(Action::NextTab));
        assert_eq!(action_for(KeyCode::BackTab), Some(Action::PrevTab));
        assert_eq!(action_for(KeyCode::Up), Some(Action::PrevCity));
        assert_eq!(action_for(KeyCode::Char(']')), Some(Action::NextStore));
        assert_eq!(action_for(KeyCode::Char('1')), Some(Action::Trigger(0)));
        assert_eq!(action_for(KeyCode::Char('4')), Some(Action::Trigger(3)));
        assert_eq!(action_for(KeyCode::Char('5')), None);
        assert_eq!(action_for(KeyCode::Esc), Some(Action::Quit));
    }

    #[test]
    fn tab_keys_switch_and_fetch() {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        dashboard.start();
        let requests = perform(&mut dashboard, Action::NextTab);
        assert_eq!(dashboard.active_tab(), TabId::ThreePl);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/demand/insights");
    }

    #[test]
    fn triggers_on_a_tab_without_actions_do_nothing() {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        dashboard.start();
        assert!(perform(&mut dashboard, Action::Trigger(0)).is_empty());
        assert!(perform(&mut dashboard, Action::Quit).is_empty());
    }
}
