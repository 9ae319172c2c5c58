use serde::Serialize;

use crate::domain::TabId;
use crate::selector::wrap_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub tab: TabId,
    pub previous: TabId,
    /// First time this tab was shown in the session.
    pub first: bool,
}

/// Which tab is on screen. Exactly one is visible at any time.
#[derive(Debug, Clone)]
pub struct TabRouter {
    active: TabId,
    activations: [u32; TabId::COUNT],
}

impl Default for TabRouter {
    fn default() -> Self {
        Self {
            active: TabId::Demand,
            activations: [0; TabId::COUNT],
        }
    }
}

impl TabRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn active(&self) -> TabId {
        self.active
    }

    pub fn activate(&mut self, tab: TabId) -> Activation {
        let previous = self.active;
        self.active = tab;
        let count = &mut self.activations[tab.index()];
        *count += 1;
        Activation {
            tab,
            previous,
            first: *count == 1,
        }
    }

    pub const fn activation_count(&self, tab: TabId) -> u32 {
        self.activations[tab.index()]
    }

    pub fn is_visible(&self, tab: TabId) -> bool {
        self.active == tab
    }

    pub fn visible_panels(&self) -> usize {
        TabId::ALL.iter().filter(|tab| self.is_visible(**tab)).count()
    }

    pub fn button_style(&self, tab: TabId) -> ButtonStyle {
        if self.is_visible(tab) {
            ButtonStyle::Active
        } else {
            ButtonStyle::Inactive
        }
    }

    pub fn next(&self) -> TabId {
        self.offset(1)
    }

    pub fn prev(&self) -> TabId {
        self.offset(-1)
    }

    fn offset(&self, delta: isize) -> TabId {
        let index = wrap_index(self.active.index(), delta, TabId::ALL.len());
        TabId::from_index(index).unwrap_or(TabId::Demand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_demand() {
        let router = TabRouter::new();
        assert_eq!(router.active(), TabId::Demand);
        assert_eq!(router.button_style(TabId::Demand), ButtonStyle::Active);
        assert_eq!(router.button_style(TabId::Credit), ButtonStyle::Inactive);
    }

    #[test]
    fn repeated_activation_keeps_one_panel_visible() {
        let mut router = TabRouter::new();
        let first = router.activate(TabId::Energy);
        let again = router.activate(TabId::Energy);
        assert!(first.first);
        assert!(!again.first);
        assert_eq!(again.previous, TabId::Energy);
        assert_eq!(router.visible_panels(), 1);
        assert_eq!(router.activation_count(TabId::Energy), 2);
        let active: Vec<_> = TabId::ALL
            .iter()
            .filter(|tab| router.button_style(**tab) == ButtonStyle::Active)
            .collect();
        assert_eq!(active, vec![&TabId::Energy]);
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut router = TabRouter::new();
        assert_eq!(router.prev(), TabId::Jobs);
        router.activate(TabId::Jobs);
        assert_eq!(router.next(), TabId::Demand);
        assert_eq!(router.prev(), TabId::Launch);
    }
}
