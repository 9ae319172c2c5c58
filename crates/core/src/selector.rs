use serde::Serialize;

/// Steps `current` by `delta` within `0..len`, wrapping at both ends.
pub const fn wrap_index(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    let next = (current as isize % len + delta % len + len) % len;
    next as usize
}

/// A dropdown: keys in the order they were supplied, an optional display
/// label per key, and the chosen index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selector {
    options: Vec<String>,
    labels: Vec<String>,
    selected: Option<usize>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the options and selects the first one.
    pub fn populate(&mut self, options: Vec<String>) {
        self.labels = options.clone();
        self.options = options;
        self.selected = if self.options.is_empty() { None } else { Some(0) };
    }

    pub fn populate_labeled(&mut self, entries: Vec<(String, String)>) {
        let (options, labels) = entries.into_iter().unzip();
        self.options = options;
        self.labels = labels;
        self.selected = if self.options.is_empty() { None } else { Some(0) };
    }

    pub fn clear(&mut self) {
        self.options.clear();
        self.labels.clear();
        self.selected = None;
    }

    /// Selects by key. Unknown keys leave the selection alone.
    pub fn select(&mut self, key: &str) -> bool {
        match self.options.iter().position(|option| option == key) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Moves the selection by `delta`, wrapping. Returns the new key.
    pub fn cycle(&mut self, delta: isize) -> Option<&str> {
        if self.options.is_empty() {
            return None;
        }
        let next = wrap_index(self.selected.unwrap_or(0), delta, self.options.len());
        self.selected = Some(next);
        self.selected_key()
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.options.get(index))
            .map(String::as_str)
    }

    pub const fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Monotonic request generation for one binder.
///
/// Each request carries the generation it was issued under; a response
/// whose generation is no longer current belongs to an abandoned selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestGate {
    current: u64,
}

impl RequestGate {
    pub fn issue(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub const fn current(&self) -> u64 {
        self.current
    }

    pub const fn is_current(&self, generation: u64) -> bool {
        generation == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_index_wraps_both_ways() {
        assert_eq!(wrap_index(0, -1, 3), 2);
        assert_eq!(wrap_index(2, 1, 3), 0);
        assert_eq!(wrap_index(1, 1, 3), 2);
        assert_eq!(wrap_index(0, 1, 0), 0);
    }

    #[test]
    fn populate_selects_first_in_order() {
        let mut selector = Selector::new();
        selector.populate(vec!["Pune".into(), "Mumbai".into()]);
        assert_eq!(selector.options(), ["Pune", "Mumbai"]);
        assert_eq!(selector.selected_key(), Some("Pune"));

        assert!(selector.select("Mumbai"));
        assert!(!selector.select("Delhi"));
        assert_eq!(selector.selected_key(), Some("Mumbai"));

        selector.populate(Vec::new());
        assert_eq!(selector.selected_key(), None);
    }

    #[test]
    fn cycle_moves_and_wraps() {
        let mut selector = Selector::new();
        selector.populate_labeled(vec![
            ("S1".into(), "S1 (Pune)".into()),
            ("S2".into(), "S2 (Agra)".into()),
        ]);
        assert_eq!(selector.cycle(1), Some("S2"));
        assert_eq!(selector.cycle(1), Some("S1"));
        assert_eq!(selector.labels()[1], "S2 (Agra)");
    }

    #[test]
    fn gate_only_accepts_latest_generation() {
        let mut gate = RequestGate::default();
        let first = gate.issue();
        let second = gate.issue();
        assert!(!gate.is_current(first));
        assert!(gate.is_current(second));
    }
}
