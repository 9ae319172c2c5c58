//! Front-end neutral snapshot of a tab, ready to draw or print.

use serde::Serialize;

use crate::chart::{ChartHandle, Rgb};
use crate::domain::{Signal, TabId};
use crate::selector::Selector;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub title: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn new(title: impl Into<String>, columns: Vec<&'static str>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Small labelled value shown above a table, optionally tinted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip {
    pub label: String,
    pub value: String,
    pub tone: Option<Signal>,
}

impl Chip {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            tone: None,
        }
    }

    #[must_use]
    pub const fn toned(mut self, tone: Signal) -> Self {
        self.tone = Some(tone);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectorView<'a> {
    pub title: &'static str,
    pub options: &'a [String],
    pub labels: &'a [String],
    pub selected: Option<usize>,
}

impl<'a> SelectorView<'a> {
    pub fn of(title: &'static str, selector: &'a Selector) -> Self {
        Self {
            title,
            options: selector.options(),
            labels: selector.labels(),
            selected: selector.selected_index(),
        }
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.labels.get(index))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HexBin {
    pub cell: (i64, i64),
    pub boundary: Vec<(f64, f64)>,
    pub count: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum MapLayer {
    #[default]
    Empty,
    Hexes(Vec<HexBin>),
    Markers(Vec<Marker>),
}

/// Map viewport plus whatever is drawn on it. Coordinates are `(lat, lng)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub bounds: Option<((f64, f64), (f64, f64))>,
    pub layer: MapLayer,
    pub overlay: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabView<'a> {
    pub tab: TabId,
    pub title: &'static str,
    pub loading: bool,
    pub primary: Option<SelectorView<'a>>,
    pub secondary: Option<SelectorView<'a>>,
    pub chips: &'a [Chip],
    pub tables: Vec<&'a TableView>,
    pub charts: Vec<&'a ChartHandle>,
    pub map: Option<&'a MapView>,
    pub log: Option<&'a str>,
    pub actions: &'static [&'static str],
    pub notice: Option<&'a str>,
}

impl<'a> TabView<'a> {
    pub fn new(tab: TabId) -> Self {
        Self {
            tab,
            title: tab.label(),
            loading: false,
            primary: None,
            secondary: None,
            chips: &[],
            tables: Vec::new(),
            charts: Vec::new(),
            map: None,
            log: None,
            actions: &[],
            notice: None,
        }
    }
}
