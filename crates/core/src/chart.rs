//! Chart registry: one live chart per canvas.
//!
//! Drawing onto a canvas disposes whatever was there first, so a canvas can
//! never carry two overlapping charts. The counters exist so that property
//! can be checked from tests and from the headless summary.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    VerticalBar,
    HorizontalBar,
    LineFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const EMERALD: Self = Self(0x10, 0xb9, 0x81);
    pub const AMBER: Self = Self(0xf5, 0x9e, 0x0b);
    pub const VIOLET: Self = Self(0x8b, 0x5c, 0xf6);
    pub const BLUE: Self = Self(0x3b, 0x82, 0xf6);
    pub const CYAN: Self = Self(0x06, 0xb6, 0xd4);
    pub const ORANGE: Self = Self(0xf9, 0x73, 0x16);
    pub const RED: Self = Self(0xef, 0x44, 0x44);
    pub const GREEN: Self = Self(0x16, 0xa3, 0x4a);
    pub const LIME: Self = Self(0x22, 0xc5, 0x5e);
    pub const YELLOW: Self = Self(0xfd, 0xe0, 0x47);

    /// Straight-line blend, `t` clamped to 0..=1.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| {
            let value = f64::from(b).mul_add(t, f64::from(a) * (1.0 - t));
            value.round().clamp(0.0, 255.0) as u8
        };
        Self(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub colors: Vec<Rgb>,
}

impl Series {
    /// Missing points are drawn as 0.
    pub fn new(label: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>, color: Rgb) -> Self {
        Self {
            label: label.into(),
            values: values.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
            colors: vec![color],
        }
    }

    /// One colour per bar.
    #[must_use]
    pub fn with_colors(mut self, colors: Vec<Rgb>) -> Self {
        if !colors.is_empty() {
            self.colors = colors;
        }
        self
    }

    pub fn color_at(&self, index: usize) -> Rgb {
        self.colors
            .get(index)
            .or_else(|| self.colors.first())
            .copied()
            .unwrap_or(Rgb::BLUE)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    pub fn has_positive(&self) -> bool {
        self.values.iter().any(|v| *v > 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartOptions {
    pub title: String,
    pub max: Option<f64>,
    pub show_legend: bool,
}

impl ChartOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub const fn legend(mut self) -> Self {
        self.show_legend = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartHandle {
    pub id: u64,
    pub canvas: &'static str,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub options: ChartOptions,
}

impl ChartHandle {
    /// Axis upper bound: the configured max, else the largest value.
    pub fn upper_bound(&self) -> f64 {
        self.options.max.unwrap_or_else(|| {
            self.series
                .iter()
                .map(Series::max)
                .fold(0.0, f64::max)
        })
    }
}

#[derive(Debug, Default)]
pub struct ChartBoard {
    handles: Vec<ChartHandle>,
    created: u64,
    disposed: u64,
}

impl ChartBoard {
    pub const fn new() -> Self {
        Self {
            handles: Vec::new(),
            created: 0,
            disposed: 0,
        }
    }

    pub fn draw(
        &mut self,
        canvas: &'static str,
        kind: ChartKind,
        labels: Vec<String>,
        series: Vec<Series>,
        options: ChartOptions,
    ) -> &ChartHandle {
        self.created += 1;
        let handle = ChartHandle {
            id: self.created,
            canvas,
            kind,
            labels,
            series,
            options,
        };

        let index = match self.handles.iter().position(|h| h.canvas == canvas) {
            Some(index) => {
                self.disposed += 1;
                self.handles[index] = handle;
                index
            }
            None => {
                self.handles.push(handle);
                self.handles.len() - 1
            }
        };
        &self.handles[index]
    }

    /// Disposes the chart on `canvas`, if any.
    pub fn clear(&mut self, canvas: &str) {
        let before = self.handles.len();
        self.handles.retain(|h| h.canvas != canvas);
        self.disposed += (before - self.handles.len()) as u64;
    }

    pub fn dispose_all(&mut self) {
        self.disposed += self.handles.len() as u64;
        self.handles.clear();
    }

    pub fn get(&self, canvas: &str) -> Option<&ChartHandle> {
        self.handles.iter().find(|h| h.canvas == canvas)
    }

    pub fn handles(&self) -> &[ChartHandle] {
        &self.handles
    }

    pub fn live(&self) -> usize {
        self.handles.len()
    }

    pub const fn created(&self) -> u64 {
        self.created
    }

    pub const fn disposed(&self) -> u64 {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(values: &[f64]) -> Vec<Series> {
        vec![Series::new("v", values.iter().copied().map(Some), Rgb::BLUE)]
    }

    #[test]
    fn redraw_keeps_one_handle_per_canvas() {
        let mut board = ChartBoard::new();
        for round in 0..5 {
            board.draw(
                "demand",
                ChartKind::HorizontalBar,
                vec!["A".to_string()],
                bars(&[f64::from(round)]),
                ChartOptions::default(),
            );
        }
        assert_eq!(board.live(), 1);
        assert_eq!(board.created(), 5);
        assert_eq!(board.disposed(), 4);
        assert_eq!(board.created() - board.disposed(), board.live() as u64);
    }

    #[test]
    fn canvases_are_independent() {
        let mut board = ChartBoard::new();
        board.draw("kwh", ChartKind::HorizontalBar, vec![], bars(&[]), ChartOptions::default());
        board.draw("swaps", ChartKind::HorizontalBar, vec![], bars(&[]), ChartOptions::default());
        board.clear("kwh");
        board.clear("kwh");
        assert!(board.get("kwh").is_none());
        assert!(board.get("swaps").is_some());
        assert_eq!(board.disposed(), 1);

        board.dispose_all();
        assert_eq!(board.live(), 0);
        assert_eq!(board.disposed(), 2);
    }

    #[test]
    fn missing_points_become_zero() {
        let series = Series::new("p25", [Some(10.0), None], Rgb::GREEN);
        assert_eq!(series.values, vec![10.0, 0.0]);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(Rgb::YELLOW.lerp(Rgb::RED, 0.0), Rgb::YELLOW);
        assert_eq!(Rgb::YELLOW.lerp(Rgb::RED, 1.0), Rgb::RED);
        assert_eq!(Rgb::YELLOW.lerp(Rgb::RED, 7.0), Rgb::RED);
        assert_eq!(Rgb::RED.hex(), "#ef4444");
    }
}
