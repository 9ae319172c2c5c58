// Shared core for the rider dashboard front ends.
// Everything here is I/O free: binders hand back requests and the
// terminal or browser shell executes them and feeds the outcomes back.

pub mod api;
pub mod binder;
pub mod chart;
pub mod collection;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod format;
pub mod hex;
pub mod lenient;
pub mod metrics;
pub mod records;
pub mod router;
pub mod selector;
pub mod tabs;
pub mod view;

pub use api::{FetchOutcome, FetchRequest, HealthStatus, Method, RequestKind, Route, Ticket};
pub use chart::{ChartBoard, ChartHandle, ChartKind, ChartOptions, Rgb, Series};
pub use collection::CityKeyed;
pub use config::{Assumptions, DashboardConfig};
pub use dashboard::Dashboard;
pub use domain::{Signal, TabId};
pub use error::ApiError;
pub use router::{ButtonStyle, TabRouter};
pub use view::{Chip, MapLayer, MapView, SelectorView, TabView, TableView};
