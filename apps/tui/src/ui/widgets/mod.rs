pub mod charts;
pub mod map;
pub mod popup;
pub mod tables;

use ratatui::style::Color;
use rider_dash_core::{Rgb, Signal};

pub const fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub const fn signal_color(signal: Signal) -> Color {
    match signal {
        Signal::Green => color(Rgb::GREEN),
        Signal::Yellow => color(Rgb::YELLOW),
        Signal::Red => color(Rgb::RED),
    }
}
