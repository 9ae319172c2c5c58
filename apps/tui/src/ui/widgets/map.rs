use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Map, MapResolution, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use rider_dash_core::{MapLayer, MapView};

use super::color;

// Degrees shown around the centre when there is nothing to fit.
const DEFAULT_SPAN: f64 = 0.25;

/// `([west, east], [south, north])` for the canvas.
pub fn viewport(map: &MapView) -> ([f64; 2], [f64; 2]) {
    match map.bounds {
        Some(((south, west), (north, east))) => ([west, east], [south, north]),
        None => {
            let (lat, lng) = map.center;
            (
                [lng - DEFAULT_SPAN, lng + DEFAULT_SPAN],
                [lat - DEFAULT_SPAN, lat + DEFAULT_SPAN],
            )
        }
    }
}

pub fn render_map(f: &mut Frame<'_>, area: Rect, map: &MapView) {
    let block = Block::default()
        .title(" Hotspots ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if let Some(overlay) = &map.overlay {
        let paragraph = Paragraph::new(overlay.as_str())
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let (x_bounds, y_bounds) = viewport(map);
    let span = (x_bounds[1] - x_bounds[0]).max(y_bounds[1] - y_bounds[0]);

    let canvas = Canvas::default()
        .block(block)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();
            draw_layer(ctx, &map.layer, span);
        });
    f.render_widget(canvas, area);
}

fn draw_layer(ctx: &mut Context<'_>, layer: &MapLayer, span: f64) {
    match layer {
        MapLayer::Empty => {}
        MapLayer::Hexes(bins) => {
            for bin in bins {
                let fill = color(bin.color);
                let corners = &bin.boundary;
                for (index, &(lat, lng)) in corners.iter().enumerate() {
                    let (next_lat, next_lng) = corners[(index + 1) % corners.len()];
                    ctx.draw(&CanvasLine::new(lng, lat, next_lng, next_lat, fill));
                }
                let (lat_sum, lng_sum) = corners
                    .iter()
                    .fold((0.0, 0.0), |(a, b), (lat, lng)| (a + lat, b + lng));
                let n = corners.len().max(1) as f64;
                ctx.draw(&Points {
                    coords: &[(lng_sum / n, lat_sum / n)],
                    color: fill,
                });
            }
        }
        MapLayer::Markers(markers) => {
            for marker in markers {
                ctx.draw(&Circle {
                    x: marker.lng,
                    y: marker.lat,
                    radius: span * marker.radius / 400.0,
                    color: color(marker.color),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_uses_bounds_when_present() {
        let map = MapView {
            center: (18.5, 73.8),
            bounds: Some(((18.0, 73.0), (19.0, 74.0))),
            layer: MapLayer::Empty,
            overlay: None,
        };
        assert_eq!(viewport(&map), ([73.0, 74.0], [18.0, 19.0]));
    }

    #[test]
    fn viewport_falls_back_to_the_centre() {
        let map = MapView {
            center: (18.5, 73.5),
            bounds: None,
            layer: MapLayer::Empty,
            overlay: None,
        };
        assert_eq!(viewport(&map), ([73.25, 73.75], [18.25, 18.75]));
    }
}
