//! Off-screen rendering of the chromaticity scatter to an RGB image, for the
//! headless binary and the viewer's PNG export.

use image::{Rgb, RgbImage};

use crate::color::{machine_marker, rainbow, Marker};
use crate::sim::ChromaticityPoint;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const FRAME: Rgb<u8> = Rgb([60, 60, 60]);

#[derive(Debug, Clone)]
pub struct ScatterStyle {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub marker_radius: i64,
}

impl Default for ScatterStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            margin: 40,
            marker_radius: 4,
        }
    }
}

/// Axis-aligned data bounds on the chromaticity plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub r: [f64; 2],
    pub g: [f64; 2],
}

impl Bounds {
    /// Tight bounds around the points plus 5% padding; the unit square when
    /// there is nothing to fit.
    pub fn fit(points: &[ChromaticityPoint]) -> Self {
        if points.is_empty() {
            return Self {
                r: [0.0, 1.0],
                g: [0.0, 1.0],
            };
        }
        let fold = |f: fn(&ChromaticityPoint) -> f64| {
            points.iter().map(f).fold([f64::INFINITY, f64::NEG_INFINITY], |[lo, hi], v| {
                [lo.min(v), hi.max(v)]
            })
        };
        Self {
            r: padded(fold(|p| p.r)),
            g: padded(fold(|p| p.g)),
        }
    }
}

fn padded([lo, hi]: [f64; 2]) -> [f64; 2] {
    let pad = ((hi - lo) * 0.05).max(1e-3);
    [lo - pad, hi + pad]
}

/// Most grid lines drawn along one axis.
const MAX_GRID_LINES: usize = 100;

/// Power-of-ten grid spacing giving a handful of lines across `range`.
fn grid_step(range: f64) -> f64 {
    10f64.powf((range / 2.0).log10().floor())
}

/// Grid line positions inside `[lo, hi]`, counted up front so a step below
/// the float resolution of the bounds cannot stall the loop.
fn grid_lines([lo, hi]: [f64; 2]) -> Vec<f64> {
    let step = grid_step(hi - lo);
    if !step.is_finite() || step <= 0.0 {
        return Vec::new();
    }
    let first = (lo / step).ceil();
    let count = ((hi / step).floor() - first + 1.0).clamp(0.0, MAX_GRID_LINES as f64) as usize;
    (0..count)
        .map(|i| (first + i as f64) * step)
        .filter(|v| (lo..=hi).contains(v))
        .collect()
}

/// Draw every point, coloured by object and shaped by machine.
pub fn render_scatter(
    points: &[ChromaticityPoint],
    n_objects: usize,
    style: &ScatterStyle,
) -> RgbImage {
    let mut img = RgbImage::from_pixel(style.width, style.height, WHITE);
    let bounds = Bounds::fit(points);
    let colors = rainbow(n_objects.max(1));

    let plot_w = style.width.saturating_sub(2 * style.margin).max(1) as f64;
    let plot_h = style.height.saturating_sub(2 * style.margin).max(1) as f64;
    let left = style.margin as f64;
    let bottom = style.height.saturating_sub(style.margin) as f64;

    let to_px = |r: f64, g: f64| -> (i64, i64) {
        let x = left + (r - bounds.r[0]) / (bounds.r[1] - bounds.r[0]) * plot_w;
        let y = bottom - (g - bounds.g[0]) / (bounds.g[1] - bounds.g[0]) * plot_h;
        (x.round() as i64, y.round() as i64)
    };

    // Grid
    for r in grid_lines(bounds.r) {
        let (x, _) = to_px(r, bounds.g[0]);
        draw_vline(&mut img, x, style.margin as i64, bottom as i64, GRID);
    }
    for g in grid_lines(bounds.g) {
        let (_, y) = to_px(bounds.r[0], g);
        draw_hline(&mut img, y, left as i64, (left + plot_w) as i64, GRID);
    }

    // Frame
    let (x0, y0) = (left as i64, style.margin as i64);
    let (x1, y1) = ((left + plot_w) as i64, bottom as i64);
    draw_hline(&mut img, y0, x0, x1, FRAME);
    draw_hline(&mut img, y1, x0, x1, FRAME);
    draw_vline(&mut img, x0, y0, y1, FRAME);
    draw_vline(&mut img, x1, y0, y1, FRAME);

    for p in points {
        let [cr, cg, cb] = colors[p.object.min(colors.len() - 1)];
        let (x, y) = to_px(p.r, p.g);
        let marker = machine_marker(p.machine);
        draw_marker(&mut img, x, y, style.marker_radius, marker, Rgb([cr, cg, cb]));
    }

    img
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_hline(img: &mut RgbImage, y: i64, x0: i64, x1: i64, color: Rgb<u8>) {
    for x in x0..=x1 {
        put(img, x, y, color);
    }
}

fn draw_vline(img: &mut RgbImage, x: i64, y0: i64, y1: i64, color: Rgb<u8>) {
    for y in y0..=y1 {
        put(img, x, y, color);
    }
}

fn draw_marker(img: &mut RgbImage, x: i64, y: i64, radius: i64, marker: Marker, color: Rgb<u8>) {
    match marker {
        Marker::Circle => {
            let outer = radius * radius;
            let inner = (radius - 1) * (radius - 1);
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let d = dx * dx + dy * dy;
                    if d <= outer && d >= inner {
                        put(img, x + dx, y + dy, color);
                    }
                }
            }
        }
        Marker::Plus => {
            for d in -radius..=radius {
                put(img, x + d, y, color);
                put(img, x, y + d, color);
            }
        }
        Marker::Cross => {
            for d in -radius..=radius {
                put(img, x + d, y + d, color);
                put(img, x + d, y - d, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn point(machine: usize, object: usize, r: f64, g: f64) -> ChromaticityPoint {
        ChromaticityPoint {
            machine,
            led: 0,
            draw: 0,
            object,
            object_height: 0.5,
            red_flux: r,
            green_flux: g,
            blue_flux: 1.0 - r - g,
            r,
            g,
        }
    }

    #[test]
    fn bounds_cover_all_points() {
        let pts = [point(0, 0, 0.3, 0.2), point(1, 1, 0.5, 0.4)];
        let b = Bounds::fit(&pts);
        assert!(b.r[0] < 0.3 && b.r[1] > 0.5);
        assert!(b.g[0] < 0.2 && b.g[1] > 0.4);
        assert_eq!(Bounds::fit(&[]).r, [0.0, 1.0]);
    }

    #[test]
    fn grid_step_scales_with_range() {
        assert_relative_eq!(grid_step(1.0), 0.1, epsilon = 1e-12);
        assert_relative_eq!(grid_step(0.05), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn grid_lines_land_on_step_multiples() {
        let lines = grid_lines([0.05, 0.47]);
        assert_eq!(lines.len(), 4);
        assert_relative_eq!(lines[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(lines[3], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn grid_lines_stay_bounded_far_from_origin() {
        let bounds = Bounds::fit(&[point(0, 0, 8.0e12, 0.2)]);
        assert!(grid_lines(bounds.r).len() <= MAX_GRID_LINES);
        let img = render_scatter(&[point(0, 0, 8.0e12, 0.2)], 1, &ScatterStyle::default());
        assert_eq!(img.dimensions(), (800, 800));
    }

    #[test]
    fn markers_are_drawn_in_object_colour() {
        let pts = [point(1, 0, 0.3, 0.2), point(1, 1, 0.5, 0.4)];
        let style = ScatterStyle::default();
        let img = render_scatter(&pts, 2, &style);
        assert_eq!(img.dimensions(), (800, 800));

        // A plus marker always covers its own centre pixel.
        let bounds = Bounds::fit(&pts);
        let plot = (style.width - 2 * style.margin) as f64;
        let x = style.margin as f64 + (0.3 - bounds.r[0]) / (bounds.r[1] - bounds.r[0]) * plot;
        let y = (style.height - style.margin) as f64
            - (0.2 - bounds.g[0]) / (bounds.g[1] - bounds.g[0]) * plot;
        let [r, g, b] = rainbow(2)[0];
        assert_eq!(*img.get_pixel(x.round() as u32, y.round() as u32), Rgb([r, g, b]));
    }
}
