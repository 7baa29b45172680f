use crate::db::gap::Gap;
use crate::db::netlist::NetList;
use crate::geom::rect::Rect;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const NET_FILL: Rgb<u8> = Rgb([40, 70, 220]);
const NET_EDGE: Rgb<u8> = Rgb([0, 0, 0]);
const GAP_FILL: Rgb<u8> = Rgb([211, 211, 211]);
const ZONE: Rgb<u8> = Rgb([220, 30, 30]);
const SEPARATOR: Rgb<u8> = Rgb([120, 120, 120]);

/// World window of one panel mapped onto a pixel band of the image.
struct Panel {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    top: u32,
    width: u32,
    height: u32,
}

impl Panel {
    fn map(&self, x: f64, y: f64) -> (f64, f64) {
        let sx = self.width as f64 / (self.max_x - self.min_x).max(f64::EPSILON);
        let sy = self.height as f64 / (self.max_y - self.min_y).max(f64::EPSILON);
        (
            (x - self.min_x) * sx,
            self.top as f64 + self.height as f64 - (y - self.min_y) * sy,
        )
    }

    fn fill(&self, img: &mut RgbImage, rect: &Rect, color: Rgb<u8>, outline: bool) {
        let ([x0, y0], [x1, y1]) = rect.corners_f64();
        let (px0, py_bot) = self.map(x0, y0);
        let (px1, py_top) = self.map(x1, y1);
        let w = (px1 - px0).max(1.0) as u32;
        let h = (py_bot - py_top).max(1.0) as u32;
        let r = ImageRect::at(px0 as i32, py_top as i32).of_size(w, h);
        draw_filled_rect_mut(img, r, color);
        if outline {
            draw_hollow_rect_mut(img, r, NET_EDGE);
        }
    }

    fn vline(&self, img: &mut RgbImage, x: f64, color: Rgb<u8>, thickness: i32) {
        let (px, _) = self.map(x, self.min_y);
        let (top, bottom) = (self.top as f32, (self.top + self.height) as f32);
        for dx in -(thickness / 2)..=(thickness / 2) {
            let x = px as f32 + dx as f32;
            draw_line_segment_mut(img, (x, top), (x, bottom), color);
        }
    }
}

fn f(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn save(img: &RgbImage, filename: &str) {
    if let Err(e) = img.save(Path::new(filename)) {
        log::warn!("Failed to write {}: {}", filename, e);
    }
}

/// Two stacked panels, one packing each, for the unlimited single-track case.
/// Red lines mark the peak-density zones of each gap's nets.
pub fn draw_single_gap(left_edge: &Gap, proposal: &Gap, filename: &str, width: u32, height: u32) {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let panel_h = (height / 2).max(1);
    let max_y = f(left_edge.used_height().max(proposal.used_height())).max(1.0);
    let margin = 0.01;

    for (i, gap) in [left_edge, proposal].into_iter().enumerate() {
        let (Some(&first), Some(&last)) = (gap.x_coords().first(), gap.x_coords().last()) else {
            continue;
        };
        let panel = Panel {
            min_x: f(first) - margin,
            max_x: f(last) + margin,
            min_y: 0.0,
            max_y,
            top: i as u32 * panel_h,
            width,
            height: panel_h,
        };

        for a in gap.net2assignment().values() {
            panel.fill(&mut img, &a.rect(), NET_FILL, true);
        }

        let nets: NetList = gap.nets().cloned().collect();
        for (start, end) in nets.max_density_zones() {
            panel.vline(&mut img, f(start), ZONE, 3);
            panel.vline(&mut img, f(end), ZONE, 3);
        }
    }

    draw_line_segment_mut(
        &mut img,
        (0.0, panel_h as f32),
        (width as f32, panel_h as f32),
        SEPARATOR,
    );
    save(&img, filename);
}

/// Two panels showing every gap as a grey band at its base height with the
/// nets it holds drawn on top.
pub fn draw_multiple_gaps(
    left_edge: &[Gap],
    proposal: &[Gap],
    filename: &str,
    width: u32,
    height: u32,
) {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let panel_h = (height / 2).max(1);

    let bands = if left_edge.len() > proposal.len() {
        left_edge
    } else {
        proposal
    };
    let band_height = |g: &Gap| g.width().unwrap_or_else(|| g.used_height());

    let xs = left_edge.iter().chain(proposal).flat_map(|g| g.x_coords());
    let (min_x, max_x) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
        (lo.min(f(x)), hi.max(f(x)))
    });
    if !min_x.is_finite() {
        log::warn!("No gaps to draw, skipping {}", filename);
        return;
    }
    let min_y = bands
        .iter()
        .map(|g| f(g.base_height()))
        .fold(f64::INFINITY, f64::min);
    let max_y = bands
        .iter()
        .map(|g| f(g.base_height() + band_height(g)))
        .fold(f64::NEG_INFINITY, f64::max)
        + 10.0;

    for (i, gaps) in [left_edge, proposal].into_iter().enumerate() {
        let panel = Panel {
            min_x,
            max_x,
            min_y,
            max_y,
            top: i as u32 * panel_h,
            width,
            height: panel_h,
        };

        for g in bands {
            let (_, py_bot) = panel.map(min_x, f(g.base_height()));
            let (_, py_top) = panel.map(min_x, f(g.base_height() + band_height(g)));
            let h = (py_bot - py_top).max(1.0) as u32;
            draw_filled_rect_mut(
                &mut img,
                ImageRect::at(0, py_top as i32).of_size(width.max(1), h),
                GAP_FILL,
            );
        }

        for g in gaps {
            for a in g.net2assignment().values() {
                panel.fill(&mut img, &g.placed_rect(a), NET_FILL, false);
            }
        }
    }

    draw_line_segment_mut(
        &mut img,
        (0.0, panel_h as f32),
        (width as f32, panel_h as f32),
        SEPARATOR,
    );
    save(&img, filename);
}
