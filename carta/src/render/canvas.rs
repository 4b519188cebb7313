use carta_types::Point2d;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

use crate::Color;

/// Drawing primitive used for a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawKind {
    /// Stroke through all the points.
    Polyline {
        /// Line width in pixels.
        width: f64,
    },
    /// Filled area bounded by the points.
    Polygon,
    /// Marker at every point.
    Point {
        /// Marker diameter in pixels.
        size: f64,
    },
}

/// Surface the renderer draws on. Points are given in pixels with the origin at the top left
/// corner.
pub trait Canvas {
    /// Draws the points with the given primitive.
    fn draw(&mut self, points: &[Point2d], kind: DrawKind, color: Color);
}

/// Canvas drawing into an in-memory RGBA image.
pub struct RasterCanvas {
    image: RgbaImage,
}

impl RasterCanvas {
    /// Creates a canvas of the given size filled with the background color.
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background.into()),
        }
    }

    /// Image drawn so far.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consumes the canvas and returns the image.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn draw_polyline(&mut self, points: &[Point2d], width: f64, color: Rgba<u8>) {
        for segment in points.windows(2) {
            self.draw_segment(
                (segment[0].x() as f32, segment[0].y() as f32),
                (segment[1].x() as f32, segment[1].y() as f32),
                width as f32,
                color,
            );
        }
    }

    // Lines wider than a pixel are drawn as a row of circles along the segment.
    fn draw_segment(&mut self, start: (f32, f32), end: (f32, f32), width: f32, color: Rgba<u8>) {
        if width <= 1.0 {
            draw_line_segment_mut(&mut self.image, start, end, color);
            return;
        }

        let radius = (width / 2.0).max(1.0) as i32;
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        let length = (dx * dx + dy * dy).sqrt();

        if length > 0.001 {
            let step = (radius as f32 * 0.5).max(0.5);
            let steps = (length / step).ceil() as i32;
            let step_x = dx * step / length;
            let step_y = dy * step / length;

            for i in 0..steps {
                let x = start.0 + i as f32 * step_x;
                let y = start.1 + i as f32 * step_y;
                draw_filled_circle_mut(&mut self.image, (x as i32, y as i32), radius, color);
            }
        }

        draw_filled_circle_mut(
            &mut self.image,
            (start.0 as i32, start.1 as i32),
            radius,
            color,
        );
        draw_filled_circle_mut(&mut self.image, (end.0 as i32, end.1 as i32), radius, color);
    }

    fn draw_polygon(&mut self, points: &[Point2d], color: Rgba<u8>) {
        let mut ring: Vec<Point<i32>> = Vec::with_capacity(points.len());
        for p in points {
            let p = Point::new(p.x().round() as i32, p.y().round() as i32);
            if ring.last() != Some(&p) {
                ring.push(p);
            }
        }

        // The ring must not be closed explicitly.
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        if ring.len() < 3 {
            log::trace!("Polygon collapsed to {} pixels", ring.len());
            self.draw_polyline(points, 1.0, color);
            return;
        }

        draw_polygon_mut(&mut self.image, &ring, color);
    }

    fn draw_points(&mut self, points: &[Point2d], size: f64, color: Rgba<u8>) {
        let radius = (size / 2.0).max(1.0) as i32;
        for p in points {
            draw_filled_circle_mut(
                &mut self.image,
                (p.x().round() as i32, p.y().round() as i32),
                radius,
                color,
            );
        }
    }
}

impl Canvas for RasterCanvas {
    fn draw(&mut self, points: &[Point2d], kind: DrawKind, color: Color) {
        let color: Rgba<u8> = color.into();
        match kind {
            DrawKind::Polyline { width } => self.draw_polyline(points, width, color),
            DrawKind::Polygon => self.draw_polygon(points, color),
            DrawKind::Point { size } => self.draw_points(points, size, color),
        }
    }
}
