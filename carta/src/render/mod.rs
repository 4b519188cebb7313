//! Rendering of classified shapes into an image.
//!
//! Shapes are drawn in the order of their z-index, so layering is achieved only by drawing order:
//! areas first, then lines, then borders and places on top. The projected bounding box of all the
//! shapes is fitted into the image with a uniform scale, and the Y axis is flipped so that north is
//! at the top of the image.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use carta_types::{Point2d, Rect};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::tessellate::{GeoFeatureKind, Shape, ShapeKind};
use crate::Color;

mod canvas;
pub use canvas::{Canvas, DrawKind, RasterCanvas};

/// Priority queue of shapes ordered by z-index.
///
/// Shapes with equal z-index are returned in the order they were pushed.
#[derive(Debug, Default)]
pub struct ShapeQueue {
    heap: BinaryHeap<QueuedShape>,
    next_sequence: u64,
}

#[derive(Debug)]
struct QueuedShape {
    z_index: i32,
    sequence: u64,
    shape: Shape,
}

impl PartialEq for QueuedShape {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedShape {}

impl PartialOrd for QueuedShape {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedShape {
    // Reversed, so that the max-heap pops the lowest z-index and the earliest shape first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .z_index
            .cmp(&self.z_index)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl ShapeQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape to the queue.
    pub fn push(&mut self, shape: Shape, z_index: i32) {
        self.heap.push(QueuedShape {
            z_index,
            sequence: self.next_sequence,
            shape,
        });
        self.next_sequence += 1;
    }

    /// Removes the shape with the lowest z-index from the queue.
    pub fn pop(&mut self) -> Option<(Shape, i32)> {
        self.heap.pop().map(|q| (q.shape, q.z_index))
    }

    /// Number of shapes in the queue.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Style of a line shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePaint {
    /// Color of the line.
    pub color: Color,
    /// Width of the line in pixels.
    pub width: f64,
}

/// Style of a point shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPaint {
    /// Color of the marker.
    pub color: Color,
    /// Diameter of the marker in pixels.
    pub size: f64,
}

/// Styles of all shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Roads.
    pub road: LinePaint,
    /// Rivers and water lines.
    pub waterway: LinePaint,
    /// Country borders.
    pub border: LinePaint,
    /// Railways.
    pub railway: LinePaint,
    /// Settlement markers.
    pub populated_place: PointPaint,
    /// Grassland and farmland fill.
    pub plain: Color,
    /// Forest fill.
    pub forest: Color,
    /// Rock fill.
    pub mountains: Color,
    /// Sand fill.
    pub desert: Color,
    /// Water area fill.
    pub water: Color,
    /// Built-up area fill.
    pub residential: Color,
    /// Fill of natural areas of unknown type.
    pub unknown: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            road: LinePaint {
                color: Color::from_hex("#e892a2"),
                width: 2.0,
            },
            waterway: LinePaint {
                color: Color::from_hex("#6fa8dc"),
                width: 1.5,
            },
            border: LinePaint {
                color: Color::from_hex("#9e5fa0"),
                width: 2.0,
            },
            railway: LinePaint {
                color: Color::from_hex("#707070"),
                width: 1.5,
            },
            populated_place: PointPaint {
                color: Color::from_hex("#333333"),
                size: 6.0,
            },
            plain: Color::from_hex("#d8e8c8"),
            forest: Color::from_hex("#add19e"),
            mountains: Color::from_hex("#c8c0b0"),
            desert: Color::from_hex("#f5e9c6"),
            water: Color::from_hex("#aad3df"),
            residential: Color::from_hex("#e0dfdf"),
            unknown: Color::from_hex("#eeeeee"),
        }
    }
}

impl Palette {
    /// Drawing primitive and color for the shape kind.
    pub fn style(&self, kind: ShapeKind) -> (DrawKind, Color) {
        let line = |paint: LinePaint| (DrawKind::Polyline { width: paint.width }, paint.color);
        match kind {
            ShapeKind::Road => line(self.road),
            ShapeKind::Waterway => line(self.waterway),
            ShapeKind::Border => line(self.border),
            ShapeKind::Railway => line(self.railway),
            ShapeKind::PopulatedPlace => (
                DrawKind::Point {
                    size: self.populated_place.size,
                },
                self.populated_place.color,
            ),
            ShapeKind::GeoFeature(kind) => {
                let color = match kind {
                    GeoFeatureKind::Plain => self.plain,
                    GeoFeatureKind::Forest => self.forest,
                    GeoFeatureKind::Mountains => self.mountains,
                    GeoFeatureKind::Desert => self.desert,
                    GeoFeatureKind::Water => self.water,
                    GeoFeatureKind::Residential => self.residential,
                    GeoFeatureKind::Unknown => self.unknown,
                };
                (DrawKind::Polygon, color)
            }
        }
    }
}

/// Parameters of the output image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Width of the image in pixels.
    pub width: u32,
    /// Height of the image in pixels.
    pub height: u32,
    /// Color the image is filled with before drawing.
    pub background: Color,
    /// Shape styles.
    pub palette: Palette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            background: Color::from_hex("#f2efe9"),
            palette: Palette::default(),
        }
    }
}

/// Renders all shapes of the queue into a new image.
pub fn render(queue: ShapeQueue, bounding_box: &Rect, options: &RenderOptions) -> RgbaImage {
    let mut canvas = RasterCanvas::new(options.width, options.height, options.background);
    render_to(&mut canvas, queue, bounding_box, options);
    canvas.into_image()
}

/// Draws all shapes of the queue on the canvas. Returns the number of drawn shapes.
///
/// The canvas is expected to be `options.width` by `options.height` pixels and to be already
/// filled with the background.
pub fn render_to<C: Canvas>(
    canvas: &mut C,
    mut queue: ShapeQueue,
    bounding_box: &Rect,
    options: &RenderOptions,
) -> usize {
    let transform = ScreenTransform::fit(bounding_box, options.width, options.height);
    log::debug!(
        "Rendering {} shapes with scale {}",
        queue.len(),
        transform.scale
    );

    let mut drawn = 0;
    while let Some((shape, z_index)) = queue.pop() {
        if shape.points.len() < 2 {
            log::trace!(
                "Skipping {:?} shape with {} points at z-index {z_index}",
                shape.kind,
                shape.points.len()
            );
            continue;
        }

        let points: Vec<Point2d> = shape.points.iter().map(|p| transform.apply(p)).collect();
        let (kind, color) = options.palette.style(shape.kind);
        canvas.draw(&points, kind, color);
        drawn += 1;
    }

    drawn
}

#[derive(Debug, Clone, Copy)]
struct ScreenTransform {
    origin: Point2d,
    scale: f64,
    height: f64,
}

impl ScreenTransform {
    fn fit(bounding_box: &Rect, width: u32, height: u32) -> Self {
        let usable = |scale: f64| scale.is_finite() && scale > 0.0;
        let scale_x = width as f64 / bounding_box.width();
        let scale_y = height as f64 / bounding_box.height();

        let scale = match (usable(scale_x), usable(scale_y)) {
            (true, true) => scale_x.min(scale_y),
            (true, false) => scale_x,
            (false, true) => scale_y,
            (false, false) => 1.0,
        };

        Self {
            origin: bounding_box.min_corner(),
            scale,
            height: height as f64,
        }
    }

    fn apply(&self, point: &Point2d) -> Point2d {
        Point2d::new(
            (point.x() - self.origin.x()) * self.scale,
            self.height - (point.y() - self.origin.y()) * self.scale,
        )
    }
}
