//! Silhouette rasterization into boolean occupancy masks.
//!
//! The mask biases seeding toward the silhouette and is never consulted
//! during integration.

use crate::schema::{Bounds, FillRule, MaskConfig, Point, Silhouette};

/// Boolean occupancy grid, indexed `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl ShapeMask {
    /// All-false mask.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Wrap a rasterized grid. Mismatched lengths produce an empty mask.
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Self {
        if cells.len() != width * height {
            log::warn!(
                "mask buffer has {} cells, expected {}x{}",
                cells.len(),
                width,
                height
            );
            return Self::empty(width, height);
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Disc of cells whose centers lie within `radius` of `(cx, cy)`.
    pub fn circle(width: usize, height: usize, cx: f32, cy: f32, radius: f32) -> Self {
        let r2 = radius * radius;
        let mut cells = vec![false; width * height];
        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                cells[y * width + x] = dx * dx + dy * dy <= r2;
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x]
    }

    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// `(x, y, inside)` for every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &inside)| (i % width, i / width, inside))
    }

    /// Number of marked cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }
}

/// Capability that fills closed contours on a grid.
///
/// Contours arrive already transformed into grid space.
pub trait Rasterizer {
    fn rasterize(&self, contours: &[Vec<Point>], width: usize, height: usize) -> Vec<bool>;
}

/// Scanline rasterizer sampling each cell at its center.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineRasterizer {
    pub fill_rule: FillRule,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    direction: i32, // +1 for down, -1 for up
}

impl ScanlineRasterizer {
    fn edges(contours: &[Vec<Point>]) -> Vec<Edge> {
        let mut edges = Vec::new();
        for contour in contours {
            for i in 0..contour.len() {
                let p0 = contour[i];
                let p1 = contour[(i + 1) % contour.len()];

                // Horizontal edges never cross a scanline.
                if p0.y == p1.y {
                    continue;
                }
                let (x0, y0, x1, y1, direction) = if p0.y < p1.y {
                    (p0.x, p0.y, p1.x, p1.y, 1)
                } else {
                    (p1.x, p1.y, p0.x, p0.y, -1)
                };
                edges.push(Edge {
                    x0,
                    y0,
                    x1,
                    y1,
                    direction,
                });
            }
        }
        edges
    }
}

impl Rasterizer for ScanlineRasterizer {
    fn rasterize(&self, contours: &[Vec<Point>], width: usize, height: usize) -> Vec<bool> {
        let mut cells = vec![false; width * height];
        let edges = Self::edges(contours);
        let mut crossings: Vec<(f32, i32)> = Vec::new();

        for y in 0..height {
            let scanline_y = y as f32 + 0.5;

            crossings.clear();
            for edge in &edges {
                if scanline_y < edge.y0 || scanline_y >= edge.y1 {
                    continue;
                }
                let t = (scanline_y - edge.y0) / (edge.y1 - edge.y0);
                crossings.push((edge.x0 + t * (edge.x1 - edge.x0), edge.direction));
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0i32;
            for pair in crossings.windows(2) {
                let (x, direction) = pair[0];
                winding += direction;
                let inside = match self.fill_rule {
                    FillRule::NonZero => winding != 0,
                    FillRule::EvenOdd => winding % 2 != 0,
                };
                if !inside {
                    continue;
                }

                // Cells whose centers fall in [x, next_x).
                let next_x = pair[1].0;
                let start = (x - 0.5).ceil().max(0.0) as usize;
                let end = ((next_x - 0.5).ceil().max(0.0) as usize).min(width);
                let row = y * width;
                for cell in &mut cells[row + start.min(end)..row + end] {
                    *cell = true;
                }
            }
        }

        cells
    }
}

/// Uniform scale and offset mapping silhouette space onto the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    pub scale: f32,
    pub source_center: Point,
    pub target_center: Point,
}

impl FitTransform {
    /// Center `bounds` on the grid, scaled to fit inside the padded area.
    pub fn fit(bounds: &Bounds, width: usize, height: usize, padding: f32) -> Option<Self> {
        let avail_w = width as f32 * (1.0 - 2.0 * padding);
        let avail_h = height as f32 * (1.0 - 2.0 * padding);
        let scale = (avail_w / bounds.width()).min(avail_h / bounds.height());
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        Some(Self {
            scale,
            source_center: bounds.center(),
            target_center: Point::new(width as f32 / 2.0, height as f32 / 2.0),
        })
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.target_center.x + (p.x - self.source_center.x) * self.scale,
            self.target_center.y + (p.y - self.source_center.y) * self.scale,
        )
    }
}

/// Builds [`ShapeMask`]s from silhouettes at a given grid resolution.
pub struct ShapeMaskBuilder<R: Rasterizer = ScanlineRasterizer> {
    rasterizer: R,
    padding: f32,
}

impl ShapeMaskBuilder<ScanlineRasterizer> {
    pub fn new(padding: f32) -> Self {
        Self::with_rasterizer(ScanlineRasterizer::default(), padding)
    }

    /// Scanline builder using the configured padding and fill rule.
    pub fn from_config(config: &MaskConfig) -> Self {
        Self::with_rasterizer(
            ScanlineRasterizer {
                fill_rule: config.fill_rule,
            },
            config.padding,
        )
    }
}

impl<R: Rasterizer> ShapeMaskBuilder<R> {
    pub fn with_rasterizer(rasterizer: R, padding: f32) -> Self {
        Self {
            rasterizer,
            padding,
        }
    }

    /// Rasterize a silhouette. Degenerate outlines yield an all-false mask.
    pub fn build(&self, silhouette: &Silhouette, width: usize, height: usize) -> ShapeMask {
        let contours = silhouette.contours();
        let Some(transform) = silhouette
            .bounds()
            .and_then(|b| FitTransform::fit(&b, width, height, self.padding))
        else {
            log::warn!("silhouette has no fillable area, using empty mask");
            return ShapeMask::empty(width, height);
        };

        let placed: Vec<Vec<Point>> = contours
            .iter()
            .map(|c| c.iter().map(|&p| transform.apply(p)).collect())
            .collect();

        let mask = ShapeMask::from_cells(
            width,
            height,
            self.rasterizer.rasterize(&placed, width, height),
        );
        log::debug!(
            "built {}x{} mask with {} cells (scale {:.3})",
            width,
            height,
            mask.count(),
            transform.scale
        );
        mask
    }

    /// Parse and rasterize SVG path data. Malformed data yields an all-false mask.
    pub fn build_from_path_data(&self, data: &str, width: usize, height: usize) -> ShapeMask {
        match Silhouette::parse(data) {
            Ok(silhouette) => self.build(&silhouette, width, height),
            Err(e) => {
                log::warn!("invalid silhouette path ({e}), using empty mask");
                ShapeMask::empty(width, height)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::HORSE_PATH;

    fn square(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    #[test]
    fn test_rasterize_square_exact() {
        let cells = ScanlineRasterizer::default().rasterize(&[square(2.0, 3.0, 6.0, 5.0)], 10, 10);
        for y in 0..10 {
            for x in 0..10 {
                let expected = (2..6).contains(&x) && (3..5).contains(&y);
                assert_eq!(cells[y * 10 + x], expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_rasterize_clips_to_grid() {
        let cells = ScanlineRasterizer::default().rasterize(&[square(-5.0, -5.0, 3.0, 20.0)], 8, 8);
        let count = cells.iter().filter(|&&c| c).count();
        assert_eq!(count, 3 * 8);
    }

    #[test]
    fn test_fill_rules_on_nested_square() {
        // Same orientation for both contours: non-zero fills the hole, even-odd does not.
        let contours = [square(0.0, 0.0, 10.0, 10.0), square(3.0, 3.0, 7.0, 7.0)];
        let non_zero = ScanlineRasterizer::default().rasterize(&contours, 10, 10);
        let even_odd = ScanlineRasterizer {
            fill_rule: FillRule::EvenOdd,
        }
        .rasterize(&contours, 10, 10);

        assert!(non_zero[5 * 10 + 5]);
        assert!(!even_odd[5 * 10 + 5]);
        assert!(even_odd[1 * 10 + 1]);
    }

    #[test]
    fn test_horse_mask_centered_and_padded() {
        let builder = ShapeMaskBuilder::new(0.15);
        let mask = builder.build_from_path_data(HORSE_PATH, 256, 256);
        assert!(mask.count() > 1000, "horse covers {} cells", mask.count());

        // Nothing inside the 15% margin.
        let margin = (256.0 * 0.15) as usize - 1;
        for y in 0..256 {
            for x in 0..256 {
                if mask.get(x, y) {
                    assert!(x >= margin && x < 256 - margin, "cell ({x}, {y}) in margin");
                    assert!(y >= margin && y < 256 - margin, "cell ({x}, {y}) in margin");
                }
            }
        }
    }

    #[test]
    fn test_circle_silhouette_fills_seventy_percent() {
        let circle = Silhouette::circle(Point::new(0.0, 0.0), 1.0, 128);
        let mask = ShapeMaskBuilder::new(0.15).build(&circle, 100, 100);

        // Diameter 70 cells, area ~ pi * 35^2.
        let expected = std::f32::consts::PI * 35.0 * 35.0;
        let count = mask.count() as f32;
        assert!((count - expected).abs() / expected < 0.05, "count {count}");
        assert!(mask.get(50, 50));
        assert!(!mask.get(10, 50));
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let wide = Silhouette::parse("M 0 0 L 200 0 L 200 100 L 0 100 Z").unwrap();
        let mask = ShapeMaskBuilder::new(0.0).build(&wide, 64, 64);
        let rows = (0..64).filter(|&y| mask.get(32, y)).count();
        let cols = (0..64).filter(|&x| mask.get(x, 32)).count();
        assert_eq!(cols, 64);
        assert_eq!(rows, 32);
    }

    #[test]
    fn test_malformed_silhouette_yields_empty_mask() {
        let builder = ShapeMaskBuilder::new(0.15);
        for data in ["", "M 0 0 A 1 1 0 0 1 5 5", "L 1 1", "M 0 0 L 10 0 Z"] {
            let mask = builder.build_from_path_data(data, 32, 32);
            assert!(mask.is_empty(), "path {data:?} should give empty mask");
            assert_eq!(mask.cells().len(), 32 * 32);
        }
    }

    #[test]
    fn test_mask_circle_helper() {
        let mask = ShapeMask::circle(256, 256, 128.0, 128.0, 40.0);
        let expected = std::f32::consts::PI * 40.0 * 40.0;
        assert!((mask.count() as f32 - expected).abs() / expected < 0.02);

        let inside: Vec<(usize, usize)> = mask
            .iter()
            .filter(|&(_, _, inside)| inside)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(inside.len(), mask.count());
        assert!(inside.contains(&(128, 128)));
        assert!(!inside.contains(&(0, 0)));
    }
}
