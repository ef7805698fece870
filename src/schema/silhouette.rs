//! Vector silhouettes used to bias pattern growth.
//!
//! A silhouette is parsed from SVG path data and flattened into closed
//! polygons before rasterization. Coordinates are resolution independent;
//! the mask builder fits them onto the grid.

use serde::{Deserialize, Serialize};

/// Bundled horse outline, in source units spanning roughly x:[160,372] y:[78,352].
pub const HORSE_PATH: &str = "M 180 300 C 175 280 170 260 172 240 C 174 220 180 210 185 195 \
C 190 180 188 165 182 150 C 178 140 170 132 168 120 C 166 108 170 96 178 88 \
C 186 80 196 78 206 80 C 216 82 224 88 228 96 C 232 104 232 112 236 118 \
C 240 124 248 128 258 128 C 268 128 278 124 288 118 C 298 112 306 104 316 100 \
C 326 96 338 96 348 100 C 358 104 364 112 368 122 C 372 132 372 142 370 152 \
C 368 162 364 170 358 180 C 352 190 344 198 340 210 C 336 222 336 234 338 248 \
C 340 262 344 274 346 288 C 348 302 348 316 344 328 C 340 340 332 348 322 350 \
C 312 352 302 348 296 342 C 290 336 288 328 288 318 C 288 308 290 298 288 290 \
C 286 282 280 278 274 276 C 268 274 260 274 252 278 C 244 282 238 288 232 296 \
C 226 304 222 314 218 322 C 214 330 210 338 204 344 C 198 350 190 352 180 350 \
C 170 348 164 340 162 330 C 160 320 162 310 168 302 C 174 294 180 292 180 300 Z";

/// Line segments per flattened curve.
const CURVE_SEGMENTS: usize = 16;

/// A 2D point in silhouette or grid space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Fill rule for determining inside/outside, as SVG `fill-rule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    /// Non-zero winding rule.
    #[default]
    NonZero,
    /// Even-odd (parity) rule.
    EvenOdd,
}

/// Absolute path command after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
    CubicTo { control1: Point, control2: Point, to: Point },
    Close,
}

/// Axis-aligned bounds of a flattened outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.min.lerp(self.max, 0.5)
    }
}

/// Silhouette path parsing errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("Path data is empty")]
    Empty,
    #[error("Unsupported path command '{0}'")]
    UnsupportedCommand(char),
    #[error("Expected a number at byte {0}")]
    ExpectedNumber(usize),
    #[error("Path must start with a move command")]
    MissingMoveTo,
}

/// A closed vector silhouette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Silhouette {
    commands: Vec<PathCommand>,
}

impl Silhouette {
    /// Parse SVG path data (`M L H V C S Q T Z` and their relative forms).
    pub fn parse(data: &str) -> Result<Self, PathError> {
        PathParser::new(data).parse()
    }

    /// The bundled horse outline.
    pub fn horse() -> Self {
        // The bundled path is a fixed, well-formed literal.
        Self::parse(HORSE_PATH).unwrap_or_else(|_| Self::from_commands(Vec::new()))
    }

    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Closed polygon approximating a circle.
    pub fn circle(center: Point, radius: f32, segments: usize) -> Self {
        let segments = segments.max(3);
        let mut commands = Vec::with_capacity(segments + 1);
        for i in 0..segments {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            let p = Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
            commands.push(if i == 0 {
                PathCommand::MoveTo(p)
            } else {
                PathCommand::LineTo(p)
            });
        }
        commands.push(PathCommand::Close);
        Self { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Flatten into closed contours. Contours with fewer than three points are dropped.
    pub fn contours(&self) -> Vec<Vec<Point>> {
        let mut contours = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        let mut cursor = Point::default();

        let mut finish = |contour: &mut Vec<Point>| {
            if contour.len() >= 3 {
                contours.push(std::mem::take(contour));
            } else {
                contour.clear();
            }
        };

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    finish(&mut current);
                    current.push(p);
                    cursor = p;
                }
                PathCommand::LineTo(p) => {
                    current.push(p);
                    cursor = p;
                }
                PathCommand::QuadTo { control, to } => {
                    let start = cursor;
                    for i in 1..=CURVE_SEGMENTS {
                        let t = i as f32 / CURVE_SEGMENTS as f32;
                        current.push(quadratic_point(start, control, to, t));
                    }
                    cursor = to;
                }
                PathCommand::CubicTo {
                    control1,
                    control2,
                    to,
                } => {
                    let start = cursor;
                    for i in 1..=CURVE_SEGMENTS {
                        let t = i as f32 / CURVE_SEGMENTS as f32;
                        current.push(cubic_point(start, control1, control2, to, t));
                    }
                    cursor = to;
                }
                PathCommand::Close => {
                    if let Some(&first) = current.first() {
                        cursor = first;
                    }
                    finish(&mut current);
                }
            }
        }
        finish(&mut current);

        contours
    }

    /// Bounds of the flattened outline, `None` if there is nothing to fill.
    pub fn bounds(&self) -> Option<Bounds> {
        let contours = self.contours();
        let mut points = contours.iter().flatten();
        let first = *points.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for p in points {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }
}

/// Evaluates a quadratic Bezier curve at parameter `t`.
#[inline]
fn quadratic_point(p0: Point, p1: Point, p2: Point, t: f32) -> Point {
    let a = p0.lerp(p1, t);
    let b = p1.lerp(p2, t);
    a.lerp(b, t)
}

/// Evaluates a cubic Bezier curve at parameter `t`.
#[inline]
fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let w0 = mt * mt * mt;
    let w1 = 3.0 * mt * mt * t;
    let w2 = 3.0 * mt * t * t;
    let w3 = t * t * t;
    Point::new(
        w0 * p0.x + w1 * p1.x + w2 * p2.x + w3 * p3.x,
        w0 * p0.y + w1 * p1.y + w2 * p2.y + w3 * p3.y,
    )
}

/// Single-pass reader over SVG path data.
struct PathParser<'a> {
    bytes: &'a [u8],
    pos: usize,
    commands: Vec<PathCommand>,
    cursor: Point,
    subpath_start: Point,
    /// Reflected control point source for `S` / `T`.
    last_control: Option<Point>,
}

impl<'a> PathParser<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            bytes: data.as_bytes(),
            pos: 0,
            commands: Vec::new(),
            cursor: Point::default(),
            subpath_start: Point::default(),
            last_control: None,
        }
    }

    fn parse(mut self) -> Result<Silhouette, PathError> {
        self.skip_separators();
        if self.pos >= self.bytes.len() {
            return Err(PathError::Empty);
        }

        let mut command: Option<u8> = None;
        loop {
            self.skip_separators();
            let Some(&byte) = self.bytes.get(self.pos) else {
                break;
            };

            let cmd = if byte.is_ascii_alphabetic() {
                self.pos += 1;
                byte
            } else {
                // Implicit repetition of the previous command.
                match command {
                    Some(b'M') => b'L',
                    Some(b'm') => b'l',
                    Some(c) if c != b'Z' && c != b'z' => c,
                    _ => return Err(PathError::ExpectedNumber(self.pos)),
                }
            };

            if self.commands.is_empty() && !matches!(cmd, b'M' | b'm') {
                return Err(PathError::MissingMoveTo);
            }

            self.apply(cmd)?;
            command = Some(cmd);
        }

        Ok(Silhouette {
            commands: self.commands,
        })
    }

    fn apply(&mut self, cmd: u8) -> Result<(), PathError> {
        let relative = cmd.is_ascii_lowercase();
        let origin = if relative { self.cursor } else { Point::default() };

        match cmd.to_ascii_uppercase() {
            b'M' => {
                let p = self.point(origin)?;
                self.commands.push(PathCommand::MoveTo(p));
                self.cursor = p;
                self.subpath_start = p;
                self.last_control = None;
            }
            b'L' => {
                let p = self.point(origin)?;
                self.line_to(p);
            }
            b'H' => {
                let x = self.number()? + origin.x;
                self.line_to(Point::new(x, self.cursor.y));
            }
            b'V' => {
                let y = self.number()? + origin.y;
                self.line_to(Point::new(self.cursor.x, y));
            }
            b'C' => {
                let control1 = self.point(origin)?;
                let control2 = self.point(origin)?;
                let to = self.point(origin)?;
                self.cubic_to(control1, control2, to);
            }
            b'S' => {
                let control1 = self.reflected_control();
                let control2 = self.point(origin)?;
                let to = self.point(origin)?;
                self.cubic_to(control1, control2, to);
            }
            b'Q' => {
                let control = self.point(origin)?;
                let to = self.point(origin)?;
                self.quad_to(control, to);
            }
            b'T' => {
                let control = self.reflected_control();
                let to = self.point(origin)?;
                self.quad_to(control, to);
            }
            b'Z' => {
                self.commands.push(PathCommand::Close);
                self.cursor = self.subpath_start;
                self.last_control = None;
            }
            _ => return Err(PathError::UnsupportedCommand(cmd as char)),
        }
        Ok(())
    }

    fn line_to(&mut self, p: Point) {
        self.commands.push(PathCommand::LineTo(p));
        self.cursor = p;
        self.last_control = None;
    }

    fn cubic_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.commands.push(PathCommand::CubicTo {
            control1,
            control2,
            to,
        });
        self.cursor = to;
        self.last_control = Some(control2);
    }

    fn quad_to(&mut self, control: Point, to: Point) {
        self.commands.push(PathCommand::QuadTo { control, to });
        self.cursor = to;
        self.last_control = Some(control);
    }

    fn reflected_control(&self) -> Point {
        match self.last_control {
            Some(c) => Point::new(2.0 * self.cursor.x - c.x, 2.0 * self.cursor.y - c.y),
            None => self.cursor,
        }
    }

    fn point(&mut self, origin: Point) -> Result<Point, PathError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point::new(origin.x + x, origin.y + y))
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn number(&mut self) -> Result<f32, PathError> {
        self.skip_separators();
        let start = self.pos;
        let mut end = start;
        let bytes = self.bytes;

        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let mut digits = 0;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
            digits += 1;
        }
        if bytes.get(end) == Some(&b'.') {
            end += 1;
            while bytes.get(end).is_some_and(u8::is_ascii_digit) {
                end += 1;
                digits += 1;
            }
        }
        if digits == 0 {
            return Err(PathError::ExpectedNumber(start));
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp_end = end + 1;
            if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
                exp_end += 1;
            }
            if bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
                while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
                    exp_end += 1;
                }
                end = exp_end;
            }
        }

        let text = std::str::from_utf8(&bytes[start..end])
            .map_err(|_| PathError::ExpectedNumber(start))?;
        let value: f32 = text
            .parse()
            .map_err(|_| PathError::ExpectedNumber(start))?;
        if !value.is_finite() {
            return Err(PathError::ExpectedNumber(start));
        }
        self.pos = end;
        Ok(value)
    }
}
