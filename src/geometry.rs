//! Geometry and style primitives: bounding boxes, colors, and affine matrices.
//!
//! All page coordinates handed out by this crate use a top-down convention:
//! the origin is the top-left corner of the page and `y` grows downward.

use serde::{Deserialize, Serialize};

/// Slack (in points) allowed on every side when testing containment.
pub const CONTAINMENT_TOLERANCE: f32 = 5.0;

/// An axis-aligned rectangle `(x0, y0, x1, y1)` in page points.
///
/// Serialized as a 4-number array. Inputs are not required to be
/// normalized; [`BoundingBox::normalized`] swaps inverted edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl From<[f32; 4]> for BoundingBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box enclosing every point.
    pub fn from_points(points: &[(f32, f32)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = Self::new(first.0, first.1, first.0, first.1);
        for &(x, y) in rest {
            bbox.x0 = bbox.x0.min(x);
            bbox.y0 = bbox.y0.min(y);
            bbox.x1 = bbox.x1.max(x);
            bbox.y1 = bbox.y1.max(y);
        }
        Some(bbox)
    }

    /// Copy with `x0 <= x1` and `y0 <= y1`.
    pub fn normalized(&self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).abs()
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).abs()
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Whether all four coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Bounding union of two boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let a = self.normalized();
        let b = other.normalized();
        BoundingBox::new(
            a.x0.min(b.x0),
            a.y0.min(b.y0),
            a.x1.max(b.x1),
            a.y1.max(b.y1),
        )
    }

    /// Union of an iterator of boxes, `None` when empty.
    pub fn union_all<'a, I>(boxes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        boxes
            .into_iter()
            .fold(None, |acc: Option<BoundingBox>, b| match acc {
                Some(u) => Some(u.union(b)),
                None => Some(b.normalized()),
            })
    }

    /// Area of the intersection with another box (0 when disjoint).
    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        let a = self.normalized();
        let b = other.normalized();
        let dx = (a.x1.min(b.x1) - a.x0.max(b.x0)).max(0.0);
        let dy = (a.y1.min(b.y1) - a.y0.max(b.y0)).max(0.0);
        dx * dy
    }

    /// Intersection area relative to the smaller of the two boxes.
    ///
    /// Returns 0 when the boxes do not overlap or either box is degenerate.
    pub fn overlap_ratio(&self, other: &BoundingBox) -> f32 {
        let inter = self.intersection_area(other);
        if inter <= 0.0 {
            return 0.0;
        }
        let smaller = self.area().min(other.area());
        if smaller <= 0.0 {
            return 0.0;
        }
        inter / smaller
    }

    /// Whether `inner` lies inside `self`, allowing `tolerance` points of
    /// slack on every side.
    ///
    /// Boxes with positive area must also share a positive overlap, so a
    /// small box sitting in the slack band just outside `self` is not
    /// considered contained.
    pub fn contains_with_tolerance(&self, inner: &BoundingBox, tolerance: f32) -> bool {
        let outer = self.normalized();
        let inner = inner.normalized();
        let within = inner.x0 >= outer.x0 - tolerance
            && inner.y0 >= outer.y0 - tolerance
            && inner.x1 <= outer.x1 + tolerance
            && inner.y1 <= outer.y1 + tolerance;
        if !within {
            return false;
        }
        if inner.area() > 0.0 && outer.area() > 0.0 {
            outer.intersection_area(&inner) > 0.0
        } else {
            let (cx, cy) = inner.center();
            outer.contains_point(cx, cy)
        }
    }

    /// Containment with the default 5pt slack.
    pub fn contains(&self, inner: &BoundingBox) -> bool {
        self.contains_with_tolerance(inner, CONTAINMENT_TOLERANCE)
    }

    /// Whether the point lies inside the box (edges inclusive).
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let b = self.normalized();
        x >= b.x0 && x <= b.x1 && y >= b.y0 && y <= b.y1
    }

    /// Copy with every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> BoundingBox {
        BoundingBox::new(
            self.x0 * factor,
            self.y0 * factor,
            self.x1 * factor,
            self.y1 * factor,
        )
    }
}

/// An RGB color packed as `0xRRGGBB`.
///
/// Serialized as a lowercase `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xffffff);

    /// Decode a packed 24-bit integer; higher bits are discarded.
    pub fn from_packed(value: u32) -> Self {
        Color(value & 0x00ff_ffff)
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// From PDF color components in `0.0..=1.0`.
    pub fn from_rgb_f32(r: f32, g: f32, b: f32) -> Self {
        Self::from_rgb(unit_to_byte(r), unit_to_byte(g), unit_to_byte(b))
    }

    pub fn from_gray(g: f32) -> Self {
        Self::from_rgb_f32(g, g, g)
    }

    /// Naive CMYK to RGB conversion.
    pub fn from_cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        Self::from_rgb_f32(
            (1.0 - c.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - m.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - y.clamp(0.0, 1.0)) * (1.0 - k),
        )
    }

    /// Parse `#rrggbb` or `#rgb` (the `#` is optional, case-insensitive).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        match hex.len() {
            6 => u32::from_str_radix(hex, 16).ok().map(Color),
            3 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                let (r, g, b) = ((v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf);
                Some(Color((r * 17) << 16 | (g * 17) << 8 | (b * 17)))
            }
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }

    pub fn is_black(&self) -> bool {
        self.0 & 0x00ff_ffff == 0
    }

    pub fn r(&self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(&self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Components in `0.0..=1.0`, as PDF color operators expect.
    pub fn to_unit_rgb(&self) -> (f32, f32, f32) {
        (
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
        )
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid color: {}", s))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A PDF affine transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: the result applies `self` first, then `other`.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Length of the transformed unit x vector.
    pub fn x_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    /// Length of the transformed unit y vector.
    pub fn y_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosed_box_is_contained() {
        let outer = BoundingBox::new(100.0, 100.0, 300.0, 200.0);
        assert!(outer.contains(&BoundingBox::new(120.0, 110.0, 280.0, 190.0)));
        // Up to 5pt of slack on every side.
        assert!(outer.contains(&BoundingBox::new(95.0, 95.0, 305.0, 205.0)));
        assert!(!outer.contains(&BoundingBox::new(90.0, 110.0, 280.0, 190.0)));
    }

    #[test]
    fn test_disjoint_boxes() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 40.0, 40.0);
        assert_eq!(a.overlap_ratio(&b), 0.0);
        assert!(!a.contains(&b));
        assert!(!b.contains(&a));

        // Inside the slack band but not overlapping.
        let tiny = BoundingBox::new(16.0, 16.0, 18.0, 18.0);
        assert_eq!(b.overlap_ratio(&tiny), 0.0);
        assert!(!b.contains(&tiny));
    }

    #[test]
    fn test_touching_boxes_have_zero_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
        assert_eq!(a.overlap_ratio(&b), 0.0);
    }

    #[test]
    fn test_overlap_ratio_uses_smaller_box() {
        let big = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let small = BoundingBox::new(50.0, 50.0, 70.0, 70.0);
        assert!((big.overlap_ratio(&small) - 1.0).abs() < 1e-6);

        let half = BoundingBox::new(90.0, 0.0, 110.0, 10.0);
        assert!((big.overlap_ratio(&half) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_union_and_normalize() {
        let a = BoundingBox::new(10.0, 20.0, 0.0, 0.0);
        assert_eq!(a.normalized(), BoundingBox::new(0.0, 0.0, 10.0, 20.0));
        let u = a.union(&BoundingBox::new(5.0, 5.0, 50.0, 8.0));
        assert_eq!(u, BoundingBox::new(0.0, 0.0, 50.0, 20.0));
        assert!(BoundingBox::union_all(std::iter::empty()).is_none());
    }

    #[test]
    fn test_bbox_serializes_as_array() {
        let b = BoundingBox::new(1.0, 2.0, 3.0, 4.5);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.5]");
        let back: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn test_color_hex_is_six_lowercase_digits() {
        for value in [0u32, 0x1, 0xabcdef, 0x00ff00, 0xffffff, 0x123456] {
            let hex = Color::from_packed(value).to_hex();
            assert_eq!(hex.len(), 7);
            assert!(hex.starts_with('#'));
            assert!(hex[1..]
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            assert_eq!(u32::from_str_radix(&hex[1..], 16).unwrap(), value);
        }
        assert_eq!(Color::from_packed(0xABCDEF).to_hex(), "#abcdef");
    }

    #[test]
    fn test_color_exhaustive_sample() {
        for value in (0..=0xffffffu32).step_by(4099) {
            let c = Color::from_packed(value);
            assert_eq!(Color::from_hex(&c.to_hex()), Some(c));
        }
    }

    #[test]
    fn test_color_from_components() {
        assert_eq!(Color::from_gray(0.0), Color::BLACK);
        assert_eq!(Color::from_rgb_f32(1.0, 0.0, 0.0).to_hex(), "#ff0000");
        assert_eq!(Color::from_cmyk(0.0, 0.0, 0.0, 1.0), Color::BLACK);
        assert_eq!(Color::from_hex("#FFF"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("nope"), None);
    }

    #[test]
    fn test_matrix_concat() {
        let scale = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Matrix::translation(10.0, 5.0);
        let m = scale.concat(&shift);
        assert_eq!(m.transform_point(1.0, 1.0), (12.0, 7.0));
        assert_eq!(shift.concat(&scale).transform_point(1.0, 1.0), (22.0, 12.0));
        assert!((m.y_scale() - 2.0).abs() < 1e-6);
    }
}
