use cgmath::{Point3, Vector3};

/// One rectangular face in world space.
///
/// Corners run `a, b, c, d` around the rectangle. For every quad the
/// generators emit, `(b - a) × (c - b)` points against `normal`, i.e. the
/// corners are clockwise when seen from outside the solid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad {
    /// First corner.
    pub a: Point3<f32>,
    /// Second corner.
    pub b: Point3<f32>,
    /// Third corner.
    pub c: Point3<f32>,
    /// Fourth corner.
    pub d: Point3<f32>,
    /// Unit outward normal.
    pub normal: Vector3<f32>,
}

impl Quad {
    /// Creates a quad from corners in winding order.
    pub fn new(
        a: Point3<f32>,
        b: Point3<f32>,
        c: Point3<f32>,
        d: Point3<f32>,
        normal: Vector3<f32>,
    ) -> Self {
        Quad { a, b, c, d, normal }
    }

    /// Builds a quad from unscaled cell-corner coordinates.
    pub(crate) fn from_cell_corners(
        corners: [[usize; 3]; 4],
        normal: Vector3<f32>,
        voxel_size: f32,
    ) -> Self {
        let [a, b, c, d] = corners.map(|[x, y, z]| {
            Point3::new(x as f32 * voxel_size, y as f32 * voxel_size, z as f32 * voxel_size)
        });
        Quad { a, b, c, d, normal }
    }

    /// Corners in winding order.
    pub fn corners(&self) -> [Point3<f32>; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Component-wise minimum corner.
    pub fn min(&self) -> Point3<f32> {
        self.corners()
            .into_iter()
            .fold(self.a, |m, p| Point3::new(m.x.min(p.x), m.y.min(p.y), m.z.min(p.z)))
    }

    /// Component-wise maximum corner.
    pub fn max(&self) -> Point3<f32> {
        self.corners()
            .into_iter()
            .fold(self.a, |m, p| Point3::new(m.x.max(p.x), m.y.max(p.y), m.z.max(p.z)))
    }

    /// The same quad moved by `offset`, e.g. into a space's frame.
    pub fn translated(&self, offset: Vector3<f32>) -> Quad {
        Quad {
            a: self.a + offset,
            b: self.b + offset,
            c: self.c + offset,
            d: self.d + offset,
            normal: self.normal,
        }
    }
}

/// An axis-aligned rectangle of cells in a 2D slice.
///
/// `left`/`right` run along the slice's columns, `top`/`bottom` along its rows;
/// `right` and `bottom` are exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rectangle {
    /// First column.
    pub left: usize,
    /// First row.
    pub top: usize,
    /// Columns covered.
    pub width: usize,
    /// Rows covered.
    pub height: usize,
}

impl Rectangle {
    /// Creates a rectangle.
    pub fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Rectangle { left, top, width, height }
    }

    /// One past the last column.
    pub fn right(&self) -> usize {
        self.left + self.width
    }

    /// One past the last row.
    pub fn bottom(&self) -> usize {
        self.top + self.height
    }

    /// Whether the cell at `(column, row)` lies inside.
    pub fn contains(&self, column: usize, row: usize) -> bool {
        (self.left..self.right()).contains(&column) && (self.top..self.bottom()).contains(&row)
    }

    /// Whether the two rectangles share at least one cell.
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Number of cells covered.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}
