// Copyright (c) 2025 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The boundary module contains a point in polygon classifier and the
//! polygon that encircles the Ordnance Survey's coverage of Great Britain.
//!
//! The classifier distinguishes points on a vertex or an edge of the polygon
//! from points strictly inside or outside it, using an even-odd ray casting
//! test along a horizontal ray.

#![allow(clippy::float_cmp)]

use crate::GridCoordinate;
use icao_units::si::Metres;
use once_cell::sync::Lazy;

/// The location of a point relative to a `Polygon`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// The point is one of the polygon's vertices.
    Vertex,
    /// The point lies on one of the polygon's edges.
    Boundary,
    /// The point is inside the polygon.
    Inside,
    /// The point is outside the polygon.
    Outside,
}

/// A closed ring of grid coordinates, the first vertex is repeated as the last.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<GridCoordinate>,
}

impl Polygon {
    /// Constructor.
    /// * `vertices` - the vertices of a closed ring.
    ///
    /// # Panics
    ///
    /// The function will panic if there are less than 3 `vertices` or the
    /// last vertex is not the first.
    #[must_use]
    pub fn new(vertices: Vec<GridCoordinate>) -> Self {
        assert!(
            vertices.len() >= 3,
            "a polygon requires at least 3 vertices, found {}",
            vertices.len()
        );
        assert!(
            vertices.first() == vertices.last(),
            "a polygon must be a closed ring"
        );
        Self { vertices }
    }

    /// Accessor for the vertices.
    #[must_use]
    pub fn vertices(&self) -> &[GridCoordinate] {
        &self.vertices
    }

    /// Classify a point against the polygon.
    /// * `point` - the point to classify.
    #[must_use]
    pub fn classify(&self, point: &GridCoordinate) -> Location {
        classify(point, self)
    }
}

/// Classify a point against a polygon.
/// * `point` - the point to classify.
/// * `polygon` - the polygon.
///
/// returns the `Location` of the point relative to the polygon.
/// # Examples
/// ```
/// use osgb36::boundary::{classify, Location, Polygon};
/// use osgb36::{GridCoordinate, Metres};
///
/// let square = Polygon::new(vec![
///     GridCoordinate::new(Metres(0.0), Metres(0.0)),
///     GridCoordinate::new(Metres(10.0), Metres(0.0)),
///     GridCoordinate::new(Metres(10.0), Metres(10.0)),
///     GridCoordinate::new(Metres(0.0), Metres(10.0)),
///     GridCoordinate::new(Metres(0.0), Metres(0.0)),
/// ]);
/// let centre = GridCoordinate::new(Metres(5.0), Metres(5.0));
/// assert_eq!(Location::Inside, classify(&centre, &square));
/// ```
#[must_use]
pub fn classify(point: &GridCoordinate, polygon: &Polygon) -> Location {
    if polygon.vertices.iter().any(|vertex| vertex == point) {
        return Location::Vertex;
    }

    let x = point.easting().0;
    let y = point.northing().0;
    let mut intersections = 0_usize;
    for edge in polygon.vertices.windows(2) {
        let (x1, y1) = (edge[0].easting().0, edge[0].northing().0);
        let (x2, y2) = (edge[1].easting().0, edge[1].northing().0);

        // on a horizontal edge
        if y1 == y2 && y1 == y && x > x1.min(x2) && x < x1.max(x2) {
            return Location::Boundary;
        }

        if y > y1.min(y2) && y <= y1.max(y2) && x <= x1.max(x2) && y1 != y2 {
            let x_intersection = (y - y1) * (x2 - x1) / (y2 - y1) + x1;
            // on a sloping or vertical edge
            if x_intersection == x {
                return Location::Boundary;
            }

            if x1 == x2 || x <= x_intersection {
                intersections += 1;
            }
        }
    }

    if intersections % 2 == 1 {
        Location::Inside
    } else {
        Location::Outside
    }
}

/// The vertices of the polygon that encircles the Ordnance Survey's
/// coverage of Great Britain.
pub const GB_VERTICES: [GridCoordinate; 39] = [
    GridCoordinate::new(Metres(67_919.0), Metres(0.0)),
    GridCoordinate::new(Metres(199_488.0), Metres(0.0)),
    GridCoordinate::new(Metres(307_502.0), Metres(30_473.0)),
    GridCoordinate::new(Metres(414_691.0), Metres(60_832.0)),
    GridCoordinate::new(Metres(540_032.0), Metres(75_685.0)),
    GridCoordinate::new(Metres(632_034.0), Metres(98_379.0)),
    GridCoordinate::new(Metres(664_677.0), Metres(151_949.0)),
    GridCoordinate::new(Metres(677_568.0), Metres(258_087.0)),
    GridCoordinate::new(Metres(658_620.0), Metres(359_199.0)),
    GridCoordinate::new(Metres(586_103.0), Metres(393_753.0)),
    GridCoordinate::new(Metres(473_094.0), Metres(591_204.0)),
    GridCoordinate::new(Metres(389_931.0), Metres(717_210.0)),
    GridCoordinate::new(Metres(435_056.0), Metres(799_984.0)),
    GridCoordinate::new(Metres(427_111.0), Metres(906_851.0)),
    GridCoordinate::new(Metres(348_400.0), Metres(904_402.0)),
    GridCoordinate::new(Metres(490_128.0), Metres(1_133_972.0)),
    GridCoordinate::new(Metres(516_120.0), Metres(1_234_632.0)),
    GridCoordinate::new(Metres(455_840.0), Metres(1_264_920.0)),
    GridCoordinate::new(Metres(135_463.0), Metres(1_115_119.0)),
    GridCoordinate::new(Metres(0.0), Metres(983_469.0)),
    GridCoordinate::new(Metres(0.0), Metres(725_288.0)),
    GridCoordinate::new(Metres(71_476.0), Metres(667_325.0)),
    GridCoordinate::new(Metres(139_734.0), Metres(619_270.0)),
    GridCoordinate::new(Metres(163_110.0), Metres(581_867.0)),
    GridCoordinate::new(Metres(205_709.0), Metres(519_035.0)),
    GridCoordinate::new(Metres(237_191.0), Metres(516_155.0)),
    GridCoordinate::new(Metres(276_613.0), Metres(529_647.0)),
    GridCoordinate::new(Metres(293_901.0), Metres(464_542.0)),
    GridCoordinate::new(Metres(310_046.0), Metres(394_559.0)),
    GridCoordinate::new(Metres(230_583.0), Metres(406_901.0)),
    GridCoordinate::new(Metres(208_024.0), Metres(363_916.0)),
    GridCoordinate::new(Metres(202_386.0), Metres(310_331.0)),
    GridCoordinate::new(Metres(155_062.0), Metres(248_502.0)),
    GridCoordinate::new(Metres(130_167.0), Metres(215_750.0)),
    GridCoordinate::new(Metres(173_779.0), Metres(182_643.0)),
    GridCoordinate::new(Metres(206_111.0), Metres(147_420.0)),
    GridCoordinate::new(Metres(106_242.0), Metres(42_291.0)),
    GridCoordinate::new(Metres(61_292.0), Metres(20_190.0)),
    GridCoordinate::new(Metres(67_919.0), Metres(0.0)),
];

/// The polygon that encircles the Ordnance Survey's coverage of Great Britain.
pub static GB_BOUNDARY: Lazy<Polygon> = Lazy::new(|| Polygon::new(GB_VERTICES.to_vec()));

/// The maximum easting of the GB polygon's bounding box.
pub const GB_MAX_EASTING: Metres = Metres(700_000.0);

/// The maximum northing of the GB polygon's bounding box.
pub const GB_MAX_NORTHING: Metres = Metres(1_300_000.0);

/// Test whether a point is within the bounding box of the GB polygon.
/// * `point` - the point to test.
#[must_use]
pub fn within_gb_bounds(point: &GridCoordinate) -> bool {
    (0.0..=GB_MAX_EASTING.0).contains(&point.easting().0)
        && (0.0..=GB_MAX_NORTHING.0).contains(&point.northing().0)
}

/// Test whether a point is within Great Britain.
///
/// Points on the boundary or a vertex of the GB polygon are not in
/// Great Britain.
/// * `point` - the point to test.
///
/// returns true if the point is strictly inside the GB polygon.
#[must_use]
pub fn is_in_gb(point: &GridCoordinate) -> bool {
    within_gb_bounds(point) && classify(point, &GB_BOUNDARY) == Location::Inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(easting: f64, northing: f64) -> GridCoordinate {
        GridCoordinate::new(Metres(easting), Metres(northing))
    }

    fn diamond() -> Polygon {
        Polygon::new(vec![
            grid(0.0, 5.0),
            grid(5.0, 0.0),
            grid(10.0, 5.0),
            grid(5.0, 10.0),
            grid(0.0, 5.0),
        ])
    }

    #[test]
    fn test_classify_diamond() {
        let polygon = diamond();
        assert_eq!(Location::Inside, polygon.classify(&grid(5.0, 5.0)));
        assert_eq!(Location::Vertex, polygon.classify(&grid(10.0, 5.0)));
        assert_eq!(Location::Boundary, polygon.classify(&grid(2.5, 2.5)));
        assert_eq!(Location::Boundary, polygon.classify(&grid(7.5, 7.5)));
        assert_eq!(Location::Outside, polygon.classify(&grid(1.0, 1.0)));
        assert_eq!(Location::Outside, polygon.classify(&grid(11.0, 5.0)));
        assert_eq!(Location::Outside, polygon.classify(&grid(-1.0, 5.0)));
    }

    #[test]
    fn test_classify_gb() {
        // vertices
        assert_eq!(Location::Vertex, classify(&grid(67_919.0, 0.0), &GB_BOUNDARY));
        assert_eq!(Location::Vertex, classify(&grid(455_840.0, 1_264_920.0), &GB_BOUNDARY));
        // on the horizontal southern edge
        assert_eq!(Location::Boundary, classify(&grid(100_000.0, 0.0), &GB_BOUNDARY));
        // on the vertical western edge
        assert_eq!(Location::Boundary, classify(&grid(0.0, 800_000.0), &GB_BOUNDARY));

        assert_eq!(Location::Inside, classify(&grid(350_000.0, 500_000.0), &GB_BOUNDARY));
        assert_eq!(Location::Inside, classify(&grid(300_000.0, 904_402.0), &GB_BOUNDARY));
        assert_eq!(Location::Outside, classify(&grid(0.0, 1_000_000.0), &GB_BOUNDARY));
        assert_eq!(Location::Outside, classify(&grid(650_000.0, 1_250_000.0), &GB_BOUNDARY));
    }

    #[test]
    fn test_is_in_gb() {
        // Southampton
        assert!(is_in_gb(&grid(442_289.657_985_669_5, 111_340.572_063_768_8)));
        // Lerwick
        assert!(is_in_gb(&grid(447_323.724_876_709_63, 1_141_427.891_876_850_3)));
        // Dublin and Belfast
        assert!(!is_in_gb(&grid(116_569.895_048_491_31, 392_121.457_838_353_06)));
        assert!(!is_in_gb(&grid(146_241.481_113_341_4, 529_559.873_709_746_6)));
        // the boundary is not in GB
        assert!(!is_in_gb(&grid(100_000.0, 0.0)));
        assert!(!is_in_gb(&grid(67_919.0, 0.0)));
    }

    #[test]
    fn test_within_gb_bounds() {
        assert!(within_gb_bounds(&grid(0.0, 0.0)));
        assert!(within_gb_bounds(&grid(700_000.0, 1_300_000.0)));
        // Paris
        assert!(!within_gb_bounds(&grid(719_204.167_352_486, -106_884.886_440_420_77)));
        assert!(!is_in_gb(&grid(719_204.167_352_486, -106_884.886_440_420_77)));
        assert!(!within_gb_bounds(&grid(f64::NAN, 0.0)));
    }

    #[test]
    fn test_gb_boundary_is_closed() {
        let vertices = GB_BOUNDARY.vertices();
        assert_eq!(39, vertices.len());
        assert_eq!(vertices[0], vertices[vertices.len() - 1]);
    }

    #[test]
    #[should_panic(expected = "a polygon requires at least 3 vertices")]
    fn test_polygon_too_small() {
        let _ = Polygon::new(vec![grid(0.0, 0.0), grid(1.0, 1.0)]);
    }

    #[test]
    #[should_panic(expected = "a polygon must be a closed ring")]
    fn test_polygon_not_closed() {
        // without the closing edge (0, 10) to (0, 0), (-1, 5) would be Inside
        let _ = Polygon::new(vec![
            grid(0.0, 0.0),
            grid(10.0, 0.0),
            grid(10.0, 10.0),
            grid(0.0, 10.0),
        ]);
    }
}
