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

// extern crate we're testing, same as any other code would do.
extern crate osgb36;

use angle_sc::is_within_tolerance;
use osgb36::format::AngleFormat;
use osgb36::maps::{MapType, SheetCache, SheetIndex, SheetLookup};
use osgb36::{boundary, grid_reference, Degrees, Error, GridCoordinate, Metres, Position};

/// The approximate distance in metres between the WGS 84 positions of
/// two nearby `Position`s.
fn distance_between(a: &Position, b: &Position) -> f64 {
    let metres_per_degree = 111_320.0;
    let d_lat = (a.latitude().0 - b.latitude().0) * metres_per_degree;
    let d_lon = (a.longitude().0 - b.longitude().0)
        * metres_per_degree
        * libm::cos(a.latitude().0.to_radians());
    libm::hypot(d_lat, d_lon)
}

#[test]
fn test_southampton() {
    let southampton = Position::from_wgs84(Degrees(50.9), Degrees(-1.4)).unwrap();
    assert_eq!(
        "SU 42289 11340",
        southampton.to_grid_reference(10, true).unwrap()
    );
    assert_eq!("SU422113", southampton.to_grid_reference(6, false).unwrap());
    assert_eq!("SU 42 11", southampton.to_grid_reference(4, true).unwrap());
    assert_eq!("SU4211", southampton.to_grid_reference(4, false).unwrap());
    assert!(southampton.is_in_gb());
}

#[test]
fn test_from_grid_reference() {
    let position = Position::from_grid_reference("SU422113").unwrap();
    assert_eq!("50.90009", format!("{:.5}", position.latitude().0));
    assert_eq!("-1.40056", format!("{:.5}", position.longitude().0));

    // case and spacing are not significant
    assert_eq!(position, Position::from_grid_reference("su 422 113").unwrap());

    for reference in ["", "S", "SU42211", "SI422113", "SU 42x113", "12422113"] {
        let result = Position::from_grid_reference(reference);
        assert!(
            matches!(result, Err(Error::InvalidFormat { .. })),
            "{reference:?} {result:?}"
        );
    }
}

#[test]
fn test_grid_reference_round_trip() {
    let southampton = Position::from_wgs84(Degrees(50.9), Degrees(-1.4)).unwrap();
    let reference = southampton.to_grid_reference(10, false).unwrap();
    let position = Position::from_grid_reference(&reference).unwrap();
    assert!(distance_between(&southampton, &position) < 1.0);

    // coarser references are centred within 10^(5 - digits / 2) metres
    for digits in [2_u8, 4, 6, 8] {
        let reference = southampton.to_grid_reference(digits, true).unwrap();
        let position = Position::from_grid_reference(&reference).unwrap();
        let precision = 10.0_f64.powi(5 - i32::from(digits) / 2);
        assert!(libm::fabs(position.easting().0 - southampton.easting().0) < precision);
        assert!(libm::fabs(position.northing().0 - southampton.northing().0) < precision);
    }
}

#[test]
fn test_os_guide_example() {
    // Annex C of A guide to coordinate systems in Great Britain
    let position =
        Position::from_easting_northing(Metres(651_409.903), Metres(313_177.270)).unwrap();
    assert!(is_within_tolerance(52.657_570_3, position.os_latitude().0, 1e-8));
    assert!(is_within_tolerance(1.717_921_58, position.os_longitude().0, 1e-8));
    assert_eq!("TG 51409 13177", position.to_grid_reference(10, true).unwrap());
    assert!(position.is_in_gb());
}

#[test]
fn test_is_in_gb() {
    let paris = Position::from_wgs84(Degrees(48.8567), Degrees(2.3508)).unwrap();
    assert!(!paris.is_in_gb());
    assert!(paris.to_grid_reference(10, true).is_none());

    // within the grid but across the Irish Sea
    let dublin = Position::from_wgs84(Degrees(53.3498), Degrees(-6.2603)).unwrap();
    assert!(!dublin.is_in_gb());
    assert_eq!("SG165921", dublin.to_grid_reference(6, false).unwrap());

    let lerwick = Position::from_wgs84(Degrees(60.1546), Degrees(-1.1494)).unwrap();
    assert!(lerwick.is_in_gb());

    // points outside the bounding box are never in GB
    let origin = GridCoordinate::new(Metres(-1.0), Metres(500_000.0));
    assert!(!boundary::within_gb_bounds(&origin));
    assert!(!boundary::is_in_gb(&origin));
}

#[test]
fn test_grid_extent() {
    // the 100km squares of the National Grid
    assert_eq!(
        Some("SV".to_owned()),
        grid_reference::format(&GridCoordinate::new(Metres(0.0), Metres(0.0)), 0, false)
    );
    assert_eq!(
        Some("JM".to_owned()),
        grid_reference::format(
            &GridCoordinate::new(Metres(699_999.0), Metres(1_299_999.0)),
            0,
            false
        )
    );
    assert!(grid_reference::format(
        &GridCoordinate::new(Metres(700_000.0), Metres(0.0)),
        0,
        false
    )
    .is_none());
    assert!(grid_reference::format(
        &GridCoordinate::new(Metres(0.0), Metres(-0.5)),
        0,
        false
    )
    .is_none());
}

#[test]
fn test_format_lat_long() {
    let position = Position::from_grid_reference("TG 51409 13177").unwrap();
    let text = position.format_lat_long(AngleFormat::DegreesMinutesSeconds, 1, " ");
    assert!(text.starts_with("052°39'"), "{text}");
    assert!(text.ends_with("\" E"), "{text}");
}

#[test]
fn test_map_sheet() {
    let json = r#"{"features": [{
        "properties": {"SHEET": "OL22", "TITLE": "New Forest", "NUMBER": "22"},
        "geometry": {"coordinates": [[
            [400000, 90000], [450000, 90000], [450000, 130000], [400000, 130000], [400000, 90000]
        ]]}
    }]}"#;
    let index = SheetIndex::from_json(json).unwrap();
    let southampton = Position::from_wgs84(Degrees(50.9), Degrees(-1.4)).unwrap();
    let sheet = index.find(MapType::Explorer, southampton.grid()).unwrap();
    assert_eq!("New Forest", sheet.title);

    let directory = std::env::temp_dir().join(format!("osgb36-it-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&directory);
    let fetcher = move |_: &str| -> Result<String, osgb36::maps::Error> { Ok(json.to_owned()) };
    let cache = SheetCache::new(fetcher).with_directory(&directory);
    let sheet = southampton.map_sheet(&cache, MapType::Explorer).unwrap();
    assert_eq!("OL22", sheet.sheet);
    assert_eq!(sheet, cache.lookup(MapType::Explorer, southampton.grid()).unwrap());

    let paris = Position::from_wgs84(Degrees(48.8567), Degrees(2.3508)).unwrap();
    assert!(paris.map_sheet(&cache, MapType::Explorer).is_none());

    std::fs::remove_dir_all(&directory).unwrap();
}
