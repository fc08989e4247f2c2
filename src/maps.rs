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

//! The maps module finds the Ordnance Survey map sheet that contains a
//! National Grid position.
//!
//! The sheet outlines of each map series are published by the Ordnance Survey
//! as a `GeoJSON` feature collection. A `SheetCache` downloads them with a
//! `Fetch` implementation and keeps them in a local directory, refreshing
//! a file once it is older than its time to live.
//!
//! Where sheets overlap, the sheet whose bounding box centre is nearest to
//! the position is chosen.

use crate::boundary::{Location, Polygon};
use crate::GridCoordinate;
use icao_units::si::Metres;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

/// The default time to live of a cached sheet index: 30 days.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// The name of the default cache directory, within the system temporary directory.
pub const DEFAULT_DIRECTORY: &str = "osmaps";

const PICTURE_URL: &str = "https://www.ordnancesurvey.co.uk/shop/clickable-map/assets";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown map type: {0:?}")]
    UnknownMapType(String),
    #[error("error accessing map sheet cache file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error deserializing map sheets")]
    SerdeJson(#[from] serde_json::Error),
    #[error("error fetching {url}: {message}")]
    Fetch { url: String, message: String },
    #[cfg(feature = "remote")]
    #[error("error performing http request")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// An Ordnance Survey map series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapType {
    /// The 1:25 000 scale Explorer series.
    Explorer,
    /// The 1:50 000 scale Landranger series.
    Landranger,
    /// The 1896 New Popular Edition historic series.
    Historic1896,
}

impl MapType {
    const VARIANTS: &'static [Self] = &[Self::Explorer, Self::Landranger, Self::Historic1896];

    /// All of the map series.
    #[must_use]
    pub const fn enumerate() -> &'static [Self] {
        Self::VARIANTS
    }

    /// The key of the map series, used to name its cache file.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Landranger => "landranger",
            Self::Historic1896 => "historic1896",
        }
    }

    /// The URL of the sheet outlines of the map series.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Explorer => "https://api.ordnancesurvey.co.uk/osl/v1/mapsheet/explorer?bbox=0,0,700000,1300000,27700&tsrs=27700",
            Self::Landranger => "https://api.ordnancesurvey.co.uk/osl/v1/mapsheet/landranger?bbox=0,0,700000,1300000,27700&tsrs=27700",
            Self::Historic1896 => "https://www.ordnancesurvey.co.uk/shop/clickable-map/assets/historic1896.json",
        }
    }

    /// The URL of the cover picture of a sheet.
    /// * `number` - the sheet number.
    #[must_use]
    pub fn picture_url(self, number: &str) -> String {
        match self {
            // all historic sheets share a cover
            Self::Historic1896 => {
                format!("{PICTURE_URL}/historic1896-front-cover/historic1896.jpg")
            }
            _ => {
                let key = self.key();
                number.parse::<u32>().map_or_else(
                    |_| format!("{PICTURE_URL}/{key}-front-cover/{number}.jpg"),
                    |n| format!("{PICTURE_URL}/{key}-front-cover/{n:03}.jpg"),
                )
            }
        }
    }
}

impl std::fmt::Display for MapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MapType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explorer" => Ok(Self::Explorer),
            "landranger" => Ok(Self::Landranger),
            "historic" | "historic1896" => Ok(Self::Historic1896),
            _ => Err(Error::UnknownMapType(s.to_owned())),
        }
    }
}

/// The details of a map sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SheetInfo {
    /// The shop page of the sheet.
    pub url: String,
    /// The sheet identifier, e.g. "OL22".
    pub sheet: String,
    pub title: String,
    pub sub_title: String,
    /// The sheet number.
    pub number: String,
    /// The URL of the cover picture.
    pub picture: String,
}

/// Deserialize a JSON string or number as a `String`, null as empty.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: Properties,
    geometry: Geometry,
}

#[derive(Clone, Debug, Deserialize)]
struct Properties {
    #[serde(default, deserialize_with = "string_or_number")]
    url: String,
    #[serde(rename = "SHEET", default, deserialize_with = "string_or_number")]
    sheet: String,
    #[serde(rename = "TITLE", default, deserialize_with = "string_or_number")]
    title: String,
    #[serde(rename = "SUB_TITLE", default, deserialize_with = "string_or_number")]
    sub_title: String,
    #[serde(rename = "NUMBER", default, deserialize_with = "string_or_number")]
    number: String,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(default)]
    bbox: Vec<f64>,
    coordinates: Vec<Vec<Vec<f64>>>,
}

/// A map sheet: its details, outline and bounding box centre.
#[derive(Clone, Debug)]
struct Sheet {
    properties: Properties,
    rings: Vec<Polygon>,
    centre: GridCoordinate,
}

/// The centre of a bounding box: `[min_x, min_y, max_x, max_y]` or
/// `[min_x, min_y, min_z, max_x, max_y, max_z]`.
fn bbox_centre(bbox: &[f64]) -> Option<GridCoordinate> {
    let (min_x, min_y, max_x, max_y) = match *bbox {
        [min_x, min_y, _, max_x, max_y, _] => (min_x, min_y, max_x, max_y),
        [min_x, min_y, max_x, max_y] => (min_x, min_y, max_x, max_y),
        _ => return None,
    };
    Some(GridCoordinate::new(
        Metres((min_x + max_x) / 2.0),
        Metres((min_y + max_y) / 2.0),
    ))
}

/// The centre of the bounding box of some rings.
fn rings_centre(rings: &[Polygon]) -> GridCoordinate {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for vertex in rings.iter().flat_map(Polygon::vertices) {
        min_x = min_x.min(vertex.easting().0);
        min_y = min_y.min(vertex.northing().0);
        max_x = max_x.max(vertex.easting().0);
        max_y = max_y.max(vertex.northing().0);
    }
    GridCoordinate::new(Metres((min_x + max_x) / 2.0), Metres((min_y + max_y) / 2.0))
}

/// Repeat the first vertex of a ring as its last, if it is not already.
fn close_ring(mut vertices: Vec<GridCoordinate>) -> Vec<GridCoordinate> {
    if let (Some(first), Some(last)) = (vertices.first().copied(), vertices.last()) {
        if first != *last {
            vertices.push(first);
        }
    }
    vertices
}

impl From<Feature> for Sheet {
    fn from(feature: Feature) -> Self {
        let rings: Vec<Polygon> = feature
            .geometry
            .coordinates
            .iter()
            .map(|ring| {
                ring.iter()
                    .filter_map(|point| match point.as_slice() {
                        [x, y, ..] if x.is_finite() && y.is_finite() => {
                            Some(GridCoordinate::new(Metres(*x), Metres(*y)))
                        }
                        _ => None,
                    })
                    .collect::<Vec<_>>()
            })
            .map(close_ring)
            .filter(|vertices| vertices.len() >= 4)
            .map(Polygon::new)
            .collect();
        let centre = bbox_centre(&feature.geometry.bbox).unwrap_or_else(|| rings_centre(&rings));
        Self {
            properties: feature.properties,
            rings,
            centre,
        }
    }
}

/// The sheets of a map series.
#[derive(Clone, Debug, Default)]
pub struct SheetIndex {
    sheets: Vec<Sheet>,
}

impl SheetIndex {
    /// Parse a sheet index from a `GeoJSON` feature collection.
    /// * `json` - the feature collection.
    ///
    /// # Errors
    ///
    /// Returns `Error::SerdeJson` if `json` is not a feature collection of
    /// polygons.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let collection: FeatureCollection = serde_json::from_str(json)?;
        let sheets = collection
            .features
            .into_iter()
            .map(Sheet::from)
            .collect::<Vec<_>>();
        tracing::debug!(sheets = sheets.len(), "parsed map sheet index");
        Ok(Self { sheets })
    }

    /// The number of sheets in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the index has no sheets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Find the sheet containing a point.
    /// * `map_type` - the map series of the index.
    /// * `point` - the National Grid point.
    ///
    /// returns the details of the sheet whose outline contains the point
    /// and whose centre is nearest to it, or None.
    #[must_use]
    pub fn find(&self, map_type: MapType, point: &GridCoordinate) -> Option<SheetInfo> {
        let mut nearest: Option<(f64, &Sheet)> = None;
        for sheet in &self.sheets {
            if sheet
                .rings
                .iter()
                .any(|ring| ring.classify(point) != Location::Outside)
            {
                let distance = libm::round(libm::hypot(
                    sheet.centre.easting().0 - point.easting().0,
                    sheet.centre.northing().0 - point.northing().0,
                ));
                if !nearest.is_some_and(|(d, _)| d <= distance) {
                    nearest = Some((distance, sheet));
                }
            }
        }

        nearest.map(|(_, sheet)| {
            let properties = &sheet.properties;
            SheetInfo {
                url: properties.url.clone(),
                sheet: properties.sheet.clone(),
                title: properties.title.clone(),
                sub_title: properties.sub_title.clone(),
                number: properties.number.clone(),
                picture: map_type.picture_url(&properties.number),
            }
        })
    }
}

/// A map sheet lookup.
pub trait SheetLookup {
    /// Find the sheet of a map series containing a point.
    /// * `map_type` - the map series.
    /// * `point` - the National Grid point.
    fn lookup(&self, map_type: MapType, point: &GridCoordinate) -> Option<SheetInfo>;
}

/// A source of sheet index documents.
pub trait Fetch {
    /// Fetch the document at a URL.
    /// * `url` - the URL.
    ///
    /// # Errors
    ///
    /// Returns an `Error` if the document could not be fetched.
    fn fetch(&self, url: &str) -> Result<String, Error>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> Result<String, Error>,
{
    fn fetch(&self, url: &str) -> Result<String, Error> {
        self(url)
    }
}

/// Fetches documents over HTTP.
#[cfg(feature = "remote")]
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "remote")]
impl HttpFetcher {
    /// Constructor.
    /// * `client` - the HTTP client.
    #[must_use]
    pub const fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "remote")]
impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, Error> {
        Ok(self.client.get(url).send()?.error_for_status()?.text()?)
    }
}

/// Distinguishes the partial files of concurrent writers in one process.
static NEXT_WRITER: AtomicU64 = AtomicU64::new(0);

/// A unique path to write a cache file to before renaming it into place.
fn partial_path(path: &Path) -> PathBuf {
    let writer = NEXT_WRITER.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!("json.{}-{writer}.part", std::process::id()))
}

/// A parsed sheet index and the modification time of the file it was read from.
#[derive(Debug)]
struct Loaded {
    modified: SystemTime,
    index: Arc<SheetIndex>,
}

/// A read-through file cache of sheet indices, one file per map series.
///
/// Parsed indices are held in memory until their file changes.
#[derive(Debug)]
pub struct SheetCache<F> {
    fetcher: F,
    directory: PathBuf,
    ttl: Duration,
    loaded: Mutex<HashMap<MapType, Loaded>>,
}

impl<F: Fetch> SheetCache<F> {
    /// Constructor, caching in `<temp dir>/osmaps` for 30 days.
    /// * `fetcher` - fetches the sheet indices.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            directory: std::env::temp_dir().join(DEFAULT_DIRECTORY),
            ttl: DEFAULT_TTL,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Set the cache directory.
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the time to live of the cache files.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The cache directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The time to live of the cache files.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The path of the cache file of a map series.
    #[must_use]
    pub fn path(&self, map_type: MapType) -> PathBuf {
        self.directory.join(format!("{}.json", map_type.key()))
    }

    /// Whether a cache file exists and is younger than the time to live.
    fn is_fresh(&self, path: &Path) -> bool {
        fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .is_ok_and(|modified| !modified.elapsed().is_ok_and(|age| age > self.ttl))
    }

    /// Fetch the sheet index of a map series into its cache file.
    fn refresh(&self, map_type: MapType, path: &Path) -> Result<(), Error> {
        tracing::info!(map_type = map_type.key(), path = ?path, "refreshing map sheet cache");
        let json = self.fetcher.fetch(map_type.url())?;

        fs::create_dir_all(&self.directory).map_err(|e| Error::io(&self.directory, e))?;
        // write then rename, so readers never see a partial file
        let partial = partial_path(path);
        if let Err(e) = fs::write(&partial, json) {
            let _ = fs::remove_file(&partial);
            return Err(Error::io(&partial, e));
        }
        fs::rename(&partial, path).map_err(|e| Error::io(path, e))?;

        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&map_type);
        Ok(())
    }

    /// Load the sheet index of a map series, fetching it if the cache file
    /// is missing or stale.
    ///
    /// The file is only parsed again when its modification time changes.
    /// * `map_type` - the map series.
    ///
    /// # Errors
    ///
    /// Returns an `Error` if the index could not be fetched, stored, read
    /// or parsed.
    pub fn load(&self, map_type: MapType) -> Result<Arc<SheetIndex>, Error> {
        let path = self.path(map_type);
        if !self.is_fresh(&path) {
            self.refresh(map_type, &path)?;
        }

        let modified = fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .map_err(|e| Error::io(&path, e))?;
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = loaded.get(&map_type) {
            if entry.modified == modified {
                return Ok(Arc::clone(&entry.index));
            }
        }

        let json = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let index = Arc::new(SheetIndex::from_json(&json)?);
        loaded.insert(
            map_type,
            Loaded {
                modified,
                index: Arc::clone(&index),
            },
        );
        Ok(index)
    }
}

impl<F: Fetch> SheetLookup for SheetCache<F> {
    fn lookup(&self, map_type: MapType, point: &GridCoordinate) -> Option<SheetInfo> {
        match self.load(map_type) {
            Ok(index) => index.find(map_type, point),
            Err(error) => {
                tracing::warn!(%error, map_type = map_type.key(), "map sheet lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::SystemTime;

    const SHEETS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "url": "https://shop.example/explorer/ol22",
                    "SHEET": "OL22",
                    "TITLE": "New Forest",
                    "SUB_TITLE": "Southampton & Bournemouth",
                    "NUMBER": 22
                },
                "geometry": {
                    "type": "Polygon",
                    "bbox": [400000.0, 90000.0, 450000.0, 130000.0],
                    "coordinates": [[
                        [400000.0, 90000.0], [450000.0, 90000.0],
                        [450000.0, 130000.0], [400000.0, 130000.0],
                        [400000.0, 90000.0]
                    ]]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "url": "https://shop.example/explorer/131",
                    "SHEET": "131",
                    "TITLE": "Romsey, Andover & Test Valley",
                    "SUB_TITLE": null,
                    "NUMBER": "131"
                },
                "geometry": {
                    "type": "Polygon",
                    "bbox": [420000.0, 110000.0, 0.0, 460000.0, 150000.0, 0.0],
                    "coordinates": [[
                        [420000.0, 110000.0], [460000.0, 110000.0],
                        [460000.0, 150000.0], [420000.0, 150000.0],
                        [420000.0, 110000.0]
                    ]]
                }
            }
        ]
    }"#;

    fn grid(easting: f64, northing: f64) -> GridCoordinate {
        GridCoordinate::new(Metres(easting), Metres(northing))
    }

    /// A `Fetch` that counts its calls.
    struct CountingFetcher {
        json: &'static str,
        calls: Cell<u32>,
    }

    impl CountingFetcher {
        fn new(json: &'static str) -> Self {
            Self {
                json,
                calls: Cell::new(0),
            }
        }
    }

    impl Fetch for CountingFetcher {
        fn fetch(&self, _url: &str) -> Result<String, Error> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.json.to_owned())
        }
    }

    fn cache_directory(name: &str) -> PathBuf {
        let directory =
            std::env::temp_dir().join(format!("osgb36-maps-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&directory);
        directory
    }

    #[test]
    fn test_map_type() {
        assert_eq!(3, MapType::enumerate().len());
        for map_type in MapType::enumerate() {
            assert_eq!(*map_type, map_type.key().parse::<MapType>().unwrap());
            assert_eq!(map_type.key(), map_type.to_string());
        }
        assert_eq!(MapType::Historic1896, "Historic".parse::<MapType>().unwrap());
        assert!(MapType::Landranger.url().contains("/mapsheet/landranger?"));

        let error = "pathfinder".parse::<MapType>().unwrap_err();
        assert!(matches!(error, Error::UnknownMapType(_)));
        assert_eq!("unknown map type: \"pathfinder\"", error.to_string());
    }

    #[test]
    fn test_picture_url() {
        assert_eq!(
            "https://www.ordnancesurvey.co.uk/shop/clickable-map/assets/explorer-front-cover/022.jpg",
            MapType::Explorer.picture_url("22")
        );
        assert_eq!(
            "https://www.ordnancesurvey.co.uk/shop/clickable-map/assets/landranger-front-cover/196.jpg",
            MapType::Landranger.picture_url("196")
        );
        assert_eq!(
            "https://www.ordnancesurvey.co.uk/shop/clickable-map/assets/historic1896-front-cover/historic1896.jpg",
            MapType::Historic1896.picture_url("7")
        );
    }

    #[test]
    fn test_bbox_centre() {
        assert_eq!(
            Some(grid(425_000.0, 110_000.0)),
            bbox_centre(&[400_000.0, 90_000.0, 450_000.0, 130_000.0])
        );
        assert_eq!(
            Some(grid(440_000.0, 130_000.0)),
            bbox_centre(&[420_000.0, 110_000.0, 0.0, 460_000.0, 150_000.0, 0.0])
        );
        assert_eq!(None, bbox_centre(&[]));
    }

    #[test]
    fn test_sheet_index_find() {
        let index = SheetIndex::from_json(SHEETS).unwrap();
        assert_eq!(2, index.len());
        assert!(!index.is_empty());

        // only in OL22
        let sheet = index.find(MapType::Explorer, &grid(410_000.0, 100_000.0)).unwrap();
        assert_eq!("OL22", sheet.sheet);
        assert_eq!("New Forest", sheet.title);
        assert_eq!("22", sheet.number);
        assert!(sheet.picture.ends_with("/explorer-front-cover/022.jpg"));

        // only in 131, with a null sub title
        let sheet = index.find(MapType::Explorer, &grid(455_000.0, 145_000.0)).unwrap();
        assert_eq!("131", sheet.sheet);
        assert_eq!("", sheet.sub_title);

        // in both, nearer the centre of 131
        let sheet = index.find(MapType::Explorer, &grid(442_289.0, 125_000.0)).unwrap();
        assert_eq!("131", sheet.sheet);

        // in both, nearer the centre of OL22
        let sheet = index.find(MapType::Explorer, &grid(425_000.0, 115_000.0)).unwrap();
        assert_eq!("OL22", sheet.sheet);

        // on the edge of OL22
        let sheet = index.find(MapType::Explorer, &grid(400_000.0, 100_000.0)).unwrap();
        assert_eq!("OL22", sheet.sheet);

        assert!(index.find(MapType::Explorer, &grid(300_000.0, 100_000.0)).is_none());
    }

    #[test]
    fn test_sheet_index_from_invalid_json() {
        let result = SheetIndex::from_json("{\"features\": 3}");
        assert!(matches!(result, Err(Error::SerdeJson(_))));

        let index = SheetIndex::from_json("{\"features\": []}").unwrap();
        assert!(index.is_empty());
        assert!(index.find(MapType::Explorer, &grid(410_000.0, 100_000.0)).is_none());
    }

    #[test]
    fn test_partial_path_is_unique() {
        let path = Path::new("/var/cache/osmaps/explorer.json");
        let first = partial_path(path);
        let second = partial_path(path);
        assert_ne!(first, second);
        assert_eq!(Some(Path::new("/var/cache/osmaps")), first.parent());

        let name = first.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(&format!("explorer.json.{}-", std::process::id())));
        assert!(name.ends_with(".part"));
    }

    #[test]
    fn test_close_ring() {
        let square = vec![
            grid(0.0, 0.0),
            grid(10.0, 0.0),
            grid(10.0, 10.0),
            grid(0.0, 10.0),
        ];
        let closed = close_ring(square.clone());
        assert_eq!(5, closed.len());
        assert_eq!(closed[0], closed[4]);

        // an already closed ring is unchanged
        assert_eq!(closed, close_ring(closed.clone()));
        assert!(close_ring(Vec::new()).is_empty());
    }

    #[test]
    fn test_sheet_index_open_ring() {
        let json = r#"{"features": [{
            "properties": {"SHEET": "1", "NUMBER": "1"},
            "geometry": {"coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10]]]}
        }]}"#;
        let index = SheetIndex::from_json(json).unwrap();
        assert_eq!("1", index.find(MapType::Explorer, &grid(5.0, 5.0)).unwrap().sheet);
        // outside the closing edge from (0, 10) to (0, 0)
        assert!(index.find(MapType::Explorer, &grid(-1.0, 5.0)).is_none());
    }

    #[test]
    fn test_sheet_cache_builder() {
        let fetcher = |_: &str| -> Result<String, Error> { Ok(String::new()) };
        let cache = SheetCache::new(fetcher);
        assert_eq!(std::env::temp_dir().join("osmaps"), cache.directory());
        assert_eq!(DEFAULT_TTL, cache.ttl());

        let cache = cache
            .with_directory("/var/cache/osmaps")
            .with_ttl(Duration::from_secs(60));
        assert_eq!(Path::new("/var/cache/osmaps"), cache.directory());
        assert_eq!(Duration::from_secs(60), cache.ttl());
        assert_eq!(
            Path::new("/var/cache/osmaps/landranger.json"),
            cache.path(MapType::Landranger)
        );
    }

    #[test]
    fn test_sheet_cache_load() {
        let directory = cache_directory("load");
        let cache = SheetCache::new(CountingFetcher::new(SHEETS))
            .with_directory(&directory)
            .with_ttl(Duration::from_secs(60));
        let calls = || cache.fetcher.calls.get();

        // a missing file is fetched
        let index = cache.load(MapType::Explorer).unwrap();
        assert_eq!(2, index.len());
        assert_eq!(1, calls());
        assert!(cache.path(MapType::Explorer).exists());

        // a fresh file is reused, without parsing it again
        let reused = cache.load(MapType::Explorer).unwrap();
        assert_eq!(1, calls());
        assert!(Arc::ptr_eq(&index, &reused));

        // a stale file is fetched again
        let stale = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(cache.path(MapType::Explorer))
            .unwrap()
            .set_modified(stale)
            .unwrap();
        let refreshed = cache.load(MapType::Explorer).unwrap();
        assert_eq!(2, calls());
        assert!(!Arc::ptr_eq(&index, &refreshed));
        assert_eq!(2, refreshed.len());

        // each map series has its own file
        cache.load(MapType::Landranger).unwrap();
        assert_eq!(3, calls());

        // no partial files are left behind
        let mut names = fs::read_dir(&directory)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        names.sort();
        assert_eq!(vec!["explorer.json", "landranger.json"], names);

        fs::remove_dir_all(&directory).unwrap();
    }

    #[test]
    fn test_sheet_cache_lookup() {
        let directory = cache_directory("lookup");
        let cache = SheetCache::new(CountingFetcher::new(SHEETS)).with_directory(&directory);

        let sheet = cache
            .lookup(MapType::Landranger, &grid(410_000.0, 100_000.0))
            .unwrap();
        assert_eq!("OL22", sheet.sheet);
        assert!(sheet.picture.ends_with("/landranger-front-cover/022.jpg"));

        assert!(cache
            .lookup(MapType::Landranger, &grid(100_000.0, 100_000.0))
            .is_none());

        fs::remove_dir_all(&directory).unwrap();
    }

    #[test]
    fn test_sheet_cache_lookup_failure() {
        let directory = cache_directory("failure");
        let fetcher = |url: &str| -> Result<String, Error> {
            Err(Error::Fetch {
                url: url.to_owned(),
                message: "connection refused".to_owned(),
            })
        };
        let cache = SheetCache::new(fetcher).with_directory(&directory);

        let result = cache.load(MapType::Explorer);
        assert!(matches!(result, Err(Error::Fetch { .. })));
        assert!(cache.lookup(MapType::Explorer, &grid(410_000.0, 100_000.0)).is_none());
        assert!(!directory.exists());

        // an unreadable index is a lookup failure, not a panic
        let fetcher = |_: &str| -> Result<String, Error> { Ok("not json".to_owned()) };
        let cache = SheetCache::new(fetcher).with_directory(&directory);
        assert!(matches!(cache.load(MapType::Explorer), Err(Error::SerdeJson(_))));
        assert!(cache.lookup(MapType::Explorer, &grid(410_000.0, 100_000.0)).is_none());

        fs::remove_dir_all(&directory).unwrap();
    }
}
