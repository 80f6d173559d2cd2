//! In-memory stand-ins for the geocoding and map services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use geodata::{Geocoder, MapDataSource};
use poster_common::{
    FeatureCollection, GeoPoint, PosterError, PosterResult, StreetGraph,
};

use crate::fixtures::minimal_motorway_graph;

/// Geocoder that returns a fixed point, or `CoordinatesNotFound`.
pub struct StubGeocoder {
    point: Option<GeoPoint>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    pub fn at(point: GeoPoint) -> Self {
        Self {
            point: Some(point),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn not_found() -> Self {
        Self {
            point: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn locate(&self, city: &str, country: &str) -> PosterResult<GeoPoint> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.point.ok_or_else(|| PosterError::CoordinatesNotFound {
            city: city.to_string(),
            country: country.to_string(),
        })
    }
}

/// Map source that serves fixed layers and records every request in order.
///
/// Each layer can be switched to fail with a fetch error.
pub struct CountingMapSource {
    streets: StreetGraph,
    water: FeatureCollection,
    parks: FeatureCollection,
    fail_streets: bool,
    fail_water: bool,
    fail_parks: bool,
    calls: Mutex<Vec<&'static str>>,
}

impl CountingMapSource {
    pub fn new(streets: StreetGraph) -> Self {
        Self {
            streets,
            water: FeatureCollection::default(),
            parks: FeatureCollection::default(),
            fail_streets: false,
            fail_water: false,
            fail_parks: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// One motorway through `center`, no water, no parks.
    pub fn minimal(center: GeoPoint) -> Self {
        Self::new(minimal_motorway_graph(center))
    }

    pub fn with_water(mut self, water: FeatureCollection) -> Self {
        self.water = water;
        self
    }

    pub fn with_parks(mut self, parks: FeatureCollection) -> Self {
        self.parks = parks;
        self
    }

    pub fn failing_streets(mut self) -> Self {
        self.fail_streets = true;
        self
    }

    pub fn failing_water(mut self) -> Self {
        self.fail_water = true;
        self
    }

    pub fn failing_parks(mut self) -> Self {
        self.fail_parks = true;
        self
    }

    /// Layers requested so far, in request order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    fn record(&self, layer: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(layer);
        }
    }
}

#[async_trait]
impl MapDataSource for CountingMapSource {
    async fn fetch_streets(&self, _center: GeoPoint, _dist_m: u32) -> PosterResult<StreetGraph> {
        self.record("streets");
        if self.fail_streets {
            return Err(PosterError::fetch("street network", "stubbed failure"));
        }
        Ok(self.streets.clone())
    }

    async fn fetch_water(&self, _center: GeoPoint, _dist_m: u32) -> PosterResult<FeatureCollection> {
        self.record("water");
        if self.fail_water {
            return Err(PosterError::fetch("water features", "stubbed failure"));
        }
        Ok(self.water.clone())
    }

    async fn fetch_parks(&self, _center: GeoPoint, _dist_m: u32) -> PosterResult<FeatureCollection> {
        self.record("parks");
        if self.fail_parks {
            return Err(PosterError::fetch("parks", "stubbed failure"));
        }
        Ok(self.parks.clone())
    }
}
