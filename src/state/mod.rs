//! URL-bound application view state.
//!
//! Everything the dashboard persists lives in the address bar: the
//! selected facet path and the map viewport. Reloading, or opening a
//! shared link, restores the same view.

use crate::params::{
    boolean_param, number_param, string_param, ParamStore, UrlParam,
};

/// Default map center and zoom (continental US, statewide framing).
const DEFAULT_LAT: f64 = 42.0;
const DEFAULT_LON: f64 = -93.5;
const DEFAULT_ZOOM: f64 = 7.0;

/// The view state synchronized with the browser URL.
pub struct ViewState {
    /// Selected geographic level (e.g. "county", "tract").
    pub level: UrlParam<String>,
    /// Selected measure category within the level.
    pub category: UrlParam<String>,
    /// Selected measure within the category.
    pub measure: UrlParam<String>,
    /// Map viewport center.
    pub lat: UrlParam<f64>,
    pub lon: UrlParam<f64>,
    pub zoom: UrlParam<f64>,
    /// Whether the legend shows age-adjusted counts alongside rates.
    pub show_aac: UrlParam<bool>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            level: UrlParam::new("level", string_param(), "county".to_string()),
            category: UrlParam::new("category", string_param(), String::new()),
            measure: UrlParam::new("measure", string_param(), String::new()),
            lat: UrlParam::new("lat", number_param(), DEFAULT_LAT),
            lon: UrlParam::new("lon", number_param(), DEFAULT_LON),
            zoom: UrlParam::new("zoom", number_param(), DEFAULT_ZOOM),
            show_aac: UrlParam::new("aac", boolean_param(), false),
        }
    }

    /// Applies the store's current parameters; call on startup and on
    /// `popstate`.
    pub fn read_from(&mut self, store: &impl ParamStore) {
        self.level.read_from(store);
        self.category.read_from(store);
        self.measure.read_from(store);
        self.lat.read_from(store);
        self.lon.read_from(store);
        self.zoom.read_from(store);
        self.show_aac.read_from(store);
        log::debug!(
            "Applied URL state: {}/{}/{}",
            self.level.get(),
            self.category.get(),
            self.measure.get()
        );
    }

    /// Flushes pending debounced writes; call once per frame.
    pub fn sync(&mut self, store: &mut impl ParamStore) {
        self.level.sync(store);
        self.category.sync(store);
        self.measure.sync(store);
        self.lat.sync(store);
        self.lon.sync(store);
        self.zoom.sync(store);
        self.show_aac.sync(store);
    }

    #[cfg(test)]
    fn sync_at(&mut self, now: web_time::Instant, store: &mut impl ParamStore) {
        self.level.sync_at(now, store);
        self.category.sync_at(now, store);
        self.measure.sync_at(now, store);
        self.lat.sync_at(now, store);
        self.lon.sync_at(now, store);
        self.zoom.sync_at(now, store);
        self.show_aac.sync_at(now, store);
    }
}
