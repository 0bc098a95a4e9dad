//! Map load state and marker synchronization.
//!
//! Loading walks an explicit state machine:
//!
//! ```text
//! Idle ──submit──▶ Loading ──▶ Ready
//!   ▲                │
//!   └─change cred────┴──▶ Failed
//! ```
//!
//! Only one load runs at a time — a second credential submission while
//! one is in flight is rejected. Initialization failure is logged and
//! leaves the panel in a non-loaded state; no retry, no error banner.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::model::Trip;
use crate::registry::SignalRegistry;

use super::markers::{route_markers, signal_markers};
use super::sdk::{MapError, MapOptions, MapSdk, MapSurface, MarkerId};

/// Where the map panel stands.
pub enum LoadState {
    /// No credential submitted; the panel shows the credential form.
    Idle,

    /// An initialize call is in flight on a worker thread.
    Loading,

    /// The surface is live and markers can be placed.
    Ready(MapSurface),

    /// The last initialize failed. The credential form is shown again.
    Failed,
}

/// The dashboard's view of the map: load state plus the markers it has
/// placed, which it exclusively owns and disposes before re-rendering.
pub struct MapView {
    sdk: Arc<dyn MapSdk>,
    options: MapOptions,
    state: LoadState,
    pending: Option<Receiver<Result<MapSurface, MapError>>>,
    placed: Vec<MarkerId>,
    synced_revision: Option<u64>,
}

impl MapView {
    pub fn new(sdk: Arc<dyn MapSdk>) -> Self {
        Self {
            sdk,
            options: MapOptions::default(),
            state: LoadState::Idle,
            pending: None,
            placed: Vec::new(),
            synced_revision: None,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn surface(&self) -> Option<&MapSurface> {
        match &self.state {
            LoadState::Ready(surface) => Some(surface),
            _ => None,
        }
    }

    /// Starts initializing the map with the given credential.
    ///
    /// Rejects a blank credential without touching the SDK, and rejects
    /// any submission while a load is already in flight.
    pub fn submit_credential(&mut self, key: &str) -> Result<(), MapError> {
        if self.is_loading() {
            return Err(MapError::LoadInFlight);
        }
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(MapError::EmptyCredential);
        }

        let (tx, rx) = mpsc::channel();
        let sdk = Arc::clone(&self.sdk);
        let options = self.options.clone();
        thread::spawn(move || {
            let _ = tx.send(sdk.initialize(&key, &options));
        });

        self.pending = Some(rx);
        self.state = LoadState::Loading;
        Ok(())
    }

    /// Checks an in-flight load for completion. Called once per tick.
    pub fn poll(&mut self) {
        if !self.is_loading() {
            return;
        }
        let Some(rx) = &self.pending else {
            self.state = LoadState::Failed;
            return;
        };

        match rx.try_recv() {
            Ok(Ok(surface)) => {
                let options = surface.options();
                tracing::info!(
                    "map surface ready (center {:.4},{:.4}, zoom {}, poi labels hidden: {})",
                    options.center.lat,
                    options.center.lng,
                    options.zoom,
                    options.hide_poi_labels,
                );
                self.pending = None;
                self.placed.clear();
                self.synced_revision = None;
                self.state = LoadState::Ready(surface);
            }
            Ok(Err(e)) => {
                tracing::error!("map initialization failed: {e}");
                self.pending = None;
                self.state = LoadState::Failed;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                let e = MapError::Init("loader stopped before reporting a result".into());
                tracing::error!("map initialization failed: {e}");
                self.pending = None;
                self.state = LoadState::Failed;
            }
        }
    }

    /// Discards the loaded surface and returns to credential entry.
    ///
    /// An in-flight load is not aborted; dropping the receiver means a
    /// late result is discarded rather than applied to a torn-down view.
    pub fn change_credential(&mut self) {
        self.pending = None;
        self.placed.clear();
        self.synced_revision = None;
        self.state = LoadState::Idle;
    }

    /// Rebuilds markers from current state when the registry has
    /// changed since the last sync (or has never been synced).
    ///
    /// Every previously placed marker is disposed first — route markers
    /// included, even though their positions never change.
    pub fn sync(&mut self, registry: &SignalRegistry, trip: &Trip) {
        let LoadState::Ready(surface) = &mut self.state else {
            return;
        };
        if self.synced_revision == Some(registry.revision()) {
            return;
        }

        for id in self.placed.drain(..) {
            surface.dispose_marker(id);
        }
        for spec in signal_markers(registry.signals()) {
            self.placed.push(surface.create_marker(spec));
        }
        for spec in route_markers(trip) {
            self.placed.push(surface.create_marker(spec));
        }
        self.synced_revision = Some(registry.revision());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::model::SignalStatus;

    /// Counts initialize calls; succeeds or fails per `fail`.
    struct CountingSdk {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingSdk {
        fn succeeding() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    impl MapSdk for CountingSdk {
        fn initialize(&self, _key: &str, options: &MapOptions) -> Result<MapSurface, MapError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(MapError::Init("simulated outage".into()))
            } else {
                Ok(MapSurface::new(options.clone()))
            }
        }
    }

    /// Never completes within the test body; used to observe Loading.
    struct SlowSdk;

    impl MapSdk for SlowSdk {
        fn initialize(&self, _key: &str, options: &MapOptions) -> Result<MapSurface, MapError> {
            thread::sleep(Duration::from_millis(250));
            Ok(MapSurface::new(options.clone()))
        }
    }

    fn settle(view: &mut MapView) {
        for _ in 0..200 {
            view.poll();
            if !view.is_loading() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("map load never settled");
    }

    fn sample_trip() -> Trip {
        Trip {
            start_location: "City Hospital".into(),
            destination: "Trauma Center".into(),
        }
    }

    #[test]
    fn blank_credential_is_rejected_without_touching_the_sdk() {
        let sdk = Arc::new(CountingSdk::succeeding());
        let mut view = MapView::new(Arc::clone(&sdk) as Arc<dyn MapSdk>);

        let err = view.submit_credential("  ").unwrap_err();

        assert!(matches!(err, MapError::EmptyCredential));
        assert!(matches!(view.state(), LoadState::Idle));
        assert_eq!(sdk.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_initialize_leaves_the_panel_non_loaded() {
        let sdk = Arc::new(CountingSdk::failing());
        let mut view = MapView::new(Arc::clone(&sdk) as Arc<dyn MapSdk>);

        view.submit_credential("demo-key").unwrap();
        settle(&mut view);

        assert!(matches!(view.state(), LoadState::Failed));
        assert!(view.surface().is_none());
        assert_eq!(sdk.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn second_submission_during_load_is_rejected() {
        let mut view = MapView::new(Arc::new(SlowSdk));

        view.submit_credential("demo-key").unwrap();
        let err = view.submit_credential("another-key").unwrap_err();

        assert!(matches!(err, MapError::LoadInFlight));
        settle(&mut view);
        assert!(view.surface().is_some());
    }

    #[test]
    fn sync_places_signal_and_route_markers() {
        let mut view = MapView::new(Arc::new(CountingSdk::succeeding()));
        view.submit_credential("demo-key").unwrap();
        settle(&mut view);

        let registry = SignalRegistry::with_demo_signals();
        view.sync(&registry, &sample_trip());

        let surface = view.surface().unwrap();
        assert_eq!(surface.markers().len(), registry.len() + 2);
    }

    #[test]
    fn sync_rebuilds_without_accumulating_markers() {
        let mut view = MapView::new(Arc::new(CountingSdk::succeeding()));
        view.submit_credential("demo-key").unwrap();
        settle(&mut view);

        let mut registry = SignalRegistry::with_demo_signals();
        let trip = sample_trip();
        view.sync(&registry, &trip);

        registry.override_all_to_green();
        view.sync(&registry, &trip);
        view.sync(&registry, &trip); // Same revision: no rebuild.

        let surface = view.surface().unwrap();
        assert_eq!(surface.markers().len(), registry.len() + 2);
        let green = surface
            .markers()
            .iter()
            .filter(|m| m.spec.color == SignalStatus::Green.color_hex())
            .count();
        // The start marker uses its own hue; only signals match here.
        assert_eq!(green, registry.len());
    }

    #[test]
    fn unchanged_registry_skips_the_rebuild() {
        let mut view = MapView::new(Arc::new(CountingSdk::succeeding()));
        view.submit_credential("demo-key").unwrap();
        settle(&mut view);

        let registry = SignalRegistry::with_demo_signals();
        let trip = sample_trip();
        view.sync(&registry, &trip);
        let first_ids: Vec<MarkerId> = view
            .surface()
            .unwrap()
            .markers()
            .iter()
            .map(|m| m.id)
            .collect();

        view.sync(&registry, &trip);
        let second_ids: Vec<MarkerId> = view
            .surface()
            .unwrap()
            .markers()
            .iter()
            .map(|m| m.id)
            .collect();

        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn change_credential_discards_the_surface() {
        let mut view = MapView::new(Arc::new(CountingSdk::succeeding()));
        view.submit_credential("demo-key").unwrap();
        settle(&mut view);
        assert!(view.surface().is_some());

        view.change_credential();

        assert!(matches!(view.state(), LoadState::Idle));
        assert!(view.surface().is_none());
    }

    #[test]
    fn late_result_after_credential_change_is_discarded() {
        let mut view = MapView::new(Arc::new(SlowSdk));
        view.submit_credential("demo-key").unwrap();
        view.change_credential();

        // The worker finishes eventually; the view must stay Idle.
        thread::sleep(Duration::from_millis(300));
        view.poll();

        assert!(matches!(view.state(), LoadState::Idle));
    }
}
