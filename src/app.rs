use crate::dlog;
use crate::form::{Entry, WorkoutForm};
use crate::map::{Geolocator, MapView, PanOptions, Popup};
use crate::render::{workout_popup, workout_row_html};
use crate::storage::{KeyValueStore, load_workouts, save_workouts};
use crate::types::{Coords, IdGenerator, Workout, WorkoutId, WorkoutKind};
use crate::ui::Ui;
use anyhow::Result;
use chrono::{DateTime, Local};

pub const DEFAULT_STORAGE_KEY: &str = "workouts";
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

pub const POSITION_ALERT: &str = "Could not get your position";
pub const NO_LOCATION_ALERT: &str = "Click on the map to choose a location first";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_key: String,
    /// Zoom when the map first opens on the user's position.
    pub initial_zoom: u8,
    /// Zoom when jumping to a workout from the list.
    pub focus_zoom: u8,
    pub pan_duration_secs: f64,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            initial_zoom: 13,
            focus_zoom: 17,
            pan_duration_secs: 1.0,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

/// Owns the workout list and wires form, map, list and storage together.
///
/// Markers requested before the map exists are queued and drawn, in order,
/// right after [`App::start`] initializes the map.
pub struct App<M, S, U> {
    map: M,
    store: S,
    ui: U,
    config: AppConfig,
    map_ready: bool,
    pending_markers: Vec<usize>,
    pending_click: Option<Coords>,
    workouts: Vec<Workout>,
    ids: IdGenerator,
    clock: fn() -> DateTime<Local>,
}

impl<M: MapView, S: KeyValueStore, U: Ui> App<M, S, U> {
    pub fn new(map: M, store: S, ui: U, config: AppConfig) -> Self {
        Self {
            map,
            store,
            ui,
            config,
            map_ready: false,
            pending_markers: Vec::new(),
            pending_click: None,
            workouts: Vec::new(),
            ids: IdGenerator::new(),
            clock: Local::now,
        }
    }

    /// Replace the time source used for new workouts.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// Restore persisted workouts, then ask for the device position.
    pub fn boot(&mut self, geo: &mut impl Geolocator) -> Result<bool> {
        self.load_workouts()?;
        Ok(self.start(geo))
    }

    /// Read the stored list. With nothing stored the list is left alone;
    /// otherwise it is replaced, each entry gets a row, and its marker is
    /// queued until the map is ready.
    pub fn load_workouts(&mut self) -> Result<()> {
        let Some(loaded) = load_workouts(&self.store, &self.config.storage_key)? else {
            dlog!("no stored workouts");
            return Ok(());
        };

        let rows = loaded
            .iter()
            .map(workout_row_html)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(count = loaded.len(), "restored workouts");
        self.ids = IdGenerator::seeded_from(loaded.iter().map(|w| &w.id));
        self.workouts = loaded;
        self.pending_markers.clear();

        for (idx, row) in rows.iter().enumerate() {
            self.ui.insert_row(row);
            self.render_marker(idx);
        }
        Ok(())
    }

    /// Geolocate and open the map there. On failure the user is alerted and
    /// the map stays closed, so no workout can be placed.
    pub fn start(&mut self, geo: &mut impl Geolocator) -> bool {
        let center = match geo.current_position() {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(err = %e, "geolocation failed");
                self.alert(POSITION_ALERT);
                return false;
            }
        };

        if let Err(e) = self.map.init(
            center,
            self.config.initial_zoom,
            &self.config.tile_url,
            &self.config.attribution,
        ) {
            tracing::warn!(err = %e, "map initialization failed");
            self.alert(POSITION_ALERT);
            return false;
        }

        tracing::info!(lat = center.lat, lng = center.lng, "map ready");
        self.map_ready = true;
        self.map.add_marker(center, &Popup::simple("Your Location"));

        for idx in std::mem::take(&mut self.pending_markers) {
            self.render_marker(idx);
        }
        true
    }

    /// A click on the map picks the location of the next workout and opens the form.
    pub fn handle_map_click(&mut self, at: Coords) {
        if !self.map_ready {
            dlog!("map click before map ready lat={} lng={}", at.lat, at.lng);
            return;
        }
        self.pending_click = Some(at);
        self.ui.show_form();
    }

    pub fn toggle_input_fields(&mut self, kind: WorkoutKind) {
        self.ui.show_metric_field(kind);
    }

    /// Validate and record a workout at the last clicked location.
    ///
    /// Returns `Ok(None)` when the user was alerted and nothing changed. Once
    /// validation passes the workout is listed, drawn and saved; a storage
    /// failure at that point is returned as an error.
    pub fn submit_workout(&mut self, form: &WorkoutForm) -> Result<Option<WorkoutId>> {
        let Some(coords) = self.pending_click else {
            self.alert(NO_LOCATION_ALERT);
            return Ok(None);
        };

        let entry = match form.validate() {
            Ok(entry) => entry,
            Err(e) => {
                self.alert(&e.to_string());
                return Ok(None);
            }
        };

        let now = (self.clock)();
        let id = self.ids.next_at(now);
        let workout = match entry {
            Entry::Running {
                distance,
                duration,
                cadence,
            } => Workout::running(id.clone(), now, coords, distance, duration, cadence),
            Entry::Cycling {
                distance,
                duration,
                elevation_gain,
            } => Workout::cycling(id.clone(), now, coords, distance, duration, elevation_gain),
        };
        let row = workout_row_html(&workout)?;

        tracing::info!(id = %id, kind = %workout.kind(), "new workout");
        self.workouts.push(workout);
        let idx = self.workouts.len() - 1;

        self.render_marker(idx);
        self.ui.hide_form();
        self.ui.insert_row(&row);

        if let Err(e) = save_workouts(&mut self.store, &self.config.storage_key, &self.workouts) {
            tracing::error!(err = %e, "saving workouts failed");
            return Err(e);
        }
        Ok(Some(id))
    }

    /// Pan to the workout whose row carries `data_id`. `None` (the click was
    /// outside any row) or an unknown id does nothing.
    pub fn move_to_workout(&mut self, data_id: Option<&str>) -> bool {
        let Some(data_id) = data_id else {
            return false;
        };
        let Some(workout) = self.workouts.iter().find(|w| w.id.as_str() == data_id) else {
            dlog!("no workout for data-id={data_id}");
            return false;
        };
        if !self.map_ready {
            dlog!("map not ready, ignoring row click data-id={data_id}");
            return false;
        }

        self.map.set_view(
            workout.coords,
            self.config.focus_zoom,
            PanOptions {
                animate: true,
                duration_secs: self.config.pan_duration_secs,
            },
        );
        true
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    pub fn pending_location(&self) -> Option<Coords> {
        self.pending_click
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn alert(&mut self, message: &str) {
        tracing::warn!(alert = message, "user alert");
        self.ui.alert(message);
    }

    fn render_marker(&mut self, idx: usize) {
        if !self.map_ready {
            self.pending_markers.push(idx);
            return;
        }
        let w = &self.workouts[idx];
        self.map.add_marker(w.coords, &workout_popup(w));
    }
}
