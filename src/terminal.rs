//! Map and page adapters for running the tracker from a terminal session.
//!
//! Nothing is drawn: map and form interactions are logged, alerts go to
//! stderr, and list rows are kept in page order for the caller to print.

use crate::dlog;
use crate::map::{MapView, PanOptions, Popup};
use crate::types::{Coords, WorkoutKind};
use crate::ui::Ui;
use anyhow::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub coords: Coords,
    pub popup: Popup,
}

#[derive(Debug, Default)]
pub struct TerminalMap {
    center: Option<Coords>,
    zoom: u8,
    markers: Vec<PlacedMarker>,
}

impl TerminalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn center(&self) -> Option<Coords> {
        self.center
    }

    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }
}

impl MapView for TerminalMap {
    fn init(&mut self, center: Coords, zoom: u8, tile_url: &str, attribution: &str) -> Result<()> {
        tracing::info!(%center, zoom, tiles = tile_url, "map opened");
        dlog!("tile attribution: {attribution}");
        self.center = Some(center);
        self.zoom = zoom;
        Ok(())
    }

    fn add_marker(&mut self, coords: Coords, popup: &Popup) {
        dlog!("marker at {coords}: {}", popup.content);
        self.markers.push(PlacedMarker {
            coords,
            popup: popup.clone(),
        });
    }

    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) {
        tracing::info!(
            %center,
            zoom,
            animate = pan.animate,
            duration_secs = pan.duration_secs,
            "map view set"
        );
        self.center = Some(center);
        self.zoom = zoom;
    }
}

#[derive(Debug, Default)]
pub struct TerminalUi {
    rows: Vec<String>,
    alerts: Vec<String>,
    form_visible: bool,
    metric_field: Option<WorkoutKind>,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows in the order the page shows them, newest first.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub const fn form_visible(&self) -> bool {
        self.form_visible
    }

    pub const fn metric_field(&self) -> Option<WorkoutKind> {
        self.metric_field
    }
}

impl Ui for TerminalUi {
    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
        self.alerts.push(message.to_string());
    }

    fn show_form(&mut self) {
        dlog!("form shown");
        self.form_visible = true;
    }

    fn hide_form(&mut self) {
        dlog!("form cleared and hidden");
        self.form_visible = false;
    }

    fn show_metric_field(&mut self, kind: WorkoutKind) {
        dlog!("metric field switched to {kind}");
        self.metric_field = Some(kind);
    }

    fn insert_row(&mut self, html: &str) {
        self.rows.insert(0, html.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_inserted_after_the_form() {
        let mut ui = TerminalUi::new();
        ui.insert_row("<li>first</li>");
        ui.insert_row("<li>second</li>");
        assert_eq!(ui.rows(), ["<li>second</li>", "<li>first</li>"]);
    }

    #[test]
    fn set_view_moves_center() {
        let mut map = TerminalMap::new();
        map.init(Coords::new(1.0, 1.0), 13, "tiles", "attr").unwrap();
        map.set_view(
            Coords::new(2.0, 3.0),
            17,
            PanOptions {
                animate: true,
                duration_secs: 1.0,
            },
        );
        assert_eq!(map.center(), Some(Coords::new(2.0, 3.0)));
        assert_eq!(map.zoom(), 17);
    }
}
