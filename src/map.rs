use crate::types::Coords;
use anyhow::{Result, bail};

/// Popup options attached to a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: Option<String>,
    pub content: String,
}

impl Popup {
    /// Plain popup with the map library's defaults, e.g. the user location marker.
    pub fn simple(content: impl Into<String>) -> Self {
        Self {
            max_width: 300,
            min_width: 50,
            auto_close: true,
            close_on_click: true,
            class_name: None,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOptions {
    pub animate: bool,
    pub duration_secs: f64,
}

/// The slice of a slippy-map library the tracker drives.
pub trait MapView {
    /// Create the map centered on `center` and add the tile layer.
    fn init(&mut self, center: Coords, zoom: u8, tile_url: &str, attribution: &str) -> Result<()>;

    /// Place a marker and open its popup.
    fn add_marker(&mut self, coords: Coords, popup: &Popup);

    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions);
}

/// Source of the device position.
pub trait Geolocator {
    fn current_position(&mut self) -> Result<Coords>;
}

/// Position supplied up front (command line, environment). `None` behaves
/// like a denied permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(pub Option<Coords>);

impl Geolocator for FixedPosition {
    fn current_position(&mut self) -> Result<Coords> {
        match self.0 {
            Some(c) => Ok(c),
            None => bail!("position unavailable"),
        }
    }
}
