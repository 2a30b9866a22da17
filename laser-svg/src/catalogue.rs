use std::collections::HashMap;
use std::fs;
use std::path::Path;

use laser_core::Config;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A saved cutting colour: the palette entry itself, plus the speed
/// preset a UI might pair it with. `laser-core` only ever reads the
/// palette's hex list; `speed_preset` and [`Catalogue::speeds`] exist for
/// the UI layer and are round-tripped unexamined.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogueColour {
    pub hex: String,
    #[serde(default)]
    pub speed_preset: Option<String>,
}

/// The persisted catalogue (spec §6): known colours in cut order, named
/// speed presets, and the configuration last applied. Only `colors` (via
/// [`Catalogue::palette`]) feeds the pipeline; `speeds` and `last_used`
/// are opaque storage for whatever UI reads this file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub colors: Vec<CatalogueColour>,

    #[serde(default)]
    pub speeds: HashMap<String, f64>,

    #[serde(default)]
    pub last_used: Option<Config>,
}

impl Catalogue {
    pub fn load(path: &Path) -> Result<Catalogue> {
        if !path.exists() {
            return Ok(Catalogue::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// The hex colour list in catalogue order, the form [`Config::palette`]
    /// expects.
    pub fn palette(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.hex.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_an_empty_catalogue() {
        let cat = Catalogue::load(Path::new("/nonexistent/catalogue.json")).unwrap();
        assert!(cat.colors.is_empty());
    }

    #[test]
    fn palette_extracts_hex_values_in_order() {
        let cat = Catalogue {
            colors: vec![
                CatalogueColour { hex: "#ff0000".to_string(), speed_preset: None },
                CatalogueColour { hex: "#000000".to_string(), speed_preset: Some("fast".to_string()) },
            ],
            ..Catalogue::default()
        };
        assert_eq!(cat.palette(), vec!["#ff0000".to_string(), "#000000".to_string()]);
    }

    #[test]
    fn round_trips_through_json() {
        let cat = Catalogue {
            colors: vec![CatalogueColour { hex: "#00ff00".to_string(), speed_preset: None }],
            speeds: HashMap::from([("fast".to_string(), 40.0)]),
            last_used: Some(Config::default()),
        };
        let json = serde_json::to_string(&cat).unwrap();
        let back: Catalogue = serde_json::from_str(&json).unwrap();
        assert_eq!(back.colors, cat.colors);
        assert_eq!(back.speeds, cat.speeds);
    }
}
