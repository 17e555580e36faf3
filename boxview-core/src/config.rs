/// Preview configuration.
///
/// Loaded from JSON; every field is optional:
///
/// ```json
/// {
///   "dimensions": { "width": 120, "height": 80, "depth": 40 },
///   "home": { "pitch": -20, "yaw": 45 },
///   "drag": { "mode": "delta", "sensitivity": 0.4 }
/// }
/// ```
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dimensions::{BoxDimensions, RawDimensions};
use crate::error::ConfigError;
use crate::orientation::{DragMapping, Orientation};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreviewConfig {
    /// Box shown when the session starts.
    pub dimensions: BoxDimensions,
    /// Orientation restored by a view reset.
    pub home: Orientation,
    pub drag: DragMapping,
}

/// On-disk shape; dimensions are validated after parsing.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    dimensions: Option<RawDimensions>,
    home: Orientation,
    drag: DragMapping,
}

impl PreviewConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let dimensions = match file.dimensions {
            Some(raw) => BoxDimensions::try_from(raw)?,
            None => BoxDimensions::default(),
        };
        Ok(Self {
            dimensions,
            home: file.home,
            drag: file.drag,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
