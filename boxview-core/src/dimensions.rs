/// Box dimensions and the model that owns them.
///
/// All values are millimetres. A [`BoxDimensions`] can only be built through
/// validation, so every consumer can rely on three finite, positive values.
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DimensionError, Field};

/// Width, height and depth of a box in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct BoxDimensions {
    width: f64,
    height: f64,
    depth: f64,
}

/// Unvalidated dimensions as they appear in JSON.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDimensions {
    width: f64,
    height: f64,
    depth: f64,
}

impl TryFrom<RawDimensions> for BoxDimensions {
    type Error = DimensionError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        BoxDimensions::new(raw.width, raw.height, raw.depth)
    }
}

impl BoxDimensions {
    pub fn new(width: f64, height: f64, depth: f64) -> Result<Self, DimensionError> {
        Ok(Self {
            width: validate(Field::Width, width)?,
            height: validate(Field::Height, height)?,
            depth: validate(Field::Depth, depth)?,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Width => self.width,
            Field::Height => self.height,
            Field::Depth => self.depth,
        }
    }

    /// Copy with one field replaced, validated like a full triple.
    pub fn with(&self, field: Field, value: f64) -> Result<Self, DimensionError> {
        let value = validate(field, value)?;
        let mut next = *self;
        match field {
            Field::Width => next.width = value,
            Field::Height => next.height = value,
            Field::Depth => next.depth = value,
        }
        Ok(next)
    }

    /// Largest of the three dimensions.
    pub fn max_extent(&self) -> f64 {
        self.width.max(self.height).max(self.depth)
    }
}

impl Default for BoxDimensions {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 150.0,
            depth: 50.0,
        }
    }
}

fn validate(field: Field, value: f64) -> Result<f64, DimensionError> {
    if !value.is_finite() {
        return Err(DimensionError::NonFinite { field, value });
    }
    if value <= 0.0 {
        return Err(DimensionError::NonPositive { field, value });
    }
    Ok(value)
}

/// Owner of the current box dimensions.
///
/// Accepted edits bump [`revision`](Self::revision) so dependants know the
/// face layout must be recomputed. Rejected edits change nothing.
#[derive(Debug, Clone)]
pub struct DimensionModel {
    current: BoxDimensions,
    revision: u64,
}

impl DimensionModel {
    pub fn new(initial: BoxDimensions) -> Self {
        Self {
            current: initial,
            revision: 0,
        }
    }

    pub fn dimensions(&self) -> BoxDimensions {
        self.current
    }

    /// Number of accepted edits since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace all three dimensions at once.
    pub fn set_dimensions(
        &mut self,
        width: f64,
        height: f64,
        depth: f64,
    ) -> Result<BoxDimensions, DimensionError> {
        let next = BoxDimensions::new(width, height, depth).inspect_err(|err| {
            warn!(%err, "rejected dimension edit");
        })?;
        Ok(self.accept(next))
    }

    /// Replace a single dimension, keeping the other two.
    pub fn set_field(&mut self, field: Field, value: f64) -> Result<BoxDimensions, DimensionError> {
        let next = self.current.with(field, value).inspect_err(|err| {
            warn!(%err, "rejected dimension edit");
        })?;
        Ok(self.accept(next))
    }

    pub fn set_width(&mut self, value: f64) -> Result<BoxDimensions, DimensionError> {
        self.set_field(Field::Width, value)
    }

    pub fn set_height(&mut self, value: f64) -> Result<BoxDimensions, DimensionError> {
        self.set_field(Field::Height, value)
    }

    pub fn set_depth(&mut self, value: f64) -> Result<BoxDimensions, DimensionError> {
        self.set_field(Field::Depth, value)
    }

    fn accept(&mut self, next: BoxDimensions) -> BoxDimensions {
        self.current = next;
        self.revision += 1;
        debug!(
            width = next.width,
            height = next.height,
            depth = next.depth,
            revision = self.revision,
            "dimensions changed"
        );
        next
    }
}

impl Default for DimensionModel {
    fn default() -> Self {
        Self::new(BoxDimensions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_width_is_non_positive() {
        let mut model = DimensionModel::default();
        let err = model.set_dimensions(0.0, 10.0, 10.0).unwrap_err();
        assert!(matches!(
            err,
            DimensionError::NonPositive {
                field: Field::Width,
                ..
            }
        ));
    }

    #[test]
    fn test_nan_height_is_non_finite() {
        let mut model = DimensionModel::default();
        let err = model.set_dimensions(10.0, f64::NAN, 10.0).unwrap_err();
        assert!(matches!(
            err,
            DimensionError::NonFinite {
                field: Field::Height,
                ..
            }
        ));
    }

    #[test]
    fn test_infinity_and_negative_infinity_are_non_finite() {
        assert!(matches!(
            BoxDimensions::new(10.0, 10.0, f64::INFINITY),
            Err(DimensionError::NonFinite { field: Field::Depth, .. })
        ));
        // Non-finite wins over the sign check.
        assert!(matches!(
            BoxDimensions::new(f64::NEG_INFINITY, 10.0, 10.0),
            Err(DimensionError::NonFinite { field: Field::Width, .. })
        ));
    }

    #[test]
    fn test_nan_error_carries_field_and_value() {
        let err = BoxDimensions::new(f64::NAN, 10.0, 10.0).unwrap_err();
        assert_eq!(err.field(), Field::Width);
        assert!(matches!(
            err,
            DimensionError::NonFinite { value, .. } if value.is_nan()
        ));
    }

    #[test]
    fn test_negative_depth_is_non_positive() {
        let err = BoxDimensions::new(10.0, 10.0, -1.0).unwrap_err();
        assert_eq!(err.field(), Field::Depth);
    }

    #[test]
    fn test_accepted_triple_is_retrievable() {
        let mut model = DimensionModel::default();
        let dims = model.set_dimensions(10.0, 10.0, 10.0).unwrap();
        assert_eq!(model.dimensions(), dims);
        assert_eq!(dims.width(), 10.0);
        assert_eq!(dims.height(), 10.0);
        assert_eq!(dims.depth(), 10.0);
        assert_eq!(model.revision(), 1);
    }

    #[test]
    fn test_rejected_edit_leaves_state_untouched() {
        let mut model = DimensionModel::default();
        model.set_dimensions(20.0, 30.0, 40.0).unwrap();
        let before = model.dimensions();

        assert!(model.set_dimensions(20.0, 0.0, 40.0).is_err());
        assert!(model.set_depth(f64::NAN).is_err());

        assert_eq!(model.dimensions(), before);
        assert_eq!(model.revision(), 1);
    }

    #[test]
    fn test_single_field_edit() {
        let mut model = DimensionModel::default();
        let dims = model.set_height(75.5).unwrap();
        assert_eq!(dims.height(), 75.5);
        assert_eq!(dims.width(), BoxDimensions::default().width());
        assert_eq!(dims.depth(), BoxDimensions::default().depth());
    }

    #[test]
    fn test_extreme_values_accepted() {
        let dims = BoxDimensions::new(1.0, 100_000.0, 0.001).unwrap();
        assert_eq!(dims.max_extent(), 100_000.0);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: BoxDimensions =
            serde_json::from_str(r#"{"width": 10, "height": 20, "depth": 30}"#).unwrap();
        assert_eq!(ok.depth(), 30.0);

        let err = serde_json::from_str::<BoxDimensions>(r#"{"width": 10, "height": -2, "depth": 30}"#)
            .unwrap_err();
        assert!(err.to_string().contains("height"));
    }
}
