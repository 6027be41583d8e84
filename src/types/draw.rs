use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::{PipelineError, PipelineResult};

/// Numbers per combination.
pub const DRAW_SIZE: usize = 6;
/// Lowest ball number in the default game.
pub const MIN_NUMBER: u32 = 1;
/// Highest ball number in the default game.
pub const MAX_NUMBER: u32 = 49;

/// One lottery combination: six distinct numbers in strictly ascending order.
///
/// Only ordering is checked here. The number range is configurable, so
/// `SeriesGenerator` owns the bounds and only samples inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Draw([u32; DRAW_SIZE]);

impl Draw {
    pub fn new(numbers: [u32; DRAW_SIZE]) -> PipelineResult<Self> {
        if numbers.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(PipelineError::invalid_argument(format!(
                "draw numbers must be distinct and ascending: {:?}",
                numbers
            )));
        }
        Ok(Self(numbers))
    }

    pub fn from_slice(numbers: &[u32]) -> PipelineResult<Self> {
        let numbers: [u32; DRAW_SIZE] = numbers.try_into().map_err(|_| {
            PipelineError::invalid_argument(format!(
                "a draw holds exactly {} numbers, got {}",
                DRAW_SIZE,
                numbers.len()
            ))
        })?;
        Self::new(numbers)
    }

    pub fn numbers(&self) -> &[u32; DRAW_SIZE] {
        &self.0
    }
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", n)?;
        }
        write!(f, "]")
    }
}

impl Serialize for Draw {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Named feature columns fed to the model, in fixed order.
///
/// Training and inference both build their matrices through this struct, so
/// column order cannot drift between the two calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawFeatures {
    pub num1: f64,
    pub num2: f64,
    pub num3: f64,
    pub num4: f64,
    pub num5: f64,
    pub num6: f64,
}

impl DrawFeatures {
    pub const NUM_FEATURES: usize = DRAW_SIZE;

    pub const COLUMNS: [&'static str; Self::NUM_FEATURES] =
        ["num1", "num2", "num3", "num4", "num5", "num6"];

    pub fn to_array(&self) -> [f64; Self::NUM_FEATURES] {
        [
            self.num1,
            self.num2,
            self.num3,
            self.num4,
            self.num5,
            self.num6,
        ]
    }
}

impl From<&Draw> for DrawFeatures {
    fn from(draw: &Draw) -> Self {
        let n = draw.numbers();
        Self {
            num1: n[0] as f64,
            num2: n[1] as f64,
            num3: n[2] as f64,
            num4: n[3] as f64,
            num5: n[4] as f64,
            num6: n[5] as f64,
        }
    }
}

/// Identifies the ordered column set a feature matrix was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: &'static [&'static str],
}

impl FeatureSchema {
    pub fn draw_numbers() -> Self {
        Self {
            columns: &DrawFeatures::COLUMNS,
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_rejects_unsorted_or_duplicate_numbers() {
        assert!(Draw::new([1, 2, 3, 4, 5, 6]).is_ok());
        assert!(Draw::new([2, 1, 3, 4, 5, 6]).is_err());
        assert!(Draw::new([1, 1, 3, 4, 5, 6]).is_err());
        // games wider than 1..=49 build draws through the same type
        assert!(Draw::new([10, 20, 30, 40, 50, 60]).is_ok());
    }

    #[test]
    fn test_draw_from_slice_checks_length() {
        assert!(Draw::from_slice(&[1, 2, 3]).is_err());
        let draw = Draw::from_slice(&[4, 8, 15, 16, 23, 42]).unwrap();
        assert_eq!(draw.numbers()[0], 4);
        assert_eq!(draw.numbers()[5], 42);
    }

    #[test]
    fn test_draw_display_matches_chart_label() {
        let draw = Draw::new([4, 8, 15, 16, 23, 42]).unwrap();
        assert_eq!(draw.to_string(), "[4, 8, 15, 16, 23, 42]");
        assert_eq!(serde_json::to_string(&draw).unwrap(), "[4,8,15,16,23,42]");
    }

    #[test]
    fn test_features_follow_column_order() {
        let draw = Draw::new([3, 9, 12, 30, 41, 49]).unwrap();
        let features = DrawFeatures::from(&draw);
        assert_eq!(features.to_array(), [3.0, 9.0, 12.0, 30.0, 41.0, 49.0]);
        assert_eq!(FeatureSchema::draw_numbers().columns().len(), DrawFeatures::NUM_FEATURES);
        assert_eq!(FeatureSchema::draw_numbers().columns()[0], "num1");
    }
}
