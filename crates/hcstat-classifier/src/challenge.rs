//! Answer schema of a grid selection challenge

use hcstat_core::error::{HcstatError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Largest row or column index of the 3x3 grid
pub const GRID_MAX_INDEX: u8 = 2;

/// One selected grid cell, `[row, column]` with both in `0..=2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub box_2d: [u8; 2],
}

impl GridCoordinate {
    pub fn new(row: u8, col: u8) -> Self {
        Self { box_2d: [row, col] }
    }

    pub fn row(&self) -> u8 {
        self.box_2d[0]
    }

    pub fn col(&self) -> u8 {
        self.box_2d[1]
    }

    /// Whether the cell lies inside the grid
    pub fn in_bounds(&self) -> bool {
        self.row() <= GRID_MAX_INDEX && self.col() <= GRID_MAX_INDEX
    }
}

/// Model answer to an image challenge
///
/// ```json
/// {
///   "challenge_prompt": "please click on the largest animal",
///   "coordinates": [{"box_2d": [0,0]}, {"box_2d": [1,2]}]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBinaryChallenge {
    pub challenge_prompt: String,
    pub coordinates: Vec<GridCoordinate>,
}

impl ImageBinaryChallenge {
    /// Decode an answer from a JSON value and check every coordinate
    pub fn from_value(value: Value) -> Result<Self> {
        let answer: Self = serde_json::from_value(value)
            .map_err(|e| HcstatError::InvalidAnswer(e.to_string()))?;
        answer.validate()?;
        Ok(answer)
    }

    /// Reject coordinates outside the 3x3 grid
    pub fn validate(&self) -> Result<()> {
        if let Some(cell) = self.coordinates.iter().find(|c| !c.in_bounds()) {
            return Err(HcstatError::InvalidAnswer(format!(
                "coordinate {:?} is outside the [0,0]-[2,2] grid",
                cell.box_2d
            )));
        }
        Ok(())
    }

    /// Response schema handed to the model for constrained decoding
    pub fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "challenge_prompt": {"type": "STRING"},
                "coordinates": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "box_2d": {
                                "type": "ARRAY",
                                "items": {"type": "INTEGER"}
                            }
                        },
                        "required": ["box_2d"]
                    }
                }
            },
            "required": ["challenge_prompt", "coordinates"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_answer() {
        let answer = ImageBinaryChallenge::from_value(json!({
            "challenge_prompt": "please click on the largest animal",
            "coordinates": [{"box_2d": [0, 0]}, {"box_2d": [1, 2]}, {"box_2d": [2, 1]}]
        }))
        .unwrap();

        assert_eq!(answer.coordinates.len(), 3);
        assert_eq!(answer.coordinates[1], GridCoordinate::new(1, 2));
        assert_eq!(answer.coordinates[2].row(), 2);
        assert_eq!(answer.coordinates[2].col(), 1);
    }

    #[test]
    fn test_out_of_grid_rejected() {
        let result = ImageBinaryChallenge::from_value(json!({
            "challenge_prompt": "p",
            "coordinates": [{"box_2d": [3, 0]}]
        }));
        assert!(matches!(result, Err(HcstatError::InvalidAnswer(_))));
    }

    #[test]
    fn test_negative_coordinate_rejected() {
        let result = ImageBinaryChallenge::from_value(json!({
            "challenge_prompt": "p",
            "coordinates": [{"box_2d": [-1, 0]}]
        }));
        assert!(matches!(result, Err(HcstatError::InvalidAnswer(_))));
    }

    #[test]
    fn test_empty_selection_is_valid() {
        let answer = ImageBinaryChallenge::from_value(json!({
            "challenge_prompt": "select all buses",
            "coordinates": []
        }))
        .unwrap();
        assert!(answer.coordinates.is_empty());
    }
}
