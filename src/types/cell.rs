use serde::{Deserialize, Serialize};

/// Value type of a cell, using the model's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum CellType {
    Number,
    #[default]
    Text,
    LogicalValue,
    ErrorValue,
    Array,
    CompoundData,
}

impl From<u32> for CellType {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::Number,
            4 => Self::LogicalValue,
            16 => Self::ErrorValue,
            64 => Self::Array,
            128 => Self::CompoundData,
            _ => Self::Text,
        }
    }
}

impl From<CellType> for u32 {
    fn from(t: CellType) -> Self {
        match t {
            CellType::Number => 1,
            CellType::Text => 2,
            CellType::LogicalValue => 4,
            CellType::ErrorValue => 16,
            CellType::Array => 64,
            CellType::CompoundData => 128,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(CellType::from(1), CellType::Number);
        assert_eq!(CellType::from(4), CellType::LogicalValue);
        assert_eq!(CellType::from(99), CellType::Text);
        let t: CellType = serde_json::from_str("16").unwrap();
        assert_eq!(t, CellType::ErrorValue);
        assert_eq!(serde_json::to_string(&CellType::Number).unwrap(), "1");
    }
}
