//! Read-only queries used by every renderer.

use std::fmt;
use std::str::FromStr;

use lux_math::nearest_index;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::IesRecord;

/// Errors raised by record queries (never by parsing).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Absolute photometry (lumens per lamp {lumens_per_lamp}) has no rated lumens to normalize by")]
    AbsolutePhotometry { lumens_per_lamp: f64 },

    #[error("Rated lamp output is zero ({lamps} lamp(s) x {lumens_per_lamp} lm)")]
    ZeroRatedLumens { lamps: u32, lumens_per_lamp: f64 },

    #[error("Unknown intensity mode: {0}")]
    UnknownMode(String),
}

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Unit in which intensities are reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntensityMode {
    /// Candela
    Candela,

    /// Candela per 1000 lumens of rated lamp output
    CandelaPerKilolumen,
}

impl IntensityMode {
    /// Display alias for chart labels.
    pub fn label(&self) -> &'static str {
        match self {
            IntensityMode::Candela => "cd",
            IntensityMode::CandelaPerKilolumen => "cd/klm",
        }
    }
}

impl fmt::Display for IntensityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IntensityMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cd" => Ok(IntensityMode::Candela),
            "cdklm" => Ok(IntensityMode::CandelaPerKilolumen),
            other => Err(QueryError::UnknownMode(other.to_string())),
        }
    }
}

impl IesRecord {
    /// Index of the horizontal angle closest to `angle`.
    ///
    /// Ties go to the lowest index. A NaN angle yields 0.
    pub fn index(&self, angle: f64) -> usize {
        nearest_index(&self.properties().horizontal_angles, angle).unwrap_or(0)
    }

    /// Candela values of the horizontal plane closest to `angle`.
    pub fn plane(&self, angle: f64) -> &[f64] {
        &self.matrix()[self.index(angle)]
    }

    /// Convert a candela value to the report unit, rounded down.
    ///
    /// `CandelaPerKilolumen` divides by the total rated lamp lumens and fails
    /// for absolute photometry or zero rated output instead of returning a
    /// negative or infinite number.
    pub fn value(&self, candela: f64, mode: IntensityMode) -> QueryResult<f64> {
        match mode {
            IntensityMode::Candela => Ok(candela.floor()),
            IntensityMode::CandelaPerKilolumen => {
                let props = self.properties();
                let lumens = props.rated_lumens().ok_or(QueryError::AbsolutePhotometry {
                    lumens_per_lamp: props.lumens_per_lamp,
                })?;
                if lumens == 0.0 {
                    return Err(QueryError::ZeroRatedLumens {
                        lamps: props.lamps,
                        lumens_per_lamp: props.lumens_per_lamp,
                    });
                }
                Ok((candela * 1000.0 / lumens).floor())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(header: &str, horizontal: &str, candela: &str) -> IesRecord {
        let content = format!(
            "IESNA:LM-63-2002\n[TEST] query\nTILT=NONE\n{}\n1 1 50\n0 90\n{}\n{}\n",
            header, horizontal, candela
        );
        IesRecord::parse(&content).unwrap()
    }

    fn four_planes() -> IesRecord {
        record(
            "1 1000 1 2 4 1 1 1 1 1",
            "0 90 180 270",
            "10 20 30 40 50 60 70 80",
        )
    }

    #[test]
    fn test_index_nearest_plane() {
        let ies = four_planes();
        assert_eq!(ies.index(0.0), 0);
        assert_eq!(ies.index(91.0), 1);
        assert_eq!(ies.index(269.0), 3);
        assert_eq!(ies.index(360.0), 3);
        // Exactly between two planes resolves to the first
        assert_eq!(ies.index(45.0), 0);
        assert_eq!(ies.index(f64::NAN), 0);
    }

    #[test]
    fn test_plane_and_opposite_plane() {
        let ies = four_planes();
        assert_eq!(ies.plane(0.0), &[10.0, 20.0]);
        assert_eq!(ies.plane((90.0 + 180.0) % 360.0), &[70.0, 80.0]);
        assert_eq!(ies.plane(100.0), &[30.0, 40.0]);
    }

    #[test]
    fn test_value_candela() {
        let ies = four_planes();
        assert_eq!(ies.value(100.0, IntensityMode::Candela), Ok(100.0));
        assert_eq!(ies.value(20.0, IntensityMode::Candela), Ok(20.0));
        assert_eq!(ies.value(99.9, IntensityMode::Candela), Ok(99.0));
    }

    #[test]
    fn test_value_per_kilolumen() {
        let ies = four_planes();
        assert_eq!(ies.value(1000.0, IntensityMode::CandelaPerKilolumen), Ok(1000.0));

        let two_lamps = record("2 1500 1 2 1 1 1 1 1 1", "0", "10 20");
        // 450 * 1000 / 3000 = 150
        assert_eq!(two_lamps.value(450.0, IntensityMode::CandelaPerKilolumen), Ok(150.0));
        assert_eq!(two_lamps.value(451.0, IntensityMode::CandelaPerKilolumen), Ok(150.0));
    }

    #[test]
    fn test_value_absolute_photometry() {
        let ies = record("1 -1 1 2 1 1 1 1 1 1", "0", "10 20");
        assert_eq!(
            ies.value(500.0, IntensityMode::CandelaPerKilolumen),
            Err(QueryError::AbsolutePhotometry { lumens_per_lamp: -1.0 })
        );
        // Plain candela still works
        assert_eq!(ies.value(500.0, IntensityMode::Candela), Ok(500.0));
    }

    #[test]
    fn test_value_zero_rated_lumens() {
        let ies = record("0 1000 1 2 1 1 1 1 1 1", "0", "10 20");
        assert!(matches!(
            ies.value(500.0, IntensityMode::CandelaPerKilolumen),
            Err(QueryError::ZeroRatedLumens { lamps: 0, .. })
        ));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("cd".parse::<IntensityMode>(), Ok(IntensityMode::Candela));
        assert_eq!(
            "cdklm".parse::<IntensityMode>(),
            Ok(IntensityMode::CandelaPerKilolumen)
        );
        assert_eq!(
            "lux".parse::<IntensityMode>(),
            Err(QueryError::UnknownMode("lux".to_string()))
        );
        assert_eq!(IntensityMode::CandelaPerKilolumen.to_string(), "cd/klm");
    }
}
