//! Record assembly.
//!
//! The parser hands each validated section to a [`RecordBuilder`], which is
//! finalized exactly once into an immutable [`IesRecord`].

use super::derive;
use super::parser::{ParseError, ParseResult, Section};
use super::types::{IesRecord, Keywords, PhotometricType, Properties, Tilt, UnitsType};

/// Values from the ten-field photometric header line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PhotometricHeader {
    /// Line the header was read from
    pub line: usize,
    pub lamps: u32,
    pub lumens_per_lamp: f64,
    pub candela_multiplier: f64,
    pub vertical_count: usize,
    pub horizontal_count: usize,
    pub photometric_type: PhotometricType,
    pub units_type: UnitsType,
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

/// Values from the three-field ballast line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BallastHeader {
    pub ballast_factor: f64,
    pub future_use: f64,
    pub input_watts: f64,
}

/// Accumulates parsed sections until the record is complete.
pub(crate) struct RecordBuilder {
    version: String,
    keywords: Keywords,
    tilt: Tilt,
    header: PhotometricHeader,
    ballast: BallastHeader,
    vertical_angles: Vec<f64>,
    horizontal_angles: Vec<f64>,
    candela: Vec<f64>,
}

impl RecordBuilder {
    pub fn new(
        version: String,
        keywords: Keywords,
        tilt: Tilt,
        header: PhotometricHeader,
        ballast: BallastHeader,
    ) -> Self {
        Self {
            version,
            keywords,
            tilt,
            header,
            ballast,
            vertical_angles: Vec::new(),
            horizontal_angles: Vec::new(),
            candela: Vec::new(),
        }
    }

    pub fn vertical_angles(&mut self, angles: Vec<f64>) {
        self.vertical_angles = angles;
    }

    pub fn horizontal_angles(&mut self, angles: Vec<f64>) {
        self.horizontal_angles = angles;
    }

    /// Flat candela values, multiplier already applied.
    pub fn candela(&mut self, values: Vec<f64>) {
        self.candela = values;
    }

    /// Check the shape invariants, reshape the matrix and derive properties.
    ///
    /// `content` is the whole original text, scanned for a color temperature.
    pub fn finish(self, content: &str) -> ParseResult<IesRecord> {
        let header = self.header;
        let vertical = header.vertical_count;
        let horizontal = header.horizontal_count;

        check_count(Section::VerticalAngles, header.line, vertical, self.vertical_angles.len())?;
        check_count(Section::HorizontalAngles, header.line, horizontal, self.horizontal_angles.len())?;
        check_count(Section::Candela, header.line, vertical.saturating_mul(horizontal), self.candela.len())?;

        // Row h holds the values for horizontal_angles[h]
        let matrix: Vec<Vec<f64>> = (0..horizontal)
            .map(|h| self.candela[h * vertical..(h + 1) * vertical].to_vec())
            .collect();

        let properties = Properties {
            lamps: header.lamps,
            lumens_per_lamp: header.lumens_per_lamp,
            candela_multiplier: header.candela_multiplier,
            total_vertical_angles: vertical,
            total_horizontal_angles: horizontal,
            photometric_type: header.photometric_type,
            units_type: header.units_type,
            width: header.width,
            length: header.length,
            height: header.height,
            ballast_factor: self.ballast.ballast_factor,
            future_use: self.ballast.future_use,
            input_watts: self.ballast.input_watts,
            vertical_angles: self.vertical_angles,
            horizontal_angles: self.horizontal_angles,
            color_temperature: derive::color_temperature(content),
            luminaire_type: derive::luminaire_type(header.width, header.length),
            peak_value: derive::peak_value(&matrix),
        };

        Ok(IesRecord::new(
            self.version,
            self.keywords,
            self.tilt,
            properties,
            matrix,
        ))
    }
}

fn check_count(section: Section, line: usize, expected: usize, found: usize) -> ParseResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ParseError::CountMismatch {
            section,
            line,
            expected,
            found,
        })
    }
}
