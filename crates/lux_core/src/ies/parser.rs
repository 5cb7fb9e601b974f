//! IES LM-63 text parser.
//!
//! The format is strictly sequential. Each reader below advances one shared
//! [`LineCursor`] and hands over to the next:
//!
//! 1. version line
//! 2. `[KEY] value` lines up to the `TILT=` line
//! 3. `TILT=NONE | INCLUDE | <file>` (an `INCLUDE` block is skipped)
//! 4. ten-field photometric header line
//! 5. three-field ballast line
//! 6. vertical angles, then horizontal angles (any number per line)
//! 7. `vertical * horizontal` candela values (any number per line)
//!
//! Section lengths are only known from the header, so every count is checked
//! as it is read and any failure aborts the parse.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::builder::{BallastHeader, PhotometricHeader, RecordBuilder};
use super::lines::LineCursor;
use super::types::{IesRecord, Keywords, PhotometricType, Tilt, UnitsType};

const TILT_PREFIX: &str = "TILT=";

/// Lines following `TILT=INCLUDE` that belong to the tilt block.
const TILT_BLOCK_LINES: usize = 4;

const PHOTOMETRIC_FIELDS: [&str; 10] = [
    "lamps",
    "lumens_per_lamp",
    "candela_multiplier",
    "total_vertical_angles",
    "total_horizontal_angles",
    "photometric_type",
    "units_type",
    "width",
    "length",
    "height",
];

const BALLAST_FIELDS: [&str; 3] = ["ballast_factor", "future_use", "input_watts"];

/// Part of the document an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    TiltDirective,
    TiltBlock,
    PhotometricHeader,
    BallastHeader,
    VerticalAngles,
    HorizontalAngles,
    Candela,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::TiltDirective => "tilt directive",
            Section::TiltBlock => "tilt block",
            Section::PhotometricHeader => "photometric header",
            Section::BallastHeader => "ballast header",
            Section::VerticalAngles => "vertical angles",
            Section::HorizontalAngles => "horizontal angles",
            Section::Candela => "candela values",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during IES parsing.
///
/// Line numbers are 1-based and refer to the original text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty input")]
    EmptyInput,

    #[error("Invalid tilt directive at line {line}: expected `TILT=`, found `{found}`")]
    InvalidTiltDirective { line: usize, found: String },

    #[error("Malformed header at line {line}, field {position} ({field}): {message}")]
    MalformedHeader {
        line: usize,
        field: &'static str,
        position: usize,
        message: String,
    },

    #[error("Unrecognized units type {value} at line {line}")]
    UnrecognizedUnits { line: usize, value: f64 },

    #[error("Unrecognized photometric type {value} at line {line}")]
    UnrecognizedPhotometricType { line: usize, value: f64 },

    #[error("Truncated input in {section} after line {line}: expected {expected}, found {found}")]
    TruncatedInput {
        section: Section,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Count mismatch in {section} at line {line}: declared {expected}, found {found}")]
    CountMismatch {
        section: Section,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid number `{token}` in {section} at line {line}")]
    InvalidNumber {
        section: Section,
        line: usize,
        token: String,
    },

    #[error("{section} not ascending at index {index}: {value} follows {previous}")]
    UnorderedAngles {
        section: Section,
        index: usize,
        previous: f64,
        value: f64,
    },

    #[error("Negative candela value {value} at line {line}")]
    NegativeCandela { line: usize, value: f64 },

    #[error("Candela value {value} at line {line} overflows when scaled by {multiplier}")]
    CandelaOverflow {
        line: usize,
        value: f64,
        multiplier: f64,
    },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Fail when tokens remain after the candela matrix
    pub reject_trailing_tokens: bool,
    /// Fail when an angle array steps backwards
    pub require_ascending_angles: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            reject_trailing_tokens: true,
            require_ascending_angles: true,
        }
    }
}

/// IES LM-63 parser over one complete document.
pub struct IesParser<'a> {
    content: &'a str,
    cursor: LineCursor<'a>,
    options: ParseOptions,
}

impl<'a> IesParser<'a> {
    /// Create a parser with default options.
    pub fn new(content: &'a str) -> Self {
        Self::with_options(content, ParseOptions::default())
    }

    pub fn with_options(content: &'a str, options: ParseOptions) -> Self {
        Self {
            content,
            cursor: LineCursor::new(content),
            options,
        }
    }

    /// Parse the whole document into a record.
    pub fn parse(mut self) -> ParseResult<IesRecord> {
        let version = self
            .cursor
            .next_line()
            .ok_or(ParseError::EmptyInput)?
            .text
            .to_string();

        let keywords = self.read_keywords();
        let tilt = self.read_tilt()?;
        let header = self.read_photometric_header()?;
        let ballast = self.read_ballast_header()?;

        let mut builder = RecordBuilder::new(version, keywords, tilt, header.clone(), ballast);

        let vertical = self.read_angles(Section::VerticalAngles, header.vertical_count)?;
        let horizontal = self.read_angles(Section::HorizontalAngles, header.horizontal_count)?;
        log::debug!(
            "Read {} vertical and {} horizontal angles",
            vertical.len(),
            horizontal.len()
        );
        builder.vertical_angles(vertical);
        builder.horizontal_angles(horizontal);

        let candela = self.read_candela(&header)?;
        builder.candela(candela);
        self.check_trailing(&header)?;

        builder.finish(self.content)
    }

    /// Read `[KEY] value` lines until the `TILT=` line, leaving it unread.
    fn read_keywords(&mut self) -> Keywords {
        let mut keywords = Keywords::default();

        while let Some(line) = self.cursor.peek_line() {
            if line.text.starts_with(TILT_PREFIX) {
                break;
            }
            self.cursor.next_line();

            let Some(rest) = line.text.strip_prefix('[') else {
                log::warn!("Skipping non-keyword line {}: {}", line.number, line.text);
                continue;
            };

            match rest.find(']') {
                Some(end) => keywords.append(&rest[..end], rest[end + 1..].trim()),
                None => log::warn!("Skipping unclosed keyword at line {}: {}", line.number, line.text),
            }
        }

        log::debug!("Read {} keywords", keywords.len());
        keywords
    }

    /// Read and classify the `TILT=` line; skip the tilt block for `INCLUDE`.
    fn read_tilt(&mut self) -> ParseResult<Tilt> {
        let line = self.cursor.next_line().ok_or(ParseError::TruncatedInput {
            section: Section::TiltDirective,
            line: self.cursor.last_line_number(),
            expected: 1,
            found: 0,
        })?;

        let value = line
            .text
            .strip_prefix(TILT_PREFIX)
            .ok_or_else(|| ParseError::InvalidTiltDirective {
                line: line.number,
                found: line.text.to_string(),
            })?;

        let tilt = Tilt::from_directive(value);
        if tilt == Tilt::Include {
            let skipped = self.cursor.skip_lines(TILT_BLOCK_LINES);
            if skipped < TILT_BLOCK_LINES {
                return Err(ParseError::TruncatedInput {
                    section: Section::TiltBlock,
                    line: self.cursor.last_line_number(),
                    expected: TILT_BLOCK_LINES,
                    found: skipped,
                });
            }
        }

        log::debug!("Tilt directive at line {}: {:?}", line.number, tilt);
        Ok(tilt)
    }

    fn read_photometric_header(&mut self) -> ParseResult<PhotometricHeader> {
        let (line, values) = self.read_fixed_line(Section::PhotometricHeader, &PHOTOMETRIC_FIELDS)?;
        let [lamps, lumens_per_lamp, candela_multiplier, vertical, horizontal, photometric_type, units_type, width, length, height] =
            values;

        let lamps = integer_field(line, 0, lamps)?;
        let vertical_count = angle_count(line, 3, vertical)?;
        let horizontal_count = angle_count(line, 4, horizontal)?;

        if candela_multiplier < 0.0 {
            return Err(malformed(line, 2, "must not be negative"));
        }
        if vertical_count.checked_mul(horizontal_count).is_none() {
            return Err(malformed(line, 4, "angle counts overflow the matrix size"));
        }

        let photometric_type = PhotometricType::from_code(photometric_type).ok_or(
            ParseError::UnrecognizedPhotometricType {
                line,
                value: photometric_type,
            },
        )?;
        let units_type = UnitsType::from_code(units_type)
            .ok_or(ParseError::UnrecognizedUnits { line, value: units_type })?;

        let header = PhotometricHeader {
            line,
            lamps: u32::try_from(lamps).map_err(|_| malformed(line, 0, "too large"))?,
            lumens_per_lamp,
            candela_multiplier,
            vertical_count,
            horizontal_count,
            photometric_type,
            units_type,
            width: width.abs(),
            length: length.abs(),
            height: height.abs(),
        };

        log::debug!(
            "Photometric header at line {}: {} lamp(s) x {} lm, multiplier {}, {}x{} angles, {:?}, {}",
            line,
            header.lamps,
            header.lumens_per_lamp,
            header.candela_multiplier,
            header.vertical_count,
            header.horizontal_count,
            header.photometric_type,
            header.units_type.label()
        );
        Ok(header)
    }

    fn read_ballast_header(&mut self) -> ParseResult<BallastHeader> {
        let (line, [ballast_factor, future_use, input_watts]) =
            self.read_fixed_line(Section::BallastHeader, &BALLAST_FIELDS)?;

        if input_watts < 0.0 {
            return Err(ParseError::MalformedHeader {
                line,
                field: BALLAST_FIELDS[2],
                position: 3,
                message: "must not be negative".to_string(),
            });
        }
        if future_use != 1.0 {
            log::warn!("Future-use field at line {} is {}, expected 1", line, future_use);
        }

        Ok(BallastHeader {
            ballast_factor,
            future_use,
            input_watts,
        })
    }

    /// Read one line holding exactly `N` finite numbers.
    fn read_fixed_line<const N: usize>(
        &mut self,
        section: Section,
        fields: &[&'static str; N],
    ) -> ParseResult<(usize, [f64; N])> {
        let line = self.cursor.next_line().ok_or(ParseError::TruncatedInput {
            section,
            line: self.cursor.last_line_number(),
            expected: N,
            found: 0,
        })?;

        let mut tokens = line.text.split_whitespace();
        let mut values = [0.0; N];

        for (i, &field) in fields.iter().enumerate() {
            let error = |message: String| ParseError::MalformedHeader {
                line: line.number,
                field,
                position: i + 1,
                message,
            };
            let token = tokens
                .next()
                .ok_or_else(|| error("missing value".to_string()))?;
            values[i] = parse_number(token)
                .ok_or_else(|| error(format!("expected a number, found `{}`", token)))?;
        }

        if let Some(extra) = tokens.next() {
            return Err(ParseError::MalformedHeader {
                line: line.number,
                field: "end of line",
                position: N + 1,
                message: format!("unexpected extra value `{}`", extra),
            });
        }

        Ok((line.number, values))
    }

    /// Read `count` angles from the token stream.
    fn read_angles(&mut self, section: Section, count: usize) -> ParseResult<Vec<f64>> {
        let angles: Vec<f64> = self
            .read_numbers(section, count)?
            .into_iter()
            .map(|(_, value)| value)
            .collect();

        if self.options.require_ascending_angles {
            check_ascending(section, &angles)?;
        }
        Ok(angles)
    }

    /// Read the flat candela stream and apply the multiplier.
    fn read_candela(&mut self, header: &PhotometricHeader) -> ParseResult<Vec<f64>> {
        // Overflow was rejected with the header
        let count = header.vertical_count * header.horizontal_count;

        self.read_numbers(Section::Candela, count)?
            .into_iter()
            .map(|(line, raw)| {
                if raw < 0.0 {
                    return Err(ParseError::NegativeCandela { line, value: raw });
                }
                let scaled = raw * header.candela_multiplier;
                if !scaled.is_finite() {
                    return Err(ParseError::CandelaOverflow {
                        line,
                        value: raw,
                        multiplier: header.candela_multiplier,
                    });
                }
                Ok(scaled)
            })
            .collect()
    }

    /// Read exactly `count` finite numbers with their line numbers.
    fn read_numbers(&mut self, section: Section, count: usize) -> ParseResult<Vec<(usize, f64)>> {
        let available = self.cursor.remaining_tokens();
        if available < count {
            return Err(ParseError::TruncatedInput {
                section,
                line: self.cursor.last_line_number(),
                expected: count,
                found: available,
            });
        }

        let mut values = Vec::with_capacity(count);
        while values.len() < count {
            let Some(token) = self.cursor.next_token() else {
                break;
            };
            let value = parse_number(token.text).ok_or_else(|| ParseError::InvalidNumber {
                section,
                line: token.line,
                token: token.text.to_string(),
            })?;
            values.push((token.line, value));
        }
        Ok(values)
    }

    /// Tokens after the matrix mean a declared count disagrees with the data.
    fn check_trailing(&mut self, header: &PhotometricHeader) -> ParseResult<()> {
        let leftover = self.cursor.remaining_tokens();
        if leftover == 0 {
            return Ok(());
        }

        let expected = header.vertical_count * header.horizontal_count;
        let line = self
            .cursor
            .next_token()
            .map_or(self.cursor.last_line_number(), |token| token.line);

        if self.options.reject_trailing_tokens {
            return Err(ParseError::CountMismatch {
                section: Section::Candela,
                line,
                expected,
                found: expected + leftover,
            });
        }

        log::warn!("Ignoring {} trailing value(s) from line {}", leftover, line);
        Ok(())
    }
}

impl FromStr for IesRecord {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IesRecord::parse(s)
    }
}

impl IesRecord {
    /// Parse a complete LM-63 document with default options.
    pub fn parse(content: &str) -> ParseResult<Self> {
        IesParser::new(content).parse()
    }

    pub fn parse_with_options(content: &str, options: &ParseOptions) -> ParseResult<Self> {
        IesParser::with_options(content, options.clone()).parse()
    }
}

/// Parse an IES string into a record.
pub fn parse_ies(content: &str) -> ParseResult<IesRecord> {
    IesRecord::parse(content)
}

/// Parse a finite number; NaN and infinities are rejected.
fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn malformed(line: usize, index: usize, message: &str) -> ParseError {
    ParseError::MalformedHeader {
        line,
        field: PHOTOMETRIC_FIELDS[index],
        position: index + 1,
        message: message.to_string(),
    }
}

fn integer_field(line: usize, index: usize, value: f64) -> ParseResult<usize> {
    if value < 0.0 || value.fract() != 0.0 {
        return Err(malformed(line, index, "expected a non-negative integer"));
    }
    if value > usize::MAX as f64 {
        return Err(malformed(line, index, "too large"));
    }
    Ok(value as usize)
}

fn angle_count(line: usize, index: usize, value: f64) -> ParseResult<usize> {
    let count = integer_field(line, index, value)?;
    if count == 0 {
        return Err(malformed(line, index, "at least one angle is required"));
    }
    Ok(count)
}

fn check_ascending(section: Section, angles: &[f64]) -> ParseResult<()> {
    for (i, pair) in angles.windows(2).enumerate() {
        let (previous, value) = (pair[0], pair[1]);
        if value < previous {
            return Err(ParseError::UnorderedAngles {
                section,
                index: i + 1,
                previous,
                value,
            });
        }
        if value == previous {
            log::warn!("Duplicate {} value {} at index {}", section, value, i + 1);
        }
    }
    Ok(())
}
