//! Photometric record types.
//!
//! These types are produced once by the parser and are read-only afterwards.
//! Downstream renderers consume them through shared references.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A parsed LM-63 document.
///
/// A record is only ever returned fully built: the angle arrays match the
/// declared counts and the matrix has one row per horizontal angle, each
/// holding one value per vertical angle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IesRecord {
    version: String,
    keywords: Keywords,
    tilt: Tilt,
    properties: Properties,
    matrix: Vec<Vec<f64>>,
}

impl IesRecord {
    pub(crate) fn new(
        version: String,
        keywords: Keywords,
        tilt: Tilt,
        properties: Properties,
        matrix: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            version,
            keywords,
            tilt,
            properties,
            matrix,
        }
    }

    /// First line of the document, verbatim (e.g. `IESNA:LM-63-2002`).
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Keyword section in first-seen order.
    pub fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// Case-insensitive keyword lookup.
    pub fn keyword(&self, name: &str) -> Option<&str> {
        self.keywords.get(name)
    }

    pub fn tilt(&self) -> &Tilt {
        &self.tilt
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Candela values `[horizontal_index][vertical_index]`, multiplier applied.
    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.matrix
    }
}

/// Keyword section: lower-cased keys mapped to their text.
///
/// A repeated key appends its value after a newline. Serialized as an
/// object whose keys keep first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Keywords {
    entries: Vec<(String, String)>,
}

impl Keywords {
    /// Insert a value, or append it to an existing key's value.
    pub fn append(&mut self, key: &str, value: &str) {
        let key = key.to_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                existing.push('\n');
                existing.push_str(value);
            }
            None => self.entries.push((key, value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for Keywords {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Keywords {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeywordsVisitor;

        impl<'de> Visitor<'de> for KeywordsVisitor {
            type Value = Keywords;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of keyword names to text")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut keywords = Keywords::default();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    keywords.append(&key, &value);
                }
                Ok(keywords)
            }
        }

        deserializer.deserialize_map(KeywordsVisitor)
    }
}

/// The `TILT=` directive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tilt {
    /// `TILT=NONE`: output does not vary with tilt angle
    None,

    /// `TILT=INCLUDE`: a tilt block follows in this file (skipped, not interpreted)
    Include,

    /// `TILT=<filename>`: tilt data lives in a separate file
    External(String),
}

impl Tilt {
    /// Classify the text following `TILT=`.
    pub fn from_directive(value: &str) -> Self {
        match value {
            "NONE" => Tilt::None,
            "INCLUDE" => Tilt::Include,
            other => Tilt::External(other.to_string()),
        }
    }
}

/// Goniophotometer geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotometricType {
    TypeC = 1,
    TypeB = 2,
    TypeA = 3,
}

impl PhotometricType {
    pub fn from_code(code: f64) -> Option<Self> {
        match code {
            c if c == 1.0 => Some(Self::TypeC),
            c if c == 2.0 => Some(Self::TypeB),
            c if c == 3.0 => Some(Self::TypeA),
            _ => None,
        }
    }
}

/// Units of the luminous opening dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitsType {
    Feet = 1,
    Meters = 2,
}

impl UnitsType {
    pub fn from_code(code: f64) -> Option<Self> {
        match code {
            c if c == 1.0 => Some(Self::Feet),
            c if c == 2.0 => Some(Self::Meters),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitsType::Feet => "feet",
            UnitsType::Meters => "meters",
        }
    }
}

/// Rough luminaire shape, guessed from the opening's aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LuminaireType {
    Panel,
    Spot,
}

impl LuminaireType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LuminaireType::Panel => "panel",
            LuminaireType::Spot => "spot",
        }
    }
}

/// Scalar and derived photometric properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    /// Number of lamps in the luminaire
    pub lamps: u32,

    /// Rated lumens per lamp; `-1` marks absolute photometry
    pub lumens_per_lamp: f64,

    /// Factor already applied to every value in the matrix
    pub candela_multiplier: f64,

    pub total_vertical_angles: usize,

    pub total_horizontal_angles: usize,

    pub photometric_type: PhotometricType,

    pub units_type: UnitsType,

    /// Luminous opening width (absolute value)
    pub width: f64,

    /// Luminous opening length (absolute value)
    pub length: f64,

    /// Luminous opening height (absolute value)
    pub height: f64,

    /// Not applied to the matrix; consumers multiply by it at application time
    pub ballast_factor: f64,

    /// Expected to be 1; LM-63-2019 stores a file generation code here
    pub future_use: f64,

    pub input_watts: f64,

    /// Vertical angles in degrees, ascending
    pub vertical_angles: Vec<f64>,

    /// Horizontal angles in degrees, ascending
    pub horizontal_angles: Vec<f64>,

    /// Kelvin value found in the document text, if any (heuristic)
    pub color_temperature: Option<u32>,

    /// Shape guess from width/length (heuristic)
    pub luminaire_type: LuminaireType,

    /// Largest value in the matrix
    pub peak_value: f64,
}

impl Properties {
    /// Unit label for the dimensions.
    pub fn unit(&self) -> &'static str {
        self.units_type.label()
    }

    /// Total rated lamp lumens, or `None` for absolute photometry.
    pub fn rated_lumens(&self) -> Option<f64> {
        if self.lumens_per_lamp < 0.0 {
            None
        } else {
            Some(f64::from(self.lamps) * self.lumens_per_lamp)
        }
    }

    /// Ballast factor, defaulting to 1.0 when the file does not give a usable one.
    pub fn effective_ballast_factor(&self) -> f64 {
        if self.ballast_factor > 0.0 {
            self.ballast_factor
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties() -> Properties {
        Properties {
            lamps: 2,
            lumens_per_lamp: 1500.0,
            candela_multiplier: 1.0,
            total_vertical_angles: 0,
            total_horizontal_angles: 0,
            photometric_type: PhotometricType::TypeC,
            units_type: UnitsType::Meters,
            width: 0.6,
            length: 0.6,
            height: 0.0,
            ballast_factor: 1.0,
            future_use: 1.0,
            input_watts: 36.0,
            vertical_angles: Vec::new(),
            horizontal_angles: Vec::new(),
            color_temperature: None,
            luminaire_type: LuminaireType::Spot,
            peak_value: 0.0,
        }
    }

    #[test]
    fn test_keywords_append_and_order() {
        let mut keywords = Keywords::default();
        keywords.append("TEST", "42");
        keywords.append("Luminaire", "Panel 600");
        keywords.append("LUMINAIRE", "opal diffuser");

        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords.get("luminaire"), Some("Panel 600\nopal diffuser"));
        assert_eq!(keywords.get("Test"), Some("42"));
        assert_eq!(keywords.get("manufac"), None);

        let keys: Vec<_> = keywords.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["test", "luminaire"]);
    }

    #[test]
    fn test_keywords_serialize_as_ordered_map() {
        let mut keywords = Keywords::default();
        keywords.append("TEST", "1");
        keywords.append("MANUFAC", "Lux");
        keywords.append("Test", "2");

        let json = serde_json::to_string(&keywords).unwrap();
        assert_eq!(json, r#"{"test":"1\n2","manufac":"Lux"}"#);

        let back: Keywords = serde_json::from_str(&json).unwrap();
        assert_eq!(back, keywords);
    }

    #[test]
    fn test_keywords_append_to_empty_value() {
        let mut keywords = Keywords::default();
        keywords.append("MORE", "");
        keywords.append("MORE", "text");
        assert_eq!(keywords.get("more"), Some("\ntext"));
    }

    #[test]
    fn test_tilt_from_directive() {
        assert_eq!(Tilt::from_directive("NONE"), Tilt::None);
        assert_eq!(Tilt::from_directive("INCLUDE"), Tilt::Include);
        assert_eq!(
            Tilt::from_directive("MH100V.TLT"),
            Tilt::External("MH100V.TLT".to_string())
        );
        // Exact match only
        assert_eq!(
            Tilt::from_directive("none"),
            Tilt::External("none".to_string())
        );
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(PhotometricType::from_code(1.0), Some(PhotometricType::TypeC));
        assert_eq!(PhotometricType::from_code(3.0), Some(PhotometricType::TypeA));
        assert_eq!(PhotometricType::from_code(1.5), None);
        assert_eq!(UnitsType::from_code(1.0), Some(UnitsType::Feet));
        assert_eq!(UnitsType::from_code(2.0).map(|u| u.label()), Some("meters"));
        assert_eq!(UnitsType::from_code(0.0), None);
    }

    #[test]
    fn test_rated_lumens() {
        let mut props = properties();
        assert_eq!(props.rated_lumens(), Some(3000.0));
        assert_eq!(props.unit(), "meters");

        props.lumens_per_lamp = -1.0;
        assert_eq!(props.rated_lumens(), None);
    }

    #[test]
    fn test_effective_ballast_factor() {
        let mut props = properties();
        props.ballast_factor = 0.95;
        assert_eq!(props.effective_ballast_factor(), 0.95);

        props.ballast_factor = 0.0;
        assert_eq!(props.effective_ballast_factor(), 1.0);
    }
}
