use serde::{Deserialize, Serialize};

/// Persisted overlay document: a base image plus overlay elements positioned in percentages of
/// the base image size.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayDocument {
    /// Source of the base image, if any.
    #[serde(default)]
    pub base_image: Option<String>,
    /// Overlays in paint order.
    #[serde(default)]
    pub elements: Vec<ElementDef>,
}

impl OverlayDocument {
    /// Parse a document from JSON text.
    pub fn from_json_str(s: &str) -> crate::PictexResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a document from any reader.
    pub fn from_reader(r: impl std::io::Read) -> crate::PictexResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| crate::PictexError::serde(format!("overlay document: {e}")))
    }

    /// Read a document from a JSON file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> crate::PictexResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            crate::PictexError::validation(format!("open '{}': {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> crate::PictexResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One overlay element. Text-only and image-only fields are omitted for the other kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementDef {
    /// `"text"` or `"image"`; other kinds are skipped on import.
    #[serde(rename = "type")]
    pub kind: String,
    /// Left edge, relative to the base width.
    #[serde(default)]
    pub x: Dim,
    /// Top edge, relative to the base height.
    #[serde(default)]
    pub y: Dim,
    /// Padding in pixels.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub padding: f64,
    /// Corner radius in pixels.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub border_radius: f64,
    /// Solid color string or gradient.
    #[serde(default)]
    pub background: Option<BackgroundDef>,
    /// First shadow: glyph shadow for text, box shadow for images.
    #[serde(default)]
    pub shadow: Option<ShadowDef>,

    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Font size, relative to the base height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dim>,
    /// Font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Image source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Image width, relative to the base width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dim>,
    /// Image height, relative to the base height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dim>,
}

/// Background as written in overlay documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackgroundDef {
    /// `{"type": "linear_gradient", "colors": [...]}`.
    Gradient {
        /// Always `"linear_gradient"`.
        #[serde(rename = "type")]
        kind: String,
        /// Color strings, evenly spaced.
        #[serde(default)]
        colors: Vec<String>,
    },
    /// A color string.
    Solid(String),
}

/// Shadow as written in overlay documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShadowDef {
    /// Blur radius in pixels.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub blur: f64,
    /// Color string; black when missing.
    #[serde(default)]
    pub color: Option<String>,
    /// `[dx, dy]` in pixels; `[2, 2]` when missing.
    #[serde(default)]
    pub offset: Option<[f64; 2]>,
}

/// Dimension that is either a percentage of a base length or raw pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Dim {
    /// `"12.5%"`: a percentage of the relevant base dimension.
    Percent(f64),
    /// A bare number (or numeric string) in pixels.
    Px(f64),
}

impl Default for Dim {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl Dim {
    /// Pixels for a base length of `base`.
    pub fn resolve(self, base: f64) -> f64 {
        match self {
            Self::Percent(p) => p / 100.0 * base,
            Self::Px(v) => v,
        }
    }

    /// Percentage of `base` that `px` represents. A zero base yields `0%`.
    pub fn percent_of(px: f64, base: f64) -> Self {
        if base == 0.0 || !base.is_finite() {
            return Self::Percent(0.0);
        }
        Self::Percent(px / base * 100.0)
    }

    /// Parse the document string form. Numeric garbage degrades to `0px`.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        match t.strip_suffix('%') {
            Some(num) => Self::Percent(parse_float_prefix(num).unwrap_or(0.0)),
            None => Self::Px(parse_float_prefix(t).unwrap_or(0.0)),
        }
    }
}

impl Serialize for Dim {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match *self {
            Self::Percent(p) => serializer.serialize_str(&format!("{p:.2}%")),
            Self::Px(v) => serializer.serialize_f64(v),
        }
    }
}

impl<'de> Deserialize<'de> for Dim {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Self::parse(&s),
            serde_json::Value::Number(n) => Self::Px(n.as_f64().unwrap_or(0.0)),
            _ => Self::Px(0.0),
        })
    }
}

/// Numbers, numeric strings, `null`, or anything else (as `0`).
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => parse_float_prefix(&s).unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Parse the longest leading decimal number in `s`, ignoring leading whitespace and any trailing
/// text (`"12.5px"` is `12.5`).
pub(crate) fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let b = s.as_bytes();
    let mut end = 0;
    if end < b.len() && (b[end] == b'+' || b[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < b.len() && b[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < b.len() && b[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            end = j;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < b.len() && (b[end] == b'e' || b[end] == b'E') {
        let mut j = end + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
