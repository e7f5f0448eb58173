//! Typed parameter values for clip-data change notifications.

use serde::{Deserialize, Serialize};

/// A single typed parameter value, as carried by `clip-data-changed` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Float(f32),
    Bool(bool),
    Text(String),
    Color([u8; 4]),
}

impl ParamValue {
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<[u8; 4]> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<[u8; 4]> for ParamValue {
    fn from(v: [u8; 4]) -> Self {
        Self::Color(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(ParamValue::Float(1.5).as_float(), Some(1.5));
        assert_eq!(ParamValue::Float(1.5).as_bool(), None);
        assert_eq!(ParamValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ParamValue::Text("hi".into()).as_text(), Some("hi"));
        assert_eq!(
            ParamValue::Color([1, 2, 3, 4]).as_color(),
            Some([1, 2, 3, 4])
        );
    }

    #[test]
    fn from_conversions() {
        assert_eq!(ParamValue::from(2.0f32), ParamValue::Float(2.0));
        assert_eq!(ParamValue::from(false), ParamValue::Bool(false));
        assert_eq!(ParamValue::from("x"), ParamValue::Text("x".into()));
    }
}
