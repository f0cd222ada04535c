//! `#[serde(with = "infinity")]` for `f32` fields: infinite values are written as the strings
//! `"Infinity"` / `"-Infinity"`, which JSON has no number for.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

const POS: &str = "Infinity";
const NEG: &str = "-Infinity";

pub(super) fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    if *value == f32::INFINITY {
        serializer.serialize_str(POS)
    } else if *value == f32::NEG_INFINITY {
        serializer.serialize_str(NEG)
    } else {
        serializer.serialize_f32(*value)
    }
}

pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    deserializer.deserialize_any(FloatOrToken)
}

struct FloatOrToken;

impl Visitor<'_> for FloatOrToken {
    type Value = f32;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a number, {POS:?} or {NEG:?}")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f32, E> {
        Ok(v as f32)
    }

    fn visit_f32<E: de::Error>(self, v: f32) -> Result<f32, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f32, E> {
        Ok(v as f32)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f32, E> {
        Ok(v as f32)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f32, E> {
        match v {
            POS => Ok(f32::INFINITY),
            NEG => Ok(f32::NEG_INFINITY),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}
