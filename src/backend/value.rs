use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use zbus::zvariant::Value;

pub type Metadata = BTreeMap<String, PlainValue>;

#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlainValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    String(String),
    List(Vec<PlainValue>),
    Map(BTreeMap<String, PlainValue>),
    #[serde(serialize_with = "serialize_opaque")]
    Opaque(Value<'static>),
}

impl PlainValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::UInt(_) => "integer",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Opaque(_) => "opaque value",
        }
    }
}

fn serialize_opaque<S: Serializer>(
    value: &Value<'static>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Bare(value).serialize(serializer)
}

/// Serializes a wire value without its signature envelope.
struct Bare<'a>(&'a Value<'a>);

impl Serialize for Bare<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Value(inner) => Bare(&**inner).serialize(serializer),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::U8(n) => serializer.serialize_u8(*n),
            Value::U16(n) => serializer.serialize_u16(*n),
            Value::U32(n) => serializer.serialize_u32(*n),
            Value::U64(n) => serializer.serialize_u64(*n),
            Value::I16(n) => serializer.serialize_i16(*n),
            Value::I32(n) => serializer.serialize_i32(*n),
            Value::I64(n) => serializer.serialize_i64(*n),
            Value::F64(n) => serializer.serialize_f64(*n),
            Value::Str(s) => serializer.serialize_str(s.as_str()),
            Value::ObjectPath(path) => serializer.serialize_str(path.as_str()),
            Value::Signature(signature) => serializer.serialize_str(signature.as_str()),
            Value::Array(array) => serializer.collect_seq(array.inner().iter().map(Bare)),
            Value::Structure(structure) => {
                serializer.collect_seq(structure.fields().iter().map(Bare))
            }
            Value::Dict(dict) => {
                serializer.collect_map(dict.iter().map(|(key, entry)| (Bare(key), Bare(entry))))
            }
            other => serializer.serialize_str(&other.value_signature().to_string()),
        }
    }
}

pub fn strip_namespaces(metadata: BTreeMap<String, PlainValue>) -> Metadata {
    metadata
        .into_iter()
        .map(|(key, value)| match key.rsplit_once(':') {
            Some((_, stripped)) => (stripped.to_owned(), value),
            None => (key, value),
        })
        .collect()
}
