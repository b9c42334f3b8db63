use crate::backend::PlainValue;
use std::collections::BTreeMap;
use zbus::zvariant::Value;

/// Unboxes variants and collapses integer widths. Signatures, fds and dicts
/// with non-string keys are kept opaque.
pub fn normalize(value: &Value<'_>) -> PlainValue {
    match value {
        Value::Value(inner) => normalize(inner),
        Value::Bool(b) => PlainValue::Bool(*b),
        Value::U8(n) => PlainValue::UInt(u64::from(*n)),
        Value::U16(n) => PlainValue::UInt(u64::from(*n)),
        Value::U32(n) => PlainValue::UInt(u64::from(*n)),
        Value::U64(n) => PlainValue::UInt(*n),
        Value::I16(n) => PlainValue::Int(i64::from(*n)),
        Value::I32(n) => PlainValue::Int(i64::from(*n)),
        Value::I64(n) => PlainValue::Int(*n),
        Value::F64(n) => PlainValue::Double(*n),
        Value::Str(s) => PlainValue::String(s.as_str().to_owned()),
        Value::ObjectPath(path) => PlainValue::String(path.as_str().to_owned()),
        Value::Array(array) => PlainValue::List(array.inner().iter().map(normalize).collect()),
        Value::Structure(structure) => {
            PlainValue::List(structure.fields().iter().map(normalize).collect())
        }
        Value::Dict(dict) => {
            let mut map = BTreeMap::new();
            for (key, entry) in dict.iter() {
                match normalize(key) {
                    PlainValue::String(key) => {
                        map.insert(key, normalize(entry));
                    }
                    _ => return opaque(value),
                }
            }
            PlainValue::Map(map)
        }
        other => opaque(other),
    }
}

pub fn normalize_map(value: &Value<'_>) -> Option<BTreeMap<String, PlainValue>> {
    match normalize(value) {
        PlainValue::Map(map) => Some(map),
        _ => None,
    }
}

fn opaque(value: &Value<'_>) -> PlainValue {
    match value.try_to_owned() {
        Ok(owned) => PlainValue::Opaque(owned.into()),
        // only fds can fail to duplicate; report their signature instead
        Err(_) => PlainValue::String(value.value_signature().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use zbus::zvariant::{Signature, Structure};

    fn boxed(value: Value<'static>) -> Value<'static> {
        Value::Value(Box::new(value))
    }

    #[test]
    fn unboxes_nested_containers() {
        let inner = Value::from(HashMap::from([
            ("count", boxed(Value::U32(42))),
            ("ratio", boxed(Value::F64(0.75))),
            ("name", boxed(Value::from("song"))),
        ]));
        let wire = boxed(Value::from(vec![boxed(inner)]));

        let expected = PlainValue::List(vec![PlainValue::Map(BTreeMap::from([
            ("count".to_owned(), PlainValue::UInt(42)),
            ("ratio".to_owned(), PlainValue::Double(0.75)),
            ("name".to_owned(), PlainValue::String("song".to_owned())),
        ]))]);
        assert_eq!(normalize(&wire), expected);
    }

    #[test]
    fn scalars() {
        assert_eq!(normalize(&Value::Bool(true)), PlainValue::Bool(true));
        assert_eq!(normalize(&Value::U8(7)), PlainValue::UInt(7));
        assert_eq!(normalize(&Value::U16(7)), PlainValue::UInt(7));
        assert_eq!(normalize(&Value::U64(u64::MAX)), PlainValue::UInt(u64::MAX));
        assert_eq!(normalize(&Value::I16(-7)), PlainValue::Int(-7));
        assert_eq!(normalize(&Value::I32(-7)), PlainValue::Int(-7));
        assert_eq!(normalize(&Value::I64(i64::MIN)), PlainValue::Int(i64::MIN));
        assert_eq!(normalize(&Value::F64(-1.5)), PlainValue::Double(-1.5));
        assert_eq!(
            normalize(&Value::from(zbus::zvariant::ObjectPath::try_from("/org/mpris/1").unwrap())),
            PlainValue::String("/org/mpris/1".to_owned())
        );
    }

    #[test]
    fn structures_become_lists() {
        let wire = Value::from(Structure::from((1u32, "x", true)));
        assert_eq!(
            normalize(&wire),
            PlainValue::List(vec![
                PlainValue::UInt(1),
                PlainValue::String("x".to_owned()),
                PlainValue::Bool(true),
            ])
        );
    }

    #[test]
    fn unknown_types_pass_through() {
        let signature = Value::from(Signature::from_static_str_unchecked("as"));
        assert!(matches!(
            normalize(&signature),
            PlainValue::Opaque(Value::Signature(ref s)) if s.as_str() == "as"
        ));

        let int_keyed = Value::from(HashMap::from([(1u32, "one")]));
        assert!(matches!(normalize(&int_keyed), PlainValue::Opaque(Value::Dict(_))));
    }

    #[test]
    fn normalize_map_rejects_non_maps() {
        assert!(normalize_map(&Value::U32(1)).is_none());
        let map = normalize_map(&Value::from(HashMap::from([("k", "v")]))).unwrap();
        assert_eq!(map["k"], PlainValue::String("v".to_owned()));
    }
}
