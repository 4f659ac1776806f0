use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Non-text insert content.
///
/// On the wire an embed is a single-key object naming its format, e.g.
/// `{"image": "https://example.com/a.png"}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    pub name: String,
    pub value: Value,
}

impl Embed {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Serialize for Embed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Embed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(D::Error::custom(format!(
                "embed must be an object with exactly one key, got {}",
                map.len()
            )));
        }
        let (name, value) = map
            .into_iter()
            .next()
            .ok_or_else(|| D::Error::custom("embed object is empty"))?;
        Ok(Embed { name, value })
    }
}
