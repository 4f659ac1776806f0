use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::embed::Embed;

/// Attribute name → value, in insertion order.
pub type AttributeMap = Map<String, Value>;

/// Content of an `insert` op: a text run or a single embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InsertContent {
    Text(String),
    Embed(Embed),
}

/// A single Delta operation.
///
/// Wire shape:
/// - `{"insert": "text" | {"<embed>": value}, "attributes"?: {...}}`
/// - `{"retain": n, "attributes"?: {...}}`
/// - `{"delete": n}`
///
/// `attributes` is never written when absent. An empty attribute set is
/// represented by `None`, not by an empty map.
///
/// Reading rejects objects that name none or several of `insert`, `retain`
/// and `delete`, and `delete` ops that carry attributes. Other keys are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Op {
    Insert {
        insert: InsertContent,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attributes: Option<AttributeMap>,
    },
    Retain {
        retain: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attributes: Option<AttributeMap>,
    },
    Delete {
        delete: u64,
    },
}

const OP_KINDS: [&str; 3] = ["insert", "retain", "delete"];

impl<'de> Deserialize<'de> for Op {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        let kinds: Vec<&str> = OP_KINDS
            .into_iter()
            .filter(|k| map.contains_key(*k))
            .collect();
        let attributes = match map.remove("attributes") {
            None | Some(Value::Null) => None,
            Some(v) => Some(AttributeMap::deserialize(v).map_err(D::Error::custom)?),
        };
        let mut field = |key: &str| map.remove(key).unwrap_or(Value::Null);

        match kinds.as_slice() {
            ["insert"] => Ok(Op::Insert {
                insert: InsertContent::deserialize(field("insert")).map_err(D::Error::custom)?,
                attributes,
            }),
            ["retain"] => Ok(Op::Retain {
                retain: u64::deserialize(field("retain")).map_err(D::Error::custom)?,
                attributes,
            }),
            ["delete"] if attributes.is_some() => {
                Err(D::Error::custom("delete ops carry no attributes"))
            }
            ["delete"] => Ok(Op::Delete {
                delete: u64::deserialize(field("delete")).map_err(D::Error::custom)?,
            }),
            [] => Err(D::Error::custom(
                "op has none of 'insert', 'retain', 'delete'",
            )),
            many => Err(D::Error::custom(format!(
                "op has more than one of {}",
                many.join(", ")
            ))),
        }
    }
}

impl Op {
    pub fn text(text: impl Into<String>, attributes: Option<AttributeMap>) -> Self {
        Op::Insert {
            insert: InsertContent::Text(text.into()),
            attributes,
        }
    }

    pub fn embed(name: impl Into<String>, value: Value, attributes: Option<AttributeMap>) -> Self {
        Op::Insert {
            insert: InsertContent::Embed(Embed::new(name, value)),
            attributes,
        }
    }

    pub fn attributes(&self) -> Option<&AttributeMap> {
        match self {
            Op::Insert { attributes, .. } | Op::Retain { attributes, .. } => attributes.as_ref(),
            Op::Delete { .. } => None,
        }
    }

    /// Same op with its attributes replaced. `delete` ops carry no attributes
    /// and are returned unchanged.
    pub fn with_attributes(&self, attributes: Option<AttributeMap>) -> Op {
        match self {
            Op::Insert { insert, .. } => Op::Insert {
                insert: insert.clone(),
                attributes,
            },
            Op::Retain { retain, .. } => Op::Retain {
                retain: *retain,
                attributes,
            },
            Op::Delete { delete } => Op::Delete { delete: *delete },
        }
    }

    pub fn as_embed(&self) -> Option<&Embed> {
        match self {
            Op::Insert {
                insert: InsertContent::Embed(embed),
                ..
            } => Some(embed),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Op::Insert {
                insert: InsertContent::Text(text),
                ..
            } => Some(text),
            _ => None,
        }
    }

    /// Document length covered by this op: characters for text, 1 for an embed.
    pub fn len(&self) -> u64 {
        match self {
            Op::Insert {
                insert: InsertContent::Text(text),
                ..
            } => text.chars().count() as u64,
            Op::Insert {
                insert: InsertContent::Embed(_),
                ..
            } => 1,
            Op::Retain { retain, .. } => *retain,
            Op::Delete { delete } => *delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An ordered sequence of ops. Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Delta {
    pub ops: Vec<Op>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ops(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    pub fn push(mut self, op: Op) -> Self {
        self.ops.push(op);
        self
    }

    pub fn insert(self, text: impl Into<String>) -> Self {
        self.push(Op::text(text, None))
    }

    pub fn insert_with(self, text: impl Into<String>, attributes: AttributeMap) -> Self {
        self.push(Op::text(text, Some(attributes)))
    }

    pub fn insert_embed(self, name: impl Into<String>, value: Value) -> Self {
        self.push(Op::embed(name, value, None))
    }

    pub fn insert_embed_with(
        self,
        name: impl Into<String>,
        value: Value,
        attributes: AttributeMap,
    ) -> Self {
        self.push(Op::embed(name, value, Some(attributes)))
    }

    pub fn retain(self, length: u64) -> Self {
        self.push(Op::Retain {
            retain: length,
            attributes: None,
        })
    }

    pub fn retain_with(self, length: u64, attributes: AttributeMap) -> Self {
        self.push(Op::Retain {
            retain: length,
            attributes: Some(attributes),
        })
    }

    pub fn delete(self, length: u64) -> Self {
        self.push(Op::Delete { delete: length })
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl From<Vec<Op>> for Delta {
    fn from(ops: Vec<Op>) -> Self {
        Self { ops }
    }
}

/// Deep structural copy of a Delta.
///
/// The result owns fresh op values and attribute maps; editing the copy can
/// never be observed through the source.
pub fn clone_delta(delta: &Delta) -> Delta {
    Delta {
        ops: delta.ops.iter().map(clone_op).collect(),
    }
}

fn clone_op(op: &Op) -> Op {
    match op {
        Op::Insert { insert, attributes } => Op::Insert {
            insert: match insert {
                InsertContent::Text(text) => InsertContent::Text(text.clone()),
                InsertContent::Embed(embed) => {
                    InsertContent::Embed(Embed::new(embed.name.clone(), embed.value.clone()))
                }
            },
            attributes: attributes.as_ref().map(clone_attributes),
        },
        Op::Retain { retain, attributes } => Op::Retain {
            retain: *retain,
            attributes: attributes.as_ref().map(clone_attributes),
        },
        Op::Delete { delete } => Op::Delete { delete: *delete },
    }
}

fn clone_attributes(attributes: &AttributeMap) -> AttributeMap {
    attributes
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
