//! Interaction data model
//!
//! Users and products are opaque string identifiers compared by exact match.
//! Product sets are ordered so iteration (and therefore any output derived from
//! it) is reproducible.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

pub type UserId = String;
pub type ProductId = String;
pub type ProductSet = BTreeSet<ProductId>;

/// Snapshot of every user's interacted products
///
/// Fetched fresh for each recommendation request and treated as read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionTable {
    users: HashMap<UserId, ProductSet>,
}

impl InteractionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful in tests and fixtures
    pub fn with_user<I, P>(mut self, user_id: impl Into<UserId>, products: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ProductId>,
    {
        self.insert(user_id, products);
        self
    }

    /// Insert or replace a user's product set
    pub fn insert<I, P>(&mut self, user_id: impl Into<UserId>, products: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<ProductId>,
    {
        self.users
            .insert(user_id.into(), products.into_iter().map(Into::into).collect());
    }

    pub fn products(&self, user_id: &str) -> Option<&ProductSet> {
        self.users.get(user_id)
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    /// Number of users in the snapshot
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &ProductSet)> {
        self.users.iter()
    }

    /// Decode a Realtime Database payload shaped `{user_id: {product_id: metadata}}`
    ///
    /// Only key presence is consulted; the metadata values are ignored. `null`
    /// (node absent) decodes to an empty table. Firebase returns objects whose keys
    /// are small sequential integers as JSON arrays, so arrays are accepted at both
    /// levels with the non-null indices used as identifiers. A user whose value is
    /// a scalar has no products.
    pub fn from_firebase_value(value: Value) -> Result<Self, String> {
        let entries: Vec<(String, Value)> = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(map) => map.into_iter().collect(),
            Value::Array(items) => indexed_entries(items),
            other => {
                return Err(format!(
                    "expected an object of users, found {}",
                    json_kind(&other)
                ))
            }
        };

        let users = entries
            .into_iter()
            .map(|(user_id, products)| {
                let product_ids: ProductSet = match products {
                    Value::Object(map) => map.into_iter().map(|(product_id, _)| product_id).collect(),
                    Value::Array(items) => indexed_entries(items)
                        .into_iter()
                        .map(|(product_id, _)| product_id)
                        .collect(),
                    _ => ProductSet::new(),
                };
                (user_id, product_ids)
            })
            .collect();

        Ok(Self { users })
    }
}

impl FromIterator<(UserId, ProductSet)> for InteractionTable {
    fn from_iter<T: IntoIterator<Item = (UserId, ProductSet)>>(iter: T) -> Self {
        Self {
            users: iter.into_iter().collect(),
        }
    }
}

fn indexed_entries(items: Vec<Value>) -> Vec<(String, Value)> {
    items
        .into_iter()
        .enumerate()
        .filter(|(_, item)| !item.is_null())
        .map(|(index, item)| (index.to_string(), item))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Successful recommendation payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Product identifiers, best first
    pub recommended_products: Vec<ProductId>,
}
