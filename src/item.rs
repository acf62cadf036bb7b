// Checkable item trait and a generic record type

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Core trait that any item held by a `CheckList` must implement
pub trait Checkable: Clone {
    /// Identifier type, compared by equality
    type Id: PartialEq + Clone + Debug;

    /// Identifier of this item, assumed unique within a list
    fn id(&self) -> &Self::Id;

    /// Raw checked flag; `None` is treated as unchecked
    fn checked(&self) -> Option<bool>;

    /// Copy of this item with the checked flag replaced.
    /// Every other field must be carried over unchanged.
    fn with_checked(&self, checked: bool) -> Self;

    /// Checked flag with `None` read as `false`
    fn is_checked(&self) -> bool {
        self.checked().unwrap_or(false)
    }
}

/// Ready-made item: id, optional checked flag, and caller-owned fields
///
/// With `D = serde_json::Map<String, Value>` any extra JSON fields are
/// flattened into `data` and written back out verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckItem<I, D> {
    pub id: I,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(flatten)]
    pub data: D,
}

impl<I, D> CheckItem<I, D> {
    pub fn new(id: I, checked: Option<bool>, data: D) -> Self {
        Self { id, checked, data }
    }
}

impl<I, D> Checkable for CheckItem<I, D>
where
    I: PartialEq + Clone + Debug,
    D: Clone,
{
    type Id = I;

    fn id(&self) -> &I {
        &self.id
    }

    fn checked(&self) -> Option<bool> {
        self.checked
    }

    fn with_checked(&self, checked: bool) -> Self {
        Self {
            id: self.id.clone(),
            checked: Some(checked),
            data: self.data.clone(),
        }
    }
}

/// Identifier that is either an integer or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl ItemId {
    /// Ids a command-line token may refer to: the literal string first,
    /// then the integer it parses as, if any
    pub fn candidates(token: &str) -> Vec<Self> {
        let mut ids = vec![ItemId::Str(token.to_string())];
        if let Ok(i) = token.parse::<i64>() {
            ids.push(ItemId::Int(i));
        }
        ids
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Int(i) => write!(f, "{}", i),
            ItemId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(i: i64) -> Self {
        ItemId::Int(i)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Str(s.to_string())
    }
}
