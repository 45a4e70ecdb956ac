//! Favorite conversions

use std::sync::Arc;

use metra_core::{ConversionKind, ConvertError};
use serde::{Deserialize, Serialize};

use crate::store::{read_list, write_list, KeyValueStore};

pub const FAVORITES_KEY: &str = "unit-converter-favorites";

/// A saved unit pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(rename = "type")]
    pub kind: ConversionKind,
    pub from_unit: String,
    pub to_unit: String,
}

impl Favorite {
    pub fn new(kind: ConversionKind, from_unit: &str, to_unit: &str) -> Self {
        Favorite {
            kind,
            from_unit: from_unit.to_string(),
            to_unit: to_unit.to_string(),
        }
    }

    fn same_pair(&self, other: &Favorite) -> bool {
        self.kind == other.kind && self.from_unit == other.from_unit && self.to_unit == other.to_unit
    }
}

/// Favorites list, in insertion order
#[derive(Clone)]
pub struct Favorites {
    store: Arc<dyn KeyValueStore>,
}

impl Favorites {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Favorite>, ConvertError> {
        read_list(self.store.as_ref(), FAVORITES_KEY)
    }

    /// Append `favorite`. Returns `false` when the same pair is already saved.
    pub fn add(&self, favorite: Favorite) -> Result<bool, ConvertError> {
        let mut favorites = self.list()?;
        if favorites.iter().any(|f| f.same_pair(&favorite)) {
            return Ok(false);
        }
        favorites.push(favorite);
        write_list(self.store.as_ref(), FAVORITES_KEY, &favorites)?;
        Ok(true)
    }

    /// Remove the favorite at `index`. Returns `false` when out of range.
    pub fn remove(&self, index: usize) -> Result<bool, ConvertError> {
        let mut favorites = self.list()?;
        if index >= favorites.len() {
            return Ok(false);
        }
        favorites.remove(index);
        write_list(self.store.as_ref(), FAVORITES_KEY, &favorites)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), ConvertError> {
        write_list::<Favorite>(self.store.as_ref(), FAVORITES_KEY, &[])
    }
}
