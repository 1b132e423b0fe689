//! Remembered sort order per table, stored next to the data.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::warn;

use crate::columns::Screen;
use crate::db::KvBackend;
use crate::query::{Field, MultiSort, SortKey, SortState};

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Stored<F> {
    One(SortKey<F>),
    Many(Vec<SortKey<F>>),
}

pub fn preference_key(table_id: &str) -> String {
    format!("table_preferences_{}", table_id)
}

pub struct TablePreferences {
    backend: Rc<dyn KvBackend>,
}

impl TablePreferences {
    pub fn new(backend: Rc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Stored sort keys for a screen, or the screen's default when nothing
    /// usable is stored.
    pub fn sort_keys<R>(&self) -> Vec<SortKey<R::Field>>
    where
        R: Screen,
        R::Field: DeserializeOwned,
    {
        let key = preference_key(R::TABLE_ID);
        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return R::default_sort(),
            Err(err) => {
                warn!(table = R::TABLE_ID, err = %format!("{:#}", err), "could not read sort preference");
                return R::default_sort();
            }
        };
        match serde_json::from_str::<Stored<R::Field>>(&raw) {
            Ok(Stored::One(key)) => vec![key],
            Ok(Stored::Many(keys)) => keys,
            Err(err) => {
                warn!(table = R::TABLE_ID, %err, "ignoring malformed sort preference");
                R::default_sort()
            }
        }
    }

    /// Applies a column selection to the remembered order and persists it.
    pub fn select<R>(&self, field: R::Field) -> Result<Vec<SortKey<R::Field>>>
    where
        R: Screen,
        R::Field: Serialize + DeserializeOwned,
    {
        let current = self.sort_keys::<R>();
        let stored = if R::MULTI_SORT {
            let mut sort = MultiSort::new(current);
            sort.select(field);
            Stored::Many(sort.keys)
        } else {
            let key = match current.first() {
                Some(&active) => {
                    let mut state = SortState::new(active);
                    state.select(field);
                    state.key
                }
                None => SortKey::new(field, field.default_direction()),
            };
            Stored::One(key)
        };
        self.write(R::TABLE_ID, &stored)?;
        Ok(match stored {
            Stored::One(key) => vec![key],
            Stored::Many(keys) => keys,
        })
    }

    /// Forgets the remembered order for a screen.
    pub fn reset<R>(&self) -> Result<()>
    where
        R: Screen,
        R::Field: Serialize,
    {
        let stored: Stored<R::Field> = Stored::Many(R::default_sort());
        self.write(R::TABLE_ID, &stored)
    }

    fn write<F: Serialize>(&self, table_id: &str, stored: &Stored<F>) -> Result<()> {
        let raw = serde_json::to_string(stored)
            .with_context(|| format!("Failed to serialize sort preference for '{}'", table_id))?;
        self.backend.set(&preference_key(table_id), &raw)
    }
}
