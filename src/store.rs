use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::db::KvBackend;
use crate::defaults;
use crate::models::{Application, Category, Company, Contact, Reflection, TagList, Task};

/// A collection that lives under one backend key.
pub trait Persisted: Serialize + DeserializeOwned + Clone {
    const KEY: &'static str;

    /// Built-in collection used when nothing usable is stored.
    fn fallback(backend: &dyn KvBackend) -> Self;

    /// Repairs derived fields after a successful parse.
    fn normalize(self) -> Self {
        self
    }
}

impl Persisted for Vec<Application> {
    const KEY: &'static str = "applications";

    fn fallback(_: &dyn KvBackend) -> Self {
        defaults::applications()
    }
}

impl Persisted for Vec<Task> {
    const KEY: &'static str = "tasks";

    fn fallback(_: &dyn KvBackend) -> Self {
        defaults::tasks()
    }

    fn normalize(self) -> Self {
        self.into_iter().map(Task::normalized).collect()
    }
}

impl Persisted for Vec<Company> {
    const KEY: &'static str = "target-companies";

    fn fallback(_: &dyn KvBackend) -> Self {
        defaults::companies()
    }

    fn normalize(self) -> Self {
        self.into_iter().map(Company::rescored).collect()
    }
}

impl Persisted for Vec<Contact> {
    const KEY: &'static str = "contacts";

    fn fallback(_: &dyn KvBackend) -> Self {
        defaults::contacts()
    }
}

impl Persisted for Vec<Category> {
    const KEY: &'static str = "categories";

    fn fallback(_: &dyn KvBackend) -> Self {
        defaults::categories()
    }
}

impl Persisted for Reflection {
    const KEY: &'static str = "reflection";

    /// Older data kept each list under its own key; read whatever of it parses.
    fn fallback(backend: &dyn KvBackend) -> Self {
        fn legacy<T: DeserializeOwned>(backend: &dyn KvBackend, key: &str, default: fn() -> T) -> T {
            match backend.get(key) {
                Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                    warn!(key, %err, "ignoring malformed legacy reflection data");
                    default()
                }),
                _ => default(),
            }
        }

        Reflection {
            strengths: legacy(backend, TagList::Strengths.label(), defaults::strengths),
            values: legacy(backend, TagList::Values.label(), defaults::values),
            industries: legacy(backend, TagList::Industries.label(), defaults::industries),
            roles: legacy(backend, TagList::Roles.label(), defaults::roles),
            intersections: legacy(backend, TagList::Intersections.label(), defaults::intersections),
            story_sections: legacy(backend, "storySections", defaults::story_sections),
        }
        .normalized()
    }

    fn normalize(self) -> Self {
        self.normalized()
    }
}

/// Owner of one collection's in-memory state and its persistence round-trip.
///
/// Single writer, single reader. Every [`Store::replace`] serializes and
/// writes the whole collection once.
pub struct Store<T: Persisted> {
    backend: Rc<dyn KvBackend>,
    items: RefCell<T>,
}

impl<T: Persisted> Store<T> {
    /// Hydrates from the backend. Never fails: a missing, unreadable or
    /// malformed value yields the fallback collection. A missing value also
    /// seeds the backend with that fallback.
    pub fn load(backend: Rc<dyn KvBackend>) -> Self {
        let items = match backend.get(T::KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(parsed) => parsed.normalize(),
                Err(err) => {
                    warn!(key = T::KEY, %err, "stored collection is malformed, using defaults");
                    T::fallback(backend.as_ref())
                }
            },
            Ok(None) => {
                let seeded = T::fallback(backend.as_ref());
                if let Err(err) = Self::write(backend.as_ref(), &seeded) {
                    warn!(key = T::KEY, err = %format!("{:#}", err), "could not seed defaults");
                }
                seeded
            }
            Err(err) => {
                warn!(key = T::KEY, err = %format!("{:#}", err), "backend read failed, using defaults");
                T::fallback(backend.as_ref())
            }
        };
        Self {
            backend,
            items: RefCell::new(items),
        }
    }

    /// Copy of the current collection.
    pub fn snapshot(&self) -> T {
        self.items.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.items.borrow())
    }

    /// Overwrites the persisted and in-memory collection. On a write failure
    /// the in-memory collection is left as it was.
    pub fn replace(&self, next: T) -> Result<()> {
        Self::write(self.backend.as_ref(), &next)?;
        *self.items.borrow_mut() = next;
        Ok(())
    }

    fn write(backend: &dyn KvBackend, items: &T) -> Result<()> {
        let raw = serde_json::to_string(items)
            .with_context(|| format!("Failed to serialize '{}'", T::KEY))?;
        backend.set(T::KEY, &raw)?;
        debug!(key = T::KEY, "collection replaced");
        Ok(())
    }
}

/// Read-only view of the current target companies.
pub trait TargetCompanies {
    fn target_companies(&self) -> Vec<Company>;
}

impl TargetCompanies for Store<Vec<Company>> {
    fn target_companies(&self) -> Vec<Company> {
        self.snapshot()
    }
}

/// The contact store together with the target-company capability it reads
/// for outreach suggestions.
pub struct ContactBook {
    contacts: Store<Vec<Contact>>,
    targets: Rc<dyn TargetCompanies>,
}

impl ContactBook {
    pub fn new(contacts: Store<Vec<Contact>>, targets: Rc<dyn TargetCompanies>) -> Self {
        Self { contacts, targets }
    }

    pub fn store(&self) -> &Store<Vec<Contact>> {
        &self.contacts
    }

    pub fn snapshot(&self) -> Vec<Contact> {
        self.contacts.snapshot()
    }

    pub fn replace(&self, next: Vec<Contact>) -> Result<()> {
        self.contacts.replace(next)
    }

    /// Stale contacts plus anyone working at a current target company.
    pub fn outreach_candidates(&self, today: chrono::NaiveDate) -> Vec<Contact> {
        let companies = self.targets.target_companies();
        self.contacts
            .with(|contacts| crate::derive::outreach_candidates(contacts, &companies, today))
    }
}
