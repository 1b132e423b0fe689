use anyhow::Result;
use chrono::NaiveDate;
use std::rc::Rc;
use tracing::info;

use crate::clock::Clock;
use crate::db::KvBackend;
use crate::models::{Application, Category, Company, Reflection, Task};
use crate::prefs::TablePreferences;
use crate::store::{ContactBook, Store};
use crate::view::Snapshot;

/// Every store, built once over one backend and one clock.
pub struct Tracker {
    pub applications: Store<Vec<Application>>,
    pub tasks: Store<Vec<Task>>,
    pub companies: Rc<Store<Vec<Company>>>,
    pub contacts: ContactBook,
    pub categories: Store<Vec<Category>>,
    pub reflection: Store<Reflection>,
    pub prefs: TablePreferences,
    clock: Box<dyn Clock>,
}

impl Tracker {
    pub fn open(backend: Rc<dyn KvBackend>, clock: Box<dyn Clock>) -> Self {
        let companies: Rc<Store<Vec<Company>>> = Rc::new(Store::load(backend.clone()));
        let contacts = ContactBook::new(Store::load(backend.clone()), companies.clone());
        let tracker = Self {
            applications: Store::load(backend.clone()),
            tasks: Store::load(backend.clone()),
            companies,
            contacts,
            categories: Store::load(backend.clone()),
            reflection: Store::load(backend.clone()),
            prefs: TablePreferences::new(backend),
            clock,
        };
        info!(today = %tracker.today(), "tracker opened");
        tracker
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            applications: self.applications.snapshot(),
            tasks: self.tasks.snapshot(),
            companies: self.companies.snapshot(),
            contacts: self.contacts.snapshot(),
            categories: self.categories.snapshot(),
            reflection: self.reflection.snapshot(),
        }
    }

    /// Writes a category change and the task re-pointing it caused.
    ///
    /// Tasks are written first. If the category write then fails, the old
    /// category is still listed with no tasks left in it, and repeating the
    /// same rename or delete finishes the job.
    pub fn replace_categories(&self, categories: Vec<Category>, tasks: Vec<Task>) -> Result<()> {
        self.tasks.replace(tasks)?;
        self.categories.replace(categories)
    }
}
