//! Job-search tracker: typed collections over a key-value store, company
//! scoring, date-based derivations and table queries.

#[macro_use]
mod macros;

pub mod clock;
pub mod columns;
pub mod config;
pub mod db;
pub mod defaults;
pub mod derive;
pub mod edit;
pub mod error;
pub mod logging;
pub mod models;
pub mod prefs;
pub mod query;
pub mod scoring;
pub mod session;
pub mod store;
pub mod tracker;
pub mod view;
