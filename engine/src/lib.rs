// Engine library root
// The ledger application around the `shared` core: settings, the record store
// seam, entry forms and the ledger service.

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod services;
