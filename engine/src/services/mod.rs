// Ledger operations over the record store.
pub mod clock;
pub mod ledger_service;

pub use ledger_service::LedgerService;
