//! Shop ledger core: currency arithmetic, IST reporting periods, record models
//! and the dashboard rollup. Pure functions only; nothing here performs I/O.

pub mod finance;
pub mod ist;
pub mod models;
pub mod summary;
pub mod utils;
