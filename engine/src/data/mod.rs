// Record storage: the store seam, its in-process implementation, JSON
// snapshots of it and CSV export of listed records.
pub mod csv_export;
pub mod snapshot;
pub mod store;
