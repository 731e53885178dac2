// Engine-side input models. Stored records live in `shared::models`.
pub mod form;
pub mod query;
