//! Code generators for dynpred records.

mod derive;

pub use derive::derive_record_impl;
