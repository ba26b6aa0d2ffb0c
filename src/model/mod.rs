pub mod types;

pub use types::{Categories, IngestReport, Product, SearchHit};
