pub mod csv_source;

pub use csv_source::{CsvRowSource, DataError, open_csv};
