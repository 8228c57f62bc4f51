mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{DatasetMetadata, OptionalColumn, RequiredColumn};
pub use validator::DrawValidator;
