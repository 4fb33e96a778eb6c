pub mod dates;
pub mod validation;

pub use validation::ValidatedJson;
