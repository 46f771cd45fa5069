mod ingredient;
mod recipe;
mod record;
mod validation;

pub use ingredient::Ingredient;
pub use recipe::Recipe;
pub use record::{Record, RecordId};
pub use validation::ValidationError;
