//! T-SQL stored procedure generation

mod procedure;
mod sql_generator;
mod sql_type;
pub mod templates;

pub use procedure::{Parameter, Procedure};
pub use sql_generator::{SqlGenerator, SqlScript};
pub use sql_type::{is_text_type, sql_type};
