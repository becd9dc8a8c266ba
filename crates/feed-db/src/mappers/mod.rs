//! Model to entity mappers
//!
//! Rows are converted with `TryFrom<Model> for Entity`, since stored enums may
//! hold values the domain does not know.

mod post;
