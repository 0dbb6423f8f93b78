// Result types - the row mapping and the replayable cursor over a statement.

pub mod row;
pub mod rows;

pub use row::DbRow;
pub use rows::{Rows, RowsIter};
