//! `RowAccessor` over live SQLite result rows.

use crate::model::row::{RowAccessor, RowResult};
use rusqlite::Row;

impl RowAccessor for Row<'_> {
    fn column_count(&self) -> usize {
        self.as_ref().column_count()
    }

    fn column_name(&self, index: usize) -> RowResult<&str> {
        Ok(self.as_ref().column_name(index)?)
    }

    fn get_int(&self, index: usize) -> RowResult<Option<i64>> {
        Ok(self.get::<_, Option<i64>>(index)?)
    }

    fn get_string(&self, index: usize) -> RowResult<Option<String>> {
        Ok(self.get::<_, Option<String>>(index)?)
    }
}
