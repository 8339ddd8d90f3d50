//! Row Sorting
//!
//! Records reach a row in path order; the winding filter needs them left to
//! right. Rows are usually short, so small rows use an insertion sort.

use crate::table::EdgeTable;
use crate::table::Record;

/// Rows of at most this many records are insertion sorted
pub const INSERTION_LIMIT: usize = 6;

fn insertion_sort<R: Record>(row: &mut [R]) {
    for i in 1 .. row.len() {
        let mut j = i;
        while j > 0 && row[j-1].key() > row[j].key() {
            row.swap(j-1, j);
            j -= 1;
        }
    }
}

/// Sort one row by the record ordering
pub fn sort_row<R: Record>(row: &mut [R]) {
    if row.len() <= INSERTION_LIMIT {
        insertion_sort(row);
    } else {
        row.sort_unstable_by_key(|r| r.key());
    }
}

/// Sort every row of the table in place
pub fn sort_table<R: Record>(table: &mut EdgeTable<R>) {
    for y in 0 .. table.height() {
        sort_row(table.row_mut(y));
    }
}
