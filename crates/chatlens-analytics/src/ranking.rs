//! Top-N ranking of table rows.

use crate::table::{Row, Table};

/// Sort rows by their full cell tuple, descending, and keep `[start, end)`.
///
/// Fully tied rows keep their original relative order. Bounds past the end
/// of the table are clamped; `start >= end` yields an empty table. The input
/// table is left untouched.
pub fn rank(table: &Table, start: usize, end: usize) -> Table {
    let mut order: Vec<usize> = (0..table.len()).collect();
    order.sort_by(|&a, &b| table.rows()[b].cmp(&table.rows()[a]));

    let end = end.min(order.len());
    let start = start.min(end);

    let (index, rows): (Vec<String>, Vec<Row>) = order[start..end]
        .iter()
        .map(|&i| (table.index()[i].clone(), table.rows()[i].clone()))
        .unzip();

    Table::from_parts(table.columns().to_vec(), index, rows)
}
