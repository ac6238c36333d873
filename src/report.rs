//! Console formatting of integral estimates and Romberg tables.

use crate::romberg::RombergTable;
use crate::utils::as_f64;
use num::Float;
use std::fmt::Display;

/// Which half of a Romberg table to print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    /// Extrapolated estimates `U`, cells `l <= s`.
    Values,
    /// Error estimates `R`, cells `l < s`.
    Errors,
}

/// `integral <form>  <a> < x < <b>\t=\t<value>`
pub fn integral_line<D: Display>(form: D, a: f64, b: f64, value: f64) -> String {
    format!("integral {}  {:?} < x < {:?}\t=\t{:?}", form, a, b, value)
}

/// Render one triangular half of `table` with fixed-width columns: a header
/// of column orders `p=..`, then one row per grid level `s=..`.
pub fn triangular<T: Float>(table: &RombergTable<T>, kind: TableKind) -> String {
    let mut out: String = table
        .orders()
        .iter()
        .map(|order| format!("p={:<4} ", order))
        .collect();
    out.push('\n');

    for s in 0..table.levels() {
        out.push_str(&format!("s={:<2} ", s));
        let cells = (0..=s).filter_map(|l| match kind {
            TableKind::Values => table.value(s, l),
            TableKind::Errors => table.error(s, l),
        });
        for v in cells {
            out.push_str(&format!("{:7.4} ", as_f64(v)));
        }
        out.push('\n');
    }
    out.push('\n');

    out
}
