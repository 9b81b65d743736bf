use std::fmt::Display;
use itertools::Itertools;

/// Scientific notation with five fractional digits, e.g. `1.23457e-12`.
pub fn sci(x: f64) -> String {
    format!("{x:.5e}")
}

/// Fixed-width entry of a dense matrix printout.
pub fn entry(x: f64) -> String {
    if x == 0.0 {
        format!("{:>9}", 0)
    } else {
        format!("{x:9.5}")
    }
}

pub fn table<S, I, J, D, F>(head: S, rows: &[I], cols: &[J], entry: F) -> String
where
    S: Display,
    I: Display,
    J: Display,
    D: Display,
    F: Fn(&I, &J) -> D
{
    use prettytable::*;
    use prettytable::format::Alignment;

    fn row<I>(head: String, cells: I) -> Row
    where I: Iterator<Item = String> {
        let mut res = vec![Cell::new_align(head.as_str(), Alignment::RIGHT)];
        res.extend(cells.map(|s| Cell::new_align(s.as_str(), Alignment::RIGHT)));
        Row::new(res)
    }

    let mut table = Table::new();

    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(row(
        head.to_string(),
        cols.iter().map(|j| j.to_string())
    ));

    for i in rows {
        table.add_row(row(
            i.to_string(),
            cols.iter().map(|j| entry(i, j).to_string())
        ));
    }

    table.to_string()
}

pub fn bracket<I>(items: I) -> String
where I: IntoIterator, I::Item: Display {
    format!("[{}]", items.into_iter().join(", "))
}
