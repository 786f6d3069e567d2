use std::fmt;

use crate::error::Error;
use crate::monitor::Snapshot;
use crate::process::{Field, ProcessRecord};

/// Which columns to show, how to sort, and how many rows to keep.
///
/// Construction validates every field name, so holding a ProjectionSpec
/// means projection cannot fail; bad configuration is rejected before any
/// collection work starts.
#[derive(Debug, Clone)]
pub struct ProjectionSpec {
    pub columns: Vec<Field>,
    pub sort_key: Field,
    pub descending: bool,
    pub limit: usize, //0 keeps every row
}

impl ProjectionSpec {
    /// Parses the comma-separated column list and the sort key, naming the
    /// first unrecognized field in the error.
    pub fn parse(
        columns: &str,
        sort_key: &str,
        descending: bool,
        limit: usize,
    ) -> Result<Self, Error> {
        let mut parsed = Vec::new();
        for name in columns.split(',') {
            let name = name.trim();
            let field = name
                .parse::<Field>()
                .map_err(|_| Error::UnknownColumn(name.to_string()))?;
            parsed.push(field);
        }

        let sort_key = sort_key
            .parse::<Field>()
            .map_err(|_| Error::UnknownSortKey(sort_key.to_string()))?;

        Ok(ProjectionSpec {
            columns: parsed,
            sort_key,
            descending,
            limit,
        })
    }
}

/// A render-ready grid: the selected columns in the requested order and the
/// formatted rows, already sorted and truncated. Never mutated after
/// construction.
#[derive(Debug)]
pub struct Table {
    pub columns: Vec<Field>,
    pub rows: Vec<Vec<String>>,
}

/// Projects a snapshot into a table.
///
/// The sort is stable and compares raw field values, so records with equal
/// keys keep their snapshot order and formatting can never change the
/// ordering. The row limit is applied after sorting, keeping a prefix of the
/// fully sorted sequence.
pub fn project(snapshot: &Snapshot, spec: &ProjectionSpec) -> Table {
    let mut ordered: Vec<&ProcessRecord> = snapshot.iter().collect();

    ordered.sort_by(|a, b| {
        let cmp = spec.sort_key.compare(a, b);
        if spec.descending { cmp.reverse() } else { cmp }
    });

    if spec.limit > 0 {
        ordered.truncate(spec.limit);
    }

    let rows = ordered
        .iter()
        .map(|record| {
            spec.columns
                .iter()
                .map(|column| column.format(record))
                .collect()
        })
        .collect();

    Table {
        columns: spec.columns.clone(),
        rows,
    }
}

impl fmt::Display for Table {
    //Plain text grid: numeric columns right-aligned, text columns
    //left-aligned, one header row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.name().len()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, "  ")?;
            }
            write!(f, "{:>width$}", column.name(), width = widths[i])?;
        }
        writeln!(f)?;

        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, "  ")?;
                }
                if self.columns[i].is_numeric() {
                    write!(f, "{:>width$}", cell, width = widths[i])?;
                } else if i + 1 == row.len() {
                    write!(f, "{}", cell)?; //No trailing padding on the last column
                } else {
                    write!(f, "{:<width$}", cell, width = widths[i])?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
