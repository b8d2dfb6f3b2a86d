//! Column label normalization.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde::Serialize;

use crate::{
    config::CollisionPolicy,
    data::normalize_column_name,
    error::PipelineError,
    table::{Column, Table},
    transform::string_ops::next_free_suffix,
};

/// A source column whose normalized label clashed with another column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCollision {
    pub label: String,
    pub source: String,
    /// Label the column ended up with, or `None` when it was dropped.
    pub resolved_as: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub table: Table,
    pub collisions: Vec<LabelCollision>,
}

/// Renames every column to its canonical label. Data and column order are
/// untouched; clashing labels are resolved according to `policy`.
pub fn normalize_columns(table: Table, policy: CollisionPolicy) -> Result<Normalized, PipelineError> {
    let labels = table
        .columns()
        .iter()
        .map(|c| normalize_column_name(&c.name))
        .collect::<Vec<_>>();
    let mut collisions = Vec::new();

    let columns = match policy {
        CollisionPolicy::Error => {
            {
                let mut first_source: HashMap<&str, &str> = HashMap::new();
                for (column, label) in table.columns().iter().zip(&labels) {
                    if let Some(first) = first_source.insert(label, &column.name) {
                        return Err(PipelineError::ColumnCollision {
                            label: label.clone(),
                            first: first.to_string(),
                            second: column.name.clone(),
                        });
                    }
                }
            }
            relabel(table.into_columns(), labels)
        }
        CollisionPolicy::KeepLast => {
            let mut last_index: HashMap<&str, usize> = HashMap::new();
            for (idx, label) in labels.iter().enumerate() {
                last_index.insert(label, idx);
            }
            let winners = labels
                .iter()
                .enumerate()
                .map(|(idx, label)| last_index.get(label.as_str()) == Some(&idx))
                .collect::<Vec<_>>();
            for ((column, label), keep) in table.columns().iter().zip(&labels).zip(&winners) {
                if !keep {
                    warn!(
                        "Column '{}' normalizes to '{}' and is shadowed by a later column",
                        column.name, label
                    );
                    collisions.push(LabelCollision {
                        label: label.clone(),
                        source: column.name.clone(),
                        resolved_as: None,
                    });
                }
            }
            table
                .into_columns()
                .into_iter()
                .zip(labels.clone())
                .zip(winners)
                .filter(|(_, keep)| *keep)
                .map(|((column, label), _)| Column::new(label, column.data))
                .collect()
        }
        CollisionPolicy::Suffix => {
            let natural: HashSet<String> = labels.iter().cloned().collect();
            let mut assigned: HashSet<String> = HashSet::new();
            let mut resolved = Vec::with_capacity(labels.len());
            for (column, label) in table.columns().iter().zip(&labels) {
                let final_label = if assigned.contains(label) {
                    let renamed = next_free_suffix(label, |candidate| {
                        assigned.contains(candidate) || natural.contains(candidate)
                    });
                    warn!(
                        "Column '{}' normalizes to '{}' which is already taken; renamed to '{}'",
                        column.name, label, renamed
                    );
                    collisions.push(LabelCollision {
                        label: label.clone(),
                        source: column.name.clone(),
                        resolved_as: Some(renamed.clone()),
                    });
                    renamed
                } else {
                    label.clone()
                };
                assigned.insert(final_label.clone());
                resolved.push(final_label);
            }
            relabel(table.into_columns(), resolved)
        }
    };

    for column in &columns {
        debug!("Normalized column label '{}'", column.name);
    }
    let table = Table::new(columns)?;
    Ok(Normalized { table, collisions })
}

fn relabel(columns: Vec<Column>, labels: Vec<String>) -> Vec<Column> {
    columns
        .into_iter()
        .zip(labels)
        .map(|(column, label)| Column::new(label, column.data))
        .collect()
}
