//! Target table loader.
//!
//! One target per row, columns `x y mass`, separated by whitespace and/or
//! commas. Blank lines and `#` comments are skipped. Ids are assigned in row
//! order; rewards are derived by the kernel.

use std::path::Path;

use thiserror::Error;

use sweeproute_kernel::error::KernelError;
use sweeproute_kernel::instance::target::{TargetRow, TargetSet};

/// Error loading a target table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {detail}")]
    Io { path: String, detail: String },
    /// A row does not hold exactly three finite numbers. `line` is 1-based.
    #[error("line {line}: {detail}")]
    Malformed { line: usize, detail: String },
    #[error(transparent)]
    Instance(#[from] KernelError),
}

/// Parse a target table from text.
///
/// # Errors
///
/// Returns [`LoadError::Malformed`] for the first bad row.
pub fn parse_targets(text: &str) -> Result<TargetSet, LoadError> {
    let mut rows = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let fields: Vec<&str> = content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty())
            .collect();
        let [x, y, mass] = fields.as_slice() else {
            return Err(LoadError::Malformed {
                line,
                detail: format!("expected 3 columns (x y mass), found {}", fields.len()),
            });
        };
        rows.push(TargetRow {
            x: parse_field(x, "x", line)?,
            y: parse_field(y, "y", line)?,
            mass: parse_field(mass, "mass", line)?,
        });
    }
    Ok(TargetSet::from_rows(rows)?)
}

/// Read and parse a target table file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read, otherwise as
/// [`parse_targets`].
pub fn load_targets(path: &Path) -> Result<TargetSet, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    parse_targets(&text)
}

fn parse_field(field: &str, name: &str, line: usize) -> Result<f64, LoadError> {
    let value: f64 = field.parse().map_err(|_| LoadError::Malformed {
        line,
        detail: format!("{name} is not a number: {field:?}"),
    })?;
    if !value.is_finite() {
        return Err(LoadError::Malformed {
            line,
            detail: format!("{name} is not finite: {field:?}"),
        });
    }
    Ok(value)
}
