//! TSPLIB instance loader.
//!
//! Reads the node-coordinate flavour of the TSPLIB format:
//!
//! ```text
//! NAME : sample
//! TYPE : TSP
//! DIMENSION : 3
//! EDGE_WEIGHT_TYPE : EUC_2D
//! NODE_COORD_SECTION
//! 1 0 0
//! 2 3 4
//! 3 6 8
//! EOF
//! ```
//!
//! Two distance functions are supported, selected by `EDGE_WEIGHT_TYPE`:
//!
//! - `EUC_2D`: Euclidean distance rounded to the nearest integer.
//! - `ATT`: pseudo-Euclidean, `ceil(sqrt(d² / 10))`.
//!
//! Coordinates are assigned to nodes in order of appearance; the leading
//! index column is not interpreted.

use super::problem::TspProblem;
use crate::error::DeError;
use crate::relation::SymmetricRelation;
use std::path::Path;
use std::str::FromStr;

/// Distance function of a coordinate instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeWeightType {
    /// Rounded Euclidean distance.
    Euc2d,
    /// Pseudo-Euclidean distance.
    Att,
}

impl EdgeWeightType {
    /// Distance between two points.
    pub fn distance(self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let xd = a.0 - b.0;
        let yd = a.1 - b.1;
        let squared = xd * xd + yd * yd;
        match self {
            Self::Euc2d => squared.sqrt().round(),
            Self::Att => (squared / 10.0).sqrt().ceil(),
        }
    }
}

impl FromStr for EdgeWeightType {
    type Err = DeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EUC_2D" => Ok(Self::Euc2d),
            "ATT" => Ok(Self::Att),
            other => Err(DeError::load(format!(
                "cannot read data of type {other}; only ATT and EUC_2D are supported"
            ))),
        }
    }
}

/// Reads and parses a TSPLIB file.
pub fn load_tsplib(path: impl AsRef<Path>) -> Result<TspProblem, DeError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_tsplib(&text)
}

/// Parses TSPLIB text into a dense [`TspProblem`].
pub fn parse_tsplib(text: &str) -> Result<TspProblem, DeError> {
    let mut name = None;
    let mut dimension = None;
    let mut weight_type = None;
    let mut lines = text.lines();

    // Header: "KEY : VALUE" lines up to the coordinate section.
    let mut in_section = false;
    for line in lines.by_ref() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.trim_end_matches(':').trim() == "NODE_COORD_SECTION" {
            in_section = true;
            break;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "NAME" => name = Some(value.to_string()),
            "DIMENSION" => {
                let d = value
                    .parse::<usize>()
                    .map_err(|_| DeError::load(format!("invalid DIMENSION '{value}'")))?;
                dimension = Some(d);
            }
            "EDGE_WEIGHT_TYPE" => weight_type = Some(value.parse::<EdgeWeightType>()?),
            _ => {}
        }
    }

    let dimension = dimension.ok_or_else(|| DeError::load("missing DIMENSION"))?;
    let weight_type = weight_type.ok_or_else(|| DeError::load("missing EDGE_WEIGHT_TYPE"))?;
    if !in_section {
        return Err(DeError::load("missing NODE_COORD_SECTION"));
    }

    let mut coords = Vec::with_capacity(dimension);
    for line in lines {
        if coords.len() == dimension {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "EOF" {
            break;
        }
        coords.push(parse_coordinate(line)?);
    }
    if coords.len() < dimension {
        return Err(DeError::load(format!(
            "expected {dimension} coordinates, found {}",
            coords.len()
        )));
    }

    let mut costs = SymmetricRelation::dense(dimension, 0.0);
    for i in 0..dimension {
        for j in (i + 1)..dimension {
            costs.set(i, j, weight_type.distance(coords[i], coords[j]));
        }
    }

    let problem = TspProblem::new(costs);
    Ok(match name {
        Some(n) => problem.with_name(n),
        None => problem,
    })
}

/// Parses an `index x y` line.
fn parse_coordinate(line: &str) -> Result<(f64, f64), DeError> {
    let mut fields = line.split_whitespace().skip(1);
    let mut next = || -> Result<f64, DeError> {
        let field = fields
            .next()
            .ok_or_else(|| DeError::load(format!("malformed coordinate line '{line}'")))?;
        field
            .parse::<f64>()
            .map_err(|_| DeError::load(format!("invalid coordinate '{field}'")))
    };
    let x = next()?;
    let y = next()?;
    Ok((x, y))
}
