//! Line-oriented survey reader

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// One unparsed array from a survey: its label and raw coordinate tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyArray {
    pub label: Option<String>,
    /// Space separated `lon,lat,elevation` tokens
    pub coordinates: String,
}

impl SurveyArray {
    pub fn new(coordinates: impl Into<String>) -> Self {
        Self {
            label: None,
            coordinates: coordinates.into(),
        }
    }

    pub fn labelled(label: impl Into<String>, coordinates: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            coordinates: coordinates.into(),
        }
    }
}

/// Read a survey file from disk
pub fn read_survey<P: AsRef<Path>>(path: P) -> Result<Vec<SurveyArray>> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(parse_survey(&text))
}

/// Parse survey text. Blank lines and `#` comments are skipped; every other
/// line becomes one array, in file order. Coordinates are not validated here.
pub fn parse_survey(text: &str) -> Vec<SurveyArray> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once('\t') {
            Some((label, coords)) => {
                let label = label.trim();
                SurveyArray {
                    label: (!label.is_empty()).then(|| label.to_string()),
                    coordinates: coords.trim().to_string(),
                }
            }
            None => SurveyArray::new(line),
        })
        .collect()
}
