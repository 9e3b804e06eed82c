//! I/O for survey files, configuration and analysis results
//!
//! The survey reader accepts a plain line-oriented format, one array per line:
//!
//! ```text
//! # comment
//! front roof<TAB>-0.1200,51.5000,0 -0.1199,51.5000,0 -0.1199,51.5001,0
//! -0.1300,51.6000,0 -0.1299,51.6000,0 -0.1299,51.6001,0
//! ```
//!
//! The optional label before the tab is carried through to the results.

mod json;
mod survey;

pub use json::{read_config, to_json_string, write_json};
pub use survey::{parse_survey, read_survey, SurveyArray};
