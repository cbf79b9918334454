use std::path::PathBuf;
use thiserror::Error;

/// Shown to the user for any failure that is not one of the recognized domain errors.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something unexpected went wrong, make sure your input file is formated correctly";

/// Failures of the read → group → chart pipeline.
///
/// Every variant except `Unexpected` is a domain error whose message is shown verbatim.
/// `Unexpected` carries diagnostic detail meant for the log, not the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("Filetype: {0} is not supported")]
    UnsupportedFiletype(String),
    #[error("Could not read file: {}", .0.display())]
    ReadFailed(PathBuf),
    #[error("Could not find code: {0}, you may need to add it to 'code_colors'")]
    UnknownCode(String),
    #[error("The figure was closed before it could be saved to: {}", .0.display())]
    SaveSkipped(PathBuf),
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl PlotError {
    pub fn is_domain(&self) -> bool {
        !matches!(self, PlotError::Unexpected(_))
    }

    /// The text the interactive shell displays for this failure.
    pub fn user_message(&self) -> String {
        if self.is_domain() {
            self.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }
}

/// Failures while loading a `PlotConfig` file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{axis} axis range {min}..{max} must have max greater than min")]
    BadRange { axis: &'static str, min: f64, max: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_show_their_own_message() {
        let err = PlotError::UnknownCode("Zz9".to_string());
        assert!(err.is_domain());
        assert_eq!(
            err.user_message(),
            "Could not find code: Zz9, you may need to add it to 'code_colors'"
        );

        let err = PlotError::ReadFailed(PathBuf::from("data/section.csv"));
        assert_eq!(err.user_message(), "Could not read file: data/section.csv");
    }

    #[test]
    fn skipped_save_names_the_output() {
        let err = PlotError::SaveSkipped(PathBuf::from("figures/line4.png"));
        assert!(err.is_domain());
        assert_eq!(
            err.user_message(),
            "The figure was closed before it could be saved to: figures/line4.png"
        );
    }

    #[test]
    fn unexpected_errors_hide_their_detail() {
        let err = PlotError::Unexpected("elevation cell is text".to_string());
        assert!(!err.is_domain());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        assert!(err.to_string().contains("elevation cell is text"));
    }
}
