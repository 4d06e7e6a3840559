use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    MissingAlarmTime,
    InvalidTimeOfDay(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAlarmTime => write!(f, "please set a time for the alarm"),
            Self::InvalidTimeOfDay(value) => {
                write!(f, "time of day must be HH:MM (24-hour), got {value:?}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
