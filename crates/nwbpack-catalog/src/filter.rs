use crate::{Error, Result};
use chrono::NaiveDate;
use nwbpack_types::{SessionRecord, SessionType};

/// Restricts which sessions a batch run processes.
///
/// All fields are conjunctive; an unset field matches everything.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub animals: Option<Vec<String>>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub session_types: Option<Vec<SessionType>>,
}

impl SessionFilter {
    /// Parse a comma-separated animal list, e.g. `VG1-01,VG1-02`.
    pub fn with_animals(mut self, spec: &str) -> Self {
        self.animals = Some(spec.split(',').map(|s| s.trim().to_string()).collect());
        self
    }

    /// Parse a date bound in the `YYMMDD` format used by session directories.
    pub fn parse_date(spec: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(spec, "%y%m%d")
            .map_err(|_| Error::Parse(format!("expected a YYMMDD date, got '{}'", spec)))
    }

    /// Parse a comma-separated type list; accepts the `rest` and `ss`
    /// shorthands.
    pub fn parse_types(spec: &str) -> Result<Vec<SessionType>> {
        spec.split(',')
            .map(|s| s.trim().parse::<SessionType>().map_err(Error::Parse))
            .collect()
    }

    pub fn matches(&self, session: &SessionRecord) -> bool {
        if let Some(animals) = &self.animals
            && !animals.iter().any(|a| a == &session.animal)
        {
            return false;
        }
        if let Some(from) = self.from_date
            && session.date < from
        {
            return false;
        }
        if let Some(to) = self.to_date
            && session.date > to
        {
            return false;
        }
        if let Some(types) = &self.session_types
            && !types.contains(&session.session_type)
        {
            return false;
        }
        true
    }
}
