//! Case record types: the validated projections of raw records.
//!
//! A case record is immutable once produced by the filter and is only read
//! by the aggregator. Invariants: `age_years` is within 0..=14 and the
//! diagnosis code starts with an accepted prefix for its dataset.

use chrono::NaiveDate;

/// Sex of the individual, mapped from the registry code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    /// Registry code "1"
    Male,
    /// Registry code "2"
    Female,
    /// Any other or missing code (pass-through, not rejected)
    Unknown,
}

impl Sex {
    /// Map a raw registry code to a sex
    #[must_use]
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("1") => Self::Male,
            Some("2") => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// Presentation label used in export tables
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }

    /// All sexes, in export column order
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Unknown];
}

/// Diabetes mellitus type, derived from the 3-character ICD-10 prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiabetesType {
    /// E10, insulin-dependent
    Type1,
    /// E11, non-insulin-dependent
    Type2,
    /// Any other code (reachable only when the diagnosis check is relaxed)
    Other,
}

impl DiabetesType {
    /// Derive the type from an ICD-10 code
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        if code.starts_with("E10") {
            Self::Type1
        } else if code.starts_with("E11") {
            Self::Type2
        } else {
            Self::Other
        }
    }

    /// Presentation label used in export tables
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Type1 => "type1",
            Self::Type2 => "type2",
            Self::Other => "other",
        }
    }
}

/// Clinical age band over the 0-14 range used for summary reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeBand {
    /// Ages 0 through 4
    Years0To4,
    /// Ages 5 through 9
    Years5To9,
    /// Ages 10 through 14
    Years10To14,
}

impl AgeBand {
    /// All bands, in ascending order
    pub const ALL: [Self; 3] = [Self::Years0To4, Self::Years5To9, Self::Years10To14];

    /// Band for an age in whole years (callers guarantee 0..=14)
    #[must_use]
    pub const fn of(age_years: u8) -> Self {
        match age_years {
            0..=4 => Self::Years0To4,
            5..=9 => Self::Years5To9,
            _ => Self::Years10To14,
        }
    }

    /// Presentation label used in export tables
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Years0To4 => "0-4",
            Self::Years5To9 => "5-9",
            Self::Years10To14 => "10-14",
        }
    }
}

/// A validated cause-of-death case
#[derive(Debug, Clone)]
pub struct MortalityCase {
    /// Date of death, when the source value was parseable
    pub date: Option<NaiveDate>,
    /// Age at death in whole years, 0..=14
    pub age_years: u8,
    /// Sex of the individual
    pub sex: Sex,
    /// Underlying cause of death, ICD-10
    pub diagnosis_code: String,
    /// Municipality of residence code
    pub municipality: Option<String>,
    /// Reference year
    pub year: i32,
}

impl MortalityCase {
    /// Age band this case falls into
    #[must_use]
    pub const fn age_band(&self) -> AgeBand {
        AgeBand::of(self.age_years)
    }
}

/// A validated hospitalization case
#[derive(Debug, Clone)]
pub struct MorbidityCase {
    /// Admission date, when the source value was parseable
    pub admission_date: Option<NaiveDate>,
    /// Discharge date, when the source value was parseable
    pub discharge_date: Option<NaiveDate>,
    /// Age in whole years, 0..=14
    pub age_years: u8,
    /// Sex of the individual
    pub sex: Sex,
    /// Principal diagnosis, ICD-10
    pub diagnosis_code: String,
    /// Diabetes type derived from the diagnosis prefix
    pub diabetes_type: DiabetesType,
    /// Municipality of residence code
    pub municipality: Option<String>,
    /// Length of stay in days
    pub length_of_stay_days: i64,
    /// Total cost of the hospitalization
    pub cost: f64,
    /// Reference year
    pub year: i32,
}

impl MorbidityCase {
    /// Age band this case falls into
    #[must_use]
    pub const fn age_band(&self) -> AgeBand {
        AgeBand::of(self.age_years)
    }
}
