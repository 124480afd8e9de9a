//! Record classification: raw record in, accept-or-reject decision out.
//!
//! Classification is a pure, total function over the typed raw records.
//! Rejection is a normal outcome carrying a reason, never an error; the
//! filter stage turns reasons into observable counts.

use std::fmt;

use crate::models::case::{DiabetesType, MortalityCase, MorbidityCase, Sex};
use crate::models::raw::{ColumnPresence, MortalityRaw, MorbidityRaw, parse_source_date};

/// Which of the two administrative registries a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Cause-of-death records (SIM-DO)
    Mortality,
    /// Hospitalization records (SIH-SUS)
    Morbidity,
}

impl DatasetKind {
    /// Short lowercase label for logs and reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mortality => "mortality",
            Self::Morbidity => "morbidity",
        }
    }

    /// Name of the source registry system
    #[must_use]
    pub const fn source_system(self) -> &'static str {
        match self {
            Self::Mortality => "SIM-DO",
            Self::Morbidity => "SIH-SUS",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Upper bound of the study age range in whole years
pub const MAX_AGE_YEARS: u8 = 14;

/// Upper bound of the raw mortality age in days (14 years at 365 days/year)
pub const MAX_AGE_DAYS: i64 = 5110;

/// Days-to-years divisor used by the source registry
pub const DAYS_PER_YEAR: i64 = 365;

/// Accepted ICD-10 prefixes for mortality (full diabetes mellitus family)
pub const MORTALITY_PREFIXES: [&str; 5] = ["E10", "E11", "E12", "E13", "E14"];

/// Accepted ICD-10 prefixes for morbidity (type 1 and type 2 only)
pub const MORBIDITY_PREFIXES: [&str; 2] = ["E10", "E11"];

/// Why a record was excluded from the case set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Age field missing or unparsable
    MissingAge,
    /// Age outside the accepted raw range
    AgeOutOfRange,
    /// Diagnosis field missing
    MissingDiagnosis,
    /// Diagnosis code outside the accepted prefix set
    DiagnosisNotAccepted,
    /// Length-of-stay field missing (morbidity)
    MissingLengthOfStay,
    /// Cost field missing (morbidity)
    MissingCost,
}

impl RejectReason {
    /// Short label for logs and reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MissingAge => "missing_age",
            Self::AgeOutOfRange => "age_out_of_range",
            Self::MissingDiagnosis => "missing_diagnosis",
            Self::DiagnosisNotAccepted => "diagnosis_not_accepted",
            Self::MissingLengthOfStay => "missing_length_of_stay",
            Self::MissingCost => "missing_cost",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of classifying one raw record
#[derive(Debug, Clone)]
pub enum Classification<T> {
    /// The record is in scope; carries the derived case
    Accepted(T),
    /// The record is excluded, with the reason
    Rejected(RejectReason),
}

impl<T> Classification<T> {
    /// Whether the record was accepted
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The accepted case, if any
    #[must_use]
    pub fn into_accepted(self) -> Option<T> {
        match self {
            Self::Accepted(case) => Some(case),
            Self::Rejected(_) => None,
        }
    }
}

/// Which classifier predicates are enabled for a batch
///
/// A predicate is disabled when the corresponding column is absent from the
/// whole source schema: the stage is skipped rather than rejecting every
/// record. Records still need the field value itself to project into a
/// case and are rejected individually when it is null.
#[derive(Debug, Clone, Copy)]
pub struct ColumnChecks {
    /// Apply the age range check
    pub age: bool,
    /// Apply the diagnosis prefix check
    pub diagnosis: bool,
}

impl ColumnChecks {
    /// All predicates enabled
    #[must_use]
    pub const fn all() -> Self {
        Self {
            age: true,
            diagnosis: true,
        }
    }

    /// Derive the enabled predicates from a batch's schema report
    #[must_use]
    pub const fn from_presence(presence: &ColumnPresence) -> Self {
        Self {
            age: presence.age,
            diagnosis: presence.diagnosis,
        }
    }
}

impl Default for ColumnChecks {
    fn default() -> Self {
        Self::all()
    }
}

fn has_accepted_prefix(code: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| code.starts_with(prefix))
}

/// Classify a raw cause-of-death record
///
/// Raw age is in days: values outside 0..=5110 are rejected outright, then
/// whole years are derived by integer division and clamped to 0..=14.
/// The cause code must start with one of E10..E14. Sex codes map through
/// without rejection.
#[must_use]
pub fn classify_mortality(
    raw: &MortalityRaw,
    checks: ColumnChecks,
) -> Classification<MortalityCase> {
    let Some(age_days) = raw.age_days else {
        return Classification::Rejected(RejectReason::MissingAge);
    };
    if checks.age && !(0..=MAX_AGE_DAYS).contains(&age_days) {
        return Classification::Rejected(RejectReason::AgeOutOfRange);
    }

    let Some(cause_code) = raw.cause_code.as_deref().map(str::trim) else {
        return Classification::Rejected(RejectReason::MissingDiagnosis);
    };
    if checks.diagnosis && !has_accepted_prefix(cause_code, &MORTALITY_PREFIXES) {
        return Classification::Rejected(RejectReason::DiagnosisNotAccepted);
    }

    let age_years = (age_days / DAYS_PER_YEAR).clamp(0, i64::from(MAX_AGE_YEARS)) as u8;

    Classification::Accepted(MortalityCase {
        date: raw.death_date.as_deref().and_then(parse_source_date),
        age_years,
        sex: Sex::from_code(raw.sex_code.as_deref()),
        diagnosis_code: cause_code.to_string(),
        municipality: raw.municipality.clone(),
        year: raw.year,
    })
}

/// Classify a raw hospitalization record
///
/// Age is already in whole years and must fall within 0..=14. The
/// principal diagnosis is restricted to E10/E11, which also determines the
/// diabetes type. Length-of-stay and cost must be present; their values
/// pass through unchanged.
#[must_use]
pub fn classify_morbidity(
    raw: &MorbidityRaw,
    checks: ColumnChecks,
) -> Classification<MorbidityCase> {
    let Some(age_years) = raw.age_years else {
        return Classification::Rejected(RejectReason::MissingAge);
    };
    if checks.age && !(0..=i64::from(MAX_AGE_YEARS)).contains(&age_years) {
        return Classification::Rejected(RejectReason::AgeOutOfRange);
    }

    let Some(diagnosis) = raw.principal_diagnosis.as_deref().map(str::trim) else {
        return Classification::Rejected(RejectReason::MissingDiagnosis);
    };
    if checks.diagnosis && !has_accepted_prefix(diagnosis, &MORBIDITY_PREFIXES) {
        return Classification::Rejected(RejectReason::DiagnosisNotAccepted);
    }

    let Some(stay_days) = raw.stay_days else {
        return Classification::Rejected(RejectReason::MissingLengthOfStay);
    };
    let Some(cost) = raw.total_cost else {
        return Classification::Rejected(RejectReason::MissingCost);
    };

    let age_years = age_years.clamp(0, i64::from(MAX_AGE_YEARS)) as u8;

    Classification::Accepted(MorbidityCase {
        admission_date: raw.admission_date.as_deref().and_then(parse_source_date),
        discharge_date: raw.discharge_date.as_deref().and_then(parse_source_date),
        age_years,
        sex: Sex::from_code(raw.sex_code.as_deref()),
        diagnosis_code: diagnosis.to_string(),
        diabetes_type: DiabetesType::from_code(diagnosis),
        municipality: raw.municipality.clone(),
        length_of_stay_days: stay_days,
        cost,
        year: raw.year,
    })
}
