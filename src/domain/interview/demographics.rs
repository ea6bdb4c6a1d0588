//! Patient demographics captured at interview start.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Lowest accepted age in years.
pub const MIN_AGE: u8 = 1;
/// Ages must stay strictly below this bound.
pub const AGE_LIMIT: u8 = 150;

/// Biological sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Parses `male`/`female` (also `m`/`f`), ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sex and age of the patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDemographics")]
pub struct Demographics {
    sex: Sex,
    age: u8,
}

/// Unchecked wire form; loaded snapshots go through [`Demographics::new`].
#[derive(Deserialize)]
struct RawDemographics {
    sex: Sex,
    age: u32,
}

impl TryFrom<RawDemographics> for Demographics {
    type Error = ValidationError;

    fn try_from(raw: RawDemographics) -> Result<Self, Self::Error> {
        Demographics::new(raw.sex, raw.age)
    }
}

impl Demographics {
    /// Creates demographics, rejecting ages outside `1..150`.
    pub fn new(sex: Sex, age: u32) -> Result<Self, ValidationError> {
        if age < u32::from(MIN_AGE) || age >= u32::from(AGE_LIMIT) {
            return Err(ValidationError::out_of_range(
                "age",
                i64::from(MIN_AGE),
                i64::from(AGE_LIMIT) - 1,
                i64::from(age),
            ));
        }
        // age < 150 fits in u8
        Ok(Self {
            sex,
            age: age as u8,
        })
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn age(&self) -> u8 {
        self.age
    }
}
