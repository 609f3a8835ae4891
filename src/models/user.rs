use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Wire format for dates of birth.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub dob: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        calculate_age(self.dob, today)
    }

    /// Builds the response shape with the age as of the current UTC date.
    pub fn to_response(&self) -> UserResponse {
        self.to_response_on(Utc::now().date_naive())
    }

    pub fn to_response_on(&self, today: NaiveDate) -> UserResponse {
        UserResponse {
            id: self.id,
            name: self.name.clone(),
            dob: self.dob.format(DATE_FORMAT).to_string(),
            age: self.age_on(today),
        }
    }
}

/// Whole years between `dob` and `today`.
///
/// The birthday check compares day-of-year, not (month, day), so after
/// Feb 29 in a leap year the result can be one lower than a calendar
/// reading would give.
pub fn calculate_age(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();

    if today.ordinal() < dob.ordinal() {
        age -= 1;
    }

    age
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, max = 100, message = "name must be between 1 and 100 characters")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[validate(required(message = "dob is required"))]
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, max = 100, message = "name must be between 1 and 100 characters")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[validate(required(message = "dob is required"))]
    pub dob: Option<NaiveDate>,
}

impl CreateUserRequest {
    pub fn into_input(self) -> Result<UserInput, ValidationErrors> {
        self.validate()?;
        UserInput::from_parts(self.name, self.dob)
    }
}

impl UpdateUserRequest {
    pub fn into_input(self) -> Result<UserInput, ValidationErrors> {
        self.validate()?;
        UserInput::from_parts(self.name, self.dob)
    }
}

/// A request body that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub name: String,
    pub dob: NaiveDate,
}

impl UserInput {
    fn from_parts(name: Option<String>, dob: Option<NaiveDate>) -> Result<Self, ValidationErrors> {
        match (name, dob) {
            (Some(name), Some(dob)) => Ok(Self { name, dob }),
            (name, dob) => {
                let mut errors = ValidationErrors::new();
                if name.is_none() {
                    errors.add("name", ValidationError::new("required"));
                }
                if dob.is_none() {
                    errors.add("dob", ValidationError::new("required"));
                }
                Err(errors)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub dob: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub age: i32,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp whose calendar date is
/// taken as written.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).or_else(|err| {
        DateTime::parse_from_rfc3339(value)
            .map(|timestamp| timestamp.date_naive())
            .map_err(|_| err)
    })
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse_date(&raw)
                .map_err(|e| serde::de::Error::custom(format!("invalid dob '{}': {}", raw, e)))
        })
        .transpose()
}
