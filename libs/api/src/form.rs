use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

pub const REQUIRED: &str = "Обязательное поле.";
pub const NON_FIELD: &str = "__all__";

/// Validation messages keyed by form field name.
#[derive(Debug)]
pub struct FormErrors(ValidationErrors);

impl Default for FormErrors {
    fn default() -> Self {
        Self(ValidationErrors::new())
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(value: ValidationErrors) -> Self {
        Self(value)
    }
}

impl FormErrors {
    /// Runs the derived field validators of `form`.
    pub fn check<T: Validate>(form: &T) -> Self {
        match form.validate() {
            Ok(()) => Self::default(),
            Err(errors) => Self(errors),
        }
    }

    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.add(field, invalid(message));
    }

    pub fn field(&self, field: &str) -> Vec<String> {
        self.0
            .field_errors()
            .get(field)
            .map(|errors| errors.iter().map(message).collect())
            .unwrap_or_default()
    }

    pub fn non_field(&self) -> Vec<String> {
        self.field(NON_FIELD)
    }

    pub fn has(&self, field: &str) -> bool {
        !self.field(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.errors().is_empty()
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn message(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}

fn invalid(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("invalid");
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed(REQUIRED));
        return Err(error);
    }
    Ok(())
}

/// Id submitted by a `<select>`; membership is checked against the choices
/// later.
pub fn numeric_choice(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<i32>() {
        Ok(_) => Ok(()),
        Err(_) => Err(invalid(
            "Выберите корректный вариант. Вашего варианта нет среди \
             допустимых значений.",
        )),
    }
}

/// An empty `<select>` value means none.
pub fn parse_choice(value: Option<&str>) -> Option<i32> {
    value
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .and_then(|x| x.parse().ok())
}
