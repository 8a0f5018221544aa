use chrono::{NaiveDateTime, ParseResult};
use entity::prelude::*;
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};
use validator::{Validate, ValidationError};

use crate::form::{not_blank, numeric_choice, parse_choice, FormErrors};

const DATETIME_INPUT: &str = "%Y-%m-%dT%H:%M";
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];
const INVALID_CHOICE: &str =
    "Выберите корректный вариант. Вашего варианта нет среди допустимых \
     значений.";

/// Every post field except the author, as submitted.
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct PostForm {
    #[serde(default)]
    #[validate(
        custom = "not_blank",
        length(
            max = 256,
            message = "Убедитесь, что это значение содержит не более 256 \
                       символов."
        )
    )]
    pub title: String,
    #[serde(default)]
    #[validate(custom = "not_blank")]
    pub text: String,
    #[serde(default)]
    #[validate(custom = "datetime_input")]
    pub pub_date: String,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[validate(custom = "numeric_choice")]
    pub location: Option<String>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[validate(
        required(message = "Обязательное поле."),
        custom = "numeric_choice"
    )]
    pub category: Option<String>,
    #[serde(default)]
    pub is_published: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub location_id: Option<i32>,
    pub category_id: i32,
    pub is_published: bool,
}

impl PostForm {
    /// Blank form: published, dated now.
    pub fn initial(now: NaiveDateTime) -> Self {
        Self {
            pub_date: now.format(DATETIME_INPUT).to_string(),
            is_published: Some("on".to_string()),
            ..Default::default()
        }
    }

    pub fn from_post(post: &PostEntity) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date.format(DATETIME_INPUT).to_string(),
            location: post.location_id.map(|id| id.to_string()),
            category: post.category_id.map(|id| id.to_string()),
            is_published: post.is_published.then(|| "on".to_string()),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.is_published.is_some()
    }

    pub fn category_selected(&self, id: &i32) -> bool {
        self.category.as_deref() == Some(id.to_string().as_str())
    }

    pub fn location_selected(&self, id: &i32) -> bool {
        self.location.as_deref() == Some(id.to_string().as_str())
    }

    /// Field checks plus membership of category and location in the
    /// offered choices.
    pub fn clean(
        &self,
        categories: &[CategoryEntity],
        locations: &[LocationEntity],
    ) -> Result<PostFields, FormErrors> {
        let mut errors = FormErrors::check(self);

        let category_id = parse_choice(self.category.as_deref());
        if category_id.is_some_and(|id| !categories.iter().any(|x| x.id == id))
        {
            errors.add("category", INVALID_CHOICE);
        }
        let location_id = parse_choice(self.location.as_deref());
        if location_id.is_some_and(|id| !locations.iter().any(|x| x.id == id))
        {
            errors.add("location", INVALID_CHOICE);
        }

        let pub_date = parse_datetime(self.pub_date.trim()).ok();
        let (Some(pub_date), Some(category_id)) = (pub_date, category_id)
        else {
            return Err(errors);
        };

        errors.into_result(PostFields {
            title: self.title.trim().to_string(),
            text: self.text.trim().to_string(),
            pub_date,
            location_id,
            category_id,
            is_published: self.is_checked(),
        })
    }
}

impl PostFields {
    pub fn apply(self, post: &mut PostEntity) {
        post.title = self.title;
        post.text = self.text;
        post.pub_date = self.pub_date;
        post.location_id = self.location_id;
        post.category_id = Some(self.category_id);
        post.is_published = self.is_published;
    }
}

fn datetime_input(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return not_blank(value);
    }
    parse_datetime(value.trim()).map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("invalid");
        error.message = Some("Введите правильную дату и время.".into());
        error
    })
}

fn parse_datetime(value: &str) -> ParseResult<NaiveDateTime> {
    let mut result = NaiveDateTime::parse_from_str(value, DATETIME_FORMATS[0]);
    for format in &DATETIME_FORMATS[1..] {
        if result.is_ok() {
            break;
        }
        result = NaiveDateTime::parse_from_str(value, format);
    }
    result
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::*;
    use crate::form::REQUIRED;

    fn choices() -> (Vec<CategoryEntity>, Vec<LocationEntity>) {
        (
            vec![CategoryEntity {
                id: 3,
                slug: "travel".to_string(),
                ..Default::default()
            }],
            vec![LocationEntity {
                id: 5,
                name: "Moscow".to_string(),
                ..Default::default()
            }],
        )
    }

    fn valid_form() -> PostForm {
        PostForm {
            title: " Trip ".to_string(),
            text: "We went north.".to_string(),
            pub_date: "2024-05-01T10:30".to_string(),
            location: Some("5".to_string()),
            category: Some("3".to_string()),
            is_published: Some("on".to_string()),
        }
    }

    #[test]
    fn test_valid_form() {
        // Arrange
        let (categories, locations) = choices();

        // Act
        let fields = valid_form().clean(&categories, &locations).unwrap();

        // Assert
        assert_eq!(fields.title, "Trip");
        assert_eq!(
            fields.pub_date,
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
        assert_eq!(fields.location_id, Some(5));
        assert_eq!(fields.category_id, 3);
        assert!(fields.is_published);
    }

    #[test]
    fn test_unchecked_box_and_empty_location() {
        let (categories, locations) = choices();
        let form = PostForm {
            location: None,
            is_published: None,
            pub_date: "2024-05-01 10:30:15".to_string(),
            ..valid_form()
        };

        let fields = form.clean(&categories, &locations).unwrap();

        assert_eq!(fields.location_id, None);
        assert!(!fields.is_published);
    }

    #[test]
    fn test_invalid_form_reports_each_field() {
        // Arrange
        let (categories, locations) = choices();
        let form = PostForm {
            title: "x".repeat(257),
            text: "  ".to_string(),
            pub_date: "yesterday".to_string(),
            location: Some("9".to_string()),
            category: Some("abc".to_string()),
            is_published: None,
        };

        // Act
        let errors = form.clean(&categories, &locations).unwrap_err();

        // Assert
        for field in ["title", "text", "pub_date", "location", "category"] {
            assert!(errors.has(field), "{} should have an error", field);
        }
    }

    #[test]
    fn test_missing_category_is_required() {
        let (categories, locations) = choices();
        let form = PostForm {
            category: None,
            ..valid_form()
        };

        let errors = form.clean(&categories, &locations).unwrap_err();

        assert_eq!(errors.field("category"), vec![REQUIRED.to_string()]);
    }

    #[test]
    fn test_from_post_prefills_choices() {
        let post = PostEntity {
            title: "Trip".to_string(),
            pub_date: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            category_id: Some(3),
            location_id: None,
            is_published: false,
            ..Default::default()
        };

        let form = PostForm::from_post(&post);

        assert_eq!(form.pub_date, "2024-05-01T10:30");
        assert!(form.category_selected(&3));
        assert!(!form.category_selected(&4));
        assert!(!form.location_selected(&5));
        assert!(!form.is_checked());
    }
}
