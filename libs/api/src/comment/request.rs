use serde::Deserialize;
use validator::Validate;

use crate::form::{not_blank, FormErrors};

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(custom = "not_blank")]
    pub text: String,
}

impl CommentForm {
    pub fn clean(&self) -> Result<String, FormErrors> {
        FormErrors::check(self).into_result(self.text.trim().to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_text_is_required() {
        let blank = CommentForm {
            text: " \n ".to_string(),
        };
        let filled = CommentForm {
            text: " Nice post! ".to_string(),
        };

        assert!(blank.clean().unwrap_err().has("text"));
        assert_eq!(filled.clean().unwrap(), "Nice post!");
    }
}
