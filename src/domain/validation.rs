use std::sync::LazyLock;

use regex::Regex;

use super::errors::{ValidationError, ValidationResult};
use super::models::RegistrationDraft;

/// Mainland mobile number: a literal `1`, then 3–9, then nine more digits.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9][0-9]{9}$").expect("phone pattern"));

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// Checks a draft before it is committed. The first failing field wins.
pub fn validate_submission(draft: &RegistrationDraft) -> ValidationResult<()> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if !is_valid_phone(&draft.phone) {
        return Err(ValidationError::InvalidPhone);
    }
    if draft.wechat.trim().is_empty() {
        return Err(ValidationError::MissingWechat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> RegistrationDraft {
        RegistrationDraft {
            name: "李伟".to_string(),
            phone: "13800138000".to_string(),
            wechat: "wxid_example".to_string(),
            ..RegistrationDraft::default()
        }
    }

    #[test]
    fn test_phone_pattern() {
        assert!(is_valid_phone("13800138000"));
        assert!(is_valid_phone("19912345678"));
        assert!(!is_valid_phone("12800138000"));
        assert!(!is_valid_phone("1380013800"));
        assert!(!is_valid_phone("138001380000"));
        assert!(!is_valid_phone("23800138000"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_complete_draft_passes() {
        assert_eq!(validate_submission(&complete_draft()), Ok(()));
    }

    #[test]
    fn test_field_order() {
        let mut draft = complete_draft();
        draft.name.clear();
        draft.phone = "123".to_string();
        assert_eq!(validate_submission(&draft), Err(ValidationError::MissingName));

        draft.name = "李伟".to_string();
        assert_eq!(validate_submission(&draft), Err(ValidationError::InvalidPhone));

        draft.phone = "13800138000".to_string();
        draft.wechat = "  ".to_string();
        assert_eq!(validate_submission(&draft), Err(ValidationError::MissingWechat));
    }

    #[test]
    fn test_email_is_not_checked_at_submit() {
        let mut draft = complete_draft();
        draft.email.clear();
        assert!(validate_submission(&draft).is_ok());
    }
}
