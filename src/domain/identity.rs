//! Student id rules: format, enrollment year, and the college code table.
//!
//! A student id is 13 ASCII digits. The first four digits are the enrollment
//! year and digits five and six are the college code.

use std::sync::LazyLock;

use regex::Regex;

use super::errors::{ValidationError, ValidationResult};

pub const STUDENT_ID_LEN: usize = 13;

/// The only enrollment year admitted to the current recruiting cycle.
pub const ACCEPTED_ENROLLMENT_YEAR: &str = "2023";

pub const OTHER_COLLEGE: &str = "其他学院";

static STUDENT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{13}$").expect("student id pattern"));

const SURNAMES: [&str; 10] = ["张", "李", "王", "刘", "陈", "杨", "赵", "黄", "周", "吴"];
const GIVEN_NAMES: [&str; 10] = ["明", "华", "强", "伟", "芳", "娜", "军", "杰", "磊", "敏"];

/// College resolved from a student id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollegeInfo {
    pub name: String,
    /// Whether students of this college may use the special recruitment track.
    pub has_special: bool,
}

pub fn is_well_formed(student_id: &str) -> bool {
    STUDENT_ID_PATTERN.is_match(student_id)
}

/// Checks format and enrollment year, in that order.
pub fn check_student_id(student_id: &str) -> ValidationResult<()> {
    if !is_well_formed(student_id) {
        return Err(ValidationError::MalformedStudentId);
    }
    if &student_id[..4] != ACCEPTED_ENROLLMENT_YEAR {
        return Err(ValidationError::IneligibleYear);
    }
    Ok(())
}

/// The two-digit college code, or `None` for a malformed id.
pub fn college_code(student_id: &str) -> Option<&str> {
    if !is_well_formed(student_id) {
        return None;
    }
    student_id.get(4..6)
}

/// Maps a college code; unknown codes fall back to [`OTHER_COLLEGE`].
pub fn college_for_code(code: &str) -> CollegeInfo {
    let (name, has_special) = match code {
        "11" => ("农学院", false),
        "12" => ("信息学院", true),
        "13" => ("工学院", false),
        "14" => ("经济管理学院", false),
        _ => (OTHER_COLLEGE, false),
    };
    CollegeInfo {
        name: name.to_string(),
        has_special,
    }
}

/// Placeholder display name derived from the last digit of a student id.
pub fn default_display_name(student_id: &str) -> Option<String> {
    let digit = student_id.chars().last()?.to_digit(10)? as usize;
    Some(format!("{}{}", SURNAMES[digit], GIVEN_NAMES[(digit + 3) % 10]))
}
