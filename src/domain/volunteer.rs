//! Ranked department choices an applicant submits after registering.

use super::catalog::special_track;
use super::errors::{ValidationError, ValidationResult};
use super::models::{Department, InterviewMethod, VolunteerChoice, VolunteerType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChoice {
    pub department_id: String,
    pub department_name: String,
    pub special: bool,
}

/// An applicant's volunteer choices in priority order, before submission.
#[derive(Debug, Clone, Default)]
pub struct VolunteerPlan {
    college: String,
    major: String,
    choices: Vec<PlannedChoice>,
}

impl VolunteerPlan {
    pub const MAX_CHOICES: usize = 2;

    pub fn new(college: &str, major: &str) -> Self {
        Self {
            college: college.to_string(),
            major: major.to_string(),
            choices: Vec::new(),
        }
    }

    pub fn choices(&self) -> &[PlannedChoice] {
        &self.choices
    }

    pub fn is_eligible_for_special(&self, department: &Department) -> bool {
        department.has_special
            && special_track(&department.id).is_some_and(|track| track.admits(&self.college, &self.major))
    }

    pub fn add(&mut self, department: &Department, special: bool) -> ValidationResult<()> {
        if self.choices.iter().any(|c| c.department_id == department.id) {
            return Err(ValidationError::DuplicateChoice);
        }
        if self.choices.len() >= Self::MAX_CHOICES {
            return Err(ValidationError::TooManyChoices);
        }
        if special && !self.is_eligible_for_special(department) {
            return Err(ValidationError::NotEligibleForSpecial);
        }
        self.choices.push(PlannedChoice {
            department_id: department.id.clone(),
            department_name: department.name.clone(),
            special,
        });
        Ok(())
    }

    pub fn remove(&mut self, department_id: &str) {
        self.choices.retain(|c| c.department_id != department_id);
    }

    /// Moves the choice at `from` to position `to`. Out-of-range indices are ignored.
    pub fn move_choice(&mut self, from: usize, to: usize) {
        if from >= self.choices.len() || to >= self.choices.len() || from == to {
            return;
        }
        let choice = self.choices.remove(from);
        self.choices.insert(to, choice);
    }

    /// `None` until at least one department is chosen.
    pub fn interview_method(&self) -> Option<InterviewMethod> {
        if self.choices.is_empty() {
            None
        } else if self.choices.iter().all(|c| c.special) {
            Some(InterviewMethod::Special)
        } else {
            Some(InterviewMethod::Joint)
        }
    }

    /// Choices with priorities assigned from their position.
    pub fn to_volunteer_choices(&self) -> ValidationResult<Vec<VolunteerChoice>> {
        if self.choices.is_empty() {
            return Err(ValidationError::NoChoices);
        }
        Ok(self
            .choices
            .iter()
            .enumerate()
            .map(|(i, c)| VolunteerChoice {
                department: c.department_name.clone(),
                kind: if c.special { VolunteerType::Special } else { VolunteerType::Normal },
                priority: i as u32 + 1,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::default_departments;

    fn dept(id: &str) -> Department {
        default_departments().into_iter().find(|d| d.id == id).unwrap()
    }

    #[test]
    fn test_at_most_two_distinct_choices() {
        let mut plan = VolunteerPlan::new("农学院", "农学");
        plan.add(&dept("tech"), false).unwrap();
        assert_eq!(plan.add(&dept("tech"), false), Err(ValidationError::DuplicateChoice));
        plan.add(&dept("pr"), false).unwrap();
        assert_eq!(plan.add(&dept("hr"), false), Err(ValidationError::TooManyChoices));
        assert_eq!(plan.choices().len(), 2);
    }

    #[test]
    fn test_special_requires_eligibility() {
        let mut plan = VolunteerPlan::new("农学院", "农学");
        assert_eq!(plan.add(&dept("tech"), true), Err(ValidationError::NotEligibleForSpecial));

        let mut plan = VolunteerPlan::new("信息学院", "农学");
        assert!(plan.add(&dept("tech"), true).is_ok());
        assert_eq!(plan.add(&dept("hr"), true), Err(ValidationError::NotEligibleForSpecial));

        let mut plan = VolunteerPlan::new("农学院", "市场营销");
        assert!(plan.add(&dept("event"), true).is_ok());
    }

    #[test]
    fn test_interview_method_forecast() {
        let mut plan = VolunteerPlan::new("信息学院", "软件工程");
        assert_eq!(plan.interview_method(), None);
        plan.add(&dept("tech"), true).unwrap();
        assert_eq!(plan.interview_method(), Some(InterviewMethod::Special));
        plan.add(&dept("hr"), false).unwrap();
        assert_eq!(plan.interview_method(), Some(InterviewMethod::Joint));
    }

    #[test]
    fn test_reorder_updates_priorities() {
        let mut plan = VolunteerPlan::new("农学院", "农学");
        plan.add(&dept("tech"), false).unwrap();
        plan.add(&dept("pr"), false).unwrap();
        plan.move_choice(1, 0);
        plan.move_choice(5, 0);

        let choices = plan.to_volunteer_choices().unwrap();
        assert_eq!(choices[0].department, "宣传部");
        assert_eq!(choices[0].priority, 1);
        assert_eq!(choices[1].department, "技术部");
        assert_eq!(choices[1].priority, 2);

        plan.remove("pr");
        plan.remove("tech");
        assert_eq!(plan.to_volunteer_choices(), Err(ValidationError::NoChoices));
    }
}
