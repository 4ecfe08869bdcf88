use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recruitment track an applicant entered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolunteerType {
    #[default]
    Normal,
    Special,
}

impl VolunteerType {
    pub fn as_str(self) -> &'static str {
        match self {
            VolunteerType::Normal => "normal",
            VolunteerType::Special => "special",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VolunteerType::Normal => "普通",
            VolunteerType::Special => "特招",
        }
    }
}

/// Position of an applicant in the recruiting pipeline.
///
/// Any status may be replaced by any other; no transition graph is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantStatus {
    #[default]
    Pending,
    Interview,
    Waitlist,
    Accepted,
    Rejected,
}

impl ApplicantStatus {
    pub const ALL: [ApplicantStatus; 5] = [
        ApplicantStatus::Pending,
        ApplicantStatus::Interview,
        ApplicantStatus::Waitlist,
        ApplicantStatus::Accepted,
        ApplicantStatus::Rejected,
    ];

    /// Label shown to interviewers and students.
    pub fn label(self) -> &'static str {
        match self {
            ApplicantStatus::Pending => "待审核",
            ApplicantStatus::Interview => "待面试",
            ApplicantStatus::Waitlist => "候补",
            ApplicantStatus::Accepted => "已录取",
            ApplicantStatus::Rejected => "未通过",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicantStatus::Pending => "pending",
            ApplicantStatus::Interview => "interview",
            ApplicantStatus::Waitlist => "waitlist",
            ApplicantStatus::Accepted => "accepted",
            ApplicantStatus::Rejected => "rejected",
        }
    }
}

/// A ranked department preference. Priority 1 is the first choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerChoice {
    pub department: String,
    #[serde(rename = "type")]
    pub kind: VolunteerType,
    pub priority: u32,
}

/// One prospective member's recruiting record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub department: String,
    pub college: String,
    pub volunteer_type: VolunteerType,
    pub status: ApplicantStatus,
    #[serde(default)]
    pub volunteers: Vec<VolunteerChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<String>,
}

impl Applicant {
    /// Creates the placeholder record written when a student id is first verified.
    pub fn new_pending(student_id: &str, college: &str) -> Self {
        Self {
            id: new_id(),
            student_id: student_id.to_string(),
            name: String::new(),
            department: String::new(),
            college: college.to_string(),
            volunteer_type: VolunteerType::Normal,
            status: ApplicantStatus::Pending,
            volunteers: Vec::new(),
            interview_time: None,
            interview_location: None,
            score: None,
            evaluation: None,
        }
    }

    /// Merges the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: &ApplicantPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(department) = &patch.department {
            self.department = department.clone();
        }
        if let Some(college) = &patch.college {
            self.college = college.clone();
        }
        if let Some(volunteer_type) = patch.volunteer_type {
            self.volunteer_type = volunteer_type;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(volunteers) = &patch.volunteers {
            self.volunteers = volunteers.clone();
        }
        if let Some(time) = &patch.interview_time {
            self.interview_time = Some(time.clone());
        }
        if let Some(location) = &patch.interview_location {
            self.interview_location = Some(location.clone());
        }
        if let Some(score) = patch.score {
            self.score = Some(score);
        }
        if let Some(evaluation) = &patch.evaluation {
            self.evaluation = Some(evaluation.clone());
        }
    }
}

/// Partial update for an [`Applicant`]. `None` means "leave as is".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer_type: Option<VolunteerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicantStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteers: Option<Vec<VolunteerChoice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<String>,
}

impl ApplicantPatch {
    pub fn status(status: ApplicantStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn volunteers(volunteers: Vec<VolunteerChoice>) -> Self {
        Self {
            volunteers: Some(volunteers),
            ..Self::default()
        }
    }
}

/// Static reference data describing one recruiting department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub has_special: bool,
    pub description: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Interviewer,
    Admin,
}

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub role: UserRole,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: u8,
}

impl Skill {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 5;
}

impl Default for Skill {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: Skill::MIN_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortfolioLink {
    pub title: String,
    pub url: String,
}

/// Registration data collected by the wizard before it becomes authoritative.
///
/// The avatar is held as an embedded `data:` URL, never as a file handle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub student_id: String,
    pub name: String,
    pub college: String,
    pub major: String,
    pub phone: String,
    pub wechat: String,
    pub email: String,
    pub avatar: Option<String>,
    pub biography: String,
    pub skills: Vec<Skill>,
    pub portfolio_links: Vec<PortfolioLink>,
    pub interests: Vec<String>,
    pub achievements: String,
}

/// How the interviews for a set of volunteer choices will be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewMethod {
    Special,
    Joint,
}

impl InterviewMethod {
    pub fn label(self) -> &'static str {
        match self {
            InterviewMethod::Special => "特招面试",
            InterviewMethod::Joint => "联合面试",
        }
    }
}

/// A submitted set of volunteer choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: String,
    pub student_id: String,
    pub choices: Vec<VolunteerChoice>,
    pub interview_method: InterviewMethod,
    pub submitted_at: DateTime<Utc>,
}

/// An interview slot and its outcome for one applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: String,
    pub applicant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<String>,
    pub status: ApplicantStatus,
}

/// Root aggregate held by the store and persisted as one blob.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentState {
    pub applicants: Vec<Applicant>,
    pub departments: Vec<Department>,
    pub current_user: Option<CurrentUser>,
    pub loading: bool,
    pub error: Option<String>,
    pub draft_profile: Option<RegistrationDraft>,
    pub applications: Vec<ApplicationRecord>,
    pub interviews: Vec<InterviewRecord>,
    pub is_authenticated: bool,
}

impl RecruitmentState {
    /// Default dataset used when nothing has been persisted yet.
    pub fn seeded() -> Self {
        Self {
            applicants: super::mock::generate_applicants(),
            departments: super::catalog::default_departments(),
            ..Self::default()
        }
    }

    pub fn find_by_student_id(&self, student_id: &str) -> Option<&Applicant> {
        self.applicants.iter().find(|a| a.student_id == student_id)
    }

    pub fn find_applicant(&self, id: &str) -> Option<&Applicant> {
        self.applicants.iter().find(|a| a.id == id)
    }

    pub fn find_department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }
}

/// Opaque identifier for new records.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}
