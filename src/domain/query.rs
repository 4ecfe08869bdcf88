//! Status tabs and free-text search over the applicant list.

use super::models::{Applicant, ApplicantStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTab {
    #[default]
    All,
    Only(ApplicantStatus),
}

impl StatusTab {
    pub const TABS: [StatusTab; 6] = [
        StatusTab::All,
        StatusTab::Only(ApplicantStatus::Pending),
        StatusTab::Only(ApplicantStatus::Interview),
        StatusTab::Only(ApplicantStatus::Waitlist),
        StatusTab::Only(ApplicantStatus::Accepted),
        StatusTab::Only(ApplicantStatus::Rejected),
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusTab::All => "全部",
            StatusTab::Only(status) => status.label(),
        }
    }

    pub fn index(self) -> usize {
        Self::TABS.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> StatusTab {
        Self::TABS[(self.index() + 1) % Self::TABS.len()]
    }

    pub fn previous(self) -> StatusTab {
        Self::TABS[(self.index() + Self::TABS.len() - 1) % Self::TABS.len()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicantFilter {
    pub tab: StatusTab,
    pub query: String,
}

impl ApplicantFilter {
    /// Name and college match case-insensitively; the student id by substring.
    pub fn matches(&self, applicant: &Applicant) -> bool {
        if let StatusTab::Only(status) = self.tab {
            if applicant.status != status {
                return false;
            }
        }
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        applicant.name.to_lowercase().contains(&needle)
            || applicant.student_id.contains(&self.query)
            || applicant.college.to_lowercase().contains(&needle)
    }

    pub fn apply<'a>(&self, applicants: &'a [Applicant]) -> Vec<&'a Applicant> {
        applicants.iter().filter(|a| self.matches(a)).collect()
    }
}

/// Number of applicants in each status, in [`ApplicantStatus::ALL`] order.
pub fn status_counts(applicants: &[Applicant]) -> [usize; 5] {
    let mut counts = [0; 5];
    for applicant in applicants {
        if let Some(i) = ApplicantStatus::ALL.iter().position(|s| *s == applicant.status) {
            counts[i] += 1;
        }
    }
    counts
}
