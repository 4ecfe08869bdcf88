use std::fs::File;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use super::models::Applicant;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

const HEADER: [&str; 12] = [
    "id",
    "studentId",
    "name",
    "college",
    "department",
    "volunteerType",
    "status",
    "volunteers",
    "interviewTime",
    "interviewLocation",
    "score",
    "evaluation",
];

pub struct CsvExporter;

impl CsvExporter {
    /// Writes one row per applicant. Volunteer choices are flattened to
    /// `department(priority)` separated by `;`.
    pub fn write_applicants<W: Write>(applicants: &[Applicant], writer: W) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(HEADER)?;
        for a in applicants {
            let volunteers = a
                .volunteers
                .iter()
                .map(|v| format!("{}({})", v.department, v.priority))
                .collect::<Vec<_>>()
                .join(";");
            let score = a.score.map(|s| s.to_string()).unwrap_or_default();
            csv.write_record([
                a.id.as_str(),
                a.student_id.as_str(),
                a.name.as_str(),
                a.college.as_str(),
                a.department.as_str(),
                a.volunteer_type.as_str(),
                a.status.as_str(),
                volunteers.as_str(),
                a.interview_time.as_deref().unwrap_or(""),
                a.interview_location.as_deref().unwrap_or(""),
                score.as_str(),
                a.evaluation.as_deref().unwrap_or(""),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn export_to_file(applicants: &[Applicant], path: &Path) -> Result<usize, ExportError> {
        let file = File::create(path)?;
        Self::write_applicants(applicants, file)?;
        Ok(applicants.len())
    }
}
