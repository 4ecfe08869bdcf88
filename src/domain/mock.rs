//! Synthetic applicants used to seed an empty store.

use chrono::{Days, Local};
use rand::Rng;

use super::models::{Applicant, ApplicantStatus, VolunteerChoice, VolunteerType, new_id};

pub const MOCK_BATCH_SIZE: usize = 20;

const COLLEGES: [&str; 5] = ["信息学院", "工学院", "农学院", "经济管理学院", "外国语学院"];
const SURNAMES: [&str; 10] = ["张", "李", "王", "刘", "陈", "杨", "赵", "黄", "周", "吴"];
const GIVEN_NAMES: [&str; 10] = ["明", "华", "强", "伟", "芳", "娜", "军", "杰", "磊", "敏"];
const DEPARTMENTS: [&str; 5] = ["技术部", "宣传部", "人力资源部", "策划部", "外联部"];
const EVALUATIONS: [&str; 5] = ["沟通能力强", "技术功底扎实", "有创新思维", "团队协作好", "有责任心"];

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

/// Produces [`MOCK_BATCH_SIZE`] schema-valid applicants with random fields.
///
/// Student ids embed the batch index in their last three digits, so they are
/// unique within one batch.
pub fn generate_applicants() -> Vec<Applicant> {
    let mut rng = rand::rng();
    (0..MOCK_BATCH_SIZE).map(|i| generate_one(&mut rng, i)).collect()
}

fn generate_one<R: Rng>(rng: &mut R, index: usize) -> Applicant {
    let name = format!("{}{}", pick(rng, &SURNAMES), pick(rng, &GIVEN_NAMES));
    let college = pick(rng, &COLLEGES);
    let track_open = college == "信息学院" || college == "工学院";
    let volunteer_type = if track_open && rng.random_bool(0.5) {
        VolunteerType::Special
    } else {
        VolunteerType::Normal
    };

    let choice_count = rng.random_range(1..=3);
    let mut volunteers: Vec<VolunteerChoice> = Vec::with_capacity(choice_count);
    while volunteers.len() < choice_count {
        let department = pick(rng, &DEPARTMENTS);
        if volunteers.iter().any(|v| v.department == department) {
            continue;
        }
        let kind = if volunteers.is_empty() && volunteer_type == VolunteerType::Special {
            VolunteerType::Special
        } else {
            VolunteerType::Normal
        };
        volunteers.push(VolunteerChoice {
            department: department.to_string(),
            kind,
            priority: volunteers.len() as u32 + 1,
        });
    }

    let student_id = format!(
        "2023{}{:04}{:03}",
        rng.random_range(11..=12),
        rng.random_range(0..1000),
        index
    );
    let status = ApplicantStatus::ALL[rng.random_range(0..ApplicantStatus::ALL.len())];

    let mut applicant = Applicant {
        id: new_id(),
        student_id,
        name,
        department: volunteers[0].department.clone(),
        college: college.to_string(),
        volunteer_type,
        status,
        volunteers,
        interview_time: None,
        interview_location: None,
        score: None,
        evaluation: None,
    };

    if matches!(status, ApplicantStatus::Interview | ApplicantStatus::Accepted) {
        let date = Local::now().date_naive() + Days::new(rng.random_range(0..7));
        let hour = rng.random_range(9..17);
        let minute = rng.random_range(0..4) * 15;
        applicant.interview_time = Some(format!("{} {:02}:{:02}", date.format("%Y-%m-%d"), hour, minute));
        applicant.interview_location = Some(format!(
            "{}区 {}楼 {}号面试室",
            pick(rng, &["A", "B", "C"]),
            rng.random_range(1..=5),
            rng.random_range(1..=10)
        ));
        if rng.random_bool(0.5) {
            applicant.score = Some(rng.random_range(60..100));
            applicant.evaluation = Some(pick(rng, &EVALUATIONS).to_string());
        }
    }

    applicant
}
