//! Provider resume → store record.
//!
//! The output key set is fixed by `StoreFields`: absent input maps to a
//! default value, never to a missing key. Given the same resume and the same
//! `today`, the output is identical.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::models::resume::ResumeDetail;

pub const DEFAULT_NAME: &str = "Без имени";
pub const DEFAULT_CURRENCY: &str = "RUR";
pub const HIRING_STATUS: &str = "Candidate";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreFields {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Job_Title")]
    pub job_title: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone number")]
    pub phone: String,
    #[serde(rename = "resume_url")]
    pub resume_url: String,
    #[serde(rename = "area")]
    pub area: String,
    #[serde(rename = "salary_amount")]
    pub salary_amount: i64,
    #[serde(rename = "salary_currency")]
    pub salary_currency: String,
    #[serde(rename = "experience_months")]
    pub experience_months: u32,
    #[serde(rename = "age")]
    pub age: u32,
    #[serde(rename = "last_employer")]
    pub last_employer: String,
    #[serde(rename = "education")]
    pub education: String,
    #[serde(rename = "skills")]
    pub skills: String,
    #[serde(rename = "updated_at")]
    pub updated_at: NaiveDate,
    #[serde(rename = "Hiring Status")]
    pub hiring_status: &'static str,
}

/// Store column names compared by the duplicate check.
pub const EMAIL_FIELD: &str = "Email";
pub const PHONE_FIELD: &str = "Phone number";
pub const RESUME_URL_FIELD: &str = "resume_url";

pub fn map(resume: &ResumeDetail, today: NaiveDate) -> StoreFields {
    let summary = &resume.summary;

    let name = [
        summary.last_name.as_deref(),
        summary.first_name.as_deref(),
        summary.middle_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    let education = resume
        .education
        .primary
        .first()
        .map(|e| {
            format!(
                "{} - {}",
                e.name.as_deref().unwrap_or_default(),
                e.organization.as_deref().unwrap_or_default()
            )
        })
        .unwrap_or_default();

    StoreFields {
        name: if name.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            name
        },
        job_title: summary.title.clone().unwrap_or_default(),
        email: resume.email().unwrap_or_default().to_string(),
        phone: resume.phone().unwrap_or_default().to_string(),
        resume_url: resume.profile_url().unwrap_or_default().to_string(),
        area: summary.area.clone().unwrap_or_default(),
        salary_amount: summary
            .salary
            .as_ref()
            .and_then(|s| s.amount)
            .map(|a| a.round() as i64)
            .unwrap_or(0),
        salary_currency: summary
            .salary
            .as_ref()
            .and_then(|s| s.currency.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        experience_months: summary.total_experience_months.unwrap_or(0),
        age: summary.age.unwrap_or(0),
        last_employer: resume
            .experience
            .first()
            .and_then(|e| e.company.clone())
            .unwrap_or_default(),
        education,
        skills: resume.skills.join(", "),
        updated_at: today,
        hiring_status: HIRING_STATUS,
    }
}

pub fn map_today(resume: &ResumeDetail) -> StoreFields {
    map(resume, Utc::now().date_naive())
}
