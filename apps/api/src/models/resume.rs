//! Resume shapes: validated domain types plus the raw provider payloads they
//! are built from. Raw payloads never leave this module; everything past the
//! client boundary works with `ResumeSummary` / `ResumeDetail`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("resume payload has no id")]
    MissingId,

    #[error("paid unlock action has no url (resume {0})")]
    MissingActionUrl(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Domain types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Salary {
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeSummary {
    pub id: String,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub area: Option<String>,
    pub age: Option<u32>,
    pub salary: Option<Salary>,
    pub total_experience_months: Option<u32>,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Email,
    Phone,
    Other,
}

impl ContactKind {
    fn from_provider_id(id: &str) -> Self {
        match id {
            "email" => ContactKind::Email,
            "cell" | "home" => ContactKind::Phone,
            _ => ContactKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub kind: ContactKind,
    pub value: String,
    /// Provider-formatted representation (phones only).
    pub formatted: Option<String>,
}

impl Contact {
    /// Formatted form when the provider supplied one, raw value otherwise.
    pub fn display_value(&self) -> &str {
        self.formatted
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceEntry {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationEntry {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Education {
    pub level: Option<String>,
    pub primary: Vec<EducationEntry>,
}

/// Provider-supplied action revealing gated contacts. Consumes quota.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaidUnlockAction {
    pub url: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeDetail {
    #[serde(flatten)]
    pub summary: ResumeSummary,
    pub contacts: Vec<Contact>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Education,
    pub skills: Vec<String>,
    pub paid_unlock_action: Option<PaidUnlockAction>,
}

/// Provider resume ids are opaque alphanumeric tokens. Anything else would
/// alter the request path once interpolated into `/resumes/{id}`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

impl ResumeDetail {
    pub fn has_contacts(&self) -> bool {
        !self.contacts.is_empty()
    }

    pub fn email(&self) -> Option<&str> {
        self.contacts
            .iter()
            .find(|c| c.kind == ContactKind::Email)
            .map(|c| c.value.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    /// Last phone-type contact wins, formatted form preferred.
    pub fn phone(&self) -> Option<&str> {
        self.contacts
            .iter()
            .filter(|c| c.kind == ContactKind::Phone)
            .last()
            .map(Contact::display_value)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn profile_url(&self) -> Option<&str> {
        self.summary
            .profile_url
            .as_deref()
            .filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub found: u64,
    pub page: u32,
    pub pages: u32,
    pub per_page: u32,
    pub items: Vec<ResumeSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Raw provider payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct RawNamed {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSalary {
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTotalExperience {
    #[serde(default)]
    months: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawContactType {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawContactValue {
    Text(String),
    Phone {
        #[serde(default)]
        formatted: Option<String>,
        #[serde(default)]
        country: Option<String>,
        #[serde(default)]
        city: Option<String>,
        #[serde(default)]
        number: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawContact {
    #[serde(rename = "type")]
    kind: RawContactType,
    value: RawContactValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawExperience {
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEducationEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    organization: Option<String>,
    #[serde(default)]
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEducation {
    #[serde(default)]
    level: Option<RawNamed>,
    #[serde(default)]
    primary: Option<Vec<RawEducationEntry>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAction {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawActions {
    #[serde(default)]
    get_with_contact: Option<RawAction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawResume {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    middle_name: Option<String>,
    #[serde(default)]
    area: Option<RawNamed>,
    #[serde(default)]
    age: Option<u32>,
    #[serde(default)]
    salary: Option<RawSalary>,
    #[serde(default)]
    total_experience: Option<RawTotalExperience>,
    #[serde(default)]
    alternate_url: Option<String>,
    #[serde(default)]
    contact: Option<Vec<RawContact>>,
    #[serde(default)]
    experience: Option<Vec<RawExperience>>,
    #[serde(default)]
    education: Option<RawEducation>,
    #[serde(default)]
    skill_set: Option<Vec<String>>,
    #[serde(default)]
    actions: Option<RawActions>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchPage {
    #[serde(default)]
    found: u64,
    #[serde(default)]
    page: u32,
    #[serde(default)]
    pages: u32,
    #[serde(default)]
    per_page: u32,
    #[serde(default)]
    items: Vec<RawResume>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawResume {
    fn summary(&mut self) -> Result<ResumeSummary, PayloadError> {
        let id = non_empty(self.id.take()).ok_or(PayloadError::MissingId)?;
        Ok(ResumeSummary {
            id,
            title: self.title.take(),
            first_name: self.first_name.take(),
            last_name: self.last_name.take(),
            middle_name: self.middle_name.take(),
            area: self.area.take().and_then(|a| a.name),
            age: self.age,
            salary: self.salary.take().map(|s| Salary {
                amount: s.amount,
                currency: s.currency,
            }),
            total_experience_months: self.total_experience.as_ref().and_then(|t| t.months),
            profile_url: non_empty(self.alternate_url.take()),
        })
    }
}

impl From<RawContact> for Contact {
    fn from(raw: RawContact) -> Self {
        let kind = ContactKind::from_provider_id(&raw.kind.id);
        match raw.value {
            RawContactValue::Text(value) => Contact {
                kind,
                value,
                formatted: None,
            },
            RawContactValue::Phone {
                formatted,
                country,
                city,
                number,
            } => {
                let digits = format!(
                    "{}{}{}",
                    country.unwrap_or_default(),
                    city.unwrap_or_default(),
                    number.unwrap_or_default()
                );
                let value = if digits.is_empty() {
                    formatted.clone().unwrap_or_default()
                } else {
                    format!("+{digits}")
                };
                Contact {
                    kind,
                    value,
                    formatted,
                }
            }
        }
    }
}

impl TryFrom<RawResume> for ResumeSummary {
    type Error = PayloadError;

    fn try_from(mut raw: RawResume) -> Result<Self, Self::Error> {
        raw.summary()
    }
}

impl TryFrom<RawResume> for ResumeDetail {
    type Error = PayloadError;

    fn try_from(mut raw: RawResume) -> Result<Self, Self::Error> {
        let summary = raw.summary()?;

        let paid_unlock_action = match raw.actions.and_then(|a| a.get_with_contact) {
            Some(action) => Some(PaidUnlockAction {
                url: non_empty(action.url)
                    .ok_or_else(|| PayloadError::MissingActionUrl(summary.id.clone()))?,
                method: non_empty(action.method)
                    .map(|m| m.to_ascii_uppercase())
                    .unwrap_or_else(|| "GET".to_string()),
            }),
            None => None,
        };

        let education = raw
            .education
            .map(|e| Education {
                level: e.level.and_then(|l| l.name),
                primary: e
                    .primary
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| EducationEntry {
                        name: p.name,
                        organization: p.organization,
                        year: p.year,
                    })
                    .collect(),
            })
            .unwrap_or_default();

        Ok(ResumeDetail {
            summary,
            contacts: raw
                .contact
                .unwrap_or_default()
                .into_iter()
                .map(Contact::from)
                .collect(),
            experience: raw
                .experience
                .unwrap_or_default()
                .into_iter()
                .map(|e| ExperienceEntry {
                    company: e.company,
                    position: e.position,
                    start: e.start,
                    end: e.end,
                })
                .collect(),
            education,
            skills: raw.skill_set.unwrap_or_default(),
            paid_unlock_action,
        })
    }
}

impl TryFrom<RawSearchPage> for SearchPage {
    type Error = PayloadError;

    fn try_from(raw: RawSearchPage) -> Result<Self, Self::Error> {
        Ok(SearchPage {
            found: raw.found,
            page: raw.page,
            pages: raw.pages,
            per_page: raw.per_page,
            items: raw
                .items
                .into_iter()
                .map(ResumeSummary::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail(value: serde_json::Value) -> Result<ResumeDetail, PayloadError> {
        let raw: RawResume = serde_json::from_value(value).unwrap();
        ResumeDetail::try_from(raw)
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert_eq!(
            detail(json!({"title": "Инженер"})).unwrap_err(),
            PayloadError::MissingId
        );
    }

    #[test]
    fn test_contacts_accept_string_and_phone_object() {
        let resume = detail(json!({
            "id": "r1",
            "contact": [
                {"type": {"id": "email", "name": "Эл. почта"}, "value": "ivan@example.com"},
                {"type": {"id": "cell", "name": "Мобильный"},
                 "value": {"country": "7", "city": "912", "number": "3456789", "formatted": "+7 (912) 345-67-89"}},
                {"type": {"id": "skype"}, "value": "ivan.skype"}
            ]
        }))
        .unwrap();

        assert_eq!(resume.contacts.len(), 3);
        assert_eq!(resume.email(), Some("ivan@example.com"));
        assert_eq!(resume.phone(), Some("+7 (912) 345-67-89"));
        assert_eq!(resume.contacts[1].value, "+79123456789");
        assert_eq!(resume.contacts[2].kind, ContactKind::Other);
    }

    #[test]
    fn test_last_phone_contact_wins() {
        let resume = detail(json!({
            "id": "r1",
            "contact": [
                {"type": {"id": "cell"}, "value": {"formatted": "+7 111"}},
                {"type": {"id": "home"}, "value": {"formatted": "+7 222"}}
            ]
        }))
        .unwrap();
        assert_eq!(resume.phone(), Some("+7 222"));
    }

    #[test]
    fn test_work_phone_is_not_the_stored_phone() {
        let resume = detail(json!({
            "id": "r1",
            "contact": [
                {"type": {"id": "cell"}, "value": {"formatted": "+7 111"}},
                {"type": {"id": "work"}, "value": {"formatted": "+7 333"}}
            ]
        }))
        .unwrap();
        assert_eq!(resume.contacts[1].kind, ContactKind::Other);
        assert_eq!(resume.phone(), Some("+7 111"));
    }

    #[test]
    fn test_unlock_action_defaults_to_get() {
        let resume = detail(json!({
            "id": "r1",
            "actions": {"get_with_contact": {"url": "https://api.hh.ru/resumes/r1?with_contact=true"}}
        }))
        .unwrap();
        let action = resume.paid_unlock_action.unwrap();
        assert_eq!(action.method, "GET");
        assert!(action.url.ends_with("with_contact=true"));
    }

    #[test]
    fn test_unlock_action_without_url_is_rejected() {
        let err = detail(json!({"id": "r1", "actions": {"get_with_contact": {}}})).unwrap_err();
        assert_eq!(err, PayloadError::MissingActionUrl("r1".into()));
    }

    #[test]
    fn test_summary_fields_flatten_nested_objects() {
        let resume = detail(json!({
            "id": "r1",
            "area": {"id": "1", "name": "Москва"},
            "salary": {"amount": 150000, "currency": "RUR"},
            "total_experience": {"months": 74},
            "alternate_url": "https://hh.ru/resume/r1"
        }))
        .unwrap();
        assert_eq!(resume.summary.area.as_deref(), Some("Москва"));
        assert_eq!(resume.summary.total_experience_months, Some(74));
        assert_eq!(resume.profile_url(), Some("https://hh.ru/resume/r1"));
        assert!(!resume.has_contacts());
    }
}
