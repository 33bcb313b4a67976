//! Query-string ingress for resume search.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::criteria::{SearchCriteria, SearchField};

/// Raw search parameters as submitted. Every field is optional and empty
/// strings count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    pub text: Option<String>,
    pub area: Option<String>,
    pub experience: Option<String>,
    pub salary_from: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
    pub skills_must_have: Option<String>,
    pub skills_nice_to_have: Option<String>,
    pub excluded_words: Option<String>,
    pub search_field: Option<String>,
    pub exact_phrase: Option<String>,
    pub period: Option<String>,
}

impl SearchForm {
    pub fn into_criteria(self) -> Result<SearchCriteria, AppError> {
        Ok(SearchCriteria {
            free_text: self.text.unwrap_or_default().trim().to_string(),
            area: present(self.area),
            experience_band: present(self.experience),
            salary_from: parse_number("salary_from", self.salary_from)?,
            results_per_page: parse_number("per_page", self.per_page)?,
            page: parse_number("page", self.page)?,
            must_have_skills: split_list(self.skills_must_have),
            nice_to_have_skills: split_list(self.skills_nice_to_have),
            excluded_words: split_list(self.excluded_words),
            search_field: parse_field(self.search_field)?,
            exact_phrase: present(self.exact_phrase)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "on" | "true" | "1" | "yes"))
                .unwrap_or(false),
            updated_within_days: parse_number("period", self.period)?,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T: std::str::FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, AppError> {
    present(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| AppError::Validation(format!("{name} must be a non-negative integer, got '{v}'")))
        })
        .transpose()
}

fn parse_field(value: Option<String>) -> Result<SearchField, AppError> {
    match present(value).as_deref() {
        None | Some("all") => Ok(SearchField::All),
        Some("title") => Ok(SearchField::Title),
        Some("experience") => Ok(SearchField::Experience),
        Some(other) => Err(AppError::Validation(format!(
            "search_field must be one of all, title, experience; got '{other}'"
        ))),
    }
}

/// Comma-separated list; entries trimmed, empties dropped.
fn split_list(value: Option<String>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
