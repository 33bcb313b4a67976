//! Translates `SearchCriteria` into provider query parameters.
//!
//! Text composition order is fixed:
//! 1. free text
//! 2. must-have skills, space-joined (implicit AND)
//! 3. nice-to-have skills, `" OR "`-joined
//! 4. exact phrase wraps everything composed so far in quotes
//! 5. each excluded word appends `NOT "<word>"`

use chrono::{Days, NaiveDate, Utc};

use crate::models::criteria::SearchCriteria;

pub const DEFAULT_AREA: &str = "1";
pub const DEFAULT_PER_PAGE: u32 = 20;

pub type QueryParams = Vec<(&'static str, String)>;

#[derive(Debug, Clone, Copy)]
pub struct SearchQueryBuilder {
    today: NaiveDate,
}

impl SearchQueryBuilder {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn for_today() -> Self {
        Self::new(Utc::now().date_naive())
    }

    pub fn build(&self, criteria: &SearchCriteria) -> QueryParams {
        let mut params: QueryParams = vec![
            ("text", compose_text(criteria)),
            (
                "area",
                criteria
                    .area
                    .clone()
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_AREA.to_string()),
            ),
            (
                "per_page",
                criteria
                    .results_per_page
                    .unwrap_or(DEFAULT_PER_PAGE)
                    .to_string(),
            ),
            ("page", criteria.page.unwrap_or(0).to_string()),
        ];

        if let Some(experience) = criteria
            .experience_band
            .as_ref()
            .filter(|e| !e.trim().is_empty())
        {
            params.push(("experience", experience.clone()));
        }
        if let Some(salary) = criteria.salary_from {
            params.push(("salary_from", salary.to_string()));
        }
        if let Some(field) = criteria.search_field.provider_field() {
            params.push(("text.field", field.to_string()));
        }
        // Periods reaching before the calendar's minimum date mean "no limit".
        if let Some(since) = criteria
            .updated_within_days
            .and_then(|days| self.today.checked_sub_days(Days::new(u64::from(days))))
        {
            params.push(("date_from", since.format("%Y-%m-%d").to_string()));
        }

        params
    }
}

pub fn compose_text(criteria: &SearchCriteria) -> String {
    let mut text = criteria.free_text.trim().to_string();

    let must = clean(&criteria.must_have_skills);
    if !must.is_empty() {
        append(&mut text, &must.join(" "));
    }

    let nice = clean(&criteria.nice_to_have_skills);
    if !nice.is_empty() {
        append(&mut text, &nice.join(" OR "));
    }

    if criteria.exact_phrase && !text.is_empty() {
        text = format!("\"{text}\"");
    }

    for word in clean(&criteria.excluded_words) {
        append(&mut text, &format!("NOT \"{}\"", word.replace('"', "")));
    }

    text
}

fn clean(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

fn append(text: &mut String, part: &str) {
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(part);
}
