use serde::{Deserialize, Serialize};

/// Which part of a resume the free text is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    #[default]
    All,
    Title,
    Experience,
}

impl SearchField {
    /// Provider-side field name; `None` means no restriction.
    pub fn provider_field(self) -> Option<&'static str> {
        match self {
            SearchField::All => None,
            SearchField::Title => Some("name"),
            SearchField::Experience => Some("description"),
        }
    }
}

/// Structured resume search criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub free_text: String,
    pub area: Option<String>,
    pub experience_band: Option<String>,
    pub salary_from: Option<u64>,
    pub results_per_page: Option<u32>,
    pub page: Option<u32>,
    pub must_have_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub excluded_words: Vec<String>,
    pub search_field: SearchField,
    pub exact_phrase: bool,
    pub updated_within_days: Option<u32>,
}
