use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
}

impl PersonalInfo {
    /// `email | phone | location`, the contact line under the name.
    pub fn contact_line(&self) -> String {
        format!("{} | {} | {}", self.email, self.phone, self.location)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub graduation_date: String,
}

/// Structured resume produced by a `ResumeParser`. Every section is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredResume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
}

impl StructuredResume {
    /// True when there is anything to put on the "Optimized Resume" page.
    pub fn has_content(&self) -> bool {
        self.personal_info.is_some()
            || !self.skills.is_empty()
            || !self.experience.is_empty()
            || !self.education.is_empty()
    }

    pub fn skills_line(&self) -> String {
        self.skills.join(", ")
    }
}
