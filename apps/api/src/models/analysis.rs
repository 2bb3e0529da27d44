use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// One scored dimension of the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub score: u8,
    pub feedback: String,
}

/// The four categories, in the order they appear in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    AtsCompatibility,
    SkillsMatch,
    FormatStructure,
    ContentQuality,
}

impl CategoryKind {
    pub const REPORT_ORDER: [CategoryKind; 4] = [
        CategoryKind::AtsCompatibility,
        CategoryKind::SkillsMatch,
        CategoryKind::FormatStructure,
        CategoryKind::ContentQuality,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            CategoryKind::AtsCompatibility => "ATS Compatibility",
            CategoryKind::SkillsMatch => "Skills Match",
            CategoryKind::FormatStructure => "Format & Structure",
            CategoryKind::ContentQuality => "Content Quality",
        }
    }
}

/// Score/feedback payload returned by an analysis provider.
///
/// Wire format matches the analysis backend: camelCase keys, overall score under `score`.
/// Extra keys the backend sends (e.g. `skills`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "score", alias = "overallScore")]
    pub overall_score: u8,
    pub ats_compatibility: Category,
    pub skills_match: Category,
    pub format_structure: Category,
    pub content_quality: Category,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

pub const MAX_SCORE: u8 = 100;

impl AnalysisResult {
    pub fn category(&self, kind: CategoryKind) -> &Category {
        match kind {
            CategoryKind::AtsCompatibility => &self.ats_compatibility,
            CategoryKind::SkillsMatch => &self.skills_match,
            CategoryKind::FormatStructure => &self.format_structure,
            CategoryKind::ContentQuality => &self.content_quality,
        }
    }

    /// Categories paired with their kind, in report order.
    pub fn categories(&self) -> impl Iterator<Item = (CategoryKind, &Category)> {
        CategoryKind::REPORT_ORDER
            .into_iter()
            .map(move |kind| (kind, self.category(kind)))
    }

    /// Rejects scores outside `[0, 100]`.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.overall_score > MAX_SCORE {
            return Err(AppError::Validation(format!(
                "overall score {} exceeds {MAX_SCORE}",
                self.overall_score
            )));
        }
        for (kind, category) in self.categories() {
            if category.score > MAX_SCORE {
                return Err(AppError::Validation(format!(
                    "{} score {} exceeds {MAX_SCORE}",
                    kind.heading(),
                    category.score
                )));
            }
        }
        Ok(())
    }
}
