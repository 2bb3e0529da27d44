//! Mock providers. They sleep for a fixed time and return constant data;
//! the input is ignored.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::models::analysis::{AnalysisResult, Category};
use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo, StructuredResume};
use crate::models::upload::UploadedFile;
use crate::providers::{AnalysisProvider, ImprovementGenerator, ProviderError, ResumeParser};

pub const ANALYZE_LATENCY: Duration = Duration::from_secs(3);
pub const PARSE_LATENCY: Duration = Duration::from_secs(2);
pub const IMPROVE_LATENCY: Duration = Duration::from_secs(2);

pub const MOCK_IMPROVED_RESUME: &str = "This would be the AI-improved version of the resume.";

pub fn mock_analysis() -> AnalysisResult {
    AnalysisResult {
        overall_score: 78,
        ats_compatibility: Category {
            score: 85,
            feedback: "Your resume is compatible with most ATS systems.".to_string(),
        },
        skills_match: Category {
            score: 70,
            feedback: "Consider adding more technical skills relevant to your target roles."
                .to_string(),
        },
        format_structure: Category {
            score: 90,
            feedback: "Clean structure with good use of headings and bullet points.".to_string(),
        },
        content_quality: Category {
            score: 65,
            feedback: "Use more action verbs and quantify your achievements.".to_string(),
        },
        suggestions: vec![
            "Add metrics to your achievements (e.g., 'Increased sales by 20%' instead of 'Increased sales')".to_string(),
            "Include keywords from job descriptions like 'data analysis' and 'project management'".to_string(),
            "Remove outdated skills and focus on current technologies".to_string(),
            "Shorten your resume to 1-2 pages for better readability".to_string(),
        ],
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn mock_resume() -> StructuredResume {
    StructuredResume {
        personal_info: Some(PersonalInfo {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "(123) 456-7890".to_string(),
            location: "New York, NY".to_string(),
        }),
        skills: strings(&[
            "JavaScript",
            "React",
            "Node.js",
            "TypeScript",
            "HTML",
            "CSS",
            "Git",
            "Agile",
            "Project Management",
            "UI/UX Design",
        ]),
        experience: vec![
            ExperienceEntry {
                company: "Tech Solutions Inc.".to_string(),
                title: "Senior Frontend Developer".to_string(),
                start_date: "Jan 2020".to_string(),
                end_date: "Present".to_string(),
                description: strings(&[
                    "Led a team of 5 developers to build a responsive web application",
                    "Improved site performance by 40% through code optimization",
                    "Implemented CI/CD pipeline reducing deployment time by 60%",
                ]),
            },
            ExperienceEntry {
                company: "Digital Innovations".to_string(),
                title: "Frontend Developer".to_string(),
                start_date: "Mar 2017".to_string(),
                end_date: "Dec 2019".to_string(),
                description: strings(&[
                    "Developed and maintained client websites using React and TypeScript",
                    "Collaborated with designers to implement UI/UX improvements",
                    "Participated in code reviews and mentored junior developers",
                ]),
            },
        ],
        education: vec![EducationEntry {
            institution: "University of Technology".to_string(),
            degree: "Bachelor of Science".to_string(),
            field: "Computer Science".to_string(),
            graduation_date: "May 2017".to_string(),
        }],
    }
}

pub struct MockAnalysisProvider {
    pub latency: Duration,
}

impl Default for MockAnalysisProvider {
    fn default() -> Self {
        Self {
            latency: ANALYZE_LATENCY,
        }
    }
}

#[async_trait]
impl AnalysisProvider for MockAnalysisProvider {
    async fn analyze(&self, resume_text: &str) -> Result<AnalysisResult, ProviderError> {
        debug!(chars = resume_text.len(), "Mock analysis");
        tokio::time::sleep(self.latency).await;
        Ok(mock_analysis())
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}

pub struct MockResumeParser {
    pub latency: Duration,
}

impl Default for MockResumeParser {
    fn default() -> Self {
        Self {
            latency: PARSE_LATENCY,
        }
    }
}

#[async_trait]
impl ResumeParser for MockResumeParser {
    async fn parse(&self, file: &UploadedFile) -> Result<StructuredResume, ProviderError> {
        debug!(file = %file.file_name, size = file.size(), "Mock parse");
        tokio::time::sleep(self.latency).await;
        Ok(mock_resume())
    }
}

pub struct MockImprovementGenerator {
    pub latency: Duration,
}

impl Default for MockImprovementGenerator {
    fn default() -> Self {
        Self {
            latency: IMPROVE_LATENCY,
        }
    }
}

#[async_trait]
impl ImprovementGenerator for MockImprovementGenerator {
    async fn improve(&self, _resume_text: &str) -> Result<String, ProviderError> {
        tokio::time::sleep(self.latency).await;
        Ok(MOCK_IMPROVED_RESUME.to_string())
    }
}
