use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

pub const REQUIRED_FIELDS_MESSAGE: &str = "courseCode, title, credits, and semester are required";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    #[sqlx(rename = "courseCode")]
    pub course_code: String,
    pub title: String,
    pub credits: i64,
    pub description: String,
    pub semester: String,
}

/// Payload of a create or update request, exactly as the client sent it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    pub course_code: Option<String>,
    pub title: Option<String>,
    pub credits: Option<i64>,
    pub description: Option<String>,
    pub semester: Option<String>,
}

/// The five editable fields of a course after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub course_code: String,
    pub title: String,
    pub credits: i64,
    pub description: String,
    pub semester: String,
}

impl CourseRequest {
    /// Missing, empty and zero values all count as absent.
    pub fn validate(self) -> Result<NewCourse, AppError> {
        let course_code = non_empty(self.course_code);
        let title = non_empty(self.title);
        let credits = self.credits.filter(|c| *c != 0);
        let semester = non_empty(self.semester);

        match (course_code, title, credits, semester) {
            (Some(course_code), Some(title), Some(credits), Some(semester)) => Ok(NewCourse {
                course_code,
                title,
                credits,
                description: self.description.unwrap_or_default(),
                semester,
            }),
            _ => Err(AppError::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string())),
        }
    }
}

impl NewCourse {
    pub fn with_id(self, id: i64) -> Course {
        Course {
            id,
            course_code: self.course_code,
            title: self.title,
            credits: self.credits,
            description: self.description,
            semester: self.semester,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
