use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::assessment::interest::InterestCategory;

/// A weighted interest label on a career (weight 0–100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestTag {
    pub category: InterestCategory,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct CareerRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub core_skills: Vec<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub interest_tags: Json<Vec<InterestTag>>,
}

/// A catalog entry as the recommendation pipeline sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub core_skills: Vec<String>,
    pub average_salary: Option<SalaryRange>,
    pub interest_tags: Vec<InterestTag>,
}

impl From<CareerRow> for CareerRecord {
    fn from(row: CareerRow) -> Self {
        let average_salary = match (row.salary_min, row.salary_max) {
            (Some(min), Some(max)) => Some(SalaryRange { min, max }),
            _ => None,
        };
        Self {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            core_skills: row.core_skills,
            average_salary,
            interest_tags: row.interest_tags.0,
        }
    }
}
