//! 学习进度统计（仪表盘组件的数据源）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::models::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverview {
    pub total_learners: u64,
    #[serde(default)]
    pub active_learners: u64,
    #[serde(default)]
    pub lessons_completed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub lessons_completed: u32,
    pub total_lessons: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<DateTime<Utc>>,
}

impl UserProgress {
    /// 完成率（0.0-1.0），总课时为 0 时返回 0
    pub fn completion_rate(&self) -> f64 {
        ratio(self.lessons_completed, self.total_lessons)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub lesson_id: i64,
    pub started: u32,
    pub completed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
}

impl LessonProgress {
    pub fn completion_rate(&self) -> f64 {
        ratio(self.completed, self.started)
    }
}

fn ratio(done: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        (done as f64 / total as f64).min(1.0)
    }
}

impl ApiClient {
    pub async fn progress_overview(&self) -> Result<ProgressOverview> {
        self.get_json("progress/overview").await
    }

    pub async fn user_progress(&self, user_id: i64) -> Result<UserProgress> {
        self.get_json(&format!("progress/users/{user_id}")).await
    }

    pub async fn lesson_progress(&self, lesson_id: i64) -> Result<LessonProgress> {
        self.get_json(&format!("progress/lessons/{lesson_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_rate() {
        let lesson = LessonProgress {
            lesson_id: 1,
            started: 8,
            completed: 6,
            average_score: None,
        };
        assert!((lesson.completion_rate() - 0.75).abs() < f64::EPSILON);

        let empty = LessonProgress {
            lesson_id: 2,
            started: 0,
            completed: 0,
            average_score: None,
        };
        assert_eq!(empty.completion_rate(), 0.0);
    }
}
