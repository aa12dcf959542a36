use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use super::ApiClient;
use crate::authoring::{AuthoringBackend, ContentItem, QuestionItem};
use crate::models::{AppError, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderRequest<'a> {
    question_ids: &'a [i64],
}

impl ApiClient {
    // ============== 课时内容 ==============

    pub async fn list_lesson_content(&self, lesson_id: i64) -> Result<Vec<ContentItem>> {
        self.get_json(&format!("lessons/{lesson_id}/content")).await
    }

    pub async fn create_content(&self, item: &ContentItem) -> Result<ContentItem> {
        let builder = self.request(Method::POST, "lesson-content")?.json(item);
        self.send_json(builder).await
    }

    pub async fn update_content(&self, id: i64, item: &ContentItem) -> Result<ContentItem> {
        let builder = self
            .request(Method::PUT, &format!("lesson-content/{id}"))?
            .json(item);
        self.send_json(builder).await
    }

    pub async fn delete_content(&self, id: i64) -> Result<()> {
        self.delete(&format!("lesson-content/{id}")).await
    }

    // ============== 题目 ==============

    pub async fn list_questions(&self, lesson_id: i64) -> Result<Vec<QuestionItem>> {
        self.get_json(&format!("lessons/{lesson_id}/questions")).await
    }

    pub async fn create_question(&self, item: &QuestionItem) -> Result<QuestionItem> {
        let builder = self.request(Method::POST, "questions")?.json(item);
        self.send_json(builder).await
    }

    pub async fn update_question(&self, id: i64, item: &QuestionItem) -> Result<QuestionItem> {
        let builder = self
            .request(Method::PUT, &format!("questions/{id}"))?
            .json(item);
        self.send_json(builder).await
    }

    pub async fn delete_question(&self, id: i64) -> Result<()> {
        self.delete(&format!("questions/{id}")).await
    }

    /// 按给定顺序重排课时题目，`question_ids` 需包含该课时的全部题目
    pub async fn reorder_questions(&self, lesson_id: i64, question_ids: &[i64]) -> Result<()> {
        if question_ids.is_empty() {
            return Err(AppError::validation("题目顺序不能为空"));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = question_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(AppError::validation(format!("题目 {dup} 重复出现")));
        }
        let builder = self
            .request(Method::PUT, &format!("lessons/{lesson_id}/questions/reorder"))?
            .json(&ReorderRequest { question_ids });
        self.send_empty(builder).await
    }
}

#[async_trait]
impl AuthoringBackend for ApiClient {
    async fn create_content(&self, item: &ContentItem) -> Result<ContentItem> {
        ApiClient::create_content(self, item).await
    }

    async fn update_content(&self, id: i64, item: &ContentItem) -> Result<ContentItem> {
        ApiClient::update_content(self, id, item).await
    }

    async fn create_question(&self, item: &QuestionItem) -> Result<QuestionItem> {
        ApiClient::create_question(self, item).await
    }

    async fn update_question(&self, id: i64, item: &QuestionItem) -> Result<QuestionItem> {
        ApiClient::update_question(self, id, item).await
    }
}
