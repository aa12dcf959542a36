use reqwest::Method;

use super::ApiClient;
use crate::models::{Course, CourseInput, Lesson, LessonInput, ListQuery, Result};

impl ApiClient {
    // ============== 课程 ==============

    pub async fn list_courses(&self, query: &ListQuery) -> Result<Vec<Course>> {
        let builder = self.request(Method::GET, "courses")?.query(query);
        self.send_json(builder).await
    }

    pub async fn get_course(&self, id: i64) -> Result<Course> {
        self.get_json(&format!("courses/{id}")).await
    }

    pub async fn create_course(&self, input: &CourseInput) -> Result<Course> {
        let builder = self.request(Method::POST, "courses")?.json(input);
        self.send_json(builder).await
    }

    pub async fn update_course(&self, id: i64, input: &CourseInput) -> Result<Course> {
        let builder = self
            .request(Method::PUT, &format!("courses/{id}"))?
            .json(input);
        self.send_json(builder).await
    }

    pub async fn delete_course(&self, id: i64) -> Result<()> {
        self.delete(&format!("courses/{id}")).await
    }

    // ============== 课时 ==============

    pub async fn list_lessons(&self, course_id: i64) -> Result<Vec<Lesson>> {
        self.get_json(&format!("courses/{course_id}/lessons")).await
    }

    /// 直接请求后端；需要缓存时使用 [`crate::lesson_cache::LessonCache::get_or_fetch`]
    pub async fn get_lesson(&self, id: i64) -> Result<Lesson> {
        self.get_json(&format!("lessons/{id}")).await
    }

    pub async fn create_lesson(&self, input: &LessonInput) -> Result<Lesson> {
        let builder = self.request(Method::POST, "lessons")?.json(input);
        self.send_json(builder).await
    }

    pub async fn update_lesson(&self, id: i64, input: &LessonInput) -> Result<Lesson> {
        let builder = self
            .request(Method::PUT, &format!("lessons/{id}"))?
            .json(input);
        self.send_json(builder).await
    }

    pub async fn delete_lesson(&self, id: i64) -> Result<()> {
        self.delete(&format!("lessons/{id}")).await
    }
}
