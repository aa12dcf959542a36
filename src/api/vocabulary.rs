use reqwest::Method;

use super::ApiClient;
use crate::models::{
    ListQuery, Result, SenseTranslation, TranslationInput, Word, WordInput, WordSense,
    WordSenseInput,
};

impl ApiClient {
    /// 按关键字 / HSK 等级搜索词，支持分页
    pub async fn search_words(&self, query: &ListQuery) -> Result<Vec<Word>> {
        let builder = self.request(Method::GET, "words")?.query(query);
        self.send_json(builder).await
    }

    pub async fn get_word(&self, id: i64) -> Result<Word> {
        self.get_json(&format!("words/{id}")).await
    }

    pub async fn create_word(&self, input: &WordInput) -> Result<Word> {
        let builder = self.request(Method::POST, "words")?.json(input);
        self.send_json(builder).await
    }

    pub async fn update_word(&self, id: i64, input: &WordInput) -> Result<Word> {
        let builder = self.request(Method::PUT, &format!("words/{id}"))?.json(input);
        self.send_json(builder).await
    }

    pub async fn delete_word(&self, id: i64) -> Result<()> {
        self.delete(&format!("words/{id}")).await
    }

    // ============== 义项 ==============

    pub async fn list_senses(&self, word_id: i64) -> Result<Vec<WordSense>> {
        self.get_json(&format!("words/{word_id}/senses")).await
    }

    pub async fn create_sense(&self, word_id: i64, input: &WordSenseInput) -> Result<WordSense> {
        let builder = self
            .request(Method::POST, &format!("words/{word_id}/senses"))?
            .json(input);
        self.send_json(builder).await
    }

    pub async fn update_sense(&self, sense_id: i64, input: &WordSenseInput) -> Result<WordSense> {
        let builder = self
            .request(Method::PUT, &format!("senses/{sense_id}"))?
            .json(input);
        self.send_json(builder).await
    }

    pub async fn delete_sense(&self, sense_id: i64) -> Result<()> {
        self.delete(&format!("senses/{sense_id}")).await
    }

    // ============== 义项翻译 ==============

    pub async fn list_sense_translations(&self, sense_id: i64) -> Result<Vec<SenseTranslation>> {
        self.get_json(&format!("senses/{sense_id}/translations")).await
    }

    pub async fn create_sense_translation(
        &self,
        sense_id: i64,
        input: &TranslationInput,
    ) -> Result<SenseTranslation> {
        let builder = self
            .request(Method::POST, &format!("senses/{sense_id}/translations"))?
            .json(input);
        self.send_json(builder).await
    }

    pub async fn delete_sense_translation(&self, translation_id: i64) -> Result<()> {
        self.delete(&format!("translations/{translation_id}")).await
    }
}
