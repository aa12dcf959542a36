use reqwest::Method;

use super::ApiClient;
use crate::models::{
    GrammarPattern, GrammarPatternInput, GrammarTranslation, ListQuery, Result, TranslationInput,
};

impl ApiClient {
    pub async fn list_grammar_patterns(&self, query: &ListQuery) -> Result<Vec<GrammarPattern>> {
        let builder = self.request(Method::GET, "grammar-patterns")?.query(query);
        self.send_json(builder).await
    }

    pub async fn get_grammar_pattern(&self, id: i64) -> Result<GrammarPattern> {
        self.get_json(&format!("grammar-patterns/{id}")).await
    }

    pub async fn create_grammar_pattern(
        &self,
        input: &GrammarPatternInput,
    ) -> Result<GrammarPattern> {
        let builder = self.request(Method::POST, "grammar-patterns")?.json(input);
        self.send_json(builder).await
    }

    pub async fn update_grammar_pattern(
        &self,
        id: i64,
        input: &GrammarPatternInput,
    ) -> Result<GrammarPattern> {
        let builder = self
            .request(Method::PUT, &format!("grammar-patterns/{id}"))?
            .json(input);
        self.send_json(builder).await
    }

    pub async fn delete_grammar_pattern(&self, id: i64) -> Result<()> {
        self.delete(&format!("grammar-patterns/{id}")).await
    }

    pub async fn list_grammar_translations(
        &self,
        pattern_id: i64,
    ) -> Result<Vec<GrammarTranslation>> {
        self.get_json(&format!("grammar-patterns/{pattern_id}/translations"))
            .await
    }

    pub async fn create_grammar_translation(
        &self,
        pattern_id: i64,
        input: &TranslationInput,
    ) -> Result<GrammarTranslation> {
        let builder = self
            .request(
                Method::POST,
                &format!("grammar-patterns/{pattern_id}/translations"),
            )?
            .json(input);
        self.send_json(builder).await
    }

    pub async fn delete_grammar_translation(&self, translation_id: i64) -> Result<()> {
        self.delete(&format!("grammar-translations/{translation_id}"))
            .await
    }
}
