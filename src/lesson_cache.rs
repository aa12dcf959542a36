//! 课时读穿缓存
//!
//! 缓存以 `{ "<lessonId>": Lesson }` 的 JSON 形式整体存放在 `lessonCache` 键下，
//! 只在显式 `invalidate`/`clear` 时失效，没有过期时间。并发写入以最后一次为准。
//! 当前正在编辑的课时 ID 存在 `currentLessonId` 键下。

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::models::{Lesson, Result};
use crate::storage::{KeyValueStore, CURRENT_LESSON_ID_KEY, LESSON_CACHE_KEY};

type CacheMap = BTreeMap<String, Lesson>;

#[derive(Clone)]
pub struct LessonCache {
    store: Arc<dyn KeyValueStore>,
}

impl LessonCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<CacheMap> {
        let Some(raw) = self.store.get(LESSON_CACHE_KEY)? else {
            return Ok(CacheMap::new());
        };
        match serde_json::from_str::<CacheMap>(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!("课时缓存已损坏，将重置: {}", e);
                self.store.remove(LESSON_CACHE_KEY)?;
                Ok(CacheMap::new())
            }
        }
    }

    fn save(&self, map: &CacheMap) -> Result<()> {
        if map.is_empty() {
            self.store.remove(LESSON_CACHE_KEY)?;
        } else {
            self.store.set(LESSON_CACHE_KEY, &serde_json::to_string(map)?)?;
        }
        Ok(())
    }

    pub fn get_cached_lesson(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        Ok(self.load()?.remove(&lesson_id.to_string()))
    }

    pub fn set_cached_lesson(&self, lesson: &Lesson) -> Result<()> {
        let mut map = self.load()?;
        map.insert(lesson.id.to_string(), lesson.clone());
        self.save(&map)
    }

    pub fn invalidate(&self, lesson_id: i64) -> Result<bool> {
        let mut map = self.load()?;
        let removed = map.remove(&lesson_id.to_string()).is_some();
        if removed {
            self.save(&map)?;
        }
        Ok(removed)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(LESSON_CACHE_KEY)?;
        Ok(())
    }

    /// 命中缓存直接返回，否则请求后端并写入缓存
    pub async fn get_or_fetch(&self, api: &ApiClient, lesson_id: i64) -> Result<Lesson> {
        if let Some(lesson) = self.get_cached_lesson(lesson_id)? {
            tracing::debug!("课时缓存命中: {}", lesson_id);
            return Ok(lesson);
        }
        let lesson = api.get_lesson(lesson_id).await?;
        self.set_cached_lesson(&lesson)?;
        Ok(lesson)
    }

    pub fn current_lesson_id(&self) -> Result<Option<i64>> {
        Ok(self
            .store
            .get(CURRENT_LESSON_ID_KEY)?
            .and_then(|raw| raw.trim().parse().ok()))
    }

    pub fn set_current_lesson_id(&self, lesson_id: Option<i64>) -> Result<()> {
        match lesson_id {
            Some(id) => self.store.set(CURRENT_LESSON_ID_KEY, &id.to_string())?,
            None => self.store.remove(CURRENT_LESSON_ID_KEY)?,
        }
        Ok(())
    }
}
