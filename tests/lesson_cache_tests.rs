//! 课时缓存测试：文件存储持久化与读穿行为

use hanyu_admin_lib::models::Lesson;
use hanyu_admin_lib::storage::{FileStore, KeyValueStore, LESSON_CACHE_KEY};
use hanyu_admin_lib::{ApiClient, LessonCache};
use mockito::Server;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn sample_lesson(id: i64) -> Lesson {
    serde_json::from_value(json!({
        "id": id,
        "courseId": 2,
        "title": "第一课：问候",
        "description": "你好、谢谢、再见",
        "orderIndex": 1,
        "isPublished": true,
        "createdAt": "2024-03-01T08:00:00Z"
    }))
    .unwrap()
}

#[test]
fn test_cached_lesson_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let lesson = sample_lesson(7);

    {
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let cache = LessonCache::new(store);
        cache.set_cached_lesson(&lesson).unwrap();
        cache.set_current_lesson_id(Some(7)).unwrap();
    }

    let store = Arc::new(FileStore::open(dir.path()).unwrap());
    assert!(store.contains(LESSON_CACHE_KEY).unwrap());
    let cache = LessonCache::new(store);
    assert_eq!(cache.get_cached_lesson(7).unwrap(), Some(lesson));
    assert_eq!(cache.current_lesson_id().unwrap(), Some(7));

    cache.clear().unwrap();
    assert_eq!(cache.get_cached_lesson(7).unwrap(), None);
}

#[tokio::test]
async fn test_get_or_fetch_reads_through_once() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let api = ApiClient::with_client(
        reqwest::Client::new(),
        &format!("{}/api", server.url()),
        store.clone(),
    )
    .unwrap();
    let cache = LessonCache::new(store);

    let lesson = sample_lesson(9);
    let fetch = server
        .mock("GET", "/api/lessons/9")
        .with_status(200)
        .with_body(json!({ "data": lesson }).to_string())
        .expect(1)
        .create_async()
        .await;

    let first = cache.get_or_fetch(&api, 9).await.unwrap();
    let second = cache.get_or_fetch(&api, 9).await.unwrap();
    assert_eq!(first, lesson);
    assert_eq!(second, lesson);
    fetch.assert_async().await;
    drop(fetch);

    // 失效后重新请求
    assert!(cache.invalidate(9).unwrap());
    let refetch = server
        .mock("GET", "/api/lessons/9")
        .with_status(200)
        .with_body(json!(lesson).to_string())
        .expect(1)
        .create_async()
        .await;
    cache.get_or_fetch(&api, 9).await.unwrap();
    refetch.assert_async().await;
}

#[tokio::test]
async fn test_cached_lesson_needs_no_network() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let api = ApiClient::with_client(
        reqwest::Client::new(),
        &format!("{}/api", server.url()),
        store.clone(),
    )
    .unwrap();
    let cache = LessonCache::new(store);
    let lesson = sample_lesson(3);
    cache.set_cached_lesson(&lesson).unwrap();

    let never = server
        .mock("GET", "/api/lessons/3")
        .expect(0)
        .create_async()
        .await;
    assert_eq!(cache.get_or_fetch(&api, 3).await.unwrap(), lesson);
    never.assert_async().await;
}
