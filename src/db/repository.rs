use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{CourseStore, StoreError};
use crate::models::{Course, NewCourse};

const SELECT_COURSES: &str =
    "SELECT id, courseCode, title, credits, COALESCE(description, '') AS description, semester FROM courses";

#[derive(Clone)]
pub struct SqliteCourseStore {
    db: SqlitePool,
    timeout: Duration,
}

impl SqliteCourseStore {
    pub fn new(db: SqlitePool, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    // A statement that outlives the timeout is reported once as Timeout and
    // its late result is dropped.
    async fn timed<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl CourseStore for SqliteCourseStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.timed(sqlx::query("SELECT 1").execute(&self.db)).await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Course>, StoreError> {
        let sql = format!("{SELECT_COURSES} ORDER BY id");
        self.timed(sqlx::query_as::<_, Course>(&sql).fetch_all(&self.db))
            .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Course>, StoreError> {
        let sql = format!("{SELECT_COURSES} WHERE id = ?");
        self.timed(
            sqlx::query_as::<_, Course>(&sql)
                .bind(id)
                .fetch_optional(&self.db),
        )
        .await
    }

    async fn insert(&self, course: &NewCourse) -> Result<i64, StoreError> {
        let result = self
            .timed(
                sqlx::query(
                    "INSERT INTO courses (courseCode, title, credits, description, semester) VALUES (?, ?, ?, ?, ?)",
                )
                .bind(&course.course_code)
                .bind(&course.title)
                .bind(course.credits)
                .bind(&course.description)
                .bind(&course.semester)
                .execute(&self.db),
            )
            .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, course: &NewCourse) -> Result<u64, StoreError> {
        let result = self
            .timed(
                sqlx::query(
                    "UPDATE courses SET courseCode = ?, title = ?, credits = ?, description = ?, semester = ? WHERE id = ?",
                )
                .bind(&course.course_code)
                .bind(&course.title)
                .bind(course.credits)
                .bind(&course.description)
                .bind(&course.semester)
                .bind(id)
                .execute(&self.db),
            )
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let result = self
            .timed(
                sqlx::query("DELETE FROM courses WHERE id = ?")
                    .bind(id)
                    .execute(&self.db),
            )
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MIGRATOR;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_store() -> SqliteCourseStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");

        MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        SqliteCourseStore::new(pool, Duration::from_secs(5))
    }

    fn calculus() -> NewCourse {
        NewCourse {
            course_code: "MATH150".to_string(),
            title: "Calculus I".to_string(),
            credits: 4,
            description: "Basic calculus".to_string(),
            semester: "Fall 2024".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_course() {
        let store = setup_test_store().await;

        let id = store.insert(&calculus()).await.expect("Failed to insert course");
        let course = store
            .get_by_id(id)
            .await
            .expect("Failed to fetch course")
            .expect("Course not found");

        assert_eq!(course, calculus().with_id(id));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let store = setup_test_store().await;

        let first = store.insert(&calculus()).await.unwrap();
        assert_eq!(store.delete_by_id(first).await.unwrap(), 1);
        let second = store.insert(&calculus()).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_list_all_in_storage_order() {
        let store = setup_test_store().await;
        assert!(store.list_all().await.unwrap().is_empty());

        let a = store.insert(&calculus()).await.unwrap();
        let b = store
            .insert(&NewCourse {
                course_code: "CS101".to_string(),
                title: "Intro Programming".to_string(),
                credits: 3,
                description: String::new(),
                semester: "Fall 2024".to_string(),
            })
            .await
            .unwrap();

        let ids: Vec<i64> = store.list_all().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn test_null_description_reads_as_empty() {
        let store = setup_test_store().await;
        sqlx::query(
            "INSERT INTO courses (courseCode, title, credits, description, semester) VALUES ('ENG101', 'Composition I', 3, NULL, 'Spring 2025')",
        )
        .execute(&store.db)
        .await
        .unwrap();

        let courses = store.list_all().await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].description, "");
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_id() {
        let store = setup_test_store().await;
        let id = store.insert(&calculus()).await.unwrap();

        let changed = NewCourse {
            course_code: "MATH151".to_string(),
            title: "Calculus II".to_string(),
            credits: 5,
            description: String::new(),
            semester: "Spring 2025".to_string(),
        };
        assert_eq!(store.update(id, &changed).await.unwrap(), 1);

        let course = store.get_by_id(id).await.unwrap().expect("Course not found");
        assert_eq!(course, changed.with_id(id));
    }

    #[tokio::test]
    async fn test_missing_id_reports_zero_rows() {
        let store = setup_test_store().await;

        assert!(store.get_by_id(999_999).await.unwrap().is_none());
        assert_eq!(store.update(999_999, &calculus()).await.unwrap(), 0);
        assert_eq!(store.delete_by_id(999_999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_absent() {
        let store = setup_test_store().await;
        let id = store.insert(&calculus()).await.unwrap();

        assert_eq!(store.delete_by_id(id).await.unwrap(), 1);
        assert!(store.get_by_id(id).await.unwrap().is_none());
        assert_eq!(store.delete_by_id(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bound_values_are_stored_literally() {
        let store = setup_test_store().await;
        let hostile = NewCourse {
            title: "x'); DROP TABLE courses; --".to_string(),
            ..calculus()
        };

        let id = store.insert(&hostile).await.unwrap();
        let course = store.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(course.title, hostile.title);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_pool_is_store_error() {
        let store = setup_test_store().await;
        store.db.close().await;

        assert!(matches!(store.list_all().await, Err(StoreError::Database(_))));
        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_stalled_call_times_out() {
        let store = SqliteCourseStore::new(setup_test_store().await.db, Duration::from_millis(10));

        let result = store
            .timed(std::future::pending::<Result<(), sqlx::Error>>())
            .await;

        assert!(matches!(result, Err(StoreError::Timeout(d)) if d == Duration::from_millis(10)));
    }
}
