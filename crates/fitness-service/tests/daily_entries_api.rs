//! 每日记录 API 集成测试

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, TimeZone, Utc};
use common::TestApp;
use fitness_shared::test_utils::{count_rows, insert_entry, insert_exercise};
use serde_json::json;

mod create {
    use super::*;

    #[tokio::test]
    async fn test_create_returns_201_with_entry() {
        let app = TestApp::new().await;

        let resp = app
            .post(
                "/api/daily-entries",
                json!({ "date": "2024-03-01", "weight": 72.4, "calories": 2100 }),
            )
            .await;

        assert_eq!(resp.status, StatusCode::CREATED);
        let body = resp.json();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["date"], json!("2024-03-01"));
        assert_eq!(body["data"]["weight"], json!(72.4));
        assert_eq!(body["data"]["calories"], json!(2100.0));
        assert!(body["data"]["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_duplicate_date_conflicts_with_existing_id() {
        let app = TestApp::new().await;
        let id = app.create_entry("2024-03-01", Some(70.0), None).await;

        let resp = app
            .post("/api/daily-entries", json!({ "date": "2024-03-01", "weight": 71.0 }))
            .await;

        assert_eq!(resp.status, StatusCode::CONFLICT);
        let body = resp.json();
        assert_eq!(body["code"], json!("ENTRY_ALREADY_EXISTS"));
        assert_eq!(body["data"]["entryId"], json!(id));
        assert_eq!(count_rows(&app.pool, "daily_entries").await, 1);
    }

    #[tokio::test]
    async fn test_invalid_payloads_are_rejected() {
        let app = TestApp::new().await;

        for payload in [
            json!({ "weight": 70.0 }),
            json!({ "date": "2024-13-01" }),
            json!({ "date": "2024-03-01", "weight": 0 }),
            json!({ "date": "2024-03-01", "weight": 1000.5 }),
            json!({ "date": "2024-03-01", "calories": -1 }),
            json!({ "date": "2024-03-01", "calories": 100001 }),
        ] {
            let resp = app.post("/api/daily-entries", payload.clone()).await;
            assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(resp.json()["code"], json!("VALIDATION_ERROR"), "{payload}");
        }
        assert_eq!(count_rows(&app.pool, "daily_entries").await, 0);
    }

    #[tokio::test]
    async fn test_boundary_values_are_accepted() {
        let app = TestApp::new().await;
        app.create_entry("2024-03-01", Some(1000.0), Some(0.0)).await;
        app.create_entry("2024-03-02", Some(0.1), Some(100000.0)).await;
        app.create_entry("2024-03-03", None, None).await;
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let app = TestApp::new().await;
        for date in ["2024-01-02", "2024-01-03", "2024-01-01"] {
            app.create_entry(date, Some(70.0), None).await;
        }

        let resp = app.get("/api/daily-entries").await;
        assert_eq!(resp.status, StatusCode::OK);
        let dates: Vec<String> = resp
            .data()
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["date"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
    }

    #[tokio::test]
    async fn test_get_by_id_and_date() {
        let app = TestApp::new().await;
        let id = app.create_entry("2024-02-29", Some(68.2), Some(1900.0)).await;

        let by_id = app.get(&format!("/api/daily-entries/{id}")).await;
        assert_eq!(by_id.status, StatusCode::OK);
        assert_eq!(by_id.data()["date"], json!("2024-02-29"));

        let by_date = app.get("/api/daily-entries/date/2024-02-29").await;
        assert_eq!(by_date.status, StatusCode::OK);
        assert_eq!(by_date.data()["id"], json!(id));
    }

    #[tokio::test]
    async fn test_missing_entries_return_404() {
        let app = TestApp::new().await;

        let by_id = app.get("/api/daily-entries/42").await;
        assert_eq!(by_id.status, StatusCode::NOT_FOUND);
        assert_eq!(by_id.json()["code"], json!("ENTRY_NOT_FOUND"));

        let by_date = app.get("/api/daily-entries/date/2024-01-01").await;
        assert_eq!(by_date.status, StatusCode::NOT_FOUND);
        assert_eq!(by_date.json()["code"], json!("ENTRY_NOT_FOUND_FOR_DATE"));

        let bad_date = app.get("/api/daily-entries/date/yesterday").await;
        assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_raw_rows_ordered_by_id() {
        let app = TestApp::new().await;
        let first = app.create_entry("2024-05-02", Some(70.0), None).await;
        let second = app.create_entry("2024-05-01", None, Some(1500.0)).await;

        let resp = app.get("/api/daily-entries/raw").await;
        let rows = resp.data();
        assert_eq!(rows[0]["id"], json!(first));
        assert_eq!(rows[1]["id"], json!(second));
        assert!(rows[1]["updatedAt"].is_string());
    }
}

mod update_delete {
    use super::*;

    #[tokio::test]
    async fn test_update_replaces_measurements() {
        let app = TestApp::new().await;
        let id = app.create_entry("2024-04-01", Some(80.0), Some(2500.0)).await;

        let resp = app
            .put(&format!("/api/daily-entries/{id}"), json!({ "weight": 79.5 }))
            .await;

        assert_eq!(resp.status, StatusCode::OK);
        let data = resp.data();
        assert_eq!(data["weight"], json!(79.5));
        assert!(data["calories"].is_null());
        assert_eq!(data["date"], json!("2024-04-01"));
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let app = TestApp::new().await;
        let id = insert_entry(&app.pool, "2024-04-01", Some(80.0), None).await;
        let long_ago = Utc.with_ymd_and_hms(2020, 1, 1, 8, 0, 0).unwrap();
        sqlx::query("UPDATE daily_entries SET created_at = ?, updated_at = ? WHERE id = ?")
            .bind(long_ago)
            .bind(long_ago)
            .bind(id)
            .execute(&app.pool)
            .await
            .unwrap();

        let resp = app
            .put(&format!("/api/daily-entries/{id}"), json!({ "weight": 79.0 }))
            .await;
        assert_eq!(resp.status, StatusCode::OK);

        let data = resp.data();
        let created_at = DateTime::parse_from_rfc3339(data["createdAt"].as_str().unwrap())
            .unwrap()
            .with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(data["updatedAt"].as_str().unwrap())
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(created_at, long_ago);
        assert!(updated_at > long_ago);
    }

    #[tokio::test]
    async fn test_update_validates_and_reports_missing() {
        let app = TestApp::new().await;
        let id = app.create_entry("2024-04-01", Some(80.0), None).await;

        let invalid = app
            .put(&format!("/api/daily-entries/{id}"), json!({ "weight": -3 }))
            .await;
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let missing = app
            .put("/api/daily-entries/999", json!({ "weight": 70 }))
            .await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_cascades_exercises() {
        let app = TestApp::new().await;
        let entry_id = insert_entry(&app.pool, "2024-04-02", Some(75.0), None).await;
        insert_exercise(&app.pool, entry_id, "2024-04-02", "Running", "5km").await;
        insert_exercise(&app.pool, entry_id, "2024-04-02", "Squats", "3 sets of 12").await;
        let other = insert_entry(&app.pool, "2024-04-03", None, None).await;
        insert_exercise(&app.pool, other, "2024-04-03", "Yoga", "30 min").await;

        let resp = app.delete(&format!("/api/daily-entries/{entry_id}")).await;

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.data()["id"], json!(entry_id));
        assert_eq!(resp.data()["deletedExercises"], json!(2));
        assert_eq!(count_rows(&app.pool, "daily_entries").await, 1);
        assert_eq!(count_rows(&app.pool, "exercises").await, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_404() {
        let app = TestApp::new().await;
        let resp = app.delete("/api/daily-entries/7").await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.json()["code"], json!("ENTRY_NOT_FOUND"));
    }
}

mod malformed_requests {
    use super::*;

    #[tokio::test]
    async fn test_wrong_field_types_use_error_envelope() {
        let app = TestApp::new().await;

        let payloads = vec![
            json!({ "date": 20240301 }),
            json!({ "date": "2024-03-01", "weight": "heavy" }),
            json!("2024-03-01"),
        ];
        for payload in payloads {
            let resp = app.post("/api/daily-entries", payload.clone()).await;
            assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{payload}");
            let body = resp.json();
            assert_eq!(body["success"], json!(false), "{payload}");
            assert_eq!(body["code"], json!("VALIDATION_ERROR"), "{payload}");
        }

        let id = app.create_entry("2024-03-01", Some(70.0), None).await;
        let update = app
            .put(&format!("/api/daily-entries/{id}"), json!({ "calories": "lots" }))
            .await;
        assert_eq!(update.status, StatusCode::BAD_REQUEST);
        assert_eq!(update.json()["code"], json!("VALIDATION_ERROR"));

        assert_eq!(count_rows(&app.pool, "daily_entries").await, 1);
    }

    #[tokio::test]
    async fn test_non_numeric_id_uses_error_envelope() {
        let app = TestApp::new().await;

        for resp in [
            app.get("/api/daily-entries/abc").await,
            app.put("/api/daily-entries/abc", json!({ "weight": 70 })).await,
            app.delete("/api/daily-entries/abc").await,
        ] {
            assert_eq!(resp.status, StatusCode::BAD_REQUEST);
            assert_eq!(resp.json()["code"], json!("VALIDATION_ERROR"));
        }
    }
}
