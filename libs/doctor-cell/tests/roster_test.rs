use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use doctor_cell::router::doctor_routes;

#[tokio::test]
async fn test_roster_lists_both_doctors() {
    let app = doctor_routes();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["success"], true);

    let doctors = json["doctors"].as_array().unwrap();
    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[0]["name"], "Dr. Sujith M S");
    assert_eq!(doctors[0]["specialty"], "Physician");
    assert_eq!(doctors[0]["day_start"], "5:00 PM");
    assert_eq!(doctors[0]["day_end"], "11:45 PM");
    assert_eq!(doctors[0]["slot_minutes"], 15);
    assert_eq!(doctors[1]["name"], "Dr. Ashwini B S");
    assert_eq!(doctors[1]["day_end"], "10:00 PM");
}
