//! Land listings and inquiries

mod common;

use axum::http::StatusCode;
use common::{delete, get, patch, post, TestAppState};
use pretty_assertions::assert_eq;
use serde_json::json;
use voss_core::domain::{LandListing, LandType, Role, StringUuid, User};

async fn seed_listing(state: &TestAppState, owner_id: StringUuid) -> LandListing {
    let listing = LandListing {
        title: "Riverside plot".to_string(),
        location: "Ho".to_string(),
        region: "Volta".to_string(),
        size: 12.0,
        price: 4000.0,
        land_type: LandType::Lease,
        owner_id,
        ..Default::default()
    };
    state.land_listing_repo.add_listing(listing.clone()).await;
    listing
}

#[tokio::test]
async fn test_any_role_can_list_land() {
    let state = TestAppState::new();
    let app = state.router();
    let (buyer, token) = state.seed_user(Role::Buyer).await;

    let (status, body) = post(
        &app,
        "/api/land-listings",
        Some(&token),
        &json!({
            "title": "Hillside acreage",
            "location": "Kumasi",
            "region": "Ashanti",
            "size": 5.5,
            "price": 900.0,
            "type": "sale"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["owner_id"], buyer.id.to_string());
    assert_eq!(body["data"]["type"], "sale");

    let (status, body) = get(&app, "/api/land-listings?type=sale&region=Ashanti", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stranger_cannot_delete_listing() {
    let state = TestAppState::new();
    let app = state.router();
    let (owner, _) = state.seed_user(Role::Farmer).await;
    let (_, stranger) = state.seed_user(Role::Investor).await;
    let listing = seed_listing(&state, owner.id).await;

    let (status, body) = delete(
        &app,
        &format!("/api/land-listings/{}", listing.id),
        Some(&stranger),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to delete this listing");
}

#[tokio::test]
async fn test_inquiry_lifecycle() {
    let state = TestAppState::new();
    let app = state.router();
    let (owner, owner_token) = state.seed_user(Role::Farmer).await;
    let (buyer, buyer_token) = state.seed_user(Role::Buyer).await;
    let listing = seed_listing(&state, owner.id).await;

    let (status, body) = post(
        &app,
        "/api/land-inquiries",
        Some(&buyer_token),
        &json!({"land_id": listing.id, "message": "Is water access included?"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["buyer_id"], buyer.id.to_string());
    let inquiry_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = get(&app, "/api/land-inquiries/owner", Some(&owner_token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = get(&app, "/api/land-inquiries/my", Some(&buyer_token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let status_path = format!("/api/land-inquiries/{}/status", inquiry_id);
    for next in ["contacted", "acknowledged", "acknowledged"] {
        let (status, body) =
            patch(&app, &status_path, Some(&owner_token), &json!({"status": next})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], next);
    }
}

#[tokio::test]
async fn test_inquiry_lists_carry_counterparty_contact() {
    let state = TestAppState::new();
    let app = state.router();
    let (owner, owner_token) = state.seed_user(Role::Farmer).await;
    let buyer = User {
        name: "Esi Boateng".to_string(),
        email: "esi@example.com".to_string(),
        phone: Some("+233201234567".to_string()),
        region: Some("Central".to_string()),
        role: Role::Buyer,
        ..Default::default()
    };
    state.user_repo.add_user(buyer.clone()).await;
    let buyer_token = state.token_for(&buyer.clone().into());
    let listing = seed_listing(&state, owner.id).await;

    let (status, _) = post(
        &app,
        "/api/land-inquiries",
        Some(&buyer_token),
        &json!({"land_id": listing.id, "message": "Can I visit on Saturday?"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get(&app, "/api/land-inquiries/owner", Some(&owner_token)).await;
    assert_eq!(status, StatusCode::OK);
    let received = &body["data"][0];
    assert_eq!(received["message"], "Can I visit on Saturday?");
    assert_eq!(received["land"]["title"], "Riverside plot");
    assert_eq!(received["buyer"]["name"], "Esi Boateng");
    assert_eq!(received["buyer"]["email"], "esi@example.com");
    assert_eq!(received["buyer"]["phone"], "+233201234567");

    let (status, body) = get(&app, "/api/land-inquiries/my", Some(&buyer_token)).await;
    assert_eq!(status, StatusCode::OK);
    let sent = &body["data"][0];
    assert_eq!(sent["land"]["id"], listing.id.to_string());
    assert_eq!(sent["land"]["location"], "Ho");
    assert_eq!(sent["land"]["price"], 4000.0);
    assert_eq!(sent["land"]["type"], "lease");
    assert_eq!(sent["land"]["owner"]["id"], owner.id.to_string());
    assert_eq!(sent["land"]["owner"]["email"], owner.email);
}

#[tokio::test]
async fn test_owner_cannot_inquire_on_own_land() {
    let state = TestAppState::new();
    let app = state.router();
    let (owner, owner_token) = state.seed_user(Role::Farmer).await;
    let listing = seed_listing(&state, owner.id).await;

    let (status, body) = post(
        &app,
        "/api/land-inquiries",
        Some(&owner_token),
        &json!({"land_id": listing.id}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You cannot inquire on your own land");
}

#[tokio::test]
async fn test_inquiry_on_missing_land() {
    let state = TestAppState::new();
    let app = state.router();
    let (_, token) = state.seed_user(Role::Buyer).await;

    let (status, _) = post(
        &app,
        "/api/land-inquiries",
        Some(&token),
        &json!({"land_id": StringUuid::new_v4()}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_land_owner_moves_inquiry_status() {
    let state = TestAppState::new();
    let app = state.router();
    let (owner, _) = state.seed_user(Role::Farmer).await;
    let (_, buyer_token) = state.seed_user(Role::Buyer).await;
    let (_, admin_token) = state.seed_admin(Role::Admin).await;
    let listing = seed_listing(&state, owner.id).await;

    let (_, body) = post(
        &app,
        "/api/land-inquiries",
        Some(&buyer_token),
        &json!({"land_id": listing.id}),
    )
    .await;
    let status_path = format!(
        "/api/land-inquiries/{}/status",
        body["data"]["id"].as_str().unwrap()
    );

    for token in [&buyer_token, &admin_token] {
        let (status, body) =
            patch(&app, &status_path, Some(token), &json!({"status": "closed"})).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Not authorized to update this inquiry");
    }
}

#[tokio::test]
async fn test_inquiry_hidden_from_non_parties() {
    let state = TestAppState::new();
    let app = state.router();
    let (owner, owner_token) = state.seed_user(Role::Farmer).await;
    let (_, buyer_token) = state.seed_user(Role::Buyer).await;
    let (_, stranger_token) = state.seed_user(Role::Buyer).await;
    let listing = seed_listing(&state, owner.id).await;

    let (_, body) = post(
        &app,
        "/api/land-inquiries",
        Some(&buyer_token),
        &json!({"land_id": listing.id}),
    )
    .await;
    let path = format!("/api/land-inquiries/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = get(&app, &path, Some(&owner_token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &path, Some(&buyer_token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, &path, Some(&stranger_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Inquiry not found");
}
