//! Live-database repository tests.
//!
//! These run against a real PostgreSQL instance and are skipped by
//! default; set `DATABASE_URL` and run `cargo test -- --ignored` to
//! execute them. Each test gets its own freshly migrated database.

use sqlx::PgPool;

use lifelink_core::types::geo::GeoPoint;
use lifelink_database::repositories::donation::DonationRepository;
use lifelink_database::repositories::request::RequestRepository;
use lifelink_database::repositories::user::UserRepository;
use lifelink_entity::blood::BloodType;
use lifelink_entity::donation::CreateDonation;
use lifelink_entity::request::{
    BloodRequest, CreateBloodRequest, MatchStatus, RequestStatus, Urgency,
};
use lifelink_entity::user::{CreateUser, UpdateProfile, User, UserRole};

async fn seed_user(
    users: &UserRepository,
    name: &str,
    role: UserRole,
    blood_type: Option<BloodType>,
) -> User {
    users
        .create(&CreateUser {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "$argon2id$test-only".to_string(),
            phone: None,
            role,
            blood_type,
        })
        .await
        .unwrap()
}

async fn place_donor(users: &UserRepository, donor: &User, lon: f64, lat: f64, available: bool) {
    users
        .update_profile(&UpdateProfile {
            id: donor.id,
            phone: None,
            blood_type: None,
            address: None,
            city: None,
            longitude: Some(lon),
            latitude: Some(lat),
            availability: Some(available),
        })
        .await
        .unwrap();
}

async fn seed_request(
    requests: &RequestRepository,
    requester: &User,
    blood_type: BloodType,
    quantity: i32,
) -> BloodRequest {
    requests
        .create(&CreateBloodRequest {
            requester_id: requester.id,
            requester_role: requester.role,
            patient_name: None,
            blood_type,
            quantity,
            urgency: Urgency::Medium,
            origin: Some(GeoPoint::new(10.0, 50.0).unwrap()),
        })
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs a PostgreSQL instance via DATABASE_URL"]
async fn failed_donation_write_rolls_back_the_entry(pool: PgPool) {
    let users = UserRepository::new(pool.clone());
    let requests = RequestRepository::new(pool.clone());
    let donations = DonationRepository::new(pool.clone());

    let hospital = seed_user(&users, "mercy-general", UserRole::Hospital, None).await;
    let donor = seed_user(&users, "dana", UserRole::Donor, Some(BloodType::OPositive)).await;
    let request = seed_request(&requests, &hospital, BloodType::OPositive, 2).await;

    requests.attach_matches(request.id, &[donor.id]).await.unwrap();
    requests
        .update_match_status(
            request.id,
            donor.id,
            MatchStatus::Pending,
            MatchStatus::Accepted,
        )
        .await
        .unwrap()
        .unwrap();

    // Zero units trips the donations check constraint after the entry
    // transition has already run inside the transaction.
    let result = requests
        .record_donation(
            &request,
            &CreateDonation {
                donor_id: donor.id,
                units_donated: 0,
                notes: None,
            },
        )
        .await;
    assert!(result.is_err());

    let entry = requests.find_match(request.id, donor.id).await.unwrap().unwrap();
    assert_eq!(entry.status, MatchStatus::Accepted);
    assert_eq!(donations.sum_units_for_request(request.id).await.unwrap(), 0);

    // The entry was rolled back, so a valid retry goes through.
    let donation = requests
        .record_donation(
            &request,
            &CreateDonation {
                donor_id: donor.id,
                units_donated: 2,
                notes: None,
            },
        )
        .await
        .unwrap()
        .expect("entry should still be accepted");
    assert_eq!(donation.units_donated, 2);

    let entry = requests.find_match(request.id, donor.id).await.unwrap().unwrap();
    assert_eq!(entry.status, MatchStatus::Donated);

    let request = requests.find_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(request.status, RequestStatus::Completed);
    assert!(request.completed_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs a PostgreSQL instance via DATABASE_URL"]
async fn recording_against_a_pending_entry_writes_nothing(pool: PgPool) {
    let users = UserRepository::new(pool.clone());
    let requests = RequestRepository::new(pool.clone());
    let donations = DonationRepository::new(pool.clone());

    let hospital = seed_user(&users, "mercy-general", UserRole::Hospital, None).await;
    let donor = seed_user(&users, "dana", UserRole::Donor, Some(BloodType::OPositive)).await;
    let request = seed_request(&requests, &hospital, BloodType::OPositive, 1).await;
    requests.attach_matches(request.id, &[donor.id]).await.unwrap();

    let donation = requests
        .record_donation(
            &request,
            &CreateDonation {
                donor_id: donor.id,
                units_donated: 1,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert!(donation.is_none());

    let entry = requests.find_match(request.id, donor.id).await.unwrap().unwrap();
    assert_eq!(entry.status, MatchStatus::Pending);
    assert_eq!(donations.sum_units_for_request(request.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs a PostgreSQL instance via DATABASE_URL"]
async fn candidate_query_filters_unavailable_and_incompatible_donors(pool: PgPool) {
    let users = UserRepository::new(pool.clone());
    let requests = RequestRepository::new(pool.clone());

    let hospital = seed_user(&users, "city-hospital", UserRole::Hospital, None).await;
    let compatible = seed_user(&users, "donor-one", UserRole::Donor, Some(BloodType::OPositive)).await;
    let unavailable =
        seed_user(&users, "donor-two", UserRole::Donor, Some(BloodType::OPositive)).await;
    let wrong_type = seed_user(&users, "donor-three", UserRole::Donor, Some(BloodType::APositive)).await;
    place_donor(&users, &compatible, 10.0, 50.0, true).await;
    place_donor(&users, &unavailable, 10.0, 50.0, false).await;
    place_donor(&users, &wrong_type, 10.0, 50.0, true).await;

    let request = seed_request(&requests, &hospital, BloodType::OPositive, 1).await;
    let origin = GeoPoint::new(10.0, 50.0).unwrap();

    let candidates = users
        .find_donor_candidates(&[BloodType::OPositive], Some(origin), 100_000.0, request.id, 10)
        .await
        .unwrap();
    let ids: Vec<_> = candidates.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![compatible.id]);

    // Donors already attached to the request are not surfaced again.
    requests.attach_matches(request.id, &[compatible.id]).await.unwrap();
    let candidates = users
        .find_donor_candidates(&[BloodType::OPositive], Some(origin), 100_000.0, request.id, 10)
        .await
        .unwrap();
    assert!(candidates.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "needs a PostgreSQL instance via DATABASE_URL"]
async fn candidate_query_is_distance_ordered_and_bounded(pool: PgPool) {
    let users = UserRepository::new(pool.clone());
    let requests = RequestRepository::new(pool.clone());

    let hospital = seed_user(&users, "city-hospital", UserRole::Hospital, None).await;
    let near = seed_user(&users, "donor-near", UserRole::Donor, Some(BloodType::OPositive)).await;
    let mid = seed_user(&users, "donor-mid", UserRole::Donor, Some(BloodType::OPositive)).await;
    let far = seed_user(&users, "donor-far", UserRole::Donor, Some(BloodType::OPositive)).await;
    // About 6 km, 22 km, and 111 km from the request origin.
    place_donor(&users, &near, 10.0, 50.05, true).await;
    place_donor(&users, &mid, 10.0, 50.2, true).await;
    place_donor(&users, &far, 10.0, 51.0, true).await;

    let request = seed_request(&requests, &hospital, BloodType::OPositive, 1).await;
    let origin = GeoPoint::new(10.0, 50.0).unwrap();

    // The far donor falls outside the 100 km radius.
    let candidates = users
        .find_donor_candidates(&[BloodType::OPositive], Some(origin), 100_000.0, request.id, 10)
        .await
        .unwrap();
    let ids: Vec<_> = candidates.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![near.id, mid.id]);
    assert!(candidates[0].distance_meters.unwrap() < candidates[1].distance_meters.unwrap());

    // The result cap keeps only the nearest candidates.
    let candidates = users
        .find_donor_candidates(&[BloodType::OPositive], Some(origin), 100_000.0, request.id, 1)
        .await
        .unwrap();
    let ids: Vec<_> = candidates.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![near.id]);
}
