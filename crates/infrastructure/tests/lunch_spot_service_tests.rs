//! Lunch spot service behavior over the in-memory store.

use std::sync::Arc;

use domain::{CatalogError, Cuisine, CuisineService, LunchSpot, LunchSpotService};
use infrastructure::MemoryStore;

fn services() -> (CuisineService<MemoryStore>, LunchSpotService<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cuisines = CuisineService::new(Arc::clone(&store));
    let spots = LunchSpotService::new(cuisines.clone(), store);
    (cuisines, spots)
}

fn random_name() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[tokio::test]
async fn creating_a_lunch_spot_without_a_cuisine_fails() {
    let (_, spots) = services();
    let res = spots.create(&random_name(), None).await;
    assert_eq!(res, Err(CatalogError::CuisineNotFound));
}

#[tokio::test]
async fn creating_a_lunch_spot_with_an_unknown_cuisine_fails() {
    let (_, spots) = services();
    let ghost = Cuisine::named(random_name());
    let res = spots.create(&random_name(), Some(&ghost)).await;
    assert_eq!(res, Err(CatalogError::CuisineNotFound));
}

#[tokio::test]
async fn creating_a_lunch_spot_with_a_valid_cuisine_works() {
    let (cuisines, spots) = services();
    let cuisine = cuisines.create(&random_name()).await.unwrap();
    let before = spots.list().count().await.unwrap();
    spots.create(&random_name(), Some(&cuisine)).await.unwrap();
    assert_eq!(spots.list().count().await.unwrap(), before + 1);
}

#[tokio::test]
async fn creating_resolves_the_cuisine_reference_by_name_only() {
    // Callers typically populate only the name; the placeholder id is
    // ignored and the stored reference wins.
    let (cuisines, spots) = services();
    let stored = cuisines.create("Thai").await.unwrap();
    let by_name = Cuisine::named("tHAI");
    let spot = spots.create("Thai Flavor", Some(&by_name)).await.unwrap();
    assert_eq!(spot.cuisine, Some(stored));
}

#[tokio::test]
async fn getting_an_unknown_lunch_spot_fails_as_not_found() {
    let (_, spots) = services();
    assert_eq!(
        spots.get_by_id(-1).await,
        Err(CatalogError::LunchSpotNotFound)
    );
}

#[tokio::test]
async fn created_lunch_spots_round_trip_through_get_by_id() {
    let (cuisines, spots) = services();
    let cuisine = cuisines.create(&random_name()).await.unwrap();
    let created = spots.create(&random_name(), Some(&cuisine)).await.unwrap();
    let fetched = spots.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.cuisine, Some(cuisine));
}

#[tokio::test]
async fn creating_transforms_the_name_to_title_case() {
    let cases = [
        ("bOB's lunCH SPOt", "Bob's Lunch Spot"),
        ("joES AMERICaN Food", "Joes American Food"),
        ("", ""),
        ("Franks Bar", "Franks Bar"),
        ("my cool spot", "My Cool Spot"),
    ];
    let (cuisines, spots) = services();
    let cuisine = cuisines.create(&random_name()).await.unwrap();
    for (given, expected) in cases {
        let spot = spots.create(given, Some(&cuisine)).await.unwrap();
        assert_eq!(spot.name, expected);
    }
}

#[tokio::test]
async fn updating_an_unknown_lunch_spot_fails_as_not_found() {
    let (cuisines, spots) = services();
    let cuisine = cuisines.create(&random_name()).await.unwrap();
    let changes = LunchSpot::changes(random_name(), Some(cuisine));
    assert_eq!(
        spots.update(7, &changes).await,
        Err(CatalogError::LunchSpotNotFound)
    );
}

#[tokio::test]
async fn updating_requires_a_resolvable_cuisine_even_for_a_name_change() {
    let (cuisines, spots) = services();
    let cuisine = cuisines.create(&random_name()).await.unwrap();
    let spot = spots.create("Old Name", Some(&cuisine)).await.unwrap();

    let changes = LunchSpot::changes("New Name", Some(Cuisine::named(random_name())));
    assert_eq!(
        spots.update(spot.id, &changes).await,
        Err(CatalogError::CuisineNotFound)
    );

    // The failed update left the spot untouched.
    assert_eq!(spots.get_by_id(spot.id).await.unwrap().name, "Old Name");
}

#[tokio::test]
async fn updating_applies_name_and_cuisine_together() {
    let (cuisines, spots) = services();
    let thai = cuisines.create("Thai").await.unwrap();
    let american = cuisines.create("American").await.unwrap();
    let spot = spots.create("Old Name", Some(&thai)).await.unwrap();

    let changes = LunchSpot::changes("neW naME", Some(Cuisine::named("american")));
    let updated = spots.update(spot.id, &changes).await.unwrap();

    assert_eq!(updated.id, spot.id);
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.cuisine, Some(american));
    assert_eq!(spots.get_by_id(spot.id).await.unwrap(), updated);
}

#[tokio::test]
async fn filtering_by_spot_name_returns_only_matching_spots() {
    let (cuisines, spots) = services();
    let thai = cuisines.create("Thai").await.unwrap();
    let american = cuisines.create("American").await.unwrap();
    spots.create("Thai Flavor", Some(&thai)).await.unwrap();
    spots.create("Home", Some(&american)).await.unwrap();

    let matches = spots
        .list_filtered(|s| s.name.contains("Thai"))
        .collect()
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "Thai Flavor");
}

#[tokio::test]
async fn filtering_by_cuisine_name_reaches_the_attached_cuisine() {
    let (cuisines, spots) = services();
    let thai = cuisines.create("Thai").await.unwrap();
    let american = cuisines.create("American").await.unwrap();
    spots.create("Thai Flavor", Some(&thai)).await.unwrap();
    spots.create("Home", Some(&american)).await.unwrap();

    let matches = spots
        .list_filtered(|s| {
            s.cuisine
                .as_ref()
                .map(|c| c.name.contains("Ameri"))
                .unwrap_or(false)
        })
        .collect()
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "Home");
}

#[tokio::test]
async fn every_listed_spot_has_its_cuisine_attached() {
    let (cuisines, spots) = services();
    let thai = cuisines.create("Thai").await.unwrap();
    let american = cuisines.create("American").await.unwrap();
    spots.create("Thai Flavor", Some(&thai)).await.unwrap();
    spots.create("Home", Some(&american)).await.unwrap();

    let all = spots.list().collect().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|s| s.cuisine.is_some()));
}
