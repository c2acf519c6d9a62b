//! Cuisine service behavior over the in-memory store.

use std::sync::Arc;

use domain::{strings, CatalogError, CuisineService};
use infrastructure::MemoryStore;

fn services() -> CuisineService<MemoryStore> {
    CuisineService::new(Arc::new(MemoryStore::new()))
}

fn random_name() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[tokio::test]
async fn creating_a_new_cuisine_results_in_one_new_cuisine() {
    let services = services();
    let before = services.list().count().await.unwrap();
    services.create(&random_name()).await.unwrap();
    let after = services.list().count().await.unwrap();
    assert_eq!(after, before + 1);
}

#[tokio::test]
async fn creating_cuisine_translates_to_title_case() {
    let services = services();
    let cuisine = services.create("bOB's cuiSINE TyPE").await.unwrap();
    assert_eq!(cuisine.name, "Bob's Cuisine Type");
}

#[tokio::test]
async fn creating_with_duplicate_name_returns_current_entry() {
    let services = services();
    let first = services.create(&random_name()).await.unwrap();
    let duplicate = services.create(&first.name).await.unwrap();
    assert_eq!(first.id, duplicate.id);
}

#[tokio::test]
async fn creating_ignores_case_when_checking_for_duplicate() {
    let services = services();
    let first = services.create(&random_name().to_lowercase()).await.unwrap();
    let duplicate = services.create(&first.name.to_uppercase()).await.unwrap();
    assert_eq!(first.id, duplicate.id);

    // Exactly one row with that name survives, case-insensitively.
    let name = first.name.clone();
    let matching = services
        .list_filtered(move |c| strings::eq_ignore_case(&c.name, &name))
        .count()
        .await
        .unwrap();
    assert_eq!(matching, 1);
}

#[tokio::test]
async fn listing_cuisines_returns_all_cuisines() {
    let services = services();
    for _ in 0..5 {
        services.create(&random_name()).await.unwrap();
    }
    assert_eq!(services.list().count().await.unwrap(), 5);
}

#[tokio::test]
async fn getting_cuisine_by_id_returns_the_matching_entry() {
    let services = services();
    let mut created = Vec::new();
    for _ in 0..5 {
        created.push(services.create(&random_name()).await.unwrap());
    }
    let target = &created[2];
    let fetched = services.get_by_id(target.id).await.unwrap();
    assert_eq!(fetched, *target);
}

#[tokio::test]
async fn getting_an_unknown_cuisine_id_fails_as_not_found() {
    let services = services();
    assert_eq!(
        services.get_by_id(1).await,
        Err(CatalogError::CuisineNotFound)
    );
    assert_eq!(
        services.get_by_id(-1).await,
        Err(CatalogError::CuisineNotFound)
    );
}

#[tokio::test]
async fn filtering_by_name_ignoring_case_returns_one_cuisine() {
    let services = services();
    for name in ["thai", "italian", "chinese", "american", "indian"] {
        services.create(name).await.unwrap();
        let wanted = name.to_string();
        let count = services
            .list_filtered(move |c| strings::eq_ignore_case(&c.name, &wanted))
            .count()
            .await
            .unwrap();
        assert_eq!(count, 1, "expected exactly one match for {name}");
    }
}

#[tokio::test]
async fn filtering_by_unknown_name_returns_empty_stream() {
    let services = services();
    services.create(&random_name()).await.unwrap();
    let count = services
        .list_filtered(|c| c.name == "No Such Cuisine")
        .count()
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn renaming_to_an_existing_name_fails_with_conflict() {
    let services = services();
    let alpha = services.create("Alpha").await.unwrap();
    let beta = services.create("Beta").await.unwrap();

    let res = services.rename(beta.id, "alpha").await;
    assert_eq!(
        res,
        Err(CatalogError::CuisineNameConflict {
            name: "alpha".to_string()
        })
    );

    // Both names are untouched.
    assert_eq!(services.get_by_id(alpha.id).await.unwrap().name, "Alpha");
    assert_eq!(services.get_by_id(beta.id).await.unwrap().name, "Beta");
}

#[tokio::test]
async fn renaming_to_the_current_name_is_a_self_collision() {
    // The collision scan does not exclude the target's own row, so a rename
    // that changes nothing is rejected. Existing callers rely on this.
    let services = services();
    let cuisine = services.create("Alpha").await.unwrap();
    let res = services.rename(cuisine.id, "alpha").await;
    assert!(res.unwrap_err().is_conflict());
}

#[tokio::test]
async fn renaming_persists_the_new_name_as_given() {
    // Unlike creation, rename does not title-case: the name lands exactly
    // as the caller wrote it.
    let services = services();
    let cuisine = services.create(&random_name()).await.unwrap();
    let renamed = services.rename(cuisine.id, "new mixed CASE name").await.unwrap();
    assert_eq!(renamed.id, cuisine.id);
    assert_eq!(renamed.name, "new mixed CASE name");
    assert_eq!(
        services.get_by_id(cuisine.id).await.unwrap().name,
        "new mixed CASE name"
    );
}

#[tokio::test]
async fn renaming_an_unknown_cuisine_fails_as_not_found() {
    let services = services();
    assert_eq!(
        services.rename(41, &random_name()).await,
        Err(CatalogError::CuisineNotFound)
    );
}
