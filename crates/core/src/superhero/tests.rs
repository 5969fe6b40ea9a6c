//! Service-level scenarios against in-memory collaborators.

use std::sync::Arc;

use hero_shared::{SuperheroId, SuperheroImageId};

use super::mock::{MockObjectStore, MockSuperheroRepository};
use super::*;

const BASE: &str = "https://cdn.example.com/";
const KIB: usize = 1024;
const MIB: usize = 1024 * 1024;

type Service = SuperheroService<MockSuperheroRepository, MockObjectStore>;

struct Fixture {
    repo: Arc<MockSuperheroRepository>,
    store: Arc<MockObjectStore>,
    service: Service,
}

fn fixture() -> Fixture {
    let repo = Arc::new(MockSuperheroRepository::new());
    let store = Arc::new(MockObjectStore::new());
    let service = SuperheroService::new(repo.clone(), store.clone(), MediaSettings::new(BASE));
    Fixture {
        repo,
        store,
        service,
    }
}

fn fields(nickname: &str) -> SuperheroFields {
    SuperheroFields {
        nickname: nickname.to_string(),
        real_name: Some("Clark Kent".to_string()),
        ..SuperheroFields::default()
    }
}

fn upload(name: &str, size: usize) -> ImageUpload {
    ImageUpload::new(name, Some("image/jpeg".to_string()), vec![7u8; size])
}

fn ids(hero: &Superhero) -> Vec<SuperheroImageId> {
    hero.images.iter().map(|i| i.id).collect()
}

fn orders(hero: &Superhero) -> Vec<i32> {
    hero.images.iter().map(|i| i.order).collect()
}

impl Fixture {
    async fn hero_with_images(&self, count: usize) -> Superhero {
        let files = (0..count)
            .map(|i| upload(&format!("img{i}.jpg"), KIB))
            .collect();
        self.service.create(fields("Superman"), files).await.unwrap()
    }

    fn key_of(&self, image: &SuperheroImage) -> String {
        self.service
            .codec()
            .key_from_public_url(&image.url)
            .expect("url built from base")
            .to_string()
    }
}

// ========================================================================
// Create
// ========================================================================

#[tokio::test]
async fn test_create_with_two_small_files() {
    let fx = fixture();

    let hero = fx
        .service
        .create(
            fields("Superman"),
            vec![upload("front.jpg", KIB), upload("back.jpg", KIB)],
        )
        .await
        .unwrap();

    assert_eq!(hero.nickname, "Superman");
    assert_eq!(orders(&hero), vec![0, 1]);
    let keys: Vec<String> = hero.images.iter().map(|i| fx.key_of(i)).collect();
    assert_ne!(keys[0], keys[1]);
    assert!(keys[0].ends_with("-front.jpg"));
    assert!(keys[1].ends_with("-back.jpg"));
    assert!(keys.iter().all(|k| fx.store.contains(k)));
}

#[tokio::test]
async fn test_create_without_files() {
    let fx = fixture();

    let hero = fx.service.create(fields("Batman"), Vec::new()).await.unwrap();

    assert!(hero.images.is_empty());
    assert_eq!(fx.store.put_count(), 0);
}

#[tokio::test]
async fn test_create_with_oversized_file_writes_nothing() {
    let fx = fixture();

    let err = fx
        .service
        .create(
            fields("Superman"),
            vec![upload("ok.jpg", KIB), upload("huge.jpg", 3 * MIB)],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("huge.jpg"));
    assert_eq!(fx.store.put_count(), 0);
    assert_eq!(fx.repo.total_images(), 0);
    assert_eq!(fx.repo.hero_count(), 0);
}

#[tokio::test]
async fn test_create_with_too_many_files() {
    let fx = fixture();
    let files = (0..=MAX_FILES_PER_BATCH)
        .map(|i| upload(&format!("{i}.jpg"), 1))
        .collect();

    let err = fx.service.create(fields("Superman"), files).await.unwrap_err();

    assert!(matches!(err, SuperheroError::TooManyFiles { count: 11, max: 10 }));
    assert_eq!(fx.repo.hero_count(), 0);
}

#[tokio::test]
async fn test_create_requires_nickname() {
    let fx = fixture();

    let err = fx.service.create(fields(" "), Vec::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(fx.repo.hero_count(), 0);
}

#[tokio::test]
async fn test_create_upload_failure_keeps_earlier_images() {
    let fx = fixture();
    fx.store.fail_put_at(1);

    let err = fx
        .service
        .create(
            fields("Superman"),
            vec![upload("a.jpg", KIB), upload("b.jpg", KIB), upload("c.jpg", KIB)],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamStorage);
    assert_eq!(fx.repo.hero_count(), 1);
    assert_eq!(fx.repo.total_images(), 1);
}

// ========================================================================
// Read
// ========================================================================

#[tokio::test]
async fn test_get_and_list() {
    let fx = fixture();
    let first = fx.hero_with_images(3).await;
    let second = fx.service.create(fields("Wonder Woman"), Vec::new()).await.unwrap();

    let fetched = fx.service.get(first.id).await.unwrap();
    assert_eq!(ids(&fetched), ids(&first));

    let listed = fx.service.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(ids(&listed[0]), vec![first.images[0].id]);
    assert_eq!(listed[1].id, second.id);
    assert!(listed[1].images.is_empty());
}

#[tokio::test]
async fn test_get_missing_superhero() {
    let fx = fixture();

    let err = fx.service.get(SuperheroId::new(42)).await.unwrap_err();

    assert!(matches!(err, SuperheroError::NotFound(id) if id == SuperheroId::new(42)));
}

// ========================================================================
// Append
// ========================================================================

#[tokio::test]
async fn test_append_continues_numbering() {
    let fx = fixture();
    let hero = fx.hero_with_images(2).await;

    let added = fx
        .service
        .append_images(hero.id, vec![upload("x.jpg", KIB), upload("y.jpg", KIB)])
        .await
        .unwrap();

    assert_eq!(added.iter().map(|i| i.order).collect::<Vec<_>>(), vec![2, 3]);
    let hero = fx.service.get(hero.id).await.unwrap();
    assert_eq!(orders(&hero), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_append_rejects_empty_batch() {
    let fx = fixture();
    let hero = fx.hero_with_images(0).await;

    let err = fx.service.append_images(hero.id, Vec::new()).await.unwrap_err();

    assert_eq!(err.to_string(), "validation failed: No files uploaded");
}

#[tokio::test]
async fn test_append_to_missing_superhero() {
    let fx = fixture();

    let err = fx
        .service
        .append_images(SuperheroId::new(9), vec![upload("x.jpg", KIB)])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(fx.store.put_count(), 0);
}

// ========================================================================
// Update
// ========================================================================

#[tokio::test]
async fn test_update_fields_only() {
    let fx = fixture();
    let hero = fx.hero_with_images(1).await;

    let updated = fx
        .service
        .update(
            hero.id,
            UpdateSuperheroInput {
                changes: SuperheroChanges {
                    catch_phrase: Some("Up, up and away".into()),
                    ..SuperheroChanges::default()
                },
                ..UpdateSuperheroInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.catch_phrase.as_deref(), Some("Up, up and away"));
    assert_eq!(updated.real_name.as_deref(), Some("Clark Kent"));
    assert_eq!(ids(&updated), ids(&hero));
}

#[tokio::test]
async fn test_update_removal_with_foreign_id_deletes_nothing() {
    let fx = fixture();
    let hero = fx.hero_with_images(1).await;
    let other = fx.hero_with_images(1).await;
    let own = hero.images[0].id;
    let foreign = other.images[0].id;

    let err = fx
        .service
        .update(
            hero.id,
            UpdateSuperheroInput {
                remove_image_ids: vec![own, foreign],
                changes: SuperheroChanges {
                    nickname: Some("Kal-El".into()),
                    ..SuperheroChanges::default()
                },
                ..UpdateSuperheroInput::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(fx.repo.image(own).is_some());
    assert!(fx.store.contains(&fx.key_of(&hero.images[0])));
    assert!(fx.store.deleted_keys().is_empty());
    assert_eq!(fx.service.get(hero.id).await.unwrap().nickname, "Superman");
}

#[tokio::test]
async fn test_update_full_mutation() {
    let fx = fixture();
    let hero = fx.hero_with_images(3).await;
    let [a, b, c] = [hero.images[0].id, hero.images[1].id, hero.images[2].id];

    let updated = fx
        .service
        .update(
            hero.id,
            UpdateSuperheroInput {
                changes: SuperheroChanges {
                    superpowers: Some("flight".into()),
                    ..SuperheroChanges::default()
                },
                remove_image_ids: vec![b],
                image_orders: vec![ImageOrder { id: c, order: 0 }, ImageOrder { id: a, order: 1 }],
                files: vec![upload("new.jpg", KIB)],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.superpowers.as_deref(), Some("flight"));
    let new_id = updated.images[2].id;
    assert_eq!(ids(&updated), vec![c, a, new_id]);
    assert_eq!(orders(&updated), vec![0, 1, 2]);
    assert!(!fx.store.contains(&fx.key_of(&hero.images[1])));
}

#[tokio::test]
async fn test_update_reorder_with_foreign_id_mutates_nothing() {
    let fx = fixture();
    let hero = fx.hero_with_images(2).await;
    let other = fx.hero_with_images(1).await;
    let writes_before = fx.repo.image_writes();

    let err = fx
        .service
        .update(
            hero.id,
            UpdateSuperheroInput {
                remove_image_ids: vec![hero.images[0].id],
                image_orders: vec![ImageOrder {
                    id: other.images[0].id,
                    order: 0,
                }],
                ..UpdateSuperheroInput::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SuperheroError::OwnershipMismatch { .. }));
    assert_eq!(fx.repo.image_writes(), writes_before);
    assert_eq!(ids(&fx.service.get(hero.id).await.unwrap()), ids(&hero));
}

#[tokio::test]
async fn test_update_rejects_removed_image_in_reorder() {
    let fx = fixture();
    let hero = fx.hero_with_images(2).await;
    let target = hero.images[0].id;

    let err = fx
        .service
        .update(
            hero.id,
            UpdateSuperheroInput {
                remove_image_ids: vec![target],
                image_orders: vec![ImageOrder { id: target, order: 3 }],
                ..UpdateSuperheroInput::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(fx.repo.total_images(), 2);
}

#[tokio::test]
async fn test_update_oversized_file_is_rejected_before_removal() {
    let fx = fixture();
    let hero = fx.hero_with_images(1).await;

    let err = fx
        .service
        .update(
            hero.id,
            UpdateSuperheroInput {
                remove_image_ids: vec![hero.images[0].id],
                files: vec![upload("huge.jpg", 2 * MIB + 1)],
                ..UpdateSuperheroInput::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SuperheroError::FileTooLarge { .. }));
    assert_eq!(fx.repo.total_images(), 1);
}

#[tokio::test]
async fn test_update_missing_superhero() {
    let fx = fixture();

    let err = fx
        .service
        .update(SuperheroId::new(5), UpdateSuperheroInput::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ========================================================================
// Delete
// ========================================================================

#[tokio::test]
async fn test_delete_removes_everything() {
    let fx = fixture();
    let hero = fx.hero_with_images(2).await;

    fx.service.delete(hero.id).await.unwrap();

    assert_eq!(fx.repo.hero_count(), 0);
    assert_eq!(fx.repo.total_images(), 0);
    assert_eq!(fx.store.object_count(), 0);
    assert_eq!(fx.store.deleted_keys().len(), 2);
}

#[tokio::test]
async fn test_delete_object_failure_keeps_record_and_rows() {
    let fx = fixture();
    let hero = fx.hero_with_images(3).await;
    fx.store.fail_delete_of(&fx.key_of(&hero.images[1]));

    let err = fx.service.delete(hero.id).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamStorage);
    assert_eq!(fx.repo.hero_count(), 1);
    assert_eq!(fx.repo.image_ids(hero.id), ids(&hero));
}

#[tokio::test]
async fn test_delete_skips_unresolvable_urls() {
    let fx = fixture();
    let hero = fx.hero_with_images(1).await;
    fx.repo
        .seed_image(hero.id, "https://legacy.example.com/old.jpg", 5);

    fx.service.delete(hero.id).await.unwrap();

    assert_eq!(fx.repo.hero_count(), 0);
    assert_eq!(fx.store.deleted_keys().len(), 1);
}

#[tokio::test]
async fn test_delete_missing_superhero() {
    let fx = fixture();

    let err = fx.service.delete(SuperheroId::new(3)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}
