//! In-memory collaborators for tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use bytes::Bytes;
use chrono::Utc;
use hero_shared::{SuperheroId, SuperheroImageId};

use super::error::SuperheroError;
use super::repository::SuperheroRepository;
use super::types::{
    ImageSelection, NewSuperheroImage, Superhero, SuperheroChanges, SuperheroFields,
    SuperheroImage, sort_images,
};
use crate::storage::{ObjectStore, StorageError};

#[derive(Default)]
struct RepoState {
    heroes: BTreeMap<SuperheroId, Superhero>,
    images: BTreeMap<SuperheroImageId, SuperheroImage>,
    next_hero_id: i32,
    next_image_id: i32,
    image_writes: usize,
}

/// Mock repository for testing.
#[derive(Default)]
pub(crate) struct MockSuperheroRepository {
    state: Mutex<RepoState>,
    fail_image_inserts: Mutex<bool>,
}

impl MockSuperheroRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make every following `create_image` call fail.
    pub(crate) fn fail_image_inserts(&self) {
        *self.fail_image_inserts.lock().unwrap() = true;
    }

    /// Insert an image row directly, bypassing the service.
    pub(crate) fn seed_image(&self, superhero_id: SuperheroId, url: &str, order: i32) -> SuperheroImageId {
        let mut state = self.state.lock().unwrap();
        state.next_image_id += 1;
        let id = SuperheroImageId::new(state.next_image_id);
        state.images.insert(
            id,
            SuperheroImage {
                id,
                superhero_id,
                url: url.to_string(),
                order,
                created_at: Utc::now(),
            },
        );
        id
    }

    pub(crate) fn hero_count(&self) -> usize {
        self.state.lock().unwrap().heroes.len()
    }

    pub(crate) fn image_ids(&self, superhero_id: SuperheroId) -> Vec<SuperheroImageId> {
        let mut images = self.images_of(superhero_id);
        sort_images(&mut images);
        images.into_iter().map(|i| i.id).collect()
    }

    pub(crate) fn image(&self, id: SuperheroImageId) -> Option<SuperheroImage> {
        self.state.lock().unwrap().images.get(&id).cloned()
    }

    pub(crate) fn total_images(&self) -> usize {
        self.state.lock().unwrap().images.len()
    }

    /// Number of image inserts, order updates and deletes performed.
    pub(crate) fn image_writes(&self) -> usize {
        self.state.lock().unwrap().image_writes
    }

    fn images_of(&self, superhero_id: SuperheroId) -> Vec<SuperheroImage> {
        self.state
            .lock()
            .unwrap()
            .images
            .values()
            .filter(|i| i.superhero_id == superhero_id)
            .cloned()
            .collect()
    }

    fn hydrate(&self, mut hero: Superhero, selection: ImageSelection) -> Superhero {
        let mut images = self.images_of(hero.id);
        sort_images(&mut images);
        if let Some(limit) = selection.limit() {
            images.truncate(limit);
        }
        hero.images = images;
        hero
    }
}

impl SuperheroRepository for MockSuperheroRepository {
    async fn create(&self, fields: SuperheroFields) -> Result<Superhero, SuperheroError> {
        let mut state = self.state.lock().unwrap();
        state.next_hero_id += 1;
        let now = Utc::now();
        let hero = Superhero {
            id: SuperheroId::new(state.next_hero_id),
            nickname: fields.nickname,
            real_name: fields.real_name,
            origin_description: fields.origin_description,
            superpowers: fields.superpowers,
            catch_phrase: fields.catch_phrase,
            created_at: now,
            updated_at: now,
            images: Vec::new(),
        };
        state.heroes.insert(hero.id, hero.clone());
        Ok(hero)
    }

    async fn find_by_id(
        &self,
        id: SuperheroId,
        images: ImageSelection,
    ) -> Result<Option<Superhero>, SuperheroError> {
        let hero = self.state.lock().unwrap().heroes.get(&id).cloned();
        Ok(hero.map(|h| self.hydrate(h, images)))
    }

    async fn list(&self, images: ImageSelection) -> Result<Vec<Superhero>, SuperheroError> {
        let heroes: Vec<Superhero> = self.state.lock().unwrap().heroes.values().cloned().collect();
        Ok(heroes.into_iter().map(|h| self.hydrate(h, images)).collect())
    }

    async fn update(
        &self,
        id: SuperheroId,
        changes: SuperheroChanges,
    ) -> Result<Superhero, SuperheroError> {
        let mut state = self.state.lock().unwrap();
        let hero = state
            .heroes
            .get_mut(&id)
            .ok_or_else(|| SuperheroError::repository("record not found"))?;
        if let Some(v) = changes.nickname {
            hero.nickname = v;
        }
        if let Some(v) = changes.real_name {
            hero.real_name = Some(v);
        }
        if let Some(v) = changes.origin_description {
            hero.origin_description = Some(v);
        }
        if let Some(v) = changes.superpowers {
            hero.superpowers = Some(v);
        }
        if let Some(v) = changes.catch_phrase {
            hero.catch_phrase = Some(v);
        }
        hero.updated_at = Utc::now();
        Ok(hero.clone())
    }

    async fn delete(&self, id: SuperheroId) -> Result<bool, SuperheroError> {
        let mut state = self.state.lock().unwrap();
        let removed = state.heroes.remove(&id).is_some();
        state.images.retain(|_, image| image.superhero_id != id);
        Ok(removed)
    }

    async fn exists(&self, id: SuperheroId) -> Result<bool, SuperheroError> {
        Ok(self.state.lock().unwrap().heroes.contains_key(&id))
    }

    async fn create_image(&self, input: NewSuperheroImage) -> Result<SuperheroImage, SuperheroError> {
        if *self.fail_image_inserts.lock().unwrap() {
            return Err(SuperheroError::repository("insert failed"));
        }
        let mut state = self.state.lock().unwrap();
        if !state.heroes.contains_key(&input.superhero_id) {
            return Err(SuperheroError::repository("foreign key violation"));
        }
        state.next_image_id += 1;
        state.image_writes += 1;
        let image = SuperheroImage {
            id: SuperheroImageId::new(state.next_image_id),
            superhero_id: input.superhero_id,
            url: input.url,
            order: input.order,
            created_at: Utc::now(),
        };
        state.images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn find_images(
        &self,
        superhero_id: SuperheroId,
        ids: &[SuperheroImageId],
    ) -> Result<Vec<SuperheroImage>, SuperheroError> {
        let mut images: Vec<SuperheroImage> = self
            .images_of(superhero_id)
            .into_iter()
            .filter(|i| ids.contains(&i.id))
            .collect();
        sort_images(&mut images);
        Ok(images)
    }

    async fn update_image_order(
        &self,
        image_id: SuperheroImageId,
        order: i32,
    ) -> Result<(), SuperheroError> {
        let mut state = self.state.lock().unwrap();
        state.image_writes += 1;
        let image = state
            .images
            .get_mut(&image_id)
            .ok_or_else(|| SuperheroError::repository("record not found"))?;
        image.order = order;
        Ok(())
    }

    async fn delete_images(
        &self,
        superhero_id: SuperheroId,
        ids: &[SuperheroImageId],
    ) -> Result<u64, SuperheroError> {
        let mut state = self.state.lock().unwrap();
        state.image_writes += 1;
        let before = state.images.len();
        state
            .images
            .retain(|id, image| !(image.superhero_id == superhero_id && ids.contains(id)));
        Ok((before - state.images.len()) as u64)
    }

    async fn max_image_order(&self, superhero_id: SuperheroId) -> Result<Option<i32>, SuperheroError> {
        Ok(self.images_of(superhero_id).iter().map(|i| i.order).max())
    }
}

#[derive(Default)]
struct StoreState {
    objects: BTreeMap<String, (Bytes, String)>,
    puts: usize,
    deletes: Vec<String>,
}

/// Mock object store with failure injection.
#[derive(Default)]
pub(crate) struct MockObjectStore {
    state: Mutex<StoreState>,
    fail_put_at: Mutex<Option<usize>>,
    fail_delete_keys: Mutex<HashSet<String>>,
}

impl MockObjectStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make the put with the given zero-based call index fail.
    pub(crate) fn fail_put_at(&self, index: usize) {
        *self.fail_put_at.lock().unwrap() = Some(index);
    }

    /// Make deletes of `key` fail.
    pub(crate) fn fail_delete_of(&self, key: &str) {
        self.fail_delete_keys.lock().unwrap().insert(key.to_string());
    }

    /// Store an object directly, bypassing the service.
    pub(crate) fn seed(&self, key: &str) {
        self.state.lock().unwrap().objects.insert(
            key.to_string(),
            (Bytes::from_static(b"seed"), "image/png".to_string()),
        );
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.state.lock().unwrap().objects.contains_key(key)
    }

    pub(crate) fn content_type(&self, key: &str) -> Option<String> {
        self.state.lock().unwrap().objects.get(key).map(|(_, ct)| ct.clone())
    }

    pub(crate) fn object_count(&self) -> usize {
        self.state.lock().unwrap().objects.len()
    }

    pub(crate) fn put_count(&self) -> usize {
        self.state.lock().unwrap().puts
    }

    pub(crate) fn deleted_keys(&self) -> Vec<String> {
        self.state.lock().unwrap().deletes.clone()
    }
}

impl ObjectStore for MockObjectStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        let index = state.puts;
        state.puts += 1;
        if *self.fail_put_at.lock().unwrap() == Some(index) {
            return Err(StorageError::operation("put failed"));
        }
        state
            .objects
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_delete_keys.lock().unwrap().contains(key) {
            return Err(StorageError::operation("delete failed"));
        }
        let mut state = self.state.lock().unwrap();
        state.deletes.push(key.to_string());
        state.objects.remove(key);
        Ok(())
    }
}
