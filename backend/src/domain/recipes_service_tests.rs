//! Tests for the recipe service.

use super::*;
use crate::domain::ports::{
    MockIngredientRepository, MockRecipeImageStore, MockRecipeRepository, MockTagRepository,
};
use crate::domain::{
    AttributeName, CookingTime, ErrorCode, Price, RecipeLink, RecipeTitle, Tag,
};
use rstest::rstest;

type Service = RecipesService<
    MockRecipeRepository,
    MockTagRepository,
    MockIngredientRepository,
    MockRecipeImageStore,
>;

struct Mocks {
    recipes: MockRecipeRepository,
    tags: MockTagRepository,
    ingredients: MockIngredientRepository,
    images: MockRecipeImageStore,
}

impl Mocks {
    fn new() -> Self {
        Self {
            recipes: MockRecipeRepository::new(),
            tags: MockTagRepository::new(),
            ingredients: MockIngredientRepository::new(),
            images: MockRecipeImageStore::new(),
        }
    }

    fn into_service(self) -> Service {
        RecipesService::new(
            Arc::new(self.recipes),
            Arc::new(self.tags),
            Arc::new(self.ingredients),
            Arc::new(self.images),
        )
    }
}

fn recipe_id(value: i64) -> RecipeId {
    RecipeId::new(value).expect("valid id")
}

fn tag_id(value: i64) -> TagId {
    TagId::new(value).expect("valid id")
}

fn draft(tags: Vec<TagId>) -> RecipeDraft {
    RecipeDraft {
        title: RecipeTitle::new("Sample recipe").expect("title"),
        time_minutes: CookingTime::new(22).expect("time"),
        price: Price::from_cents(525).expect("price"),
        link: RecipeLink::new("http://example.com/recipe.pdf").expect("link"),
        tags,
        ingredients: Vec::new(),
    }
}

fn recipe(owner: &UserId, id: i64, image: Option<&str>) -> Recipe {
    let draft = draft(Vec::new());
    Recipe {
        id: recipe_id(id),
        owner: owner.clone(),
        title: draft.title,
        time_minutes: draft.time_minutes,
        price: draft.price,
        link: draft.link,
        tags: Vec::new(),
        ingredients: Vec::new(),
        image: image.map(str::to_owned),
    }
}

fn tag(owner: &UserId, id: i64) -> Tag {
    Tag {
        id: tag_id(id),
        owner: owner.clone(),
        name: AttributeName::new(format!("Tag {id}")).expect("name"),
    }
}

#[tokio::test]
async fn create_recipe_checks_tag_ownership() {
    let owner = UserId::random();
    let mut mocks = Mocks::new();
    let known = tag(&owner, 1);
    mocks
        .tags
        .expect_find_many()
        .return_once(move |_, _| Ok(vec![known]));
    mocks.recipes.expect_create().never();
    let service = mocks.into_service();

    let error = service
        .create_recipe(&owner, draft(vec![tag_id(1), tag_id(9)]))
        .await
        .expect_err("foreign tag rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details");
    assert_eq!(details["field"], "tags");
    assert_eq!(details["value"], serde_json::json!(["9"]));
}

#[tokio::test]
async fn create_recipe_deduplicates_attribute_ids() {
    let owner = UserId::random();
    let stored = recipe(&owner, 1, None);
    let returned = stored.clone();
    let mut mocks = Mocks::new();
    let known = tag(&owner, 4);
    mocks
        .tags
        .expect_find_many()
        .withf(|_, ids| ids == [TagId::new(4).expect("id")])
        .return_once(move |_, _| Ok(vec![known]));
    mocks
        .recipes
        .expect_create()
        .withf(|_, draft| draft.tags.len() == 1)
        .times(1)
        .return_once(move |_, _| Ok(returned));
    let service = mocks.into_service();

    let created = service
        .create_recipe(&owner, draft(vec![tag_id(4), tag_id(4)]))
        .await
        .expect("recipe created");

    assert_eq!(created, stored);
}

#[tokio::test]
async fn missing_recipe_is_not_found() {
    let mut mocks = Mocks::new();
    mocks.recipes.expect_find().return_once(|_, _| Ok(None));
    let service = mocks.into_service();

    let error = service
        .get_recipe(&UserId::random(), recipe_id(42))
        .await
        .expect_err("missing recipe");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_recipe_keeps_unspecified_fields() {
    let owner = UserId::random();
    let current = recipe(&owner, 3, None);
    let mut mocks = Mocks::new();
    let found = current.clone();
    mocks
        .recipes
        .expect_find()
        .return_once(move |_, _| Ok(Some(found)));
    mocks
        .recipes
        .expect_update()
        .withf(|_, _, draft| {
            draft.title.as_ref() == "New recipe title"
                && draft.time_minutes.minutes() == 22
                && draft.link.as_ref() == "http://example.com/recipe.pdf"
        })
        .times(1)
        .return_once(|owner, id, draft| {
            let mut updated = recipe(owner, id.get(), None);
            updated.title = draft.title.clone();
            Ok(Some(updated))
        });
    let service = mocks.into_service();

    let updated = service
        .update_recipe(
            &owner,
            recipe_id(3),
            RecipeChanges {
                title: Some(RecipeTitle::new("New recipe title").expect("title")),
                ..RecipeChanges::default()
            },
        )
        .await
        .expect("recipe updated");

    assert_eq!(updated.title.as_ref(), "New recipe title");
}

#[tokio::test]
async fn delete_recipe_removes_its_image() {
    let owner = UserId::random();
    let current = recipe(&owner, 5, Some("uploads/recipe/old.jpg"));
    let mut mocks = Mocks::new();
    mocks
        .recipes
        .expect_find()
        .return_once(move |_, _| Ok(Some(current)));
    mocks.recipes.expect_delete().return_once(|_, _| Ok(true));
    mocks
        .images
        .expect_remove()
        .withf(|path| path == "uploads/recipe/old.jpg")
        .times(1)
        .return_once(|_| Ok(()));
    let service = mocks.into_service();

    service
        .delete_recipe(&owner, recipe_id(5))
        .await
        .expect("recipe deleted");
}

#[tokio::test]
async fn upload_image_stores_file_and_replaces_previous() {
    let owner = UserId::random();
    let current = recipe(&owner, 6, Some("uploads/recipe/old.png"));
    let mut mocks = Mocks::new();
    mocks
        .recipes
        .expect_find()
        .return_once(move |_, _| Ok(Some(current)));
    mocks
        .images
        .expect_store()
        .withf(|path, bytes| {
            path.starts_with("uploads/recipe/") && path.ends_with(".jpg") && bytes == b"jpeg"
        })
        .times(1)
        .return_once(|_, _| Ok(()));
    mocks
        .recipes
        .expect_set_image()
        .return_once(|owner, id, image| {
            let updated = recipe(owner, id.get(), Some(image));
            Ok(Some(updated))
        });
    mocks
        .images
        .expect_remove()
        .withf(|path| path == "uploads/recipe/old.png")
        .times(1)
        .return_once(|_| Err(ImageStoreError::storage("disk gone")));
    let service = mocks.into_service();

    let updated = service
        .upload_image(
            &owner,
            recipe_id(6),
            ImageUpload {
                filename: "photo.jpg".to_owned(),
                bytes: b"jpeg".to_vec(),
            },
        )
        .await
        .expect("image uploaded");

    let image = updated.image.expect("image set");
    assert!(image.starts_with("uploads/recipe/"));
    assert!(image.ends_with(".jpg"));
}

#[rstest]
#[case("notanimage", b"data".to_vec())]
#[case("photo.jpg", Vec::new())]
#[tokio::test]
async fn upload_image_rejects_bad_input(#[case] filename: &str, #[case] bytes: Vec<u8>) {
    let mut mocks = Mocks::new();
    mocks.images.expect_store().never();
    let service = mocks.into_service();

    let error = service
        .upload_image(
            &UserId::random(),
            recipe_id(1),
            ImageUpload {
                filename: filename.to_owned(),
                bytes,
            },
        )
        .await
        .expect_err("upload rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(RecipeRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
#[case(RecipeRepositoryError::query("bad"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_are_mapped(
    #[case] failure: RecipeRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut mocks = Mocks::new();
    mocks.recipes.expect_list().return_once(move |_, _| Err(failure));
    let service = mocks.into_service();

    let error = service
        .list_recipes(&UserId::random(), RecipeFilter::default())
        .await
        .expect_err("failure propagates");

    assert_eq!(error.code(), expected);
}
