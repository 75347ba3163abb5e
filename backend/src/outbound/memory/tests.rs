//! Behavioural tests for the in-memory adapters.

use super::*;
use crate::domain::{
    CookingTime, Password, PasswordHash, Price, RecipeLink, RecipeTitle, UserFlags, UserName,
    UserRole,
};
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::default()
}

fn user(email: &str) -> User {
    User::new(
        UserId::random(),
        Email::new(email).expect("email"),
        UserName::default(),
        PasswordHash::generate(&Password::new("secret123").expect("password")).expect("hash"),
        UserFlags::for_role(UserRole::Member),
    )
}

fn name(value: &str) -> AttributeName {
    AttributeName::new(value).expect("name")
}

fn draft(title: &str, tags: Vec<TagId>, ingredients: Vec<IngredientId>) -> RecipeDraft {
    RecipeDraft {
        title: RecipeTitle::new(title).expect("title"),
        time_minutes: CookingTime::new(10).expect("time"),
        price: Price::from_cents(500).expect("price"),
        link: RecipeLink::default(),
        tags,
        ingredients,
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_rejected(store: InMemoryStore) {
    UserRepository::insert(&store, &user("test@example.com"))
        .await
        .expect("first insert");

    let error = UserRepository::insert(&store, &user("test@example.com"))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(
        error,
        UserPersistenceError::duplicate_email("test@example.com")
    );
}

#[rstest]
#[tokio::test]
async fn every_issued_digest_resolves_to_its_owner(store: InMemoryStore) {
    let owner = user("test@example.com");
    UserRepository::insert(&store, &owner).await.expect("insert");
    let first = TokenDigest::from_hex("a".repeat(64));
    let second = TokenDigest::from_hex("b".repeat(64));

    AuthTokenRepository::insert(&store, owner.id(), &first, Utc::now())
        .await
        .expect("first token");
    AuthTokenRepository::insert(&store, owner.id(), &second, Utc::now())
        .await
        .expect("second token");

    for digest in [&first, &second] {
        assert_eq!(
            store.find_user_id(digest).await.expect("lookup"),
            Some(owner.id().clone())
        );
    }
    let unknown = TokenDigest::from_hex("c".repeat(64));
    assert_eq!(store.find_user_id(&unknown).await.expect("lookup"), None);
}

#[rstest]
#[tokio::test]
async fn tags_are_scoped_and_sorted_by_name_descending(store: InMemoryStore) {
    let owner = UserId::random();
    let other = UserId::random();
    TagRepository::create(&store, &owner, &name("Dessert"))
        .await
        .expect("tag");
    TagRepository::create(&store, &owner, &name("Vegan"))
        .await
        .expect("tag");
    TagRepository::create(&store, &other, &name("Fruity"))
        .await
        .expect("tag");

    let tags = TagRepository::list(&store, &owner, false)
        .await
        .expect("list");

    let names: Vec<&str> = tags.iter().map(|tag| tag.name.as_ref()).collect();
    assert_eq!(names, ["Vegan", "Dessert"]);
}

#[rstest]
#[tokio::test]
async fn assigned_only_keeps_attached_ingredients_once(store: InMemoryStore) {
    let owner = UserId::random();
    let eggs = IngredientRepository::create(&store, &owner, &name("Eggs"))
        .await
        .expect("ingredient");
    IngredientRepository::create(&store, &owner, &name("Lentils"))
        .await
        .expect("ingredient");
    for title in ["Eggs benedict", "Herb eggs"] {
        RecipeRepository::create(&store, &owner, &draft(title, Vec::new(), vec![eggs.id]))
            .await
            .expect("recipe");
    }

    let assigned = IngredientRepository::list(&store, &owner, true)
        .await
        .expect("list");

    assert_eq!(assigned, vec![eggs]);
}

#[rstest]
#[tokio::test]
async fn recipes_filter_by_any_listed_tag(store: InMemoryStore) {
    let owner = UserId::random();
    let vegan = TagRepository::create(&store, &owner, &name("Vegan"))
        .await
        .expect("tag");
    let veggie = TagRepository::create(&store, &owner, &name("Vegetarian"))
        .await
        .expect("tag");
    let curry = RecipeRepository::create(&store, &owner, &draft("Curry", vec![vegan.id], vec![]))
        .await
        .expect("recipe");
    let tahini = RecipeRepository::create(&store, &owner, &draft("Tahini", vec![veggie.id], vec![]))
        .await
        .expect("recipe");
    RecipeRepository::create(&store, &owner, &draft("Fish", vec![], vec![]))
        .await
        .expect("recipe");

    let filter = RecipeFilter {
        tags: vec![vegan.id, veggie.id],
        ingredients: Vec::new(),
    };
    let recipes = RecipeRepository::list(&store, &owner, &filter)
        .await
        .expect("list");

    let ids: Vec<RecipeId> = recipes.iter().map(|recipe| recipe.id).collect();
    assert_eq!(ids, vec![curry.id, tahini.id]);
}

#[rstest]
#[tokio::test]
async fn foreign_recipes_are_invisible(store: InMemoryStore) {
    let owner = UserId::random();
    let intruder = UserId::random();
    let recipe = RecipeRepository::create(&store, &owner, &draft("Soup", vec![], vec![]))
        .await
        .expect("recipe");

    assert_eq!(
        RecipeRepository::find(&store, &intruder, recipe.id)
            .await
            .expect("find"),
        None
    );
    assert!(
        !RecipeRepository::delete(&store, &intruder, recipe.id)
            .await
            .expect("delete")
    );
    assert!(
        RecipeRepository::delete(&store, &owner, recipe.id)
            .await
            .expect("delete")
    );
}

#[rstest]
#[tokio::test]
async fn image_store_rejects_parent_segments() {
    let images = InMemoryRecipeImageStore::default();

    let error = images
        .store("uploads/../secret.jpg", b"data")
        .await
        .expect_err("path rejected");

    assert_eq!(error, ImageStoreError::invalid_path("uploads/../secret.jpg"));
    images
        .store("uploads/recipe/a.jpg", b"data")
        .await
        .expect("stored");
    assert_eq!(images.get("uploads/recipe/a.jpg"), Some(b"data".to_vec()));
}
