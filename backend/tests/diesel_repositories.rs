//! Diesel adapters against a live PostgreSQL database.
//!
//! Set `BLOG_TEST_DATABASE_URL` to run these tests; they are skipped
//! otherwise. Each test uses fresh usernames so runs can share a database.

use std::env;
use std::sync::{Arc, Mutex};

use backend::domain::ports::{ResourcePersistenceError, ResourceRepository, UserRepository};
use backend::domain::{
    Article, ArticleContent, ArticleDraft, ArticleTitle, ArticleType, Category, CategoryDraft,
    CategoryId, CategoryName, PasswordHash, PersonName, User, UserDraft, UserId, Username,
};
use backend::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselCategoryRepository, DieselUserRepository, PoolConfig,
    run_migrations,
};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::{Clock, DefaultClock};
use uuid::Uuid;

const DATABASE_URL_ENV: &str = "BLOG_TEST_DATABASE_URL";

struct Repositories {
    users: DieselUserRepository,
    categories: DieselCategoryRepository,
    articles: DieselArticleRepository,
}

/// Clock the test moves by hand, including backwards.
struct SettableClock(Mutex<DateTime<Utc>>);

impl SettableClock {
    fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(now)))
    }

    fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().expect("clock lock") = now;
    }
}

impl Clock for SettableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

async fn repositories() -> Option<Repositories> {
    repositories_with_clock(Arc::new(DefaultClock)).await
}

async fn repositories_with_clock(clock: Arc<dyn Clock>) -> Option<Repositories> {
    let Ok(url) = env::var(DATABASE_URL_ENV) else {
        eprintln!("SKIP-TEST-DATABASE: {DATABASE_URL_ENV} is not set");
        return None;
    };
    run_migrations(&url).await.expect("migrations apply");
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(2))
        .await
        .expect("pool builds");
    Some(Repositories {
        users: DieselUserRepository::new(pool.clone()),
        categories: DieselCategoryRepository::new(pool.clone()),
        articles: DieselArticleRepository::new(pool, clock),
    })
}

fn user_draft(password: Option<&str>) -> UserDraft {
    let username = format!("u{}", Uuid::new_v4().simple());
    UserDraft {
        username: Username::new(username).expect("valid username"),
        first_name: PersonName::first("Ada").expect("valid name"),
        last_name: PersonName::last("Lovelace").expect("valid name"),
        password: password.map(PasswordHash::generate),
    }
}

fn category_draft(name: &str) -> CategoryDraft {
    CategoryDraft {
        name: CategoryName::new(name).expect("valid name"),
        description: None,
    }
}

fn article_draft(author: UserId, categories: Vec<CategoryId>) -> ArticleDraft {
    ArticleDraft::new(
        ArticleTitle::new("Intro").expect("valid title"),
        ArticleContent::new("hello").expect("valid content"),
        author,
        ArticleType::default(),
        categories,
    )
}

#[tokio::test]
async fn usernames_are_unique() {
    let Some(repos) = repositories().await else {
        return;
    };
    let draft = user_draft(Some("pw"));
    ResourceRepository::<User>::create(&repos.users, draft.clone())
        .await
        .expect("first insert");

    let err = ResourceRepository::<User>::create(&repos.users, draft)
        .await
        .expect_err("duplicate username");
    assert_eq!(err, ResourcePersistenceError::conflict("username"));
}

#[tokio::test]
async fn get_or_create_reuses_existing_users() {
    let Some(repos) = repositories().await else {
        return;
    };
    let draft = user_draft(None);
    let (first, created) = repos
        .users
        .get_or_create(draft.clone())
        .await
        .expect("insert");
    assert!(created);
    let (second, created_again) = repos.users.get_or_create(draft).await.expect("lookup");
    assert!(!created_again);
    assert_eq!(first, second);
}

#[tokio::test]
async fn deleting_an_author_cascades_to_articles() {
    let Some(repos) = repositories().await else {
        return;
    };
    let author = ResourceRepository::<User>::create(&repos.users, user_draft(None))
        .await
        .expect("author");
    let category = ResourceRepository::<Category>::create(&repos.categories, category_draft("db"))
        .await
        .expect("category");
    let article = ResourceRepository::<Article>::create(
        &repos.articles,
        article_draft(author.id, vec![category.id]),
    )
    .await
    .expect("article");
    assert_eq!(article.article_type, ArticleType::Unspecified);
    assert_eq!(article.categories, vec![category.clone()]);
    assert!(article.updated_at >= article.created_at);

    assert!(
        ResourceRepository::<Category>::delete(&repos.categories, category.id)
            .await
            .expect("category delete")
    );
    let kept = ResourceRepository::<Article>::find(&repos.articles, article.id)
        .await
        .expect("find")
        .expect("article survives category delete");
    assert!(kept.categories.is_empty());

    assert!(
        ResourceRepository::<User>::delete(&repos.users, author.id)
            .await
            .expect("user delete")
    );
    let gone = ResourceRepository::<Article>::find(&repos.articles, article.id)
        .await
        .expect("find");
    assert!(gone.is_none());
}

#[tokio::test]
async fn unknown_references_are_reported() {
    let Some(repos) = repositories().await else {
        return;
    };
    let author = ResourceRepository::<User>::create(&repos.users, user_draft(None))
        .await
        .expect("author");

    let err = ResourceRepository::<Article>::create(
        &repos.articles,
        article_draft(UserId::new(i64::MAX), Vec::new()),
    )
    .await
    .expect_err("missing author");
    assert_eq!(
        err,
        ResourcePersistenceError::unknown_reference("author", i64::MAX)
    );

    let err = ResourceRepository::<Article>::create(
        &repos.articles,
        article_draft(author.id, vec![CategoryId::new(i64::MAX)]),
    )
    .await
    .expect_err("missing category");
    assert_eq!(
        err,
        ResourcePersistenceError::unknown_reference("categories", i64::MAX)
    );
}

#[tokio::test]
async fn replacing_an_article_keeps_its_creation_time() {
    let Some(repos) = repositories().await else {
        return;
    };
    let author = ResourceRepository::<User>::create(&repos.users, user_draft(None))
        .await
        .expect("author");
    let article =
        ResourceRepository::<Article>::create(&repos.articles, article_draft(author.id, Vec::new()))
            .await
            .expect("article");

    let replaced = ResourceRepository::<Article>::replace(
        &repos.articles,
        article.id,
        ArticleDraft::new(
            ArticleTitle::new("Renamed").expect("valid title"),
            ArticleContent::new("body").expect("valid content"),
            author.id,
            ArticleType::Review,
            Vec::new(),
        ),
    )
    .await
    .expect("replace")
    .expect("article exists");

    assert_eq!(replaced.created_at, article.created_at);
    assert!(replaced.updated_at >= article.updated_at);
    assert_eq!(replaced.article_type, ArticleType::Review);
}

#[tokio::test]
async fn updated_at_holds_when_the_clock_steps_back() {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid time");
    let clock = SettableClock::starting_at(start);
    let Some(repos) = repositories_with_clock(clock.clone()).await else {
        return;
    };
    let author = ResourceRepository::<User>::create(&repos.users, user_draft(None))
        .await
        .expect("author");
    let article = ResourceRepository::<Article>::create(
        &repos.articles,
        article_draft(author.id, Vec::new()),
    )
    .await
    .expect("article");

    clock.set(start + TimeDelta::minutes(10));
    let first = ResourceRepository::<Article>::replace(
        &repos.articles,
        article.id,
        article_draft(author.id, Vec::new()),
    )
    .await
    .expect("first replace")
    .expect("article exists");

    clock.set(start + TimeDelta::minutes(5));
    let second = ResourceRepository::<Article>::replace(
        &repos.articles,
        article.id,
        article_draft(author.id, Vec::new()),
    )
    .await
    .expect("second replace")
    .expect("article exists");

    assert_eq!(first.updated_at, start + TimeDelta::minutes(10));
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(second.created_at, article.created_at);
}

#[tokio::test]
async fn deleting_a_category_unlinks_it_from_articles() {
    let Some(repos) = repositories().await else {
        return;
    };
    let author = ResourceRepository::<User>::create(&repos.users, user_draft(None))
        .await
        .expect("author");
    let doomed =
        ResourceRepository::<Category>::create(&repos.categories, category_draft("doomed"))
            .await
            .expect("category");
    let kept = ResourceRepository::<Category>::create(&repos.categories, category_draft("kept"))
        .await
        .expect("category");
    let article = ResourceRepository::<Article>::create(
        &repos.articles,
        article_draft(author.id, vec![kept.id, doomed.id]),
    )
    .await
    .expect("article");
    assert_eq!(article.categories, vec![doomed.clone(), kept.clone()]);

    assert!(
        ResourceRepository::<Category>::delete(&repos.categories, doomed.id)
            .await
            .expect("category delete")
    );

    let fetched = ResourceRepository::<Article>::find(&repos.articles, article.id)
        .await
        .expect("find")
        .expect("article survives");
    assert_eq!(fetched.categories, vec![kept]);
    assert_eq!(fetched.title, article.title);
}
