use chrono::{Duration, NaiveDateTime, Utc};
use entity::prelude::*;
use repository::{init_repository, user::ProfileChanges, Repository};

async fn setup() -> Repository {
    init_repository("sqlite::memory:", 1).await.unwrap()
}

async fn create_user(repo: &Repository, username: &str) -> UserEntity {
    repo.user
        .create(UserEntity {
            username: username.to_string(),
            password: "hash".to_string(),
            is_active: true,
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn create_category(
    repo: &Repository,
    slug: &str,
    is_published: bool,
) -> CategoryEntity {
    repo.category
        .create(CategoryEntity {
            title: slug.to_uppercase(),
            description: format!("about {}", slug),
            slug: slug.to_string(),
            is_published,
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn create_post(
    repo: &Repository,
    author: &UserEntity,
    category: &CategoryEntity,
    pub_date: NaiveDateTime,
    is_published: bool,
) -> PostEntity {
    repo.post
        .insert(PostEntity {
            title: format!("post at {}", pub_date),
            text: "text".to_string(),
            pub_date,
            is_published,
            author_id: author.id,
            category_id: Some(category.id),
            ..Default::default()
        })
        .await
        .unwrap()
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[tokio::test]
async fn test_published_feed_applies_visibility() {
    // Arrange
    let repo = setup().await;
    let author = create_user(&repo, "author").await;
    let open = create_category(&repo, "open", true).await;
    let hidden = create_category(&repo, "hidden", false).await;
    let visible =
        create_post(&repo, &author, &open, now() - Duration::days(1), true)
            .await;
    create_post(&repo, &author, &open, now() + Duration::days(1), true).await;
    create_post(&repo, &author, &open, now() - Duration::days(1), false).await;
    create_post(&repo, &author, &hidden, now() - Duration::days(1), true)
        .await;

    // Act
    let page = repo.post.find_published(now(), None, 10).await.unwrap();

    // Assert
    assert_eq!(page.count, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].post.id, visible.id);
    assert_eq!(page.items[0].author.username, "author");
    assert_eq!(page.items[0].category.as_ref().unwrap().slug, "open");
}

#[tokio::test]
async fn test_published_feed_is_paginated_newest_first() {
    // Arrange
    let repo = setup().await;
    let author = create_user(&repo, "author").await;
    let open = create_category(&repo, "open", true).await;
    for days in 1..=12 {
        create_post(&repo, &author, &open, now() - Duration::days(days), true)
            .await;
    }

    // Act
    let first = repo.post.find_published(now(), None, 10).await.unwrap();
    let second = repo
        .post
        .find_published(now(), Some("2"), 10)
        .await
        .unwrap();
    let overflow = repo
        .post
        .find_published(now(), Some("7"), 10)
        .await
        .unwrap();

    // Assert
    assert_eq!(first.count, 12);
    assert_eq!(first.num_pages, 2);
    assert_eq!(first.items.len(), 10);
    assert!(first
        .items
        .windows(2)
        .all(|w| w[0].post.pub_date >= w[1].post.pub_date));
    assert_eq!(second.number, 2);
    assert_eq!(second.items.len(), 2);
    assert!(first.items[9].post.pub_date >= second.items[0].post.pub_date);
    assert_eq!(overflow.number, 2);
}

#[tokio::test]
async fn test_category_feed_and_profile_listing() {
    // Arrange
    let repo = setup().await;
    let author = create_user(&repo, "author").await;
    let other = create_user(&repo, "other").await;
    let open = create_category(&repo, "open", true).await;
    let travel = create_category(&repo, "travel", true).await;
    let hidden = create_category(&repo, "hidden", false).await;
    create_post(&repo, &author, &open, now() - Duration::days(2), true).await;
    create_post(&repo, &author, &travel, now() - Duration::days(2), true)
        .await;
    create_post(&repo, &author, &travel, now() + Duration::days(2), true)
        .await;
    create_post(&repo, &author, &hidden, now() - Duration::days(2), true)
        .await;
    create_post(&repo, &other, &travel, now() - Duration::days(2), true).await;

    // Act
    let travel_feed = repo
        .post
        .find_published_by_category(travel.id, now(), None, 10)
        .await
        .unwrap();
    let profile = repo.post.find_by_author(author.id, None, 10).await.unwrap();

    // Assert
    assert_eq!(travel_feed.count, 2);
    assert!(travel_feed
        .items
        .iter()
        .all(|x| x.post.category_id == Some(travel.id)));
    assert_eq!(profile.count, 3);
    assert!(profile.items.iter().all(|x| x.author.id == author.id));
    assert!(profile
        .items
        .iter()
        .all(|x| x.post.category_id != Some(hidden.id)));
}

#[tokio::test]
async fn test_comment_count_and_cascade_delete() {
    // Arrange
    let repo = setup().await;
    let author = create_user(&repo, "author").await;
    let reader = create_user(&repo, "reader").await;
    let open = create_category(&repo, "open", true).await;
    let post =
        create_post(&repo, &author, &open, now() - Duration::days(1), true)
            .await;
    for text in ["first", "second"] {
        repo.comment
            .insert(CommentEntity {
                text: text.to_string(),
                post_id: post.id,
                author_id: reader.id,
                ..Default::default()
            })
            .await
            .unwrap();
    }

    // Act
    let detail = repo
        .post
        .find_visible_by_id(post.id, now())
        .await
        .unwrap()
        .unwrap();
    let comments = repo.comment.find_by_post(post.id).await.unwrap();
    repo.post.delete(post.id).await.unwrap();

    // Assert
    assert_eq!(detail.comment_count, 2);
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].comment.text, "first");
    assert_eq!(comments[0].author.username, "reader");
    assert!(repo.post.find_by_id(post.id).await.unwrap().is_none());
    assert!(repo.comment.find_by_post(post.id).await.unwrap().is_empty());
    for comment in comments {
        assert!(repo
            .comment
            .find_in_post(post.id, comment.comment.id)
            .await
            .unwrap()
            .is_none());
    }
}

#[tokio::test]
async fn test_find_visible_by_id_hides_scheduled_post() {
    // Arrange
    let repo = setup().await;
    let author = create_user(&repo, "author").await;
    let open = create_category(&repo, "open", true).await;
    let hidden = create_category(&repo, "hidden", false).await;
    let scheduled =
        create_post(&repo, &author, &open, now() + Duration::days(1), true)
            .await;
    let in_hidden =
        create_post(&repo, &author, &hidden, now() - Duration::days(1), true)
            .await;
    let draft =
        create_post(&repo, &author, &open, now() - Duration::days(1), false)
            .await;

    // Act
    let found = repo
        .post
        .find_visible_by_id(scheduled.id, now())
        .await
        .unwrap();
    let found_in_hidden = repo
        .post
        .find_visible_by_id(in_hidden.id, now())
        .await
        .unwrap();
    let found_draft =
        repo.post.find_visible_by_id(draft.id, now()).await.unwrap();

    // Assert
    assert!(found.is_none());
    assert!(found_in_hidden.is_none());
    assert!(found_draft.is_none());
    assert!(repo.post.find_by_id(scheduled.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_comment_lookup_is_scoped_to_post() {
    // Arrange
    let repo = setup().await;
    let author = create_user(&repo, "author").await;
    let open = create_category(&repo, "open", true).await;
    let first =
        create_post(&repo, &author, &open, now() - Duration::days(1), true)
            .await;
    let second =
        create_post(&repo, &author, &open, now() - Duration::days(1), true)
            .await;
    let comment = repo
        .comment
        .insert(CommentEntity {
            text: "hello".to_string(),
            post_id: first.id,
            author_id: author.id,
            ..Default::default()
        })
        .await
        .unwrap();

    // Act
    let in_first = repo.comment.find_in_post(first.id, comment.id).await;
    let in_second = repo.comment.find_in_post(second.id, comment.id).await;
    let edited = repo
        .comment
        .update_text(comment.id, "edited".to_string())
        .await
        .unwrap();

    // Assert
    assert!(in_first.unwrap().is_some());
    assert!(in_second.unwrap().is_none());
    assert_eq!(edited.text, "edited");
    assert_eq!(edited.post_id, first.id);
}

#[tokio::test]
async fn test_user_profile_update_and_uniqueness() {
    // Arrange
    let repo = setup().await;
    let leo = create_user(&repo, "leo").await;
    create_user(&repo, "anna").await;

    // Act
    let taken_by_other = repo.user.username_taken("anna", Some(leo.id)).await;
    let taken_by_self = repo.user.username_taken("leo", Some(leo.id)).await;
    let updated = repo
        .user
        .update_profile(
            leo.id,
            ProfileChanges {
                username: "lev".to_string(),
                email: "lev@example.com".to_string(),
                first_name: "Lev".to_string(),
                last_name: "Tolstoy".to_string(),
            },
        )
        .await
        .unwrap();

    // Assert
    assert!(taken_by_other.unwrap());
    assert!(!taken_by_self.unwrap());
    assert_eq!(updated.username, "lev");
    assert_eq!(updated.password, "hash");
    assert!(repo.user.find_by_username("leo").await.unwrap().is_none());
    assert_eq!(
        repo.user
            .find_by_username("lev")
            .await
            .unwrap()
            .unwrap()
            .email,
        "lev@example.com"
    );
}
