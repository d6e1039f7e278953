use api_types::{
    drink::{DrinkNew, DrinkType},
    event::{Attendance, EventNew, EventStatus, EventUpdate},
    group::{GroupNew, GroupRole},
    stats::{RankMetric, SortOrder},
    user::{UserLogin, UserRegister},
};
use chrono::{TimeZone, Utc};
use client::{Client, ClientError};
use engine::Engine;
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

async fn spawn_server() -> Client {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine, listener).unwrap();
    Client::new(&format!("http://{addr}/")).unwrap()
}

async fn register(client: &Client, username: &str, password: &str) {
    client
        .register(&UserRegister {
            username: username.to_string(),
            name: username.to_uppercase(),
            password: password.to_string(),
        })
        .await
        .unwrap();
}

fn beer(group_id: Uuid, volume_ml: i64) -> DrinkNew {
    DrinkNew {
        group_id,
        event_id: None,
        name: "Gelada".to_string(),
        drink_type: DrinkType::Beer,
        brand: "Brahma".to_string(),
        volume_ml,
        location: None,
        photo_url: "https://storage.example/1.jpg".to_string(),
        occurred_at: Some(Utc.with_ymd_and_hms(2025, 6, 1, 23, 0, 0).unwrap()),
    }
}

#[tokio::test]
async fn accounts_and_error_statuses() {
    let anon = spawn_server().await;
    register(&anon, "alice", "secret").await;

    let duplicate = anon
        .register(&UserRegister {
            username: "alice".to_string(),
            name: "Alice".to_string(),
            password: "other".to_string(),
        })
        .await;
    assert!(matches!(duplicate, Err(ClientError::Conflict(_))));

    let user = anon
        .login(&UserLogin {
            username: "alice".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.name, "ALICE");

    let bad = anon
        .login(&UserLogin {
            username: "alice".to_string(),
            password: "nope".to_string(),
        })
        .await;
    assert!(matches!(bad, Err(ClientError::Unauthorized)));

    assert!(matches!(anon.me().await, Err(ClientError::MissingCredentials)));

    let alice = anon.clone().with_credentials("alice", "secret");
    assert_eq!(alice.me().await.unwrap().username, "alice");
    assert!(matches!(
        alice.group(Uuid::new_v4()).await,
        Err(ClientError::NotFound(_))
    ));

    let wrong = anon.with_credentials("alice", "wrong");
    assert!(matches!(wrong.groups().await, Err(ClientError::Unauthorized)));
}

#[tokio::test]
async fn groups_drinks_and_statistics() {
    let anon = spawn_server().await;
    register(&anon, "alice", "secret").await;
    register(&anon, "bob", "hunter2").await;
    let alice = anon.clone().with_credentials("alice", "secret");
    let bob = anon.with_credentials("bob", "hunter2");

    let group = alice
        .create_group(&GroupNew {
            name: "Os Bebuns".to_string(),
            description: None,
        })
        .await
        .unwrap();
    assert!(matches!(bob.group(group.id).await, Err(ClientError::Forbidden(_))));

    let members = alice.add_member(group.id, "bob").await.unwrap();
    assert_eq!(members.members.len(), 2);
    assert_eq!(members.members[0].role, GroupRole::Admin);
    assert_eq!(alice.groups().await.unwrap()[0].id, group.id);

    let drink = bob.add_drink(&beer(group.id, 500)).await.unwrap();
    assert_eq!(drink.points, 5.0);
    assert!(matches!(
        bob.add_drink(&beer(group.id, 0)).await,
        Err(ClientError::Validation(_))
    ));

    let thread = alice.comment_drink(drink.id, "saúde").await.unwrap();
    assert_eq!(thread.comments.len(), 1);
    assert_eq!(thread.comments[0].author, "alice");
    assert_eq!(bob.my_drinks().await.unwrap().len(), 1);
    assert_eq!(alice.group_drinks(group.id).await.unwrap()[0].id, drink.id);

    let dashboard = alice.dashboard(group.id).await.unwrap();
    assert_eq!(dashboard.totals.drinks, 1);
    assert_eq!(dashboard.totals.liters, 0.5);
    assert_eq!(dashboard.by_type.len(), 1);
    assert_eq!(dashboard.by_period.len(), 4);
    assert_eq!(dashboard.ranking[0].username, "bob");
    assert_eq!(dashboard.member_count, 2);
    assert!(dashboard.per_event.is_none());

    let ranking = alice
        .ranking(group.id, RankMetric::TotalDrinks, SortOrder::Asc)
        .await
        .unwrap();
    assert_eq!(ranking.metric, RankMetric::TotalDrinks);
    assert_eq!(ranking.order, SortOrder::Asc);
    assert_eq!(ranking.members[0].username, "alice");

    alice.remove_member(group.id, "bob").await.unwrap();
    assert!(matches!(bob.group(group.id).await, Err(ClientError::Forbidden(_))));
    assert_eq!(alice.group_members(group.id).await.unwrap().members.len(), 1);
}

#[tokio::test]
async fn events_and_attendance() {
    let anon = spawn_server().await;
    register(&anon, "alice", "secret").await;
    let alice = anon.with_credentials("alice", "secret");

    let group = alice
        .create_group(&GroupNew {
            name: "Crew".to_string(),
            description: Some("sexta".to_string()),
        })
        .await
        .unwrap();

    let start = Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 6, 2, 2, 0, 0).unwrap();
    let backwards = alice
        .create_event(&EventNew {
            group_id: group.id,
            name: "Churrasco".to_string(),
            description: None,
            location: "Casa".to_string(),
            start: end,
            end: start,
        })
        .await;
    assert!(matches!(backwards, Err(ClientError::Validation(_))));

    let event = alice
        .create_event(&EventNew {
            group_id: group.id,
            name: "Churrasco".to_string(),
            description: None,
            location: "Casa".to_string(),
            start,
            end,
        })
        .await
        .unwrap();
    assert_eq!(event.status, EventStatus::Past);
    assert_eq!(event.duration_hours, 6.0);

    let attendees = alice.attend(event.id, Attendance::Yes).await.unwrap();
    assert_eq!(attendees.attendees.len(), 1);
    assert_eq!(attendees.attendees[0].status, Attendance::Yes);

    let thread = alice.comment_event(event.id, "bora").await.unwrap();
    assert_eq!(thread.comments[0].text, "bora");

    let renamed = alice
        .update_event(
            event.id,
            &EventUpdate {
                name: Some("Churras".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Churras");

    let detail = alice.event(event.id).await.unwrap();
    assert_eq!(detail.event.name, "Churras");
    assert_eq!(detail.attendees.len(), 1);
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(alice.group_events(group.id).await.unwrap().len(), 1);
    assert!(alice.event_drinks(event.id).await.unwrap().is_empty());
}
