use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    Attendance, BucketKey, DrinkType, Engine, EngineError, EventStatus, EventUpdate, NewDrink,
    NewEvent, RankMetric, SortOrder, TimePeriod,
};
use migration::MigratorTrait;

async fn engine_with_group() -> (Engine, Uuid) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .timezone(chrono_tz::America::Sao_Paulo)
        .build()
        .await
        .unwrap();
    for (username, name) in [("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")] {
        engine
            .register_user(username, name, "password")
            .await
            .unwrap();
    }
    let group = engine.create_group("Crew", None, "alice").await.unwrap();
    engine.add_member(group.id, "bob", "alice").await.unwrap();
    (engine, group.id)
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
}

fn drink(group_id: Uuid, kind: DrinkType, volume_ml: i64, occurred_at: DateTime<Utc>) -> NewDrink {
    NewDrink {
        group_id,
        event_id: None,
        name: "Gelada".to_string(),
        drink_type: kind,
        brand: "Brahma".to_string(),
        volume_ml,
        location: Some("Bar do Zé".to_string()),
        photo_url: "https://storage.example/drinks/1.jpg".to_string(),
        occurred_at,
    }
}

fn party(group_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> NewEvent {
    NewEvent {
        group_id,
        name: "Churrasco".to_string(),
        description: None,
        location: "Casa da Alice".to_string(),
        start,
        end,
    }
}

#[tokio::test]
async fn add_drink_stores_points() {
    let (engine, group_id) = engine_with_group().await;

    let beer = engine
        .add_drink(drink(group_id, DrinkType::Beer, 350, at(1, 22)), "bob")
        .await
        .unwrap();
    assert_eq!(beer.points, 3.5);
    assert_eq!(beer.user_id, "bob");
    assert_eq!(beer.location.as_deref(), Some("Bar do Zé"));

    let shot = engine
        .add_drink(drink(group_id, DrinkType::Shot, 50, at(1, 23)), "bob")
        .await
        .unwrap();
    assert_eq!(shot.points, 5.0);

    let listed = engine.drinks_for_user("bob").await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![shot.id, beer.id]);
}

#[tokio::test]
async fn add_drink_validates_input() {
    let (engine, group_id) = engine_with_group().await;

    let err = engine
        .add_drink(drink(group_id, DrinkType::Beer, 0, at(1, 22)), "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidVolume(_)));

    let mut no_photo = drink(group_id, DrinkType::Wine, 150, at(1, 22));
    no_photo.photo_url = String::new();
    let err = engine.add_drink(no_photo, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .add_drink(drink(group_id, DrinkType::Beer, 350, at(1, 22)), "carol")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    assert!(engine.drinks_for_user("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn drink_event_must_belong_to_the_group() {
    let (engine, group_id) = engine_with_group().await;
    let other = engine.create_group("Other", None, "bob").await.unwrap();
    let foreign = engine
        .create_event(party(other.id, at(1, 20), at(2, 2)), "bob")
        .await
        .unwrap();

    let mut new = drink(group_id, DrinkType::Beer, 350, at(1, 22));
    new.event_id = Some(foreign.id);
    let err = engine.add_drink(new, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let own = engine
        .create_event(party(group_id, at(1, 20), at(2, 2)), "bob")
        .await
        .unwrap();
    let mut new = drink(group_id, DrinkType::Beer, 350, at(1, 22));
    new.event_id = Some(own.id);
    engine.add_drink(new, "bob").await.unwrap();

    let at_party = engine.drinks_for_event(own.id, "alice").await.unwrap();
    assert_eq!(at_party.len(), 1);
    assert_eq!(engine.drinks_for_group(group_id, "alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn drink_comments_are_append_only() {
    let (engine, group_id) = engine_with_group().await;
    let beer = engine
        .add_drink(drink(group_id, DrinkType::Beer, 350, at(1, 22)), "bob")
        .await
        .unwrap();

    engine
        .add_drink_comment(beer.id, "saúde!", "alice")
        .await
        .unwrap();
    let thread = engine
        .add_drink_comment(beer.id, "mais uma", "bob")
        .await
        .unwrap();
    let texts: Vec<&str> = thread.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["saúde!", "mais uma"]);
    assert_eq!(thread[0].author, "alice");

    let err = engine
        .add_drink_comment(beer.id, "  ", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .drink_comments(beer.id, "carol")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn event_window_is_validated() {
    let (engine, group_id) = engine_with_group().await;

    let err = engine
        .create_event(party(group_id, at(2, 2), at(1, 20)), "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidEventWindow(_)));

    let err = engine
        .create_event(party(group_id, at(1, 20), at(1, 20)), "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidEventWindow(_)));

    let event = engine
        .create_event(party(group_id, at(1, 20), at(2, 2)), "bob")
        .await
        .unwrap();
    assert_eq!(event.window.duration_hours(), 6.0);
    assert_eq!(
        event.window.status(at(1, 20) + Duration::hours(1)),
        EventStatus::Current
    );

    let err = engine
        .update_event(
            event.id,
            EventUpdate {
                end: Some(at(1, 19)),
                ..Default::default()
            },
            "bob",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidEventWindow(_)));
}

#[tokio::test]
async fn only_creator_or_admin_edits_events() {
    let (engine, group_id) = engine_with_group().await;
    let event = engine
        .create_event(party(group_id, at(1, 20), at(2, 2)), "alice")
        .await
        .unwrap();

    let err = engine
        .update_event(
            event.id,
            EventUpdate {
                name: Some("Rave".to_string()),
                ..Default::default()
            },
            "bob",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let bobs = engine
        .create_event(party(group_id, at(5, 20), at(6, 2)), "bob")
        .await
        .unwrap();
    let updated = engine
        .update_event(
            bobs.id,
            EventUpdate {
                location: Some("Praia".to_string()),
                end: Some(at(6, 4)),
                ..Default::default()
            },
            "alice",
        )
        .await
        .unwrap();
    assert_eq!(updated.location, "Praia");
    assert_eq!(updated.window.end(), at(6, 4));
    assert_eq!(updated.window.start(), at(5, 20));

    let events = engine.events_for_group(group_id, "bob").await.unwrap();
    let ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![bobs.id, event.id]);
}

#[tokio::test]
async fn attendance_is_upserted() {
    let (engine, group_id) = engine_with_group().await;
    let event = engine
        .create_event(party(group_id, at(1, 20), at(2, 2)), "alice")
        .await
        .unwrap();

    engine
        .set_attendance(event.id, Attendance::Maybe, "bob")
        .await
        .unwrap();
    let attendees = engine
        .set_attendance(event.id, Attendance::Yes, "bob")
        .await
        .unwrap();
    assert_eq!(attendees.len(), 1);
    assert_eq!(attendees[0].username, "bob");
    assert_eq!(attendees[0].name, "Bob");
    assert_eq!(attendees[0].status, Attendance::Yes);

    let err = engine
        .set_attendance(event.id, Attendance::Yes, "carol")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine
        .add_event_comment(event.id, "levo o gelo", "bob")
        .await
        .unwrap();
    let detail = engine.event(event.id, "alice").await.unwrap();
    assert_eq!(detail.event.id, event.id);
    assert_eq!(detail.attendees.len(), 1);
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].text, "levo o gelo");
}

#[tokio::test]
async fn dashboard_totals_ranking_and_party_hours() {
    let (engine, group_id) = engine_with_group().await;
    engine.add_member(group_id, "carol", "alice").await.unwrap();

    // 23:00Z is 20:00 in Sao Paulo.
    engine
        .add_drink(drink(group_id, DrinkType::Beer, 500, at(1, 23)), "bob")
        .await
        .unwrap();
    engine
        .add_drink(drink(group_id, DrinkType::Shot, 50, at(1, 23)), "bob")
        .await
        .unwrap();
    engine
        .add_drink(drink(group_id, DrinkType::Wine, 150, at(1, 15)), "alice")
        .await
        .unwrap();

    let past = engine
        .create_event(party(group_id, at(1, 20), at(2, 2)), "alice")
        .await
        .unwrap();
    let running = engine
        .create_event(party(group_id, at(3, 20), at(4, 2)), "alice")
        .await
        .unwrap();
    engine
        .create_event(party(group_id, at(10, 20), at(11, 2)), "alice")
        .await
        .unwrap();

    engine.set_attendance(past.id, Attendance::Yes, "bob").await.unwrap();
    engine.set_attendance(past.id, Attendance::No, "alice").await.unwrap();
    engine
        .set_attendance(running.id, Attendance::Yes, "alice")
        .await
        .unwrap();

    let now = at(3, 22);
    let dashboard = engine.group_dashboard(group_id, "carol", now).await.unwrap();

    assert_eq!(dashboard.totals.drinks, 3);
    assert_eq!(dashboard.totals.liters, 0.7);
    assert_eq!(dashboard.totals.points, 13.0);
    assert_eq!(dashboard.totals.party_hours, 8.0);
    assert_eq!(dashboard.member_count, 3);
    assert_eq!(dashboard.total_events, 3);
    assert_eq!(dashboard.upcoming_events, 1);

    assert_eq!(dashboard.by_type.len(), 3);
    assert_eq!(dashboard.by_period.len(), 4);
    let evening = dashboard
        .by_period
        .iter()
        .find(|b| b.key == BucketKey::Period(TimePeriod::Evening))
        .unwrap();
    assert_eq!(evening.count, 2);

    let leaders: Vec<&str> = dashboard.ranking.iter().map(|m| m.user_id.as_str()).collect();
    assert_eq!(leaders, vec!["bob", "alice", "carol"]);
    assert_eq!(dashboard.ranking[0].total_points, 10.0);
    assert_eq!(dashboard.ranking[0].total_party_hours, 6.0);
    assert_eq!(dashboard.ranking[1].total_party_hours, 2.0);

    let per_member = dashboard.averages.per_member.unwrap();
    assert_eq!(per_member.drinks, 1.0);
    let per_event = dashboard.averages.per_event.unwrap();
    assert_eq!(per_event.drinks, 1.0);

    let by_hours = engine
        .group_ranking(
            group_id,
            RankMetric::TotalPartyHours,
            SortOrder::Asc,
            "alice",
            now,
        )
        .await
        .unwrap();
    let order: Vec<&str> = by_hours.iter().map(|m| m.user_id.as_str()).collect();
    assert_eq!(order, vec!["carol", "alice", "bob"]);

    let err = engine
        .group_dashboard(group_id, "nobody", now)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn dashboard_type_ties_follow_drink_time() {
    let (engine, group_id) = engine_with_group().await;

    // Logged out of order: the wine comes later in time but is stored first.
    engine
        .add_drink(drink(group_id, DrinkType::Wine, 150, at(2, 21)), "alice")
        .await
        .unwrap();
    engine
        .add_drink(drink(group_id, DrinkType::Beer, 350, at(1, 21)), "bob")
        .await
        .unwrap();
    engine
        .add_drink(drink(group_id, DrinkType::Shot, 50, at(3, 1)), "bob")
        .await
        .unwrap();

    let dashboard = engine
        .group_dashboard(group_id, "alice", at(4, 12))
        .await
        .unwrap();
    let keys: Vec<BucketKey> = dashboard.by_type.iter().map(|b| b.key).collect();
    assert_eq!(
        keys,
        vec![
            BucketKey::Type(DrinkType::Beer),
            BucketKey::Type(DrinkType::Wine),
            BucketKey::Type(DrinkType::Shot),
        ]
    );
}
