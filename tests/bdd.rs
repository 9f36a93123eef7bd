use std::{fmt, net::SocketAddr, time::Duration};

use anyhow::Context;
use cucumber::{given, then, when, World as _};
use tempfile::TempDir;
use voyagr::{
    config::AppConfig,
    db::{init_pool, run_migrations},
    error::ErrorKind,
    models::{
        itinerary::{ElementFields, ItineraryElement},
        trip::{Trip, TripInput},
    },
    state::AppState,
};

#[derive(Debug, cucumber::World, Default)]
struct AppWorld {
    state: Option<TestState>,
    last_trip: Option<Trip>,
    last_error: Option<ErrorKind>,
}

impl AppWorld {
    fn app_state(&self) -> &AppState {
        self.state
            .as_ref()
            .expect("state must be initialised first")
            .app()
    }

    fn last_trip_id(&self) -> String {
        self.last_trip
            .as_ref()
            .expect("a trip must be stored first")
            .id
            .clone()
    }
}

struct TestState {
    app: AppState,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let db_path = root.path().join("bdd.sqlite");
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let config = AppConfig {
            database_url,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            max_connections: 2,
            request_timeout: Duration::from_secs(5),
        };

        let db = init_pool(&config.database_url, config.max_connections).await?;
        run_migrations(&db).await?;

        let app = AppState::new(config, db);
        Ok(Self { app, _root: root })
    }

    fn app(&self) -> &AppState {
        &self.app
    }
}

/// Parses `"2024-03-02", "", "2024-03-01"` into one leg per anchor. Each leg
/// is titled by its position so ordering can be asserted.
fn legs(list: &str) -> Vec<ItineraryElement> {
    list.split(',')
        .map(|raw| raw.trim().trim_matches('"'))
        .enumerate()
        .map(|(index, departure)| {
            ItineraryElement::Generic(ElementFields {
                title: Some(format!("leg {index}")),
                departure: (!departure.is_empty()).then(|| departure.to_string()),
                ..ElementFields::default()
            })
        })
        .collect()
}

fn trip_input(name: &str, owner: &str, itinerary: Vec<ItineraryElement>) -> TripInput {
    TripInput {
        name: name.to_string(),
        description: "bdd trip".into(),
        start: "2024-03-01".into(),
        end: "2024-03-09".into(),
        owner: owner.to_string(),
        shared_with: Vec::new(),
        itinerary,
    }
}

fn leg_titles(trip: &Trip) -> Vec<String> {
    trip.itinerary
        .iter()
        .map(|leg| leg.title().unwrap_or_default().to_string())
        .collect()
}

#[given("a fresh application state")]
async fn given_fresh_state(world: &mut AppWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.last_trip = None;
    world.last_error = None;
}

#[when(regex = r#"^I store a trip \"([^\"]+)\" owned by \"([^\"]+)\" with an empty itinerary$"#)]
async fn store_empty_trip(world: &mut AppWorld, name: String, owner: String) {
    let trip = world
        .app_state()
        .trips
        .store(trip_input(&name, &owner, Vec::new()))
        .await
        .expect("store trip");
    world.last_trip = Some(trip);
}

#[when(regex = r#"^I store a trip \"([^\"]+)\" owned by \"([^\"]+)\" with legs departing (.+)$"#)]
async fn store_trip_with_legs(world: &mut AppWorld, name: String, owner: String, list: String) {
    let trip = world
        .app_state()
        .trips
        .store(trip_input(&name, &owner, legs(&list)))
        .await
        .expect("store trip");
    world.last_trip = Some(trip);
}

#[when(regex = r#"^I update that trip with legs departing (.+)$"#)]
async fn update_trip_with_legs(world: &mut AppWorld, list: String) {
    let id = world.last_trip_id();
    let owner = world
        .last_trip
        .as_ref()
        .map(|trip| trip.owner.clone())
        .unwrap_or_default();
    let trip = world
        .app_state()
        .trips
        .update(&id, trip_input("updated", &owner, legs(&list)))
        .await
        .expect("update trip");
    world.last_trip = Some(trip);
}

#[when("I delete that trip")]
async fn delete_trip(world: &mut AppWorld) {
    let id = world.last_trip_id();
    world
        .app_state()
        .trips
        .delete(&id)
        .await
        .expect("delete trip");
}

#[when(regex = r#"^I delete the trip with id \"([^\"]+)\"$"#)]
async fn delete_trip_by_id(world: &mut AppWorld, id: String) {
    world.last_error = world
        .app_state()
        .trips
        .delete(&id)
        .await
        .err()
        .map(|err| err.kind());
}

#[when("I fetch that trip")]
async fn fetch_trip(world: &mut AppWorld) {
    let id = world.last_trip_id();
    match world.app_state().trips.get(&id).await {
        Ok(trip) => {
            world.last_trip = Some(trip);
            world.last_error = None;
        }
        Err(err) => world.last_error = Some(err.kind()),
    }
}

#[then(regex = r#"^listing trips for \"([^\"]+)\" returns (\d+) trips?$"#)]
async fn then_listing_returns(world: &mut AppWorld, owner: String, expected: usize) {
    let trips = world
        .app_state()
        .trips
        .get_all(&owner)
        .await
        .expect("list trips");
    assert_eq!(trips.len(), expected);
    assert!(trips.iter().all(|trip| trip.owner == owner));
}

#[then(regex = r#"^listing trips for \"([^\"]+)\" fails as (\w+)$"#)]
async fn then_listing_fails(world: &mut AppWorld, owner: String, kind: String) {
    let err = world
        .app_state()
        .trips
        .get_all(&owner)
        .await
        .expect_err("listing should fail");
    assert_eq!(format!("{:?}", err.kind()), kind);
}

#[then(regex = r#"^the last error is (\w+)$"#)]
async fn then_last_error(world: &mut AppWorld, kind: String) {
    let actual = world.last_error.expect("an error was expected");
    assert_eq!(format!("{actual:?}"), kind);
}

#[then(regex = r#"^the stored legs are ordered (.+)$"#)]
async fn then_legs_ordered(world: &mut AppWorld, order: String) {
    let id = world.last_trip_id();
    let stored = world.app_state().trips.get(&id).await.expect("fetch trip");
    let expected: Vec<String> = order
        .split(',')
        .map(|raw| raw.trim().trim_matches('"').to_string())
        .collect();
    assert_eq!(leg_titles(&stored), expected);
}

#[tokio::main]
async fn main() {
    AppWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run_and_exit("tests/features")
        .await;
}
