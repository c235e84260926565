use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use movieverse::api::{LookupOutcome, OmdbClient, SearchOutcome};
use movieverse::{ApiError, Config};
use tokio::net::TcpListener;

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

const DUNE_SEARCH: &str = r#"{"Search":[
    {"Title":"Dune","Year":"2021","imdbID":"tt1160419","Type":"movie","Poster":"N/A"},
    {"Title":"Dune","Year":"1984","imdbID":"tt0087182","Type":"movie","Poster":"https://img/d.jpg"}
],"totalResults":"2","Response":"True"}"#;

const DUNE_DETAIL: &str = r#"{"Title":"Dune","Year":"2021","Rated":"PG-13","Runtime":"155 min",
    "Genre":"Action, Adventure, Drama","Director":"Denis Villeneuve","Actors":"Timothée Chalamet",
    "Plot":"A noble family becomes embroiled in a war.","Poster":"N/A","imdbRating":"8.0",
    "imdbID":"tt1160419","Type":"movie","Response":"True"}"#;

async fn omdb(State(seen): State<Seen>, Query(params): Query<HashMap<String, String>>) -> Response {
    seen.lock().unwrap().push(params.clone());
    if param(&params, "s") == Some("sleepy") {
        tokio::time::sleep(Duration::from_millis(1500)).await;
    }

    let body = match (params.get("s").map(String::as_str), params.get("i")) {
        (Some("boom"), _) => return (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response(),
        (Some("garbage"), _) => "<html>not json</html>".to_string(),
        (Some("zzzz"), _) => r#"{"Response":"False","Error":"Movie not found!"}"#.to_string(),
        (Some(_), _) => DUNE_SEARCH.to_string(),
        (None, Some(id)) if id == "tt1160419" => DUNE_DETAIL.to_string(),
        (None, Some(_)) => r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#.to_string(),
        (None, None) => r#"{"Response":"False","Error":"No API key provided."}"#.to_string(),
    };
    ([("content-type", "application/json")], body).into_response()
}

async fn spawn_server() -> anyhow::Result<(String, Seen)> {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/", get(omdb))
        .with_state(seen.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/"), seen))
}

async fn client() -> anyhow::Result<(OmdbClient, Seen)> {
    let (base_url, seen) = spawn_server().await?;
    let config = Config::new("test-key").with_base_url(base_url);
    Ok((OmdbClient::new(&config)?, seen))
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str)
}

#[tokio::test]
async fn trending_sends_fixed_catalog_parameters() -> anyhow::Result<()> {
    let (client, seen) = client().await?;

    let outcome = client.trending().await?;

    let SearchOutcome::Found(items) = outcome else {
        panic!("expected results, got {outcome:?}");
    };
    assert_eq!(items.len(), 2);

    let seen = seen.lock().unwrap();
    let params = &seen[0];
    assert_eq!(param(params, "apikey"), Some("test-key"));
    assert_eq!(param(params, "s"), Some("movie"));
    assert_eq!(param(params, "type"), Some("movie"));
    assert_eq!(param(params, "y"), Some("2023"));
    Ok(())
}

#[tokio::test]
async fn search_round_trips_query_through_url_encoding() -> anyhow::Result<()> {
    let (client, seen) = client().await?;

    let outcome = client.search("star wars & co").await?;

    match outcome {
        SearchOutcome::Found(items) => {
            assert_eq!(items[0].id.as_deref(), Some("tt1160419"));
            assert_eq!(items[0].poster, None);
            assert_eq!(items[1].poster_url(), "https://img/d.jpg");
        }
        other => panic!("expected results, got {other:?}"),
    }
    let seen = seen.lock().unwrap();
    assert_eq!(param(&seen[0], "s"), Some("star wars & co"));
    assert_eq!(param(&seen[0], "type"), None);
    Ok(())
}

#[tokio::test]
async fn search_rejection_keeps_api_message() -> anyhow::Result<()> {
    let (client, _) = client().await?;

    let outcome = client.search("zzzz").await?;

    assert_eq!(outcome, SearchOutcome::Rejected(Some("Movie not found!".into())));
    Ok(())
}

#[tokio::test]
async fn lookup_requests_full_plot() -> anyhow::Result<()> {
    let (client, seen) = client().await?;

    let outcome = client.lookup("tt1160419").await?;

    let LookupOutcome::Found(fields) = outcome else {
        panic!("expected a record, got {outcome:?}");
    };
    assert_eq!(fields.director.as_deref(), Some("Denis Villeneuve"));
    assert_eq!(fields.actors.as_deref(), Some("Timothée Chalamet"));
    assert_eq!(fields.poster, None);

    let seen = seen.lock().unwrap();
    assert_eq!(param(&seen[0], "i"), Some("tt1160419"));
    assert_eq!(param(&seen[0], "plot"), Some("full"));
    Ok(())
}

#[tokio::test]
async fn lookup_rejection_keeps_api_message() -> anyhow::Result<()> {
    let (client, _) = client().await?;

    let outcome = client.lookup("tt0000000").await?;

    assert_eq!(outcome, LookupOutcome::Rejected(Some("Incorrect IMDb ID.".into())));
    Ok(())
}

#[tokio::test]
async fn server_error_status_is_reported() -> anyhow::Result<()> {
    let (client, _) = client().await?;

    let err = client.search("boom").await.unwrap_err();

    assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 500));
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() -> anyhow::Result<()> {
    let (client, _) = client().await?;

    let err = client.search("garbage").await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let config = Config::new("test-key").with_base_url(format!("http://{addr}/"));
    let client = OmdbClient::new(&config)?;
    let err = client.search("dune").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!format!("{err:?}").contains("test-key"));
    Ok(())
}

#[tokio::test]
async fn elapsed_timeout_is_a_transport_error() -> anyhow::Result<()> {
    let (base_url, _) = spawn_server().await?;
    let config = Config::new("test-key")
        .with_base_url(base_url)
        .with_timeout(Duration::from_millis(200));
    let client = OmdbClient::new(&config)?;

    let err = client.search("sleepy").await.unwrap_err();

    match &err {
        ApiError::Transport(source) => assert!(source.is_timeout()),
        other => panic!("expected a transport error, got {other:?}"),
    }
    assert!(!format!("{err:?}").contains("test-key"));
    Ok(())
}
