use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Reply};

use crate::auth::{AuthError, AuthService};
use crate::game_manager::GameManager;
use crate::reports::ReportService;
use crate::session::{SESSION_COOKIE, SessionStore};
use game_types::{Credentials, GuessRequest, User};

pub mod auth;
pub mod config;
pub mod daily_limit;
pub mod game_manager;
pub mod reports;
pub mod session;

const MAX_BODY_BYTES: u64 = 16 * 1024;

fn json_response<T: Serialize>(value: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(value), status).into_response()
}

fn error_response(message: &str, status: StatusCode) -> Response {
    json_response(&serde_json::json!({ "error": message }), status)
}

fn internal_error(context: &str, err: anyhow::Error) -> Response {
    tracing::error!("{}: {:#}", context, err);
    error_response(context, StatusCode::INTERNAL_SERVER_ERROR)
}

/// Session token from the `session` cookie, falling back to a bearer header.
fn session_token() -> impl Filter<Extract = (Option<String>,), Error = warp::Rejection> + Clone {
    warp::cookie::optional(SESSION_COOKIE)
        .and(warp::header::optional::<String>("authorization"))
        .map(|cookie: Option<String>, header: Option<String>| {
            cookie.or_else(|| {
                header.map(|value| value.strip_prefix("Bearer ").unwrap_or(&value).to_string())
            })
        })
}

fn json_body<T: DeserializeOwned + Send>()
-> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn authenticate(token: Option<String>, sessions: &SessionStore) -> Result<(String, User), Response> {
    let unauthorized = || error_response("Authentication required", StatusCode::UNAUTHORIZED);

    let token = token.ok_or_else(unauthorized)?;
    let user = sessions.authenticate(&token).ok_or_else(unauthorized)?;
    Ok((token, user))
}

fn authenticate_admin(token: Option<String>, sessions: &SessionStore) -> Result<User, Response> {
    let (_, user) = authenticate(token, sessions)?;
    if !user.is_admin {
        return Err(error_response("Admins only", StatusCode::FORBIDDEN));
    }
    Ok(user)
}

pub fn create_routes(
    game_manager: Arc<GameManager>,
    auth_service: Arc<AuthService>,
    session_store: Arc<SessionStore>,
    report_service: Arc<ReportService>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let game_manager_filter = warp::any().map({
        let game_manager = game_manager.clone();
        move || game_manager.clone()
    });

    let auth_filter = warp::any().map({
        let auth_service = auth_service.clone();
        move || auth_service.clone()
    });

    let session_filter = warp::any().map({
        let session_store = session_store.clone();
        move || session_store.clone()
    });

    let report_filter = warp::any().map({
        let report_service = report_service.clone();
        move || report_service.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let register = warp::path("register")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(auth_filter.clone())
        .and_then(handle_register);

    let login = warp::path("login")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(auth_filter.clone())
        .and(session_filter.clone())
        .and_then(handle_login);

    let logout = warp::path("logout")
        .and(warp::path::end())
        .and(warp::post())
        .and(session_token())
        .and(session_filter.clone())
        .and_then(handle_logout);

    // Play request: resume or start a game
    let play = warp::path("game")
        .and(warp::path::end())
        .and(warp::get())
        .and(session_token())
        .and(session_filter.clone())
        .and(game_manager_filter.clone())
        .and_then(handle_play_request);

    let guess = warp::path!("game" / "guess")
        .and(warp::post())
        .and(json_body())
        .and(session_token())
        .and(session_filter.clone())
        .and(game_manager_filter.clone())
        .and_then(handle_guess_request);

    let daily_report = warp::path!("admin" / "daily")
        .and(warp::get())
        .and(session_token())
        .and(session_filter.clone())
        .and(report_filter.clone())
        .and_then(handle_daily_report);

    let user_report = warp::path!("admin" / "user" / String)
        .and(warp::get())
        .and(session_token())
        .and(session_filter.clone())
        .and(report_filter.clone())
        .and_then(handle_user_report);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(register)
        .or(login)
        .or(logout)
        .or(play)
        .or(guess)
        .or(daily_report)
        .or(user_report)
        .with(cors)
        .with(warp::log("wordle_daily"))
}

async fn handle_register(
    credentials: Credentials,
    auth_service: Arc<AuthService>,
) -> Result<Response, warp::Rejection> {
    match auth_service
        .register(&credentials.username, &credentials.password)
        .await
    {
        Ok(user) => Ok(json_response(&user, StatusCode::CREATED)),
        Err(err @ (AuthError::InvalidUsername | AuthError::InvalidPassword)) => {
            Ok(error_response(&err.to_string(), StatusCode::BAD_REQUEST))
        }
        Err(err @ AuthError::UsernameTaken) => {
            Ok(error_response(&err.to_string(), StatusCode::CONFLICT))
        }
        Err(AuthError::Store(err)) => Ok(internal_error("Failed to register user", err)),
        Err(err) => {
            tracing::error!("Registration failed: {}", err);
            Ok(error_response(
                "Failed to register user",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_login(
    credentials: Credentials,
    auth_service: Arc<AuthService>,
    session_store: Arc<SessionStore>,
) -> Result<Response, warp::Rejection> {
    match auth_service
        .login(&credentials.username, &credentials.password)
        .await
    {
        Ok(user) => {
            let token = session_store.create_session(user.clone());
            let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token);
            Ok(warp::reply::with_header(
                json_response(&user, StatusCode::OK),
                "set-cookie",
                cookie,
            )
            .into_response())
        }
        Err(AuthError::Store(err)) => Ok(internal_error("Failed to log in", err)),
        Err(err) => Ok(error_response(&err.to_string(), StatusCode::UNAUTHORIZED)),
    }
}

async fn handle_logout(
    token: Option<String>,
    session_store: Arc<SessionStore>,
) -> Result<Response, warp::Rejection> {
    if let Some(token) = token {
        session_store.remove_session(&token);
    }

    let cookie = format!("{}=; Path=/; Max-Age=0", SESSION_COOKIE);
    Ok(warp::reply::with_header(
        warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT),
        "set-cookie",
        cookie,
    )
    .into_response())
}

async fn handle_play_request(
    token: Option<String>,
    session_store: Arc<SessionStore>,
    game_manager: Arc<GameManager>,
) -> Result<Response, warp::Rejection> {
    let (token, user) = match authenticate(token, &session_store) {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let mut binding = session_store.binding(&token);
    match game_manager.start_or_resume(&user, &mut binding).await {
        Ok(snapshot) => Ok(json_response(&snapshot, StatusCode::OK)),
        Err(err) => Ok(internal_error("Failed to load game", err)),
    }
}

async fn handle_guess_request(
    request: GuessRequest,
    token: Option<String>,
    session_store: Arc<SessionStore>,
    game_manager: Arc<GameManager>,
) -> Result<Response, warp::Rejection> {
    let (token, user) = match authenticate(token, &session_store) {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let mut binding = session_store.binding(&token);
    match game_manager
        .submit_guess(&user, &mut binding, &request.guess)
        .await
    {
        Ok(outcome) => Ok(json_response(&outcome, StatusCode::OK)),
        Err(err) => Ok(internal_error("Failed to submit guess", err)),
    }
}

async fn handle_daily_report(
    token: Option<String>,
    session_store: Arc<SessionStore>,
    report_service: Arc<ReportService>,
) -> Result<Response, warp::Rejection> {
    if let Err(response) = authenticate_admin(token, &session_store) {
        return Ok(response);
    }

    match report_service.daily_report().await {
        Ok(report) => Ok(json_response(&report, StatusCode::OK)),
        Err(err) => Ok(internal_error("Failed to build daily report", err)),
    }
}

async fn handle_user_report(
    username: String,
    token: Option<String>,
    session_store: Arc<SessionStore>,
    report_service: Arc<ReportService>,
) -> Result<Response, warp::Rejection> {
    if let Err(response) = authenticate_admin(token, &session_store) {
        return Ok(response);
    }

    match report_service.user_report(&username).await {
        Ok(Some(report)) => Ok(json_response(&report, StatusCode::OK)),
        Ok(None) => Ok(error_response("User not found", StatusCode::NOT_FOUND)),
        Err(err) => Ok(internal_error("Failed to build user report", err)),
    }
}
