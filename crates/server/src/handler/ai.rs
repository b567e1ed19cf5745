use crate::middleware::{jwt, validate::SimpleValidatedJson};
use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
    middleware,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::post,
};
use futures::{Stream, StreamExt, future, stream};
use serde_json::{Value, json};
use shared::{
    domain::{request::ChatRequest, response::ErrorResponse},
    state::AppState,
    utils::AppError,
};
use std::{convert::Infallible, sync::Arc};
use tracing::error;
use utoipa_axum::router::OpenApiRouter;

fn delta_event(delta: Result<String, AppError>) -> Event {
    match delta {
        Ok(content) => Event::default().data(json!({ "content": content }).to_string()),
        Err(e) => {
            error!("Chat stream failed: {e}");
            let body = ErrorResponse::from(e);
            Event::default()
                .event("error")
                .data(json!({ "message": body.message }).to_string())
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/ai/chat",
    tag = "AI",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Server-sent events: `data` deltas as {\"content\": ...}, then a `done` event", content_type = "text/event-stream"),
        (status = 400, description = "Invalid conversation", body = ErrorResponse),
        (status = 503, description = "AI chat is not configured", body = ErrorResponse),
    )
)]
pub async fn chat_handler(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, Json<Value>)> {
    let deltas = match data.di_container.ai_service.chat(user_id, &body).await {
        Ok(deltas) => deltas,
        Err(e) => return Err((e.status_code(), Json(json!(e)))),
    };

    // Nothing follows an upstream error, not even `done`.
    let events = deltas
        .map(Some)
        .chain(stream::once(async { None }))
        .scan(false, |failed, item| {
            let event = match item {
                _ if *failed => None,
                Some(delta) => {
                    *failed = delta.is_err();
                    Some(delta_event(delta))
                }
                None => Some(Event::default().event("done").data("[DONE]")),
            };
            future::ready(event)
        })
        .map(Ok::<_, Infallible>);

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

pub fn ai_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/ai/chat", post(chat_handler))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), jwt::auth))
        .with_state(app_state.clone())
}
