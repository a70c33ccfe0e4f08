//! WhatsApp webhook adapter (Twilio inbound + verification handshake)

use axum::{
    extract::{Form, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::{verify, MessageDispatcher};
use crate::domain::entities::{ChannelKind, InboundMessage};

/// Shared webhook state
#[derive(Clone)]
struct AppState {
    dispatcher: Arc<MessageDispatcher>,
    verify_token: Arc<str>,
}

/// Handshake query sent by the channel before it delivers events
#[derive(Debug, Deserialize)]
struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// Twilio form fields we care about
#[derive(Debug, Deserialize)]
struct InboundForm {
    #[serde(rename = "From", default)]
    from: String,
    #[serde(rename = "Body", default)]
    body: String,
}

/// Build the webhook router
pub fn router(dispatcher: Arc<MessageDispatcher>, verify_token: impl Into<String>) -> Router {
    let state = AppState {
        dispatcher,
        verify_token: Arc::from(verify_token.into()),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/webhook", get(verify_webhook))
        .route("/whatsapp", post(inbound_message))
        .with_state(state)
}

/// Bind and serve until the process stops
pub async fn serve(listen: &str, router: Router) -> Result<(), BotError> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| BotError::Network(format!("Failed to bind {}: {}", listen, e)))?;

    tracing::info!("WhatsApp webhook listening on {}", listen);
    axum::serve(listener, router)
        .await
        .map_err(|e| BotError::Network(e.to_string()))
}

/// GET /health
async fn health_check() -> &'static str {
    "OK"
}

/// GET /webhook - echo the challenge when the token matches
async fn verify_webhook(State(state): State<AppState>, Query(query): Query<VerifyQuery>) -> Response {
    let provided = query.verify_token.as_deref().unwrap_or("");
    let subscribing = query.mode.as_deref() == Some("subscribe");

    if subscribing && verify(provided, &state.verify_token).is_accepted() {
        tracing::info!("Webhook verified");
        return (StatusCode::OK, query.challenge.unwrap_or_default()).into_response();
    }

    tracing::warn!("Webhook verification rejected (mode: {:?})", query.mode);
    (StatusCode::FORBIDDEN, "Forbidden").into_response()
}

/// POST /whatsapp - reply with TwiML
async fn inbound_message(State(state): State<AppState>, Form(form): Form<InboundForm>) -> Response {
    let message = InboundMessage::new(form.from, form.body).with_channel(ChannelKind::WhatsApp);
    let ack = state.dispatcher.handle_inbound(message).await;
    twiml(&ack.text)
}

fn twiml(text: &str) -> Response {
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape_xml(text)
    );
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
