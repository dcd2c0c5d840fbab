//! Push-notification hub.
//!
//! One broadcast channel per user; WebSocket sessions subscribe on connect
//! and the channel entry is dropped once the last session goes away.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::middleware::decode_claims;
use crate::models::notification::NewNotification;
use crate::models::Notification;
use crate::AppState;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
pub struct NotificationHub {
    channels: RwLock<HashMap<Uuid, broadcast::Sender<String>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<String> {
        let mut channels = self.channels.write().await;
        channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Deliver a frame to every open session of `user_id`. A user with no
    /// open sessions is not an error; the notification is already persisted.
    pub async fn send_to(&self, user_id: Uuid, frame: String) {
        let mut channels = self.channels.write().await;
        if let Some(sender) = channels.get(&user_id) {
            if sender.send(frame).is_err() || sender.receiver_count() == 0 {
                channels.remove(&user_id);
            }
        }
    }
}

/// Persist a notification and push it to the owner's live sessions.
pub async fn publish(
    db: &PgPool,
    hub: &NotificationHub,
    new: NewNotification,
) -> Result<Notification, sqlx::Error> {
    let notification = sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (id, user_id, notification_type, title, message, priority, is_read, action_url)
        VALUES ($1, $2, $3, $4, $5, $6, false, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(&new.notification_type)
    .bind(&new.title)
    .bind(&new.message)
    .bind(new.priority)
    .bind(&new.action_url)
    .fetch_one(db)
    .await?;

    let frame = json!({
        "event": "new-notification",
        "data": notification,
    })
    .to_string();
    hub.send_to(new.user_id, frame).await;

    Ok(notification)
}

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: String,
}

/// `GET /ws?token=` — the JWT rides the query string because browsers
/// cannot set headers on a WebSocket handshake.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    let claims = decode_claims(&state.config.jwt_secret, &query.token)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| StatusCode::UNAUTHORIZED)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, user_id, state)))
}

async fn handle_socket(mut socket: WebSocket, user_id: Uuid, state: AppState) {
    let mut rx = state.hub.subscribe(user_id).await;
    debug!("WebSocket session opened for user {}", user_id);

    loop {
        tokio::select! {
            frame = rx.recv() => {
                match frame {
                    Ok(frame) => {
                        if socket.send(Message::Text(frame)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("WebSocket session for {} lagged, skipped {} frames", user_id, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    // Client keep-alive; answer so its idle timer resets
                    Some(Ok(Message::Text(text))) if text == "ping" => {
                        if socket.send(Message::Text("pong".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("WebSocket session closed for user {}", user_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_reach_subscribers() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        let mut rx = hub.subscribe(user).await;

        hub.send_to(user, "hello".to_string()).await;
        assert_eq!(rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn stale_channels_are_dropped() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        {
            let _rx = hub.subscribe(user).await;
        }
        // Receiver dropped; the next send should clean up the entry
        hub.send_to(user, "gone".to_string()).await;
        assert!(hub.channels.read().await.get(&user).is_none());
    }

    #[tokio::test]
    async fn sends_to_unknown_users_are_ignored() {
        let hub = NotificationHub::new();
        hub.send_to(Uuid::new_v4(), "nobody home".to_string()).await;
    }
}
