//! WebSocket bridge to the API's notification hub.
//!
//! The connection lifecycle is an explicit state machine so reconnect
//! behavior is testable without a browser: a fixed 3-second backoff, at
//! most five attempts, then give up until the page is reloaded or the
//! user logs in again.

use crate::types::{Notification, NotificationPriority};
use serde::Deserialize;

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_DELAY_MS: u32 = 3_000;
pub const PING_INTERVAL_MS: u32 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    /// All reconnect attempts exhausted.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnEvent {
    Open,
    /// Socket closed or errored.
    Lost,
    /// Reconnect timer fired.
    RetryDue,
    /// Explicit shutdown (logout, page teardown).
    Stop,
}

/// Next state for an event. Pure so the reconnect policy can be unit
/// tested; the wasm side just drives it.
///
/// Attempts are counted once per cycle, on the loss that ends it; the
/// retry timer firing keeps the attempt number unchanged.
pub fn transition(state: ConnState, event: ConnEvent) -> ConnState {
    use ConnEvent::*;
    use ConnState::*;

    match (state, event) {
        (_, Stop) => Disconnected,
        (Connecting, Open) | (Reconnecting { .. }, Open) => Connected,
        (Connecting, Lost) => Reconnecting { attempt: 1 },
        (Connected, Lost) => Reconnecting { attempt: 1 },
        (Reconnecting { attempt }, Lost) if attempt >= MAX_RECONNECT_ATTEMPTS => Failed,
        (Reconnecting { attempt }, Lost) => Reconnecting { attempt: attempt + 1 },
        (Reconnecting { attempt }, RetryDue) => Reconnecting { attempt },
        (state, _) => state,
    }
}

/// How long a toast for this priority stays on screen.
pub fn toast_duration_ms(priority: NotificationPriority) -> u32 {
    match priority {
        NotificationPriority::Urgent => 8_000,
        NotificationPriority::High => 6_000,
        NotificationPriority::Medium => 4_500,
        NotificationPriority::Low => 3_000,
    }
}

#[derive(Debug, Deserialize)]
struct Frame {
    event: String,
    data: Notification,
}

/// Parse a server frame; anything that isn't a new-notification event
/// (e.g. "pong") is ignored.
pub fn parse_frame(raw: &str) -> Option<Notification> {
    let frame: Frame = serde_json::from_str(raw).ok()?;
    (frame.event == "new-notification").then_some(frame.data)
}

#[cfg(not(feature = "ssr"))]
pub mod socket {
    use super::*;
    use crate::session::{current_token, Surface};
    use leptos::*;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{CloseEvent, MessageEvent, WebSocket};

    /// Open the notification socket and keep it alive for the lifetime of
    /// the reactive owner. Incoming notifications are handed to `on_notify`.
    pub fn start(
        surface: Surface,
        state: RwSignal<ConnState>,
        on_notify: impl Fn(Notification) + Clone + 'static,
    ) {
        let Some(token) = current_token(surface) else {
            return;
        };
        state.set(ConnState::Connecting);
        connect(token, state, on_notify);
    }

    fn connect(
        token: String,
        state: RwSignal<ConnState>,
        on_notify: impl Fn(Notification) + Clone + 'static,
    ) {
        let url = format!("{}?token={}", crate::api::ws_endpoint(), token);
        let Ok(ws) = WebSocket::new(&url) else {
            // Construction failure ends this attempt the same way a close
            // event would
            let next = transition(state.get_untracked(), ConnEvent::Lost);
            state.set(next);
            if matches!(next, ConnState::Reconnecting { .. }) {
                schedule_retry(token, state, on_notify);
            }
            return;
        };

        let on_open = {
            let state = state;
            let ws = ws.clone();
            Closure::<dyn FnMut()>::new(move || {
                state.set(transition(state.get_untracked(), ConnEvent::Open));
                start_ping(ws.clone(), state);
            })
        };
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        let on_message = {
            let on_notify = on_notify.clone();
            Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
                if let Some(text) = ev.data().as_string() {
                    if let Some(notification) = parse_frame(&text) {
                        on_notify(notification);
                    }
                }
            })
        };
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();

        let on_close = {
            let token = token.clone();
            let on_notify = on_notify.clone();
            Closure::<dyn FnMut(CloseEvent)>::new(move |_| {
                let next = transition(state.get_untracked(), ConnEvent::Lost);
                state.set(next);
                if matches!(next, ConnState::Reconnecting { .. }) {
                    schedule_retry(token.clone(), state, on_notify.clone());
                }
            })
        };
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();
    }

    fn schedule_retry(
        token: String,
        state: RwSignal<ConnState>,
        on_notify: impl Fn(Notification) + Clone + 'static,
    ) {
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(RECONNECT_DELAY_MS).await;
            let next = transition(state.get_untracked(), ConnEvent::RetryDue);
            state.set(next);
            match next {
                ConnState::Reconnecting { .. } => connect(token, state, on_notify),
                _ => {}
            }
        });
    }

    fn start_ping(ws: WebSocket, state: RwSignal<ConnState>) {
        spawn_local(async move {
            loop {
                gloo_timers::future::TimeoutFuture::new(PING_INTERVAL_MS).await;
                if state.get_untracked() != ConnState::Connected {
                    break;
                }
                if ws.send_with_str("ping").is_err() {
                    break;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnEvent::*;
    use ConnState::*;

    #[test]
    fn happy_path_connects() {
        let s = transition(Disconnected, Stop);
        assert_eq!(s, Disconnected);
        assert_eq!(transition(Connecting, Open), Connected);
    }

    #[test]
    fn lost_connection_starts_reconnecting() {
        assert_eq!(transition(Connected, Lost), Reconnecting { attempt: 1 });
        assert_eq!(transition(Reconnecting { attempt: 2 }, Open), Connected);
    }

    #[test]
    fn retry_timer_does_not_consume_an_attempt() {
        // The timer firing only triggers the connect; the attempt is spent
        // when that connect is lost
        assert_eq!(
            transition(Reconnecting { attempt: 3 }, RetryDue),
            Reconnecting { attempt: 3 }
        );
    }

    #[test]
    fn failed_socket_construction_counts_as_a_lost_attempt() {
        assert_eq!(transition(Connecting, Lost), Reconnecting { attempt: 1 });
        assert_eq!(
            transition(Reconnecting { attempt: 1 }, Lost),
            Reconnecting { attempt: 2 }
        );
    }

    #[test]
    fn gives_up_after_max_attempts() {
        // Each cycle is one timer fire plus one loss
        let mut state = transition(Connected, Lost);
        for _ in 0..MAX_RECONNECT_ATTEMPTS {
            state = transition(state, RetryDue);
            state = transition(state, Lost);
        }
        assert_eq!(state, Failed);
        // Once failed, retries are no-ops
        assert_eq!(transition(state, RetryDue), Failed);
    }

    #[test]
    fn stop_always_wins() {
        assert_eq!(transition(Connected, Stop), Disconnected);
        assert_eq!(transition(Reconnecting { attempt: 3 }, Stop), Disconnected);
        assert_eq!(transition(Failed, Stop), Disconnected);
    }

    #[test]
    fn toast_durations_by_priority() {
        assert_eq!(toast_duration_ms(NotificationPriority::Urgent), 8_000);
        assert_eq!(toast_duration_ms(NotificationPriority::High), 6_000);
        assert_eq!(toast_duration_ms(NotificationPriority::Medium), 4_500);
        assert_eq!(toast_duration_ms(NotificationPriority::Low), 3_000);
    }

    #[test]
    fn parses_notification_frames_and_ignores_pong() {
        let raw = r#"{
            "event": "new-notification",
            "data": {
                "id": "7f8a2a5e-07aa-41fb-a0a3-8bb64ffb9a1f",
                "user_id": "58f1c0f5-9f3e-4d3f-9f3f-2a2b1c0d9e8f",
                "notification_type": "payment",
                "title": "Thanh toán thành công",
                "message": "Hóa đơn đã được thanh toán đủ.",
                "priority": "HIGH",
                "is_read": false,
                "action_url": "/invoices",
                "created_at": "2025-03-01T10:00:00Z"
            }
        }"#;
        let n = parse_frame(raw).expect("frame should parse");
        assert_eq!(n.priority, NotificationPriority::High);
        assert!(parse_frame("pong").is_none());
    }
}
