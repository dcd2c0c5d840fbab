// Toasts and the notification bell
use leptos::*;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::realtime::toast_duration_ms;
use crate::session::{current_token, use_session_store, Surface};
use crate::types::{Notification, NotificationPriority};
use crate::utils::format_relative_time;

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
}

#[derive(Debug, Clone, Copy)]
pub struct ToastStore(pub RwSignal<Vec<Toast>>);

pub fn provide_toasts() -> ToastStore {
    let store = ToastStore(create_rw_signal(Vec::new()));
    provide_context(store);
    store
}

pub fn use_toasts() -> ToastStore {
    use_context::<ToastStore>().expect("ToastStore must be provided")
}

/// Show a toast; it removes itself after its priority's duration.
pub fn push_toast(store: ToastStore, title: String, message: String, priority: NotificationPriority) {
    let id = Uuid::new_v4();
    store.0.update(|toasts| {
        toasts.push(Toast {
            id,
            title,
            message,
            priority,
        })
    });

    spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(toast_duration_ms(priority)).await;
        store.0.update(|toasts| toasts.retain(|t| t.id != id));
    });
}

pub fn push_error(store: ToastStore, message: String) {
    push_toast(store, "Lỗi".to_string(), message, NotificationPriority::High);
}

/// Version counter bumped by the socket bridge for every live
/// notification, so the bell and the notifications page refetch instead
/// of going stale until a remount.
#[derive(Debug, Clone, Copy)]
pub struct NotificationFeed(RwSignal<u32>);

impl NotificationFeed {
    pub fn notify(&self) {
        self.0.update(|v| *v += 1);
    }

    /// Reactive read; resources sourcing this refetch on every bump.
    pub fn version(&self) -> u32 {
        self.0.get()
    }
}

pub fn provide_notification_feed() -> NotificationFeed {
    let feed = NotificationFeed(create_rw_signal(0));
    provide_context(feed);
    feed
}

pub fn use_notification_feed() -> NotificationFeed {
    use_context::<NotificationFeed>().expect("NotificationFeed must be provided")
}

#[component]
pub fn ToastStack() -> impl IntoView {
    let store = use_toasts();

    view! {
        <div class="fixed top-4 right-4 z-50 space-y-2 w-80">
            <For
                each=move || store.0.get()
                key=|toast| toast.id
                children=move |toast: Toast| {
                    let border = match toast.priority {
                        NotificationPriority::Urgent => "border-red-500",
                        NotificationPriority::High => "border-orange-500",
                        NotificationPriority::Medium => "border-blue-500",
                        NotificationPriority::Low => "border-gray-300",
                    };
                    view! {
                        <div class=format!("bg-white shadow-lg rounded-lg p-4 border-l-4 {}", border)>
                            <p class="font-semibold text-sm text-gray-900">{toast.title}</p>
                            <p class="text-sm text-gray-600">{toast.message}</p>
                        </div>
                    }
                }
            />
        </div>
    }
}

/// Bell with unread badge and a dropdown of the latest notifications.
#[component]
pub fn NotificationBell(surface: Surface) -> impl IntoView {
    let store = use_session_store();
    let feed = use_notification_feed();
    let (open, set_open) = create_signal(false);

    let page = create_resource(
        move || (store.surface(surface).get().token, feed.version()),
        move |(token, _)| async move {
            let token = token?;
            ApiClient::new(Some(token)).list_notifications().await.ok()
        },
    );

    let mark_all = create_action(move |_: &()| async move {
        let client = ApiClient::new(current_token(surface));
        let _ = client.mark_all_notifications_read().await;
        page.refetch();
    });

    view! {
        <div class="relative">
            <button
                class="relative text-gray-500 hover:text-gray-900"
                on:click=move |_| set_open.update(|o| *o = !*o)
            >
                "🔔"
                {move || page.get().flatten().filter(|p| p.unread > 0).map(|p| view! {
                    <span class="absolute -top-1 -right-2 bg-red-600 text-white text-xs rounded-full px-1">
                        {p.unread}
                    </span>
                })}
            </button>
            <Show when=move || open.get()>
                <div class="absolute right-0 mt-2 w-96 bg-white shadow-xl rounded-lg z-40 max-h-96 overflow-y-auto">
                    <div class="flex items-center justify-between px-4 py-2 border-b">
                        <span class="font-semibold text-sm">"Thông báo"</span>
                        <button
                            class="text-xs text-blue-600 hover:underline"
                            on:click=move |_| mark_all.dispatch(())
                        >
                            "Đánh dấu đã đọc"
                        </button>
                    </div>
                    {move || match page.get().flatten() {
                        Some(p) if !p.notifications.is_empty() => p
                            .notifications
                            .into_iter()
                            .map(|n| view! { <NotificationRow notification=n/> })
                            .collect_view(),
                        _ => view! {
                            <p class="px-4 py-6 text-sm text-gray-500 text-center">"Không có thông báo"</p>
                        }.into_view(),
                    }}
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_notifications_bump_the_feed_version() {
        let runtime = create_runtime();
        let feed = provide_notification_feed();
        assert_eq!(feed.version(), 0);
        feed.notify();
        feed.notify();
        assert_eq!(feed.version(), 2);
        runtime.dispose();
    }
}

#[component]
fn NotificationRow(notification: Notification) -> impl IntoView {
    let weight = if notification.is_read {
        "bg-white"
    } else {
        "bg-blue-50"
    };
    view! {
        <div class=format!("px-4 py-3 border-b last:border-0 {}", weight)>
            <p class="text-sm font-medium text-gray-900">{notification.title}</p>
            <p class="text-sm text-gray-600">{notification.message}</p>
            <p class="text-xs text-gray-400 mt-1">{format_relative_time(&notification.created_at)}</p>
        </div>
    }
}
