use leptos::*;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::components::layout::PageHeader;
use crate::components::notifications::use_notification_feed;
use crate::session::{current_token, Surface};
use crate::utils::format_relative_time;

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let feed = use_notification_feed();
    let (reload, set_reload) = create_signal(0u32);
    let page = create_resource(
        move || (reload.get(), feed.version()),
        |_| async {
            ApiClient::new(current_token(Surface::Client))
                .list_notifications()
                .await
                .ok()
        },
    );

    let mark_read = create_action(move |id: &Uuid| {
        let id = *id;
        async move {
            let client = ApiClient::new(current_token(Surface::Client));
            let _ = client.mark_notification_read(id).await;
            set_reload.update(|n| *n += 1);
        }
    });

    let mark_all = create_action(move |_: &()| async move {
        let client = ApiClient::new(current_token(Surface::Client));
        let _ = client.mark_all_notifications_read().await;
        set_reload.update(|n| *n += 1);
    });

    view! {
        <div>
            <PageHeader title="Thông báo">
                <button
                    class="text-sm text-blue-600 hover:underline"
                    on:click=move |_| mark_all.dispatch(())
                >
                    "Đánh dấu tất cả đã đọc"
                </button>
            </PageHeader>

            <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
                {move || page.get().flatten().map(|page| {
                    if page.notifications.is_empty() {
                        view! { <p class="text-gray-500">"Không có thông báo."</p> }.into_view()
                    } else {
                        view! {
                            <div class="bg-white shadow rounded-lg divide-y">
                                {page.notifications.into_iter().map(|n| {
                                    let id = n.id;
                                    let weight = if n.is_read { "" } else { "bg-blue-50" };
                                    view! {
                                        <div class=format!("p-4 flex items-start justify-between {}", weight)>
                                            <div>
                                                <p class="font-medium text-gray-900">{n.title.clone()}</p>
                                                <p class="text-sm text-gray-600">{n.message.clone()}</p>
                                                <p class="text-xs text-gray-400 mt-1">
                                                    {format_relative_time(&n.created_at)}
                                                </p>
                                            </div>
                                            {(!n.is_read).then(|| view! {
                                                <button
                                                    class="text-xs text-blue-600 hover:underline"
                                                    on:click=move |_| mark_read.dispatch(id)
                                                >
                                                    "Đã đọc"
                                                </button>
                                            })}
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        }.into_view()
                    }
                })}
            </Suspense>
        </div>
    }
}
