use leptos::*;

use crate::api::ApiClient;
use crate::components::forms::{SubmitButton, TextField};
use crate::components::layout::{Card, PageHeader};
use crate::components::modals::Modal;
use crate::components::notifications::{push_error, push_toast, use_toasts};
use crate::components::tables::ComplaintStatusBadge;
use crate::session::{current_token, Surface};
use crate::types::NotificationPriority;
use crate::utils::format_datetime;

#[component]
pub fn ComplaintsPage() -> impl IntoView {
    let toasts = use_toasts();
    let show_form = create_rw_signal(false);
    let title = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());

    let (reload, set_reload) = create_signal(0u32);
    let complaints = create_resource(
        move || reload.get(),
        |_| async {
            ApiClient::new(current_token(Surface::Client))
                .my_complaints()
                .await
                .ok()
        },
    );

    let submit = create_action(move |_: &()| async move {
        let body = serde_json::json!({
            "title": title.get_untracked(),
            "description": description.get_untracked(),
        });
        let client = ApiClient::new(current_token(Surface::Client));
        match client.create_complaint(&body).await {
            Ok(_) => {
                push_toast(
                    toasts,
                    "Đã gửi".to_string(),
                    "Khiếu nại của bạn đã được ghi nhận.".to_string(),
                    NotificationPriority::Medium,
                );
                title.set(String::new());
                description.set(String::new());
                show_form.set(false);
                set_reload.update(|n| *n += 1);
            }
            Err(err) => push_error(toasts, err.message()),
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        submit.dispatch(());
    };

    view! {
        <div>
            <PageHeader title="Khiếu nại">
                <button
                    class="bg-blue-600 text-white px-4 py-2 rounded-md text-sm font-medium hover:bg-blue-700"
                    on:click=move |_| show_form.set(true)
                >
                    "Gửi khiếu nại"
                </button>
            </PageHeader>

            <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
                {move || complaints.get().flatten().map(|complaints| {
                    if complaints.is_empty() {
                        view! { <p class="text-gray-500">"Bạn chưa có khiếu nại nào."</p> }.into_view()
                    } else {
                        complaints.into_iter().map(|c| view! {
                            <div class="mb-4">
                                <Card>
                                    <div class="flex items-center justify-between mb-2">
                                        <h3 class="font-semibold text-gray-900">{c.title.clone()}</h3>
                                        <ComplaintStatusBadge status=c.status/>
                                    </div>
                                    <p class="text-sm text-gray-700 mb-2">{c.description.clone()}</p>
                                    {c.admin_note.clone().map(|note| view! {
                                        <p class="text-sm text-gray-500 bg-gray-50 rounded p-2 mb-2">
                                            "Phản hồi: " {note}
                                        </p>
                                    })}
                                    <p class="text-xs text-gray-400">{format_datetime(&c.created_at)}</p>
                                </Card>
                            </div>
                        }).collect_view()
                    }
                })}
            </Suspense>

            <Modal title="Gửi khiếu nại" show=show_form>
                <form class="space-y-4" on:submit=on_submit>
                    <TextField label="Tiêu đề" value=title/>
                    <div>
                        <label class="block text-sm font-medium text-gray-700">"Nội dung"</label>
                        <textarea
                            class="mt-1 block w-full px-3 py-2 border border-gray-300 rounded-md sm:text-sm"
                            rows=4
                            prop:value=move || description.get()
                            on:input=move |ev| description.set(event_target_value(&ev))
                        ></textarea>
                    </div>
                    <SubmitButton label="Gửi" loading=Signal::derive(move || submit.pending().get())/>
                </form>
            </Modal>
        </div>
    }
}
