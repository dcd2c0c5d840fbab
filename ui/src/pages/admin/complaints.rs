use leptos::*;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::components::layout::PageHeader;
use crate::components::notifications::{push_error, push_toast, use_toasts};
use crate::components::tables::ComplaintStatusBadge;
use crate::session::{current_token, Surface};
use crate::types::{ComplaintStatus, NotificationPriority};
use crate::utils::format_datetime;

#[component]
pub fn ComplaintsAdminPage() -> impl IntoView {
    let toasts = use_toasts();

    let (reload, set_reload) = create_signal(0u32);
    let complaints = create_resource(
        move || reload.get(),
        |_| async {
            ApiClient::new(current_token(Surface::Admin))
                .admin_list_complaints(1)
                .await
                .ok()
        },
    );

    let update = create_action(
        move |(id, current, next): &(Uuid, ComplaintStatus, ComplaintStatus)| {
            let (id, current, next) = (*id, *current, *next);
            async move {
                // Terminal statuses are final; skip the request entirely
                if current.is_terminal() {
                    push_error(
                        toasts,
                        "Khiếu nại đã đóng, không thể thay đổi trạng thái.".to_string(),
                    );
                    return;
                }
                let client = ApiClient::new(current_token(Surface::Admin));
                match client.admin_update_complaint_status(id, next, None).await {
                    Ok(_) => {
                        push_toast(
                            toasts,
                            "Khiếu nại".to_string(),
                            format!("Đã chuyển sang {}.", next.label()),
                            NotificationPriority::Medium,
                        );
                        set_reload.update(|n| *n += 1);
                    }
                    Err(err) => push_error(toasts, err.message()),
                }
            }
        },
    );

    view! {
        <div>
            <PageHeader title="Khiếu nại">
                <span></span>
            </PageHeader>

            <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
                {move || complaints.get().flatten().map(|page| view! {
                    <div class="bg-white shadow rounded-lg overflow-hidden">
                        <table class="min-w-full divide-y divide-gray-200">
                            <thead class="bg-gray-50">
                                <tr>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Tiêu đề"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Ngày gửi"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Trạng thái"</th>
                                    <th class="px-6 py-3"></th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-gray-200">
                                {page.items.into_iter().map(|c| {
                                    let id = c.id;
                                    let status = c.status;
                                    view! {
                                        <tr class="hover:bg-gray-50">
                                            <td class="px-6 py-4 text-sm text-gray-900">{c.title.clone()}</td>
                                            <td class="px-6 py-4 text-sm text-gray-400">{format_datetime(&c.created_at)}</td>
                                            <td class="px-6 py-4"><ComplaintStatusBadge status/></td>
                                            <td class="px-6 py-4 text-right space-x-3">
                                                <button
                                                    class="text-sm text-blue-600 hover:underline"
                                                    on:click=move |_| update.dispatch((id, status, ComplaintStatus::InProgress))
                                                >
                                                    "Xử lý"
                                                </button>
                                                <button
                                                    class="text-sm text-green-600 hover:underline"
                                                    on:click=move |_| update.dispatch((id, status, ComplaintStatus::Resolved))
                                                >
                                                    "Giải quyết"
                                                </button>
                                                <button
                                                    class="text-sm text-gray-500 hover:underline"
                                                    on:click=move |_| update.dispatch((id, status, ComplaintStatus::Rejected))
                                                >
                                                    "Từ chối"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                })}
            </Suspense>
        </div>
    }
}
