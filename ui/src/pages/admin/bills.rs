use leptos::*;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::components::layout::PageHeader;
use crate::components::notifications::{push_error, push_toast, use_toasts};
use crate::components::tables::BillStatusBadge;
use crate::session::{current_token, Surface};
use crate::types::{BillStatus, NotificationPriority};
use crate::utils::{format_date, format_vnd};

#[component]
pub fn BillsAdminPage() -> impl IntoView {
    let toasts = use_toasts();

    let (reload, set_reload) = create_signal(0u32);
    let bills = create_resource(
        move || reload.get(),
        |_| async {
            ApiClient::new(current_token(Surface::Admin))
                .admin_list_bills(1)
                .await
                .ok()
        },
    );

    // Confirms the tenant's cash hand-off; settles the remaining balance
    let confirm_cash = create_action(move |id: &Uuid| {
        let id = *id;
        async move {
            let client = ApiClient::new(current_token(Surface::Admin));
            match client.admin_confirm_cash(id).await {
                Ok(_) => {
                    push_toast(
                        toasts,
                        "Hóa đơn".to_string(),
                        "Đã xác nhận thanh toán tiền mặt.".to_string(),
                        NotificationPriority::Medium,
                    );
                    set_reload.update(|n| *n += 1);
                }
                Err(err) => push_error(toasts, err.message()),
            }
        }
    });

    view! {
        <div>
            <PageHeader title="Hóa đơn">
                <span></span>
            </PageHeader>

            <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
                {move || bills.get().flatten().map(|page| view! {
                    <div class="bg-white shadow rounded-lg overflow-hidden">
                        <table class="min-w-full divide-y divide-gray-200">
                            <thead class="bg-gray-50">
                                <tr>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Kỳ"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Loại"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Còn lại"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Đã trả"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Trạng thái"</th>
                                    <th class="px-6 py-3"></th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-gray-200">
                                {page.items.into_iter().map(|bill| {
                                    let id = bill.id;
                                    let pending = bill.status == BillStatus::PendingCashConfirm;
                                    view! {
                                        <tr class="hover:bg-gray-50">
                                            <td class="px-6 py-4 text-sm text-gray-900">{format_date(&bill.billing_date)}</td>
                                            <td class="px-6 py-4 text-sm text-gray-600">{format!("{:?}", bill.bill_type)}</td>
                                            <td class="px-6 py-4 text-sm font-medium text-red-600">{format_vnd(bill.amount_due)}</td>
                                            <td class="px-6 py-4 text-sm text-green-600">{format_vnd(bill.amount_paid)}</td>
                                            <td class="px-6 py-4"><BillStatusBadge status=bill.status/></td>
                                            <td class="px-6 py-4 text-right">
                                                {pending.then(|| view! {
                                                    <button
                                                        class="text-sm text-blue-600 hover:underline"
                                                        on:click=move |_| confirm_cash.dispatch(id)
                                                    >
                                                        "Xác nhận tiền mặt"
                                                    </button>
                                                })}
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
