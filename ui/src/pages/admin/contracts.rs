use leptos::*;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::components::forms::{SubmitButton, TextField};
use crate::components::layout::PageHeader;
use crate::components::modals::Modal;
use crate::components::notifications::{push_error, push_toast, use_toasts};
use crate::session::{current_token, Surface};
use crate::types::{ContractStatus, NotificationPriority};
use crate::utils::{format_date, format_vnd};

#[component]
pub fn ContractsPage() -> impl IntoView {
    let toasts = use_toasts();
    let show_checkin = create_rw_signal(false);

    let (reload, set_reload) = create_signal(0u32);
    let contracts = create_resource(
        move || reload.get(),
        |_| async {
            ApiClient::new(current_token(Surface::Admin))
                .admin_list_contracts(1)
                .await
                .ok()
        },
    );

    let end_contract = create_action(move |id: &Uuid| {
        let id = *id;
        async move {
            let client = ApiClient::new(current_token(Surface::Admin));
            match client.admin_end_contract(id).await {
                Ok(_) => {
                    push_toast(
                        toasts,
                        "Hợp đồng".to_string(),
                        "Đã kết thúc hợp đồng, phòng trở lại trạng thái trống.".to_string(),
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
            <PageHeader title="Hợp đồng">
                <button
                    class="bg-blue-600 text-white px-4 py-2 rounded-md text-sm font-medium hover:bg-blue-700"
                    on:click=move |_| show_checkin.set(true)
                >
                    "Nhận phòng"
                </button>
            </PageHeader>

            <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
                {move || contracts.get().flatten().map(|page| view! {
                    <div class="bg-white shadow rounded-lg overflow-hidden">
                        <table class="min-w-full divide-y divide-gray-200">
                            <thead class="bg-gray-50">
                                <tr>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Bắt đầu"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Tiền thuê"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Tiền cọc"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Trạng thái"</th>
                                    <th class="px-6 py-3"></th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-gray-200">
                                {page.items.into_iter().map(|contract| {
                                    let id = contract.id;
                                    let active = contract.status == ContractStatus::Active;
                                    view! {
                                        <tr class="hover:bg-gray-50">
                                            <td class="px-6 py-4 text-sm text-gray-900">{format_date(&contract.start_date)}</td>
                                            <td class="px-6 py-4 text-sm text-gray-900">{format_vnd(contract.monthly_rent)}</td>
                                            <td class="px-6 py-4 text-sm text-gray-600">{format_vnd(contract.deposit)}</td>
                                            <td class="px-6 py-4 text-sm text-gray-600">{format!("{:?}", contract.status)}</td>
                                            <td class="px-6 py-4 text-right">
                                                {active.then(|| view! {
                                                    <button
                                                        class="text-sm text-red-600 hover:underline"
                                                        on:click=move |_| end_contract.dispatch(id)
                                                    >
                                                        "Kết thúc"
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

            <CheckinModal show=show_checkin on_done=move || set_reload.update(|n| *n += 1)/>
        </div>
    }
}

/// Check-in creates the contract and the initial bill in one call.
#[component]
fn CheckinModal(show: RwSignal<bool>, on_done: impl Fn() + Copy + 'static) -> impl IntoView {
    let toasts = use_toasts();
    let room_id = create_rw_signal(String::new());
    let tenant_id = create_rw_signal(String::new());
    let start_date = create_rw_signal(String::new());
    let deposit = create_rw_signal(String::new());
    let monthly_rent = create_rw_signal(String::new());

    let submit = create_action(move |_: &()| async move {
        let Ok(room) = Uuid::parse_str(room_id.get_untracked().trim()) else {
            push_error(toasts, "Mã phòng không hợp lệ".to_string());
            return;
        };
        let tenant = Uuid::parse_str(tenant_id.get_untracked().trim()).ok();
        let body = serde_json::json!({
            "room_id": room,
            "tenant_id": tenant,
            "start_date": start_date.get_untracked(),
            "deposit": deposit.get_untracked().parse::<i64>().unwrap_or(0),
            "monthly_rent": monthly_rent.get_untracked().parse::<i64>().unwrap_or(0),
        });
        let client = ApiClient::new(current_token(Surface::Admin));
        match client.admin_checkin(&body).await {
            Ok(_) => {
                push_toast(
                    toasts,
                    "Nhận phòng".to_string(),
                    "Đã tạo hợp đồng và hóa đơn đầu tiên.".to_string(),
                    NotificationPriority::Medium,
                );
                show.set(false);
                on_done();
            }
            Err(err) => push_error(toasts, err.message()),
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        submit.dispatch(());
    };

    view! {
        <Modal title="Nhận phòng" show>
            <form class="space-y-4" on:submit=on_submit>
                <TextField label="Mã phòng (UUID)" value=room_id/>
                <TextField label="Mã khách thuê (UUID, bỏ trống nếu khách vãng lai)" value=tenant_id/>
                <TextField label="Ngày bắt đầu" value=start_date input_type="date"/>
                <div class="grid grid-cols-2 gap-4">
                    <TextField label="Tiền cọc (VND)" value=deposit/>
                    <TextField label="Tiền thuê (VND/tháng)" value=monthly_rent/>
                </div>
                <SubmitButton label="Tạo hợp đồng" loading=Signal::derive(move || submit.pending().get())/>
            </form>
        </Modal>
    }
}
