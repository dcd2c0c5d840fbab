use leptos::html::Input;
use leptos::*;
use leptos_router::*;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::billing;
use crate::components::layout::{Card, PageHeader};
use crate::components::modals::Modal;
use crate::components::notifications::{push_error, push_toast, use_toasts};
use crate::components::tables::BillStatusBadge;
use crate::session::{current_token, Surface};
use crate::types::{Bill, NotificationPriority};
use crate::utils::{format_date, format_vnd};

const GATEWAYS: &[(&str, &str)] = &[
    ("vnpay", "VNPAY"),
    ("momo", "MoMo"),
    ("zalopay", "ZaloPay"),
];

#[component]
pub fn InvoicesPage() -> impl IntoView {
    let toasts = use_toasts();
    let query = use_query_map();

    // Gateway return redirect lands back here with ?payment=success|failed
    create_effect(move |_| {
        match query.with(|q| q.get("payment").cloned()).as_deref() {
            Some("success") => push_toast(
                toasts,
                "Thanh toán".to_string(),
                "Thanh toán thành công.".to_string(),
                NotificationPriority::High,
            ),
            Some("failed") => push_error(toasts, "Thanh toán không thành công.".to_string()),
            _ => {}
        }
    });

    let (reload, set_reload) = create_signal(0u32);
    let data = create_resource(
        move || reload.get(),
        |_| async {
            ApiClient::new(current_token(Surface::Client))
                .my_bills()
                .await
                .ok()
        },
    );

    let (selected, set_selected) = create_signal(None::<Uuid>);

    view! {
        <div>
            <PageHeader title="Hóa đơn của tôi">
                <span></span>
            </PageHeader>

            <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
                {move || data.get().flatten().map(|page| {
                    let totals = billing::compute_totals(&page.bills);
                    view! {
                    <div class="grid grid-cols-2 gap-6 mb-8">
                        <Card>
                            <p class="text-sm text-gray-500">"Còn phải trả"</p>
                            <p class="text-2xl font-bold text-red-600">
                                {format_vnd(totals.unpaid_total)}
                            </p>
                        </Card>
                        <Card>
                            <p class="text-sm text-gray-500">"Đã thanh toán"</p>
                            <p class="text-2xl font-bold text-green-600">
                                {format_vnd(totals.paid_total)}
                            </p>
                        </Card>
                    </div>

                    <div class="bg-white shadow rounded-lg overflow-hidden">
                        <table class="min-w-full divide-y divide-gray-200">
                            <thead class="bg-gray-50">
                                <tr>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Kỳ"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Tổng tiền"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Còn lại"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Trạng thái"</th>
                                    <th class="px-6 py-3"></th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-gray-200">
                                {page.bills.iter().map(|bill| {
                                    let id = bill.id;
                                    view! { <BillRow bill=bill.clone() on_open=move || set_selected.set(Some(id))/> }
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                }})}
            </Suspense>

            {move || selected.get().map(|bill_id| view! {
                <BillDetailModal
                    bill_id
                    on_close=move || set_selected.set(None)
                    on_changed=move || set_reload.update(|n| *n += 1)
                />
            })}
        </div>
    }
}

#[component]
fn BillRow(bill: Bill, on_open: impl Fn() + 'static) -> impl IntoView {
    // Payable rows lead with the action; settled ones just offer details
    let action = if billing::is_payable(bill.status) {
        "Thanh toán"
    } else {
        "Chi tiết"
    };
    view! {
        <tr class="hover:bg-gray-50">
            <td class="px-6 py-4 text-sm text-gray-900">{format_date(&bill.billing_date)}</td>
            <td class="px-6 py-4 text-sm text-gray-900">{format_vnd(billing::original_total(&bill))}</td>
            <td class="px-6 py-4 text-sm font-medium text-red-600">
                {format_vnd(billing::remaining_amount(&bill))}
            </td>
            <td class="px-6 py-4"><BillStatusBadge status=bill.status/></td>
            <td class="px-6 py-4 text-right">
                <button class="text-sm text-blue-600 hover:underline" on:click=move |_| on_open()>
                    {action}
                </button>
            </td>
        </tr>
    }
}

#[component]
fn BillDetailModal(
    bill_id: Uuid,
    on_close: impl Fn() + Copy + 'static,
    on_changed: impl Fn() + Copy + 'static,
) -> impl IntoView {
    let toasts = use_toasts();
    let show = create_rw_signal(true);
    let show_cash = create_rw_signal(false);

    create_effect(move |_| {
        if !show.get() {
            on_close();
        }
    });

    let detail = create_resource(
        || (),
        move |_| async move {
            ApiClient::new(current_token(Surface::Client))
                .get_bill(bill_id)
                .await
                .ok()
        },
    );

    let pay_online = create_action(move |gateway: &String| {
        let gateway = gateway.clone();
        async move {
            let client = ApiClient::new(current_token(Surface::Client));
            match client.create_payment(&gateway, bill_id).await {
                Ok(pay_url) => {
                    if let Some(window) = web_sys::window() {
                        // New tab; fall back to the current one when the
                        // popup is blocked
                        match window.open_with_url_and_target(&pay_url, "_blank") {
                            Ok(Some(_)) => {}
                            _ => {
                                let _ = window.location().set_href(&pay_url);
                            }
                        }
                    }
                }
                Err(err) => push_error(toasts, err.message()),
            }
        }
    });

    view! {
        <Modal title="Chi tiết hóa đơn" show>
            {move || detail.get().flatten().map(|d| view! {
                <div class="space-y-4">
                    <table class="min-w-full text-sm">
                        <tbody>
                            {d.bill.line_items.iter().map(|item| view! {
                                <tr class="border-b">
                                    <td class="py-2 text-gray-700">
                                        {item.name.clone()}
                                        {item.electricity_reading.as_ref().map(|r| view! {
                                            <span class="text-xs text-gray-400">
                                                {format!(" ({} → {})", r.previous, r.current)}
                                            </span>
                                        })}
                                    </td>
                                    <td class="py-2 text-right text-gray-900">{format_vnd(item.line_total)}</td>
                                </tr>
                            }).collect_view()}
                        </tbody>
                    </table>

                    <div class="flex justify-between text-sm">
                        <span class="text-gray-500">"Tổng tiền"</span>
                        <span class="font-medium">{format_vnd(d.original_total)}</span>
                    </div>
                    <div class="flex justify-between text-sm">
                        <span class="text-gray-500">"Đã trả"</span>
                        <span class="font-medium text-green-600">{format_vnd(d.bill.amount_paid)}</span>
                    </div>
                    <div class="flex justify-between">
                        <span class="text-gray-500">"Còn lại"</span>
                        <span class="text-lg font-bold text-red-600">{format_vnd(d.remaining_amount)}</span>
                    </div>

                    {if d.can_pay {
                        view! {
                            <div class="space-y-2">
                                <div class="grid grid-cols-3 gap-2">
                                    {GATEWAYS.iter().map(|(key, label)| {
                                        let key = key.to_string();
                                        view! {
                                            <button
                                                class="py-2 border rounded-md text-sm font-medium hover:bg-gray-50"
                                                on:click=move |_| pay_online.dispatch(key.clone())
                                            >
                                                {*label}
                                            </button>
                                        }
                                    }).collect_view()}
                                </div>
                                <button
                                    class="w-full py-2 bg-blue-600 text-white rounded-md text-sm font-medium hover:bg-blue-700"
                                    on:click=move |_| show_cash.set(true)
                                >
                                    "Thanh toán tiền mặt"
                                </button>
                            </div>
                        }.into_view()
                    } else {
                        view! {
                            <p class="text-sm text-orange-600 bg-orange-50 rounded-md p-3">
                                {d.payment_blocked_reason.clone().unwrap_or_else(|| {
                                    "Hóa đơn này không thể thanh toán.".to_string()
                                })}
                            </p>
                        }.into_view()
                    }}
                </div>
            })}
        </Modal>

        {move || {
            let remaining = detail.get().flatten().map(|d| d.remaining_amount).unwrap_or(0);
            view! {
                <CashPaymentModal
                    bill_id
                    remaining
                    show=show_cash
                    on_done=move || {
                        show.set(false);
                        on_changed();
                    }
                />
            }
        }}
    }
}

/// Cash payment requires a proof image before anything is sent.
#[component]
fn CashPaymentModal(
    bill_id: Uuid,
    remaining: i64,
    show: RwSignal<bool>,
    on_done: impl Fn() + Copy + 'static,
) -> impl IntoView {
    let toasts = use_toasts();
    let file_input: NodeRef<Input> = create_node_ref();

    let submit = create_action(move |_: &()| async move {
        let proof = file_input
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let Some(proof) = proof else {
            push_error(toasts, "Vui lòng đính kèm ảnh biên lai.".to_string());
            return;
        };

        let client = ApiClient::new(current_token(Surface::Client));
        match client.pay_cash(bill_id, remaining, &proof).await {
            Ok(_) => {
                push_toast(
                    toasts,
                    "Đã gửi".to_string(),
                    "Yêu cầu thanh toán tiền mặt đang chờ xác nhận.".to_string(),
                    NotificationPriority::Medium,
                );
                show.set(false);
                on_done();
            }
            Err(err) => push_error(toasts, err.message()),
        }
    });

    view! {
        <Modal title="Thanh toán tiền mặt" show>
            <div class="space-y-4">
                <p class="text-sm text-gray-600">
                    "Số tiền: " <strong>{format_vnd(remaining)}</strong>
                    " (phải thanh toán đủ số còn lại)"
                </p>
                <div>
                    <label class="block text-sm font-medium text-gray-700 mb-1">
                        "Ảnh biên lai (bắt buộc)"
                    </label>
                    <input type="file" accept="image/jpeg,image/png,image/webp" node_ref=file_input/>
                </div>
                <button
                    class="w-full py-2 bg-blue-600 text-white rounded-md text-sm font-medium hover:bg-blue-700 disabled:opacity-50"
                    disabled=move || submit.pending().get()
                    on:click=move |_| submit.dispatch(())
                >
                    "Gửi yêu cầu"
                </button>
            </div>
        </Modal>
    }
}
