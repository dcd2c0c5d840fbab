use leptos::*;

use crate::api::ApiClient;
use crate::components::forms::{SubmitButton, TextField};
use crate::components::layout::PageHeader;
use crate::components::modals::Modal;
use crate::components::notifications::{push_error, use_toasts};
use crate::components::tables::RoomStatusBadge;
use crate::session::{current_token, Surface};
use crate::utils::format_vnd;

#[component]
pub fn RoomsAdminPage() -> impl IntoView {
    let toasts = use_toasts();
    let show_form = create_rw_signal(false);
    let room_number = create_rw_signal(String::new());
    let room_type = create_rw_signal(String::new());
    let price = create_rw_signal(String::new());
    let area = create_rw_signal(String::new());
    let floor = create_rw_signal(String::new());
    let district = create_rw_signal(String::new());

    let (reload, set_reload) = create_signal(0u32);
    let rooms = create_resource(
        move || reload.get(),
        |_| async {
            ApiClient::new(current_token(Surface::Admin))
                .admin_list_rooms()
                .await
                .ok()
                .map(|page| page.rooms)
        },
    );

    let create = create_action(move |_: &()| async move {
        let Ok(price_value) = price.get_untracked().replace('.', "").parse::<i64>() else {
            push_error(toasts, "Giá thuê không hợp lệ".to_string());
            return;
        };
        let body = serde_json::json!({
            "room_number": room_number.get_untracked(),
            "room_type": room_type.get_untracked(),
            "price_per_month": price_value,
            "area_m2": area.get_untracked().parse::<f64>().unwrap_or(0.0),
            "floor": floor.get_untracked().parse::<i32>().unwrap_or(1),
            "district": district.get_untracked(),
        });
        let client = ApiClient::new(current_token(Surface::Admin));
        match client.admin_create_room(&body).await {
            Ok(_) => {
                show_form.set(false);
                set_reload.update(|n| *n += 1);
            }
            Err(err) => push_error(toasts, err.message()),
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        create.dispatch(());
    };

    view! {
        <div>
            <PageHeader title="Quản lý phòng">
                <button
                    class="bg-blue-600 text-white px-4 py-2 rounded-md text-sm font-medium hover:bg-blue-700"
                    on:click=move |_| show_form.set(true)
                >
                    "Thêm phòng"
                </button>
            </PageHeader>

            <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
                {move || rooms.get().flatten().map(|rooms| view! {
                    <div class="bg-white shadow rounded-lg overflow-hidden">
                        <table class="min-w-full divide-y divide-gray-200">
                            <thead class="bg-gray-50">
                                <tr>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Phòng"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Loại"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Giá thuê"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Khu vực"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Trạng thái"</th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-gray-200">
                                {rooms.into_iter().map(|room| view! {
                                    <tr class="hover:bg-gray-50">
                                        <td class="px-6 py-4 text-sm font-medium text-gray-900">{room.room_number.clone()}</td>
                                        <td class="px-6 py-4 text-sm text-gray-600">{room.room_type.clone()}</td>
                                        <td class="px-6 py-4 text-sm text-gray-900">{format_vnd(room.price_per_month)}</td>
                                        <td class="px-6 py-4 text-sm text-gray-600">{room.district.clone()}</td>
                                        <td class="px-6 py-4"><RoomStatusBadge status=room.status/></td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                })}
            </Suspense>

            <Modal title="Thêm phòng" show=show_form>
                <form class="space-y-4" on:submit=on_submit>
                    <TextField label="Số phòng" value=room_number/>
                    <TextField label="Loại phòng" value=room_type placeholder="Studio, 1PN..."/>
                    <TextField label="Giá thuê (VND/tháng)" value=price/>
                    <div class="grid grid-cols-2 gap-4">
                        <TextField label="Diện tích (m²)" value=area/>
                        <TextField label="Tầng" value=floor/>
                    </div>
                    <TextField label="Khu vực" value=district/>
                    <SubmitButton label="Tạo phòng" loading=Signal::derive(move || create.pending().get())/>
                </form>
            </Modal>
        </div>
    }
}
