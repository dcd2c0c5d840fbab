use leptos::*;
use leptos_router::*;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::components::layout::PageHeader;
use crate::components::tables::RoomStatusBadge;
use crate::pages::home::RoomCard;
use crate::utils::format_vnd;

#[component]
pub fn RoomsPage() -> impl IntoView {
    let query = use_query_map();
    let initial = query.with_untracked(|q| q.get("keyword").cloned().unwrap_or_default());
    let (keyword, set_keyword) = create_signal(initial);

    // Empty keyword shows the full public listing
    let rooms = create_resource(
        move || keyword.get(),
        |keyword| async move {
            let client = ApiClient::new(None);
            if keyword.trim().is_empty() {
                client
                    .list_public_rooms()
                    .await
                    .ok()
                    .map(|page| page.rooms)
            } else {
                client.search_rooms(keyword.trim()).await.ok()
            }
        },
    );

    view! {
        <div>
            <PageHeader title="Phòng trọ">
                <input
                    type="text"
                    placeholder="Tìm kiếm..."
                    class="px-3 py-2 border border-gray-300 rounded-md w-64"
                    prop:value=keyword
                    on:input=move |ev| set_keyword.set(event_target_value(&ev))
                />
            </PageHeader>
            <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
                {move || rooms.get().flatten().map(|rooms| {
                    if rooms.is_empty() {
                        view! { <p class="text-gray-500">"Không tìm thấy phòng phù hợp."</p> }.into_view()
                    } else {
                        view! {
                            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                                {rooms.into_iter().map(|room| view! { <RoomCard room/> }).collect_view()}
                            </div>
                        }.into_view()
                    }
                })}
            </Suspense>
        </div>
    }
}

#[component]
pub fn RoomDetailPage() -> impl IntoView {
    let params = use_params_map();
    let room_id = move || {
        params.with(|p| p.get("id").and_then(|raw| Uuid::parse_str(raw).ok()))
    };

    let room = create_resource(room_id, |id| async move {
        let id = id?;
        ApiClient::new(None).get_public_room(id).await.ok()
    });

    view! {
        <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
            {move || room.get().flatten().map(|room| view! {
                <div class="bg-white shadow rounded-lg p-8">
                    <div class="flex items-center justify-between mb-4">
                        <h1 class="text-3xl font-bold text-gray-900">
                            {format!("Phòng {}", room.room_number)}
                        </h1>
                        <RoomStatusBadge status=room.status/>
                    </div>
                    <p class="text-blue-600 text-2xl font-bold mb-6">
                        {format!("{}/tháng", format_vnd(room.price_per_month))}
                    </p>
                    <dl class="grid grid-cols-2 gap-4 mb-6">
                        <div>
                            <dt class="text-sm text-gray-500">"Loại phòng"</dt>
                            <dd class="text-gray-900">{room.room_type.clone()}</dd>
                        </div>
                        <div>
                            <dt class="text-sm text-gray-500">"Diện tích"</dt>
                            <dd class="text-gray-900">{format!("{:.0} m²", room.area_m2)}</dd>
                        </div>
                        <div>
                            <dt class="text-sm text-gray-500">"Tầng"</dt>
                            <dd class="text-gray-900">{room.floor}</dd>
                        </div>
                        <div>
                            <dt class="text-sm text-gray-500">"Khu vực"</dt>
                            <dd class="text-gray-900">{room.district.clone()}</dd>
                        </div>
                    </dl>
                    {(!room.utilities.is_empty()).then(|| view! {
                        <h2 class="text-lg font-semibold text-gray-900 mb-2">"Tiện ích"</h2>
                        <ul class="list-disc list-inside text-gray-700 mb-6">
                            {room.utilities.iter().map(|u| view! {
                                <li>{format!("{} ({})", u.name, u.condition)}</li>
                            }).collect_view()}
                        </ul>
                    })}
                    {room.description.clone().map(|desc| view! {
                        <p class="text-gray-700">{desc}</p>
                    })}
                </div>
            })}
        </Suspense>
    }
}
