use leptos::*;
use leptos_router::*;

use crate::api::ApiClient;
use crate::components::tables::RoomStatusBadge;
use crate::types::Room;
use crate::utils::format_vnd;

#[component]
pub fn HomePage() -> impl IntoView {
    let (keyword, set_keyword) = create_signal(String::new());
    let navigate = use_navigate();

    let rooms = create_resource(
        || (),
        |_| async {
            ApiClient::new(None)
                .list_public_rooms()
                .await
                .ok()
                .map(|page| page.rooms)
        },
    );

    let on_search = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let kw = keyword.get_untracked();
        navigate(&format!("/rooms?keyword={}", kw), Default::default());
    };

    view! {
        <div>
            <section class="bg-blue-600 text-white rounded-lg p-12 text-center mb-10">
                <h1 class="text-4xl font-bold mb-4">"Tìm phòng trọ ưng ý"</h1>
                <p class="text-blue-100 mb-6">"Xem phòng, ký hợp đồng và thanh toán hóa đơn ở một nơi."</p>
                <form class="max-w-xl mx-auto flex" on:submit=on_search>
                    <input
                        type="text"
                        placeholder="Tìm theo số phòng, loại phòng hoặc quận..."
                        class="flex-1 px-4 py-3 rounded-l-md text-gray-900"
                        prop:value=keyword
                        on:input=move |ev| set_keyword.set(event_target_value(&ev))
                    />
                    <button type="submit" class="bg-blue-800 px-6 rounded-r-md font-medium hover:bg-blue-900">
                        "Tìm kiếm"
                    </button>
                </form>
            </section>

            <h2 class="text-2xl font-semibold text-gray-900 mb-4">"Phòng mới nhất"</h2>
            <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
                {move || rooms.get().flatten().map(|rooms| view! {
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                        {rooms.into_iter().take(6).map(|room| view! { <RoomCard room/> }).collect_view()}
                    </div>
                })}
            </Suspense>
        </div>
    }
}

#[component]
pub fn RoomCard(room: Room) -> impl IntoView {
    let href = format!("/rooms/{}", room.id);
    view! {
        <A href=href class="block bg-white shadow rounded-lg p-6 hover:shadow-md">
            <div class="flex items-center justify-between mb-2">
                <h3 class="text-lg font-semibold text-gray-900">
                    {format!("Phòng {}", room.room_number)}
                </h3>
                <RoomStatusBadge status=room.status/>
            </div>
            <p class="text-blue-600 text-xl font-bold mb-2">
                {format!("{}/tháng", format_vnd(room.price_per_month))}
            </p>
            <p class="text-sm text-gray-600">
                {format!("{} · {:.0} m² · Tầng {} · {}", room.room_type, room.area_m2, room.floor, room.district)}
            </p>
        </A>
    }
}
