use leptos::*;

use crate::api::ApiClient;
use crate::components::layout::{Card, PageHeader};
use crate::session::{current_token, Surface};
use crate::types::RoomStatus;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let rooms = create_resource(
        || (),
        |_| async {
            ApiClient::new(current_token(Surface::Admin))
                .admin_list_rooms()
                .await
                .ok()
                .map(|page| page.rooms)
        },
    );
    let bills = create_resource(
        || (),
        |_| async {
            ApiClient::new(current_token(Surface::Admin))
                .admin_list_bills(1)
                .await
                .ok()
        },
    );
    let complaints = create_resource(
        || (),
        |_| async {
            ApiClient::new(current_token(Surface::Admin))
                .admin_list_complaints(1)
                .await
                .ok()
        },
    );

    view! {
        <div>
            <PageHeader title="Tổng quan">
                <span></span>
            </PageHeader>
            <div class="grid grid-cols-1 md:grid-cols-4 gap-6">
                <Card>
                    <p class="text-sm text-gray-500">"Tổng số phòng"</p>
                    <p class="text-3xl font-bold text-gray-900">
                        {move || rooms.get().flatten().map(|r| r.len()).unwrap_or(0)}
                    </p>
                </Card>
                <Card>
                    <p class="text-sm text-gray-500">"Phòng trống"</p>
                    <p class="text-3xl font-bold text-green-600">
                        {move || rooms.get().flatten()
                            .map(|r| r.iter().filter(|room| room.status == RoomStatus::Available).count())
                            .unwrap_or(0)}
                    </p>
                </Card>
                <Card>
                    <p class="text-sm text-gray-500">"Hóa đơn"</p>
                    <p class="text-3xl font-bold text-gray-900">
                        {move || bills.get().flatten().map(|p| p.total).unwrap_or(0)}
                    </p>
                </Card>
                <Card>
                    <p class="text-sm text-gray-500">"Khiếu nại"</p>
                    <p class="text-3xl font-bold text-orange-600">
                        {move || complaints.get().flatten().map(|p| p.total).unwrap_or(0)}
                    </p>
                </Card>
            </div>
        </div>
    }
}
