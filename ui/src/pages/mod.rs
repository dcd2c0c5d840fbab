pub mod admin;
pub mod auth;
pub mod complaints;
pub mod home;
pub mod invoices;
pub mod notifications;
pub mod rooms;

use leptos::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="text-center py-20">
            <h1 class="text-4xl font-bold text-gray-900">"404"</h1>
            <p class="mt-2 text-gray-600">"Trang không tồn tại."</p>
        </div>
    }
}
