// Page chrome for both surfaces
use leptos::*;
use leptos_router::*;

use crate::components::notifications::NotificationBell;
use crate::session::{self, use_session_store, Surface};

#[component]
pub fn Card(children: Children) -> impl IntoView {
    view! {
        <div class="bg-white shadow rounded-lg p-6">
            {children()}
        </div>
    }
}

#[component]
pub fn PageHeader(#[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between mb-6">
            <h1 class="text-2xl font-semibold text-gray-900">{title}</h1>
            <div>{children()}</div>
        </div>
    }
}

/// Top navigation for the tenant site.
#[component]
pub fn ClientLayout(children: Children) -> impl IntoView {
    let store = use_session_store();
    let navigate = use_navigate();

    let logout = move |_| {
        session::logout(Surface::Client);
        navigate("/", Default::default());
    };

    view! {
        <div class="min-h-screen bg-gray-50">
            <nav class="bg-white shadow">
                <div class="max-w-7xl mx-auto px-4 flex items-center justify-between h-16">
                    <div class="flex items-center space-x-6">
                        <A href="/" class="text-xl font-bold text-blue-600">"RentCP"</A>
                        <A href="/rooms" class="text-gray-700 hover:text-blue-600">"Phòng trọ"</A>
                        <A href="/invoices" class="text-gray-700 hover:text-blue-600">"Hóa đơn"</A>
                        <A href="/complaints" class="text-gray-700 hover:text-blue-600">"Khiếu nại"</A>
                    </div>
                    <div class="flex items-center space-x-4">
                        {move || match store.client.get().user {
                            Some(user) => view! {
                                <NotificationBell surface=Surface::Client/>
                                <span class="text-sm text-gray-700">{user.full_name.clone()}</span>
                                <button
                                    class="text-sm text-gray-500 hover:text-red-600"
                                    on:click=logout.clone()
                                >
                                    "Đăng xuất"
                                </button>
                            }.into_view(),
                            None => view! {
                                <A href="/login" class="text-sm text-blue-600 hover:underline">"Đăng nhập"</A>
                                <A href="/register" class="text-sm text-gray-700 hover:underline">"Đăng ký"</A>
                            }.into_view(),
                        }}
                    </div>
                </div>
            </nav>
            <main class="max-w-7xl mx-auto px-4 py-8">
                {children()}
            </main>
        </div>
    }
}

/// Sidebar navigation for the back-office.
#[component]
pub fn AdminLayout(children: Children) -> impl IntoView {
    let store = use_session_store();
    let navigate = use_navigate();

    let logout = move |_| {
        session::logout(Surface::Admin);
        navigate("/admin/login", Default::default());
    };

    view! {
        <div class="min-h-screen bg-gray-100 flex">
            <aside class="w-64 bg-gray-900 text-gray-100 flex flex-col">
                <div class="h-16 flex items-center px-6 text-xl font-bold">"RentCP Admin"</div>
                <nav class="flex-1 px-3 space-y-1">
                    <A href="/admin" class="block px-3 py-2 rounded hover:bg-gray-800">"Tổng quan"</A>
                    <A href="/admin/rooms" class="block px-3 py-2 rounded hover:bg-gray-800">"Phòng"</A>
                    <A href="/admin/contracts" class="block px-3 py-2 rounded hover:bg-gray-800">"Hợp đồng"</A>
                    <A href="/admin/bills" class="block px-3 py-2 rounded hover:bg-gray-800">"Hóa đơn"</A>
                    <A href="/admin/users" class="block px-3 py-2 rounded hover:bg-gray-800">"Người dùng"</A>
                    <A href="/admin/complaints" class="block px-3 py-2 rounded hover:bg-gray-800">"Khiếu nại"</A>
                </nav>
                <div class="p-4 border-t border-gray-800">
                    {move || store.admin.get().user.map(|user| view! {
                        <p class="text-sm mb-2">{user.full_name.clone()}</p>
                    })}
                    <button class="text-sm text-gray-400 hover:text-white" on:click=logout>
                        "Đăng xuất"
                    </button>
                </div>
            </aside>
            <main class="flex-1 p-8">
                <div class="flex justify-end mb-4">
                    <NotificationBell surface=Surface::Admin/>
                </div>
                {children()}
            </main>
        </div>
    }
}
