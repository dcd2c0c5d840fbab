// RentCP UI - tenant site and back-office in one bundle
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

pub mod api;
pub mod billing;
pub mod components;
pub mod pages;
pub mod realtime;
pub mod session;
pub mod types;
pub mod utils;

use components::layout::{AdminLayout, ClientLayout};
use components::notifications::{provide_notification_feed, provide_toasts, push_toast, ToastStack};
use pages::NotFoundPage;
use session::{provide_session_store, RouteGuard, Surface};

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    let store = provide_session_store();
    let toasts = provide_toasts();
    let feed = provide_notification_feed();

    // Live notifications: (re)connect whenever a client session appears
    #[cfg(not(feature = "ssr"))]
    {
        let conn_state = create_rw_signal(realtime::ConnState::Disconnected);
        create_effect(move |_| {
            let has_token = store.client.get().token.is_some();
            if has_token && conn_state.get_untracked() == realtime::ConnState::Disconnected {
                realtime::socket::start(Surface::Client, conn_state, move |notification| {
                    // Refresh the bell and list before toasting
                    feed.notify();
                    push_toast(
                        toasts,
                        notification.title,
                        notification.message,
                        notification.priority,
                    );
                });
            }
        });
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/rentcp-ui.css"/>
        <Title text="RentCP - Quản lý phòng trọ"/>
        <Meta name="viewport" content="width=device-width, initial-scale=1"/>

        <ToastStack/>

        <Router>
            <Routes>
                // Tenant site
                <Route path="/" view=|| view! { <ClientLayout><pages::home::HomePage/></ClientLayout> }/>
                <Route path="/rooms" view=|| view! { <ClientLayout><pages::rooms::RoomsPage/></ClientLayout> }/>
                <Route path="/rooms/:id" view=|| view! { <ClientLayout><pages::rooms::RoomDetailPage/></ClientLayout> }/>
                <Route path="/login" view=|| view! { <pages::auth::LoginPage surface=Surface::Client/> }/>
                <Route path="/register" view=|| view! { <pages::auth::RegisterPage/> }/>
                <Route path="/invoices" view=|| view! {
                    <ClientLayout>
                        <RouteGuard surface=Surface::Client>
                            <pages::invoices::InvoicesPage/>
                        </RouteGuard>
                    </ClientLayout>
                }/>
                <Route path="/complaints" view=|| view! {
                    <ClientLayout>
                        <RouteGuard surface=Surface::Client>
                            <pages::complaints::ComplaintsPage/>
                        </RouteGuard>
                    </ClientLayout>
                }/>
                <Route path="/notifications" view=|| view! {
                    <ClientLayout>
                        <RouteGuard surface=Surface::Client>
                            <pages::notifications::NotificationsPage/>
                        </RouteGuard>
                    </ClientLayout>
                }/>

                // Back-office
                <Route path="/admin/login" view=|| view! { <pages::auth::LoginPage surface=Surface::Admin/> }/>
                <Route path="/admin" view=|| view! {
                    <RouteGuard surface=Surface::Admin>
                        <AdminLayout><pages::admin::dashboard::DashboardPage/></AdminLayout>
                    </RouteGuard>
                }/>
                <Route path="/admin/rooms" view=|| view! {
                    <RouteGuard surface=Surface::Admin>
                        <AdminLayout><pages::admin::rooms::RoomsAdminPage/></AdminLayout>
                    </RouteGuard>
                }/>
                <Route path="/admin/contracts" view=|| view! {
                    <RouteGuard surface=Surface::Admin>
                        <AdminLayout><pages::admin::contracts::ContractsPage/></AdminLayout>
                    </RouteGuard>
                }/>
                <Route path="/admin/bills" view=|| view! {
                    <RouteGuard surface=Surface::Admin>
                        <AdminLayout><pages::admin::bills::BillsAdminPage/></AdminLayout>
                    </RouteGuard>
                }/>
                <Route path="/admin/users" view=|| view! {
                    <RouteGuard surface=Surface::Admin>
                        <AdminLayout><pages::admin::users::UsersPage/></AdminLayout>
                    </RouteGuard>
                }/>
                <Route path="/admin/complaints" view=|| view! {
                    <RouteGuard surface=Surface::Admin>
                        <AdminLayout><pages::admin::complaints::ComplaintsAdminPage/></AdminLayout>
                    </RouteGuard>
                }/>

                <Route path="/*any" view=NotFoundPage/>
            </Routes>
        </Router>
    }
}

#[cfg(not(feature = "ssr"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(App);
}
