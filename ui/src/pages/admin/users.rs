use leptos::*;

use crate::api::ApiClient;
use crate::components::forms::{SubmitButton, TextField};
use crate::components::layout::PageHeader;
use crate::components::modals::Modal;
use crate::components::notifications::{push_error, use_toasts};
use crate::session::{current_token, Surface};
use crate::utils::format_datetime;

#[component]
pub fn UsersPage() -> impl IntoView {
    let toasts = use_toasts();
    let show_form = create_rw_signal(false);
    let full_name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let (role, set_role) = create_signal("TENANT".to_string());

    let (reload, set_reload) = create_signal(0u32);
    let users = create_resource(
        move || reload.get(),
        |_| async {
            ApiClient::new(current_token(Surface::Admin))
                .admin_list_users(1)
                .await
                .ok()
        },
    );

    let create = create_action(move |_: &()| async move {
        let body = serde_json::json!({
            "full_name": full_name.get_untracked(),
            "email": email.get_untracked(),
            "password": password.get_untracked(),
            "role": role.get_untracked(),
        });
        let client = ApiClient::new(current_token(Surface::Admin));
        match client.admin_create_user(&body).await {
            Ok(_) => {
                show_form.set(false);
                full_name.set(String::new());
                email.set(String::new());
                password.set(String::new());
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
            <PageHeader title="Người dùng">
                <button
                    class="bg-blue-600 text-white px-4 py-2 rounded-md text-sm font-medium hover:bg-blue-700"
                    on:click=move |_| show_form.set(true)
                >
                    "Thêm người dùng"
                </button>
            </PageHeader>

            <Suspense fallback=move || view! { <p class="text-gray-500">"Đang tải..."</p> }>
                {move || users.get().flatten().map(|page| view! {
                    <div class="bg-white shadow rounded-lg overflow-hidden">
                        <table class="min-w-full divide-y divide-gray-200">
                            <thead class="bg-gray-50">
                                <tr>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Họ tên"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Email"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Vai trò"</th>
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">"Ngày tạo"</th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-gray-200">
                                {page.items.into_iter().map(|user| view! {
                                    <tr class="hover:bg-gray-50">
                                        <td class="px-6 py-4 text-sm text-gray-900">{user.full_name.clone()}</td>
                                        <td class="px-6 py-4 text-sm text-gray-600">{user.email.clone()}</td>
                                        <td class="px-6 py-4 text-sm text-gray-600">{format!("{:?}", user.role)}</td>
                                        <td class="px-6 py-4 text-sm text-gray-400">{format_datetime(&user.created_at)}</td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                })}
            </Suspense>

            <Modal title="Thêm người dùng" show=show_form>
                <form class="space-y-4" on:submit=on_submit>
                    <TextField label="Họ và tên" value=full_name/>
                    <TextField label="Email" value=email input_type="email"/>
                    <TextField label="Mật khẩu" value=password input_type="password"/>
                    <div>
                        <label class="block text-sm font-medium text-gray-700">"Vai trò"</label>
                        <select
                            class="mt-1 block w-full px-3 py-2 border border-gray-300 rounded-md sm:text-sm"
                            on:change=move |ev| set_role.set(event_target_value(&ev))
                        >
                            <option value="TENANT">"Khách thuê"</option>
                            <option value="STAFF">"Nhân viên"</option>
                            <option value="ADMIN">"Quản trị"</option>
                        </select>
                    </div>
                    <SubmitButton label="Tạo" loading=Signal::derive(move || create.pending().get())/>
                </form>
            </Modal>
        </div>
    }
}
