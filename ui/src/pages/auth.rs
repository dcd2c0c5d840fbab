use leptos::*;
use leptos_router::*;

use crate::api::ApiClient;
use crate::components::forms::{ErrorBox, SubmitButton, TextField};
use crate::components::layout::Card;
use crate::session::{self, Surface};
use crate::utils::{validate_email, validate_phone};

#[component]
pub fn LoginPage(surface: Surface) -> impl IntoView {
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);

    let navigate = use_navigate();

    let login = create_action(move |_: &()| {
        let navigate = navigate.clone();
        async move {
            set_error.set(None);
            let client = ApiClient::new(None);
            match client.login(&email.get_untracked(), &password.get_untracked()).await {
                Ok(response) => {
                    if surface == Surface::Admin && !response.user.role.has_admin_access() {
                        set_error.set(Some("Tài khoản không có quyền quản trị".to_string()));
                        return;
                    }
                    session::login(surface, response.user, response.token);
                    let destination = match surface {
                        Surface::Client => "/",
                        Surface::Admin => "/admin",
                    };
                    navigate(destination, Default::default());
                }
                Err(err) => set_error.set(Some(err.message())),
            }
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        login.dispatch(());
    };

    let heading = match surface {
        Surface::Client => "Đăng nhập",
        Surface::Admin => "Đăng nhập quản trị",
    };

    view! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center py-12 px-4">
            <div class="max-w-md w-full space-y-8">
                <h2 class="text-center text-3xl font-extrabold text-gray-900">{heading}</h2>
                <Card>
                    <form class="space-y-6" on:submit=on_submit>
                        <TextField label="Email" value=email input_type="email"/>
                        <TextField label="Mật khẩu" value=password input_type="password"/>
                        <ErrorBox error=Signal::derive(move || error.get())/>
                        <SubmitButton label="Đăng nhập" loading=Signal::derive(move || login.pending().get())/>
                        {(surface == Surface::Client).then(|| view! {
                            <p class="text-center text-sm text-gray-600">
                                "Chưa có tài khoản? "
                                <A href="/register" class="text-blue-600 hover:underline">"Đăng ký"</A>
                            </p>
                        })}
                    </form>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let full_name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let phone = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);

    let navigate = use_navigate();

    let register = create_action(move |_: &()| {
        let navigate = navigate.clone();
        async move {
            set_error.set(None);
            if !validate_email(&email.get_untracked()) {
                set_error.set(Some("Email không hợp lệ".to_string()));
                return;
            }
            let phone_value = phone.get_untracked();
            if !phone_value.is_empty() && !validate_phone(&phone_value) {
                set_error.set(Some("Số điện thoại không hợp lệ".to_string()));
                return;
            }
            let body = serde_json::json!({
                "full_name": full_name.get_untracked(),
                "email": email.get_untracked(),
                "phone": if phone_value.is_empty() { None } else { Some(phone_value) },
                "password": password.get_untracked(),
            });
            match ApiClient::new(None).register(&body).await {
                Ok(_) => navigate("/login", Default::default()),
                Err(err) => set_error.set(Some(err.message())),
            }
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        register.dispatch(());
    };

    view! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center py-12 px-4">
            <div class="max-w-md w-full space-y-8">
                <h2 class="text-center text-3xl font-extrabold text-gray-900">"Tạo tài khoản"</h2>
                <Card>
                    <form class="space-y-6" on:submit=on_submit>
                        <TextField label="Họ và tên" value=full_name/>
                        <TextField label="Email" value=email input_type="email"/>
                        <TextField label="Số điện thoại" value=phone input_type="tel"/>
                        <TextField label="Mật khẩu" value=password input_type="password"/>
                        <ErrorBox error=Signal::derive(move || error.get())/>
                        <SubmitButton label="Đăng ký" loading=Signal::derive(move || register.pending().get())/>
                    </form>
                </Card>
            </div>
        </div>
    }
}
