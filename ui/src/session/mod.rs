// Session management for the two surfaces of the app.
//
// The tenant site and the back-office sign in independently and keep
// separate storage keys, so an admin can stay logged into both at once.
use leptos::*;

use crate::types::{User, UserRole};

/// Which half of the app a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Client,
    Admin,
}

impl Surface {
    pub fn token_key(&self) -> &'static str {
        match self {
            Surface::Client => "token",
            Surface::Admin => "admin_token",
        }
    }

    pub fn user_key(&self) -> &'static str {
        match self {
            Surface::Client => "currentUser",
            Surface::Admin => "admin_currentUser",
        }
    }

    pub fn login_path(&self) -> &'static str {
        match self {
            Surface::Client => "/login",
            Surface::Admin => "/admin/login",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionStore {
    pub client: RwSignal<Session>,
    pub admin: RwSignal<Session>,
}

impl SessionStore {
    pub fn surface(&self, surface: Surface) -> RwSignal<Session> {
        match surface {
            Surface::Client => self.client,
            Surface::Admin => self.admin,
        }
    }
}

pub fn provide_session_store() -> SessionStore {
    let store = SessionStore {
        client: create_rw_signal(restore(Surface::Client)),
        admin: create_rw_signal(restore(Surface::Admin)),
    };
    provide_context(store);
    store
}

pub fn use_session_store() -> SessionStore {
    use_context::<SessionStore>().expect("SessionStore must be provided")
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn restore(surface: Surface) -> Session {
    let Some(storage) = storage() else {
        return Session::default();
    };
    let token = storage.get_item(surface.token_key()).ok().flatten();
    let user = storage
        .get_item(surface.user_key())
        .ok()
        .flatten()
        .and_then(|raw| serde_json::from_str::<User>(&raw).ok());
    match (token, user) {
        (Some(token), Some(user)) => Session {
            user: Some(user),
            token: Some(token),
        },
        _ => Session::default(),
    }
}

/// Store a login. A login by a user with admin access is mirrored into
/// the other surface too, so one sign-in serves both the tenant site and
/// the back-office.
pub fn login(surface: Surface, user: User, token: String) {
    let store = use_session_store();
    persist(surface, &user, &token);
    store.surface(surface).set(Session {
        user: Some(user.clone()),
        token: Some(token.clone()),
    });

    if user.role.has_admin_access() {
        let other = match surface {
            Surface::Client => Surface::Admin,
            Surface::Admin => Surface::Client,
        };
        persist(other, &user, &token);
        store.surface(other).set(Session {
            user: Some(user),
            token: Some(token),
        });
    }
}

fn persist(surface: Surface, user: &User, token: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(surface.token_key(), token);
        let _ = storage.set_item(
            surface.user_key(),
            &serde_json::to_string(user).unwrap_or_default(),
        );
    }
}

pub fn logout(surface: Surface) {
    let store = use_session_store();
    if let Some(storage) = storage() {
        let _ = storage.remove_item(surface.token_key());
        let _ = storage.remove_item(surface.user_key());
    }
    store.surface(surface).set(Session::default());
}

// Read straight from localStorage so these work outside the reactive
// tree (resource fetchers, the socket bridge). login/logout keep the
// storage and the signals in sync.
pub fn current_token(surface: Surface) -> Option<String> {
    storage().and_then(|s| s.get_item(surface.token_key()).ok().flatten())
}

pub fn current_user(surface: Surface) -> Option<User> {
    restore(surface).user
}

/// Redirects to the surface's login page when there is no session;
/// a signed-in tenant hitting the back-office is sent home instead.
#[component]
pub fn RouteGuard(surface: Surface, children: ChildrenFn) -> impl IntoView {
    let store = use_session_store();

    create_effect(move |_| {
        let session = store.surface(surface).get();
        let target = match (&session.user, surface) {
            (Some(user), Surface::Admin) if !user.role.has_admin_access() => Some("/"),
            (None, _) => Some(surface.login_path()),
            _ => None,
        };
        if let Some(target) = target {
            let navigate = leptos_router::use_navigate();
            navigate(target, Default::default());
        }
    });

    move || {
        let session = store.surface(surface).get();
        let authorized = match (&session.user, surface) {
            (Some(user), Surface::Admin) => user.role.has_admin_access(),
            (Some(_), Surface::Client) => true,
            (None, _) => false,
        };
        if authorized {
            children().into_view()
        } else {
            view! {
                <div class="flex items-center justify-center min-h-screen">
                    <p class="text-gray-600">"Đang chuyển hướng đến trang đăng nhập..."</p>
                </div>
            }
            .into_view()
        }
    }
}
