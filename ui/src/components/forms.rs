// Form controls
use leptos::*;

#[component]
pub fn TextField(
    #[prop(into)] label: String,
    #[prop(into)] value: RwSignal<String>,
    #[prop(into, optional)] input_type: String,
    #[prop(into, optional)] placeholder: String,
) -> impl IntoView {
    let input_type = if input_type.is_empty() {
        "text".to_string()
    } else {
        input_type
    };
    view! {
        <div>
            <label class="block text-sm font-medium text-gray-700">{label}</label>
            <input
                type=input_type
                placeholder=placeholder
                class="mt-1 block w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-blue-500 focus:border-blue-500 sm:text-sm"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn SubmitButton(
    #[prop(into)] label: String,
    #[prop(into)] loading: Signal<bool>,
) -> impl IntoView {
    view! {
        <button
            type="submit"
            disabled=move || loading.get()
            class="w-full flex justify-center py-2 px-4 border border-transparent text-sm font-medium rounded-md text-white bg-blue-600 hover:bg-blue-700 disabled:opacity-50 disabled:cursor-not-allowed"
        >
            {move || if loading.get() { "Đang xử lý...".to_string() } else { label.clone() }}
        </button>
    }
}

#[component]
pub fn ErrorBox(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    view! {
        {move || error.get().map(|err| view! {
            <div class="rounded-md bg-red-50 p-4">
                <p class="text-sm font-medium text-red-800">{err}</p>
            </div>
        })}
    }
}
