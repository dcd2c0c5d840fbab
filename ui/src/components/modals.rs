// Modal dialog
use leptos::*;

#[component]
pub fn Modal(
    #[prop(into)] title: String,
    show: RwSignal<bool>,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <Show when=move || show.get()>
            <div class="fixed inset-0 z-50 flex items-center justify-center">
                <div
                    class="absolute inset-0 bg-black bg-opacity-40"
                    on:click=move |_| show.set(false)
                ></div>
                <div class="relative bg-white rounded-lg shadow-xl w-full max-w-lg p-6">
                    <div class="flex items-center justify-between mb-4">
                        <h3 class="text-lg font-semibold text-gray-900">{title.clone()}</h3>
                        <button
                            class="text-gray-400 hover:text-gray-600"
                            on:click=move |_| show.set(false)
                        >
                            "✕"
                        </button>
                    </div>
                    {children()}
                </div>
            </div>
        </Show>
    }
}
