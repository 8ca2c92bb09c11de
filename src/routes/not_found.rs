use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[50vh] text-center px-4">
            <h1 class="text-6xl font-black text-gray-200 dark:text-gray-700 select-none">"404"</h1>
            <p class="mt-2 text-gray-500 dark:text-gray-400">"Page not found"</p>
            <A
                href="/"
                {..}
                class="mt-6 inline-flex items-center px-5 py-2.5 text-sm font-medium text-white bg-blue-700 rounded-lg hover:bg-blue-800 dark:bg-blue-600 dark:hover:bg-blue-700"
            >
                "Back to students"
            </A>
        </div>
    }
}
