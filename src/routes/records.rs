//! The single records page: sign-in prompt while signed out; welcome bar,
//! navigation and either the list or the open form while signed in.

use crate::app_lib::GIT_COMMIT_HASH;
use crate::components::{
    Alert, AlertKind, Button, ButtonKind, Spinner, StudentForm, StudentList,
};
use crate::features::view::{ViewMode, state::use_records};
use leptos::prelude::*;

#[component]
pub fn RecordsPage() -> impl IntoView {
    let records = use_records();
    let logged_in = Memo::new(move |_| records.page.with(|page| page.session.is_logged_in));
    let auth_error = move || {
        records.page.with(|page| {
            page.auth_error
                .as_ref()
                .map(|err| view! { <Alert kind=AlertKind::Error message=err.to_string() /> })
        })
    };

    view! {
        <main class="mx-auto max-w-3xl p-6 space-y-6">
            <header class="flex items-center justify-between">
                <h1 class="text-2xl font-bold text-gray-900 dark:text-white">"Student Marks"</h1>
                <Show when=move || records.pending()>
                    <Spinner />
                </Show>
            </header>
            {auth_error}
            <Show when=move || logged_in.get() fallback=|| view! { <SignedOut /> }>
                <SignedIn />
            </Show>
            <footer class="pt-6 text-xs text-gray-400">
                {format!("v{} ({})", env!("CARGO_PKG_VERSION"), GIT_COMMIT_HASH)}
            </footer>
        </main>
    }
}

#[component]
fn SignedOut() -> impl IntoView {
    let records = use_records();

    view! {
        <section class="space-y-4">
            <Alert kind=AlertKind::Info message="Sign in to manage student records.".to_string() />
            <Button
                disabled=Signal::derive(move || records.pending())
                on_click=Callback::new(move |()| {
                    records.apply(|coordinator| coordinator.prepare_sign_in());
                    records.run(|coordinator| async move {
                        let _ = coordinator.sign_in().await;
                    });
                })
            >
                "Sign in"
            </Button>
        </section>
    }
}

#[component]
fn SignedIn() -> impl IntoView {
    let records = use_records();
    let welcome = move || {
        records
            .page
            .with(|page| format!("Welcome, {}", page.welcome_name()))
    };
    let busy = Signal::derive(move || records.pending());

    view! {
        <section class="space-y-6">
            <div class="flex flex-wrap items-center gap-2">
                <p class="mr-auto text-gray-700 dark:text-gray-300">{welcome}</p>
                <Button
                    kind=ButtonKind::Secondary
                    disabled=busy
                    on_click=Callback::new(move |()| {
                        records.run(|coordinator| async move {
                            coordinator.view_students().await;
                        });
                    })
                >
                    "View Students"
                </Button>
                <Button
                    kind=ButtonKind::Secondary
                    disabled=busy
                    on_click=Callback::new(move |()| {
                        records.apply(|coordinator| coordinator.show_add_form());
                    })
                >
                    "Add Student"
                </Button>
                <Button
                    kind=ButtonKind::Danger
                    disabled=busy
                    on_click=Callback::new(move |()| {
                        records.run(|coordinator| async move {
                            let _ = coordinator.sign_out().await;
                        });
                    })
                >
                    "Sign out"
                </Button>
            </div>
            {move || match records.mode.get() {
                ViewMode::Browsing => view! { <StudentList /> }.into_any(),
                ViewMode::Adding | ViewMode::Editing => view! { <StudentForm /> }.into_any(),
            }}
        </section>
    }
}
