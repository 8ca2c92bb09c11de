use crate::features::view::state::RecordsProvider;
use crate::routes::AppRoutes;
use leptos::prelude::*;
use leptos_router::components::Router;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <RecordsProvider>
            <Router>
                <AppRoutes />
            </Router>
        </RecordsProvider>
    }
}
