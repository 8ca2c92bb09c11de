mod not_found;
mod records;

pub(crate) use not_found::NotFoundPage;
pub(crate) use records::RecordsPage;

use leptos::prelude::*;
use leptos_router::components::{Route, Routes};
use leptos_router::path;

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <NotFoundPage /> }>
            <Route path=path!("/") view=RecordsPage />
            <Route path=path!("/*any") view=NotFoundPage />
        </Routes>
    }
}
