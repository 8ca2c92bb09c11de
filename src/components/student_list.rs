use crate::components::{Button, ButtonKind};
use crate::features::view::state::use_records;
use leptos::prelude::*;

/// Table of the locally held students with per-row edit and delete actions.
#[component]
pub fn StudentList() -> impl IntoView {
    let records = use_records();
    let is_empty = Memo::new(move |_| records.page.with(|page| page.students.is_empty()));
    let busy = Signal::derive(move || records.pending());

    view! {
        <Show
            when=move || !is_empty.get()
            fallback=|| view! { <p class="text-sm text-gray-500 dark:text-gray-400">"No students yet."</p> }
        >
            <table class="w-full text-sm text-left text-gray-700 dark:text-gray-300">
                <thead class="text-xs uppercase bg-gray-50 dark:bg-gray-800">
                    <tr>
                        <th class="px-4 py-3">"Name"</th>
                        <th class="px-4 py-3">"Email"</th>
                        <th class="px-4 py-3">"Marks"</th>
                        <th class="px-4 py-3"></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || records.page.with(|page| page.students.clone())
                        key=|student| student.clone()
                        let:student
                    >
                        {
                            let for_edit = student.clone();
                            let id = student.id.clone();
                            view! {
                                <tr class="border-b dark:border-gray-700">
                                    <td class="px-4 py-3">{student.name.clone()}</td>
                                    <td class="px-4 py-3">{student.email.clone()}</td>
                                    <td class="px-4 py-3">{student.marks}</td>
                                    <td class="px-4 py-3 flex gap-2 justify-end">
                                        <Button
                                            kind=ButtonKind::Secondary
                                            disabled=busy
                                            on_click=Callback::new(move |()| {
                                                records
                                                    .apply(|coordinator| coordinator.edit(&for_edit));
                                            })
                                        >
                                            "Edit"
                                        </Button>
                                        <Button
                                            kind=ButtonKind::Danger
                                            disabled=busy
                                            on_click=Callback::new(move |()| {
                                                let id = id.clone();
                                                records.run(move |coordinator| async move {
                                                    let _ = coordinator.delete(&id).await;
                                                });
                                            })
                                        >
                                            "Delete"
                                        </Button>
                                    </td>
                                </tr>
                            }
                        }
                    </For>
                </tbody>
            </table>
        </Show>
    }
}
