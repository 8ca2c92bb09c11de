//! Add/edit form. Inputs write straight into the coordinator's draft, so
//! leaving the form discards the edits and nothing reaches the backend until
//! submit.

use crate::components::{Button, ButtonKind};
use crate::features::{
    records::DraftField,
    view::{ViewCoordinator, ViewMode, state::use_records},
};
use leptos::{ev::SubmitEvent, prelude::*};

#[component]
pub fn StudentForm() -> impl IntoView {
    let records = use_records();
    let busy = Signal::derive(move || records.pending());

    let title = move || match records.mode.get() {
        ViewMode::Editing => "Edit Student",
        _ => "Add Student",
    };
    let submit_label = move || match records.mode.get() {
        ViewMode::Editing => "Update",
        _ => "Add",
    };

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        records.run(|coordinator| async move {
            let _ = coordinator.submit().await;
        });
    };

    view! {
        <form class="max-w-sm space-y-5" on:submit=on_submit>
            <h2 class="text-lg font-semibold text-gray-900 dark:text-white">{title}</h2>
            <DraftInput field=DraftField::Name label="Name" input_type="text" />
            <DraftInput field=DraftField::Email label="Email" input_type="email" />
            <DraftInput field=DraftField::Marks label="Marks" input_type="number" />
            <div class="flex gap-2">
                <Button button_type="submit" disabled=busy>
                    {submit_label}
                </Button>
                <Button
                    kind=ButtonKind::Secondary
                    disabled=busy
                    on_click=Callback::new(move |()| records.apply(ViewCoordinator::cancel))
                >
                    "Cancel"
                </Button>
            </div>
        </form>
    }
}

#[component]
fn DraftInput(
    field: DraftField,
    label: &'static str,
    input_type: &'static str,
) -> impl IntoView {
    let records = use_records();
    let id = match field {
        DraftField::Name => "student-name",
        DraftField::Email => "student-email",
        DraftField::Marks => "student-marks",
    };

    let value = move || {
        records.page.with(|page| {
            page.view.draft().map_or_else(String::new, |draft| match field {
                DraftField::Name => draft.name.clone(),
                DraftField::Email => draft.email.clone(),
                DraftField::Marks => draft.marks.clone(),
            })
        })
    };

    view! {
        <div>
            <label class="block mb-2 text-sm font-medium text-gray-900 dark:text-white" for=id>
                {label}
            </label>
            <input
                id=id
                type=input_type
                class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                prop:value=value
                prop:disabled=move || records.pending()
                on:input=move |event| {
                    let text = event_target_value(&event);
                    records.apply(|coordinator| coordinator.set_field(field, text));
                }
            />
        </div>
    }
}
