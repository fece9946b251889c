//! File-explorer preview surface: the host-page component that drives the
//! renderer dispatch layer and subscribes to the shared navigation store.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::rc::Rc;

use explorer_state::{ExplorerState, ExplorerStateStore};
use leptos::*;
#[cfg(target_arch = "wasm32")]
use preview_host::PreviewContainer;
use preview_host::{deliver_file_download, file_download_path, FileApi, TokenStore};
use preview_host_web::{HljsHighlighter, HttpFileApi, PdfJsPageCount, WebTokenStore};
use preview_render::{FileDescriptor, PreviewDispatcher, PreviewServices};

/// Wires the browser adapters into the service bundle the dispatcher needs.
pub fn build_preview_services() -> PreviewServices {
    let tokens: Rc<dyn TokenStore> = Rc::new(WebTokenStore);
    PreviewServices {
        api: Rc::new(HttpFileApi::new(tokens)),
        page_counts: Rc::new(PdfJsPageCount),
        highlighter: Rc::new(HljsHighlighter::default()),
        show_line_numbers: true,
    }
}

/// Routes store listener panics into the component log instead of stderr.
pub fn install_store_logging(store: &ExplorerStateStore) {
    store.set_listener_error_hook(|message| logging::warn!("{message}"));
}

/// Bridges the navigation store into a reactive signal.
///
/// The subscription lives as long as the calling scope and is released on
/// cleanup.
pub fn use_explorer_state(store: Rc<ExplorerStateStore>) -> ReadSignal<ExplorerState> {
    let (state, set_state) = create_signal(store.state());
    let subscription = store.subscribe(move |snapshot| set_state.set(snapshot.clone()));
    on_cleanup(move || subscription.unsubscribe());
    state
}

async fn download_original(api: Rc<dyn FileApi>, file_id: String) {
    match api.fetch_download(&file_download_path(&file_id)).await {
        Ok(download) => {
            let file_name = download.file_name.as_deref().unwrap_or("document");
            if let Err(err) = deliver_file_download(
                &download.blob.bytes,
                download.blob.content_type.as_deref(),
                file_name,
            ) {
                logging::warn!("file download failed: {err}");
            }
        }
        Err(err) => logging::warn!("file download failed: {err}"),
    }
}

#[component]
/// Modal pane that previews one file.
///
/// Owns a [`PreviewDispatcher`] for its lifetime: renders on mount, binds the
/// viewer controls through event delegation (the renderers rewrite their
/// subtree, so handlers must not target specific nodes), and tears the active
/// renderer down on cleanup so no resource handle outlives the pane.
pub fn FilePreviewModal(
    /// File to preview.
    file: FileDescriptor,
    /// Host services; defaults to the browser adapters.
    #[prop(optional)]
    services: Option<PreviewServices>,
    /// Invoked when the user dismisses the pane.
    #[prop(into)]
    on_close: Callback<()>,
) -> impl IntoView {
    let services = services.unwrap_or_else(build_preview_services);
    let api = Rc::clone(&services.api);
    let dispatcher = Rc::new(PreviewDispatcher::new(services));
    let error = create_rw_signal::<Option<String>>(None);
    let loading = create_rw_signal(true);
    let container_ref = create_node_ref::<html::Div>();

    #[cfg(target_arch = "wasm32")]
    {
        let dispatcher = Rc::clone(&dispatcher);
        let file = file.clone();
        create_effect(move |_| {
            let Some(node) = container_ref.get() else {
                return;
            };
            let container =
                PreviewContainer::from_element(web_sys::Element::from((*node).clone()));
            let dispatcher = Rc::clone(&dispatcher);
            let file = file.clone();
            spawn_local(async move {
                loading.set(true);
                match dispatcher.render(&file, Some(container)).await {
                    Ok(()) => error.set(None),
                    Err(err) => {
                        logging::warn!("preview render failed: {err}");
                        error.set(Some(err.to_string()));
                    }
                }
                loading.set(false);
            });
        });
    }

    let controls_dispatcher = Rc::clone(&dispatcher);
    let on_controls_click = move |ev: ev::MouseEvent| {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;

            let Some(target) = ev
                .target()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            else {
                return;
            };
            let Some(active) = controls_dispatcher.active() else {
                return;
            };

            if target.closest(".pdf-prev-btn").ok().flatten().is_some() {
                if let Some(pdf) = active.as_pdf() {
                    pdf.previous_page();
                }
            } else if target.closest(".pdf-next-btn").ok().flatten().is_some() {
                if let Some(pdf) = active.as_pdf() {
                    pdf.next_page();
                }
            } else if target.closest(".office-download-btn").ok().flatten().is_some() {
                let active = Rc::clone(&active);
                spawn_local(async move {
                    if let Some(office) = active.as_office() {
                        if let Err(err) = office.download_file().await {
                            logging::warn!("file download failed: {err}");
                        }
                    }
                });
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (&ev, &controls_dispatcher);
        }
    };

    let page_dispatcher = Rc::clone(&dispatcher);
    let on_page_change = move |ev: ev::Event| {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;

            let Some(input) = ev
                .target()
                .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
            else {
                return;
            };
            if !input.class_name().contains("pdf-page-input") {
                return;
            }
            let Some(active) = page_dispatcher.active() else {
                return;
            };
            if let Some(pdf) = active.as_pdf() {
                let requested = input.value().trim().parse::<i64>().unwrap_or(1);
                pdf.go_to_page(requested);
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (&ev, &page_dispatcher);
        }
    };

    let cleanup_dispatcher = Rc::clone(&dispatcher);
    on_cleanup(move || cleanup_dispatcher.destroy());

    let error_api = Rc::clone(&api);
    let error_file_id = file.id.clone();
    let display_name = file.display_name.clone();

    view! {
        <div
            class="file-preview-modal flex flex-col h-full bg-white dark:bg-gray-900"
            on:click=on_controls_click
            on:change=on_page_change
        >
            <div class="flex items-center justify-between px-4 py-2 border-b border-gray-200 dark:border-gray-700">
                <h2 class="text-base font-semibold text-gray-900 dark:text-gray-100 truncate">
                    {display_name}
                </h2>
                <button
                    class="px-3 py-1 text-sm text-gray-600 dark:text-gray-300 hover:text-gray-900"
                    aria-label="Close preview"
                    on:click=move |_| on_close.call(())
                >
                    "Close"
                </button>
            </div>

            {move || {
                error
                    .get()
                    .map(|message| {
                        let api = Rc::clone(&error_api);
                        let file_id = error_file_id.clone();
                        view! {
                            <div class="preview-error text-center p-8">
                                <p class="text-gray-700 dark:text-gray-300 mb-4">{message}</p>
                                <button
                                    class="px-6 py-2.5 bg-blue-600 hover:bg-blue-700 text-white rounded-lg"
                                    aria-label="Download file"
                                    on:click=move |_| {
                                        spawn_local(download_original(
                                            Rc::clone(&api),
                                            file_id.clone(),
                                        ));
                                    }
                                >
                                    "Download File"
                                </button>
                            </div>
                        }
                    })
            }}

            {move || {
                (loading.get() && error.get().is_none())
                    .then(|| {
                        view! {
                            <div class="preview-loading text-center p-4 text-sm text-gray-500">
                                "Loading preview..."
                            </div>
                        }
                    })
            }}

            <div class="flex-1 min-h-0 overflow-hidden" node_ref=container_ref></div>
        </div>
    }
}

#[component]
/// Breadcrumb trail over the shared navigation store.
pub fn ExplorerBreadcrumbs(
    /// Shared navigation store.
    store: Rc<ExplorerStateStore>,
    /// Invoked with the target path when a crumb is clicked.
    #[prop(into)]
    on_navigate: Callback<String>,
) -> impl IntoView {
    let state = use_explorer_state(store);

    view! {
        <nav class="explorer-breadcrumbs flex items-center gap-1 text-sm" aria-label="Breadcrumb">
            <For
                each=move || state.get().breadcrumbs
                key=|crumb| crumb.path.clone()
                children=move |crumb| {
                    let path = crumb.path.clone();
                    view! {
                        <span class="flex items-center gap-1">
                            <button
                                class="text-blue-600 dark:text-blue-400 hover:underline"
                                on:click=move |_| on_navigate.call(path.clone())
                            >
                                {crumb.name.clone()}
                            </button>
                            <span class="text-gray-400">"/"</span>
                        </span>
                    }
                }
            />
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_services_enable_line_numbers() {
        let services = build_preview_services();
        assert!(services.show_line_numbers);
    }
}
