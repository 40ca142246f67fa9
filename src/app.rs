use std::collections::BTreeSet;
use std::sync::Arc;

use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use tracing::error;

use crate::config::{ReportConfig, SheetConfig};
use crate::domain::entities::dataset::Dataset;
use crate::domain::entities::filter::FilterDimension;
use crate::infra::export::html::export_dashboard;
use crate::infra::import::xlsx::WorkbookSource;
use crate::infra::remote::google_sheets::GoogleSheetsSource;
use crate::ui::state::app_state::AppState;
use crate::ui::tables::{report_table, summary_tables, Column, ReportTab, ReportTable};
use crate::usecase::ports::source::SheetSource;
use crate::usecase::services::load_service::LoadService;
use crate::usecase::services::report_service::ReportService;

const CELL_STYLE: &str = "border: 1px solid #bbb; padding: 4px;";

pub fn table_container_style() -> &'static str {
    "overflow: auto; max-height: 70vh; min-height: 0; border: 1px solid #ddd; border-radius: 6px;"
}

pub fn table_header_cell_style() -> &'static str {
    "position: sticky; top: 0; z-index: 10; background: #f4f4f4; border: 1px solid #bbb; padding: 4px; text-align: left;"
}

pub fn tab_button_style(active: bool) -> &'static str {
    if active {
        "border: 1px solid #36c; background: #eef4ff; padding: 4px 12px; border-radius: 6px; cursor: pointer; font-weight: bold;"
    } else {
        "border: 1px solid #bbb; background: #fff; padding: 4px 12px; border-radius: 6px; cursor: pointer;"
    }
}

pub fn dropdown_label(selected: &BTreeSet<String>) -> String {
    match selected.len() {
        0 => "(All)".to_string(),
        1 => selected.iter().next().cloned().unwrap_or_default(),
        count => format!("{count} selected"),
    }
}

fn align_at(columns: &[Column], idx: usize) -> &'static str {
    columns
        .get(idx)
        .map(|column| column.align.css())
        .unwrap_or("left")
}

fn remote_source() -> Arc<dyn SheetSource> {
    Arc::new(GoogleSheetsSource::new(SheetConfig::default().sheet_id))
}

fn alert_load_failure(message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Failed to load data")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Signals a load writes into.
#[derive(Clone, Copy)]
struct LoadTargets {
    raw: Signal<Option<Arc<Dataset>>>,
    source_label: Signal<String>,
    expanded: Signal<BTreeSet<String>>,
    busy: Signal<bool>,
    status: Signal<String>,
}

/// Fetch every sheet from `source` in the background. A failed load keeps
/// whatever dataset was already on screen.
fn start_load(source: Arc<dyn SheetSource>, targets: LoadTargets) {
    let LoadTargets {
        mut raw,
        mut source_label,
        mut expanded,
        mut busy,
        mut status,
    } = targets;
    let service = LoadService::new(source, SheetConfig::default());
    let label = service.source_description();
    busy.set(true);
    status.set(format!("Loading {label}..."));

    spawn(async move {
        match service.load_all().await {
            Ok(dataset) => {
                let sale_rows = dataset.sale.len();
                let stock_rows = dataset.stock.len();
                raw.set(Some(Arc::new(dataset)));
                expanded.write().clear();
                status.set(format!(
                    "Loaded {sale_rows} sale rows and {stock_rows} stock rows from {label}"
                ));
                source_label.set(label);
            }
            Err(err) => {
                error!(error = %err, source = %label, "load failed");
                status.set(format!("Load failed: {err}"));
                alert_load_failure(&err.to_string());
            }
        }
        busy.set(false);
    });
}

#[component]
fn MultiSelectDropdown(
    id: FilterDimension,
    options: Vec<String>,
    selected: BTreeSet<String>,
    mut open_dropdown: Signal<Option<FilterDimension>>,
    mut dropdown_pos: Signal<Option<(f64, f64)>>,
    on_toggle: EventHandler<String>,
    on_clear: EventHandler<()>,
) -> Element {
    let is_open = open_dropdown() == Some(id);
    let label = id.label();
    let selected_label = dropdown_label(&selected);
    let (left, top) = dropdown_pos().unwrap_or((0.0, 0.0));

    rsx! {
        div {
            style: "position: relative; display: inline-flex; align-items: center; gap: 6px;",
            span { "{label}" }
            button {
                style: "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;",
                onclick: move |event| {
                    event.stop_propagation();
                    if open_dropdown() == Some(id) {
                        open_dropdown.set(None);
                        return;
                    }
                    let point = event.client_coordinates();
                    dropdown_pos.set(Some((point.x, point.y + 24.0)));
                    open_dropdown.set(Some(id));
                },
                "{selected_label}"
            }
        }

        if is_open {
            div {
                style: "position: fixed; left: {left}px; top: {top}px; min-width: 200px; max-height: 320px; overflow-y: auto; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200; padding: 6px;",
                onclick: move |event| event.stop_propagation(),
                div {
                    style: "padding: 6px 4px; cursor: pointer; color: #36c;",
                    onclick: move |_| on_clear.call(()),
                    "Clear"
                }
                {options.iter().map(|option| {
                    let value = option.clone();
                    let checked = selected.contains(option);
                    rsx!(
                        label {
                            style: "display: flex; align-items: center; gap: 8px; padding: 6px 4px; cursor: pointer;",
                            input {
                                r#type: "checkbox",
                                checked: checked,
                                onclick: move |_| on_toggle.call(value.clone()),
                            }
                            span { "{option}" }
                        }
                    )
                })}
            }
        }
    }
}

#[component]
fn ReportTableView(
    table: ReportTable,
    expanded: BTreeSet<String>,
    on_toggle: EventHandler<String>,
) -> Element {
    let expandable = table.expandable();
    let column_count = table.columns.len() + usize::from(expandable);

    rsx! {
        h3 { "{table.title}" }
        div {
            style: "{table_container_style()}",
            table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                thead {
                    tr {
                        if expandable {
                            th { style: "{table_header_cell_style()}", "" }
                        }
                        for column in table.columns.iter() {
                            th { style: "{table_header_cell_style()}", "{column.label}" }
                        }
                    }
                }
                tbody {
                    if table.groups.is_empty() {
                        tr {
                            td { colspan: "{column_count}", style: "{CELL_STYLE} color: #888;", "No rows" }
                        }
                    }
                    {table.groups.iter().map(|group| {
                        let key = group.key.clone();
                        let is_open = expanded.contains(&group.key);
                        let has_detail = !group.detail.is_empty();
                        let marker = if is_open { "▾" } else { "▸" };
                        rsx!(
                            tr {
                                if expandable {
                                    td {
                                        style: "{CELL_STYLE} cursor: pointer; text-align: center;",
                                        onclick: move |_| on_toggle.call(key.clone()),
                                        if has_detail { "{marker}" }
                                    }
                                }
                                for (idx, cell) in group.cells.iter().enumerate() {
                                    td {
                                        style: "{CELL_STYLE} text-align: {align_at(&table.columns, idx)};",
                                        "{cell}"
                                    }
                                }
                            }
                            if is_open && has_detail {
                                tr {
                                    td { colspan: "{column_count}", style: "{CELL_STYLE} background: #fafafa;",
                                        table { style: "border-collapse: collapse; width: 100%;",
                                            thead {
                                                tr {
                                                    for column in table.detail_columns.iter() {
                                                        th { style: "{CELL_STYLE} background: #f4f4f4;", "{column.label}" }
                                                    }
                                                }
                                            }
                                            tbody {
                                                for line in group.detail.iter() {
                                                    tr {
                                                        for (idx, cell) in line.iter().enumerate() {
                                                            td {
                                                                style: "{CELL_STYLE} text-align: {align_at(&table.detail_columns, idx)};",
                                                                "{cell}"
                                                            }
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        )
                    })}
                }
                if let Some(footer) = table.footer.as_ref() {
                    tfoot {
                        tr {
                            if expandable {
                                td { style: "{CELL_STYLE}", "" }
                            }
                            for (idx, cell) in footer.iter().enumerate() {
                                td {
                                    style: "{CELL_STYLE} font-weight: bold; text-align: {align_at(&table.columns, idx)};",
                                    "{cell}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let AppState {
        raw,
        source_label,
        mut criteria,
        mut search_text,
        mut active_tab,
        mut expanded,
        mut open_dropdown,
        dropdown_pos,
        busy,
        mut status,
    } = AppState::new();

    let targets = LoadTargets {
        raw,
        source_label,
        expanded,
        busy,
        status,
    };
    let report_service = use_hook(|| Arc::new(ReportService::new(ReportConfig::default())));
    let dashboard = use_memo(move || {
        raw()
            .map(|data| report_service.build_dashboard(&data, &criteria()))
    });

    use_effect(move || {
        start_load(remote_source(), targets);
    });

    let current = dashboard();
    let criteria_snapshot = criteria();
    let expanded_snapshot = expanded();
    let tab = active_tab();
    let options = current
        .as_ref()
        .map(|dashboard| dashboard.options.clone())
        .unwrap_or_default();
    let summaries = current.as_ref().map(summary_tables).unwrap_or_default();
    let report = current.as_ref().map(|dashboard| report_table(dashboard, tab));
    let window_days = current
        .as_ref()
        .map(|dashboard| dashboard.total_sale_days)
        .unwrap_or(0);

    rsx! {
        div {
            onclick: move |_| open_dropdown.set(None),
            style: "font-family: sans-serif; padding: 12px; background: #fff; min-height: 100vh;",

            h2 { "Demand Planner" }

            div {
                style: "display: flex; gap: 8px; align-items: center; margin-bottom: 12px; position: sticky; top: 0; background: #fff; z-index: 900; padding: 8px 0;",
                button {
                    disabled: busy(),
                    onclick: move |_| start_load(remote_source(), targets),
                    "Reload"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        if let Some(path) = FileDialog::new()
                            .add_filter("Excel", &["xlsx"])
                            .add_filter("All files", &["*"])
                            .pick_file()
                        {
                            start_load(Arc::new(WorkbookSource::new(path)), targets);
                        }
                    },
                    "Open workbook"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let Some(current) = dashboard() else {
                            status.set("Nothing to export yet".to_string());
                            return;
                        };
                        let Some(path) = FileDialog::new()
                            .add_filter("HTML", &["html"])
                            .set_file_name("demand-planner.html")
                            .save_file()
                        else {
                            return;
                        };
                        match export_dashboard(&path, &current) {
                            Ok(()) => status.set(format!("Exported to {}", path.display())),
                            Err(err) => status.set(format!("Export failed: {err:#}")),
                        }
                    },
                    "Export HTML"
                }
                span { " {status}" }
                if !source_label().is_empty() {
                    span { style: "color: #888;", " ({source_label}, {window_days} sale days)" }
                }
            }

            div {
                style: "display: flex; flex-wrap: wrap; gap: 12px; align-items: center; margin-bottom: 12px;",
                for dimension in FilterDimension::ALL {
                    MultiSelectDropdown {
                        key: "{dimension.label()}",
                        id: dimension,
                        options: options.values(dimension).to_vec(),
                        selected: criteria_snapshot.selected(dimension).clone(),
                        open_dropdown: open_dropdown,
                        dropdown_pos: dropdown_pos,
                        on_toggle: move |value: String| {
                            let next = criteria().toggled(dimension, &value);
                            criteria.set(next);
                        },
                        on_clear: move |_| {
                            let next = criteria().with_selection(dimension, BTreeSet::new());
                            criteria.set(next);
                        },
                    }
                }
                span { "Style ID" }
                input {
                    value: search_text(),
                    placeholder: "Exact style ID",
                    oninput: move |event| {
                        let term = event.value();
                        let next = criteria().with_style_search(&term);
                        search_text.set(term);
                        criteria.set(next);
                    },
                }
                button {
                    onclick: move |_| {
                        search_text.set(String::new());
                        let next = criteria().with_style_search("");
                        criteria.set(next);
                    },
                    "Clear"
                }
            }

            if current.is_none() {
                p { style: "color: #888;", "No data loaded." }
            }

            div {
                style: "display: flex; flex-wrap: wrap; gap: 16px;",
                for summary in summaries {
                    div { style: "flex: 1 1 420px; min-width: 0;",
                        ReportTableView {
                            table: summary,
                            expanded: BTreeSet::new(),
                            on_toggle: move |_: String| {},
                        }
                    }
                }
            }

            div {
                style: "display: flex; gap: 8px; margin: 16px 0 8px;",
                for candidate in ReportTab::ALL {
                    button {
                        style: "{tab_button_style(candidate == tab)}",
                        onclick: move |_| {
                            active_tab.set(candidate);
                            expanded.write().clear();
                        },
                        "{candidate.label()}"
                    }
                }
            }

            if let Some(report) = report {
                ReportTableView {
                    table: report,
                    expanded: expanded_snapshot,
                    on_toggle: move |key: String| {
                        let mut open = expanded.write();
                        if !open.remove(&key) {
                            open.insert(key);
                        }
                    },
                }
            }
        }
    }
}
