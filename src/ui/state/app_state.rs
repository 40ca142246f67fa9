use std::collections::BTreeSet;
use std::sync::Arc;

use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::dataset::Dataset;
use crate::domain::entities::filter::{FilterCriteria, FilterDimension};
use crate::ui::tables::ReportTab;

/// Session state owned by the root component. The loaded dataset is only
/// ever replaced as a whole; the criteria value is swapped, never mutated.
pub struct AppState {
    pub raw: Signal<Option<Arc<Dataset>>>,
    pub source_label: Signal<String>,
    pub criteria: Signal<FilterCriteria>,
    pub search_text: Signal<String>,
    pub active_tab: Signal<ReportTab>,
    pub expanded: Signal<BTreeSet<String>>,
    pub open_dropdown: Signal<Option<FilterDimension>>,
    pub dropdown_pos: Signal<Option<(f64, f64)>>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            raw: use_signal(|| None::<Arc<Dataset>>),
            source_label: use_signal(String::new),
            criteria: use_signal(FilterCriteria::default),
            search_text: use_signal(String::new),
            active_tab: use_signal(|| ReportTab::Demand),
            expanded: use_signal(BTreeSet::<String>::new),
            open_dropdown: use_signal(|| None::<FilterDimension>),
            dropdown_pos: use_signal(|| None::<(f64, f64)>),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}
