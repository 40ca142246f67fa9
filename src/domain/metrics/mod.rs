pub mod broken_size;
pub mod demand;
pub mod grouping;
pub mod hero_styles;
pub mod kpi;
pub mod overstock;
pub mod size_curve;
pub mod style_totals;
pub mod summary;
