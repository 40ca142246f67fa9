use std::fmt;

/// Daily run rate. Zero when the window has no sale days.
pub fn drr(units_sold: i64, sale_days: i64) -> f64 {
    if sale_days <= 0 {
        0.0
    } else {
        units_sold as f64 / sale_days as f64
    }
}

/// Days of stock cover at the current run rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StockCover {
    Days(f64),
    /// Stock on hand but nothing selling.
    Infinite,
    Zero,
}

impl StockCover {
    pub fn compute(stock: i64, drr: f64) -> Self {
        if drr > 0.0 {
            StockCover::Days(stock as f64 / drr)
        } else if stock > 0 {
            StockCover::Infinite
        } else {
            StockCover::Zero
        }
    }
}

impl fmt::Display for StockCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockCover::Days(days) => write!(f, "{days:.1}"),
            StockCover::Infinite => write!(f, "∞"),
            StockCover::Zero => write!(f, "0.0"),
        }
    }
}

pub fn format_drr(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_pct(value: f64) -> String {
    format!("{value:.1}%")
}

/// Units to buy so stock reaches `drr * horizon`. Never negative.
pub fn demand_units(drr: f64, stock: i64, horizon_days: f64) -> i64 {
    ((drr * horizon_days - stock as f64).round() as i64).max(0)
}

/// Stock above `drr * horizon`. Negative when under target.
pub fn excess_units(drr: f64, stock: i64, horizon_days: f64) -> i64 {
    (stock as f64 - drr * horizon_days).round() as i64
}

/// Allocate `total` by `part / whole`, rounded. Zero when `whole` is zero.
pub fn allocate(total: i64, part: i64, whole: i64) -> i64 {
    if whole == 0 {
        0
    } else {
        (total as f64 * part as f64 / whole as f64).round() as i64
    }
}

pub fn share_pct(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drr_divides_units_by_sale_days() {
        assert_eq!(format_drr(drr(450, 30)), "15.00");
        assert_eq!(drr(450, 0), 0.0);
    }

    #[test]
    fn stock_cover_uses_sentinel_when_nothing_sells() {
        assert_eq!(StockCover::compute(300, 15.0), StockCover::Days(20.0));
        assert_eq!(StockCover::compute(5, 0.0), StockCover::Infinite);
        assert_eq!(StockCover::compute(0, 0.0), StockCover::Zero);
        assert_eq!(StockCover::Infinite.to_string(), "∞");
        assert_eq!(StockCover::Days(12.345).to_string(), "12.3");
        assert_eq!(StockCover::Zero.to_string(), StockCover::Days(0.0).to_string());
    }

    #[test]
    fn demand_is_clamped_at_zero() {
        assert_eq!(demand_units(drr(900, 30), 600, 45.0), 750);
        assert_eq!(demand_units(drr(900, 30), 5000, 45.0), 0);
    }

    #[test]
    fn allocate_rounds_share_and_guards_zero_whole() {
        assert_eq!(allocate(750, 1, 3), 250);
        assert_eq!(allocate(100, 2, 3), 67);
        assert_eq!(allocate(100, 5, 0), 0);
    }
}
