// irbis-dashboard/src/main.rs

//! Static terminal dashboard over the Northwind demo dataset: the same
//! figures the chat assistants answer questions about, aggregated and laid
//! out as stat tiles and tables.

mod data;

use colored::*;

use data::{
    CATEGORY_REVENUE, MONTHLY_REVENUE, REGIONAL_SALES, TOP_PRODUCTS, TOP_TERRITORIES,
    AVERAGE_ORDER_VALUE, TOTAL_CUSTOMERS, TOTAL_ORDERS, TOTAL_PRODUCTS, TOTAL_REVENUE,
};

fn main() {
    print_header("Northwind Sales Dashboard");

    print_stat_tiles();
    print_monthly_revenue();
    print_top_products();
    print_category_distribution();
    print_regional_sales();
    print_top_territories();
}

fn print_header(title: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", "Revenue trends from July 1996 to May 1998".dimmed());
}

fn print_section(title: &str) {
    println!("\n{}", title.bold());
}

fn print_stat_tiles() {
    let tiles = [
        ("Total Revenue", format!("${}", format_money(TOTAL_REVENUE))),
        ("Total Orders", TOTAL_ORDERS.to_string()),
        ("Customers", TOTAL_CUSTOMERS.to_string()),
        ("Avg Order Value", format!("${}", format_money(AVERAGE_ORDER_VALUE))),
        ("Total Products", TOTAL_PRODUCTS.to_string()),
        ("YoY Growth", format!("{:.1}%", revenue_growth_yoy())),
    ];
    println!();
    for (label, value) in tiles {
        println!("  {:<18} {}", label.dimmed(), value.bold());
    }
}

fn print_monthly_revenue() {
    print_section("Monthly Revenue");
    for entry in MONTHLY_REVENUE {
        println!(
            "  {:<8} {:>12}  {}",
            entry.month,
            format_money(entry.revenue),
            bar(entry.revenue, max_monthly_revenue())
        );
    }
    println!(
        "  {:<8} {:>12}",
        "total".dimmed(),
        format_money(total_monthly_revenue())
    );
}

fn print_top_products() {
    print_section("Top Products by Revenue");
    for product in TOP_PRODUCTS {
        println!(
            "  {:<26} {:>12}  {:>5} units",
            product.name,
            format_money(product.sales),
            product.units
        );
    }
}

fn print_category_distribution() {
    print_section("Sales by Category");
    for (name, share, revenue) in category_distribution() {
        println!(
            "  {:<16} {:>5.1}%  {:>12}",
            name,
            share,
            format_money(revenue)
        );
    }
}

fn print_regional_sales() {
    print_section("Revenue by Region");
    for region in REGIONAL_SALES {
        println!(
            "  {:<10} {:>12}  {}",
            region.region,
            format_money(region.sales),
            bar(region.sales, REGIONAL_SALES[0].sales)
        );
    }
}

fn print_top_territories() {
    print_section("Top Territories by Revenue");
    for territory in TOP_TERRITORIES {
        println!(
            "  {:<12} {:>12}",
            territory.territory,
            format_money(territory.sales)
        );
    }
}

// --- Aggregation ---

fn total_monthly_revenue() -> f64 {
    MONTHLY_REVENUE.iter().map(|m| m.revenue).sum()
}

fn max_monthly_revenue() -> f64 {
    MONTHLY_REVENUE.iter().map(|m| m.revenue).fold(0.0, f64::max)
}

/// Category shares of total category revenue, in percent.
fn category_distribution() -> Vec<(&'static str, f64, f64)> {
    let total: f64 = CATEGORY_REVENUE.iter().map(|c| c.revenue).sum();
    CATEGORY_REVENUE
        .iter()
        .map(|c| (c.name, c.revenue / total * 100.0, c.revenue))
        .collect()
}

/// Year-over-year growth between the two Januaries in the dataset.
fn revenue_growth_yoy() -> f64 {
    let jan_97 = monthly_revenue_for("Jan 97");
    let jan_98 = monthly_revenue_for("Jan 98");
    (jan_98 - jan_97) / jan_97 * 100.0
}

fn monthly_revenue_for(month: &str) -> f64 {
    MONTHLY_REVENUE
        .iter()
        .find(|m| m.month == month)
        .map(|m| m.revenue)
        .unwrap_or(0.0)
}

// --- Formatting ---

const BAR_WIDTH: usize = 30;

fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    "█".repeat(filled.min(BAR_WIDTH))
}

/// Two-decimal money with thousands separators.
fn format_money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_total_matches_database_total() {
        // The monthly series and the database-level figure agree to the cent.
        assert!((total_monthly_revenue() - TOTAL_REVENUE).abs() < 0.01);
    }

    #[test]
    fn category_distribution_sums_to_one_hundred_percent() {
        let total: f64 = category_distribution().iter().map(|(_, pct, _)| pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn yoy_growth_matches_the_january_figures() {
        // (94222.11 - 61258.07) / 61258.07
        let growth = revenue_growth_yoy();
        assert!((growth - 53.8).abs() < 0.05, "growth was {growth}");
    }

    #[test]
    fn average_order_value_matches_orders_and_revenue() {
        let derived = TOTAL_REVENUE / TOTAL_ORDERS as f64;
        assert!((derived - AVERAGE_ORDER_VALUE).abs() < 0.01);
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(1_265_793.04), "1,265,793.04");
        assert_eq!(format_money(830.0), "830.00");
        assert_eq!(format_money(0.5), "0.50");
    }

    #[test]
    fn bar_scales_with_the_maximum() {
        assert_eq!(bar(100.0, 100.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(0.0, 100.0), "");
        assert!(bar(50.0, 100.0).chars().count() <= BAR_WIDTH);
    }
}
