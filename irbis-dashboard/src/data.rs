// irbis-dashboard/src/data.rs

//! Fixed figures from the Northwind demo datafile (July 1996 - May 1998).
//! A snapshot compiled into the binary; nothing here is fetched at runtime.

pub struct MonthlyRevenue {
    pub month: &'static str,
    pub revenue: f64,
}

pub struct ProductSales {
    pub name: &'static str,
    pub sales: f64,
    pub units: u32,
}

pub struct CategoryRevenue {
    pub name: &'static str,
    pub revenue: f64,
}

pub struct RegionSales {
    pub region: &'static str,
    pub sales: f64,
}

pub struct TerritorySales {
    pub territory: &'static str,
    pub sales: f64,
}

pub const MONTHLY_REVENUE: &[MonthlyRevenue] = &[
    MonthlyRevenue { month: "Jul 96", revenue: 27861.90 },
    MonthlyRevenue { month: "Aug 96", revenue: 25485.28 },
    MonthlyRevenue { month: "Sep 96", revenue: 26381.40 },
    MonthlyRevenue { month: "Oct 96", revenue: 37515.72 },
    MonthlyRevenue { month: "Nov 96", revenue: 45600.05 },
    MonthlyRevenue { month: "Dec 96", revenue: 45239.63 },
    MonthlyRevenue { month: "Jan 97", revenue: 61258.07 },
    MonthlyRevenue { month: "Feb 97", revenue: 38483.63 },
    MonthlyRevenue { month: "Mar 97", revenue: 38547.22 },
    MonthlyRevenue { month: "Apr 97", revenue: 53032.95 },
    MonthlyRevenue { month: "May 97", revenue: 53781.29 },
    MonthlyRevenue { month: "Jun 97", revenue: 36362.80 },
    MonthlyRevenue { month: "Jul 97", revenue: 51020.86 },
    MonthlyRevenue { month: "Aug 97", revenue: 47287.67 },
    MonthlyRevenue { month: "Sep 97", revenue: 55629.24 },
    MonthlyRevenue { month: "Oct 97", revenue: 66749.23 },
    MonthlyRevenue { month: "Nov 97", revenue: 43533.81 },
    MonthlyRevenue { month: "Dec 97", revenue: 71398.43 },
    MonthlyRevenue { month: "Jan 98", revenue: 94222.11 },
    MonthlyRevenue { month: "Feb 98", revenue: 99415.29 },
    MonthlyRevenue { month: "Mar 98", revenue: 104854.15 },
    MonthlyRevenue { month: "Apr 98", revenue: 123798.68 },
    MonthlyRevenue { month: "May 98", revenue: 18333.63 },
];

pub const TOP_PRODUCTS: &[ProductSales] = &[
    ProductSales { name: "Côte de Blaye", sales: 141396.74, units: 623 },
    ProductSales { name: "Thüringer Rostbratwurst", sales: 80368.67, units: 746 },
    ProductSales { name: "Raclette Courdavault", sales: 71155.70, units: 1496 },
    ProductSales { name: "Tarte au sucre", sales: 47234.97, units: 1083 },
    ProductSales { name: "Camembert Pierrot", sales: 46825.48, units: 1577 },
    ProductSales { name: "Gnocchi di nonna Alice", sales: 42593.06, units: 1263 },
    ProductSales { name: "Manjimup Dried Apples", sales: 41819.65, units: 886 },
    ProductSales { name: "Alice Mutton", sales: 32698.38, units: 978 },
    ProductSales { name: "Carnarvon Tigers", sales: 29171.87, units: 539 },
    ProductSales { name: "Rössle Sauerkraut", sales: 25696.64, units: 640 },
];

pub const CATEGORY_REVENUE: &[CategoryRevenue] = &[
    CategoryRevenue { name: "Beverages", revenue: 267868.18 },
    CategoryRevenue { name: "Dairy Products", revenue: 234507.28 },
    CategoryRevenue { name: "Confections", revenue: 167357.23 },
    CategoryRevenue { name: "Meat/Poultry", revenue: 163022.36 },
    CategoryRevenue { name: "Seafood", revenue: 131261.74 },
    CategoryRevenue { name: "Condiments", revenue: 106047.08 },
    CategoryRevenue { name: "Produce", revenue: 99984.58 },
    CategoryRevenue { name: "Grains/Cereals", revenue: 95744.59 },
];

pub const REGIONAL_SALES: &[RegionSales] = &[
    RegionSales { region: "Eastern", sales: 722066.00 },
    RegionSales { region: "Western", sales: 538416.00 },
    RegionSales { region: "Northern", sales: 349535.19 },
    RegionSales { region: "Southern", sales: 270417.12 },
];

pub const TOP_TERRITORIES: &[TerritorySales] = &[
    TerritorySales { territory: "Rockville", sales: 232890.85 },
    TerritorySales { territory: "Greensboro", sales: 232890.85 },
    TerritorySales { territory: "Cary", sales: 232890.85 },
    TerritorySales { territory: "Atlanta", sales: 202812.84 },
    TerritorySales { territory: "Savannah", sales: 202812.84 },
    TerritorySales { territory: "Orlando", sales: 202812.84 },
    TerritorySales { territory: "Tampa", sales: 202812.84 },
    TerritorySales { territory: "Wilton", sales: 192107.60 },
    TerritorySales { territory: "Neward", sales: 192107.60 },
    TerritorySales { territory: "Westboro", sales: 166537.76 },
];

// Database-level totals.
pub const TOTAL_REVENUE: f64 = 1_265_793.04;
pub const TOTAL_ORDERS: u32 = 830;
pub const TOTAL_CUSTOMERS: u32 = 91;
pub const AVERAGE_ORDER_VALUE: f64 = 1525.05;
pub const TOTAL_PRODUCTS: u32 = 77;
