use serde::{Deserialize, Serialize};

use super::TransactionKind;

/// A category a transaction is filed under. Categories are reference data:
/// they come from one of the two fixed catalogs and are never created at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique only within its catalog
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

// (id, name, icon, color)
type CatalogRow = (&'static str, &'static str, &'static str, &'static str);

const EXPENSE_CATALOG: &[CatalogRow] = &[
    ("1", "Food & Dining", "restaurant", "#ef4444"),
    ("2", "Transportation", "car", "#f97316"),
    ("3", "Shopping", "bag", "#ec4899"),
    ("4", "Entertainment", "game-controller", "#8b5cf6"),
    ("5", "Bills & Utilities", "receipt", "#06b6d4"),
    ("6", "Healthcare", "medical", "#10b981"),
    ("7", "Education", "school", "#3b82f6"),
    ("8", "Travel", "airplane", "#f59e0b"),
    ("9", "Groceries", "basket", "#84cc16"),
    ("10", "Gas & Fuel", "car-sport", "#ef4444"),
    ("11", "Home & Garden", "home", "#22c55e"),
    ("12", "Personal Care", "cut", "#ec4899"),
    ("13", "Insurance", "shield-checkmark", "#3b82f6"),
    ("14", "Taxes", "document-text", "#6b7280"),
    ("15", "Phone & Internet", "phone-portrait", "#06b6d4"),
    ("16", "Subscriptions", "card", "#8b5cf6"),
    ("17", "Gifts & Donations", "gift", "#f43f5e"),
    ("18", "Clothing", "shirt", "#ec4899"),
    ("19", "Electronics", "phone-portrait", "#6366f1"),
    ("20", "Books & Media", "library", "#8b5cf6"),
    ("21", "Sports & Fitness", "fitness", "#f97316"),
    ("22", "Pet Care", "paw", "#84cc16"),
    ("23", "Baby & Kids", "happy", "#f472b6"),
    ("24", "Rent & Mortgage", "business", "#0891b2"),
    ("25", "Repairs & Maintenance", "construct", "#f97316"),
    ("26", "Bank Fees", "card", "#6b7280"),
    ("27", "Office Supplies", "briefcase", "#3b82f6"),
    ("28", "Parking & Tolls", "car", "#f59e0b"),
    ("29", "Coffee & Tea", "cafe", "#92400e"),
    ("30", "Alcohol & Bars", "wine", "#dc2626"),
    ("31", "Fast Food", "fast-food", "#ea580c"),
    ("32", "Pharmacy", "medical", "#059669"),
    ("33", "Laundry", "shirt", "#0284c7"),
    ("34", "Hair & Beauty", "cut", "#e11d48"),
    ("35", "Dental Care", "medical", "#0d9488"),
    ("36", "Eye Care", "eye", "#7c3aed"),
    ("37", "Massage & Spa", "flower", "#db2777"),
    ("38", "Hobbies", "color-palette", "#7c2d12"),
    ("39", "Uncategorized", "help-circle", "#6b7280"),
    ("40", "Others", "ellipsis-horizontal", "#6b7280"),
];

const INCOME_CATALOG: &[CatalogRow] = &[
    ("1", "Salary", "card", "#10b981"),
    ("2", "Freelance", "laptop", "#3b82f6"),
    ("3", "Business", "briefcase", "#f59e0b"),
    ("4", "Investment", "trending-up", "#8b5cf6"),
    ("5", "Rental Income", "home", "#06b6d4"),
    ("6", "Dividends", "stats-chart", "#10b981"),
    ("7", "Interest", "calculator", "#3b82f6"),
    ("8", "Bonus", "star", "#f59e0b"),
    ("9", "Gift Money", "gift", "#ec4899"),
    ("10", "Refund", "return-up-back", "#22c55e"),
    ("11", "Side Hustle", "cash", "#f97316"),
    ("12", "Uncategorized", "help-circle", "#6b7280"),
    ("13", "Others", "ellipsis-horizontal", "#6b7280"),
];

fn catalog_rows(kind: TransactionKind) -> &'static [CatalogRow] {
    match kind {
        TransactionKind::Income => INCOME_CATALOG,
        TransactionKind::Expense => EXPENSE_CATALOG,
    }
}

fn row_to_category(&(id, name, icon, color): &CatalogRow) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
    }
}

/// All categories a transaction of `kind` may be filed under, in display order.
pub fn categories(kind: TransactionKind) -> Vec<Category> {
    catalog_rows(kind).iter().map(row_to_category).collect()
}

/// Look up a category by id within the catalog for `kind`.
pub fn find_category(kind: TransactionKind, id: &str) -> Option<Category> {
    catalog_rows(kind)
        .iter()
        .find(|(row_id, ..)| *row_id == id.trim())
        .map(row_to_category)
}

/// Look up a category by display name (case-insensitive) within the catalog for `kind`.
pub fn find_category_by_name(kind: TransactionKind, name: &str) -> Option<Category> {
    catalog_rows(kind)
        .iter()
        .find(|(_, row_name, ..)| row_name.eq_ignore_ascii_case(name.trim()))
        .map(row_to_category)
}
