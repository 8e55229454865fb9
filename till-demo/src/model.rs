//! Store data shared across panels.

use std::sync::{Arc, Mutex};

pub type SharedStore = Arc<Mutex<StoreModel>>;

#[derive(Debug, Clone)]
pub struct Product {
    pub sku: &'static str,
    pub name: &'static str,
    pub price_cents: i64,
    pub stock: u32,
}

#[derive(Debug, Clone)]
pub struct SaleLine {
    pub sku: String,
    pub qty: u32,
    pub total_cents: i64,
}

/// Back-office view of one register: catalogue, rung-up sales, settings.
#[derive(Debug, Clone)]
pub struct StoreModel {
    pub products: Vec<Product>,
    pub sales: Vec<SaleLine>,
    pub tax_rate_bp: u32,
}

impl StoreModel {
    pub fn seeded() -> Self {
        Self {
            products: vec![
                Product { sku: "ESP-01", name: "Espresso", price_cents: 250, stock: 120 },
                Product { sku: "CAP-01", name: "Cappuccino", price_cents: 340, stock: 80 },
                Product { sku: "CRO-02", name: "Croissant", price_cents: 290, stock: 35 },
                Product { sku: "SAN-04", name: "Club Sandwich", price_cents: 620, stock: 18 },
                Product { sku: "JUS-03", name: "Orange Juice", price_cents: 380, stock: 42 },
            ],
            sales: Vec::new(),
            tax_rate_bp: 700,
        }
    }

    /// Ring up `qty` of the product at `index`. Fails when the index is out
    /// of range or stock would go negative.
    pub fn record_sale(&mut self, index: usize, qty: u32) -> Option<SaleLine> {
        let product = self.products.get_mut(index)?;
        if qty == 0 || product.stock < qty {
            return None;
        }
        product.stock -= qty;
        let line = SaleLine {
            sku: product.sku.to_string(),
            qty,
            total_cents: product.price_cents * i64::from(qty),
        };
        self.sales.push(line.clone());
        Some(line)
    }

    pub fn revenue_cents(&self) -> i64 {
        self.sales.iter().map(|line| line.total_cents).sum()
    }

    /// Products at or below the reorder threshold.
    pub fn low_stock(&self, threshold: u32) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.stock <= threshold)
            .collect()
    }
}

pub fn shared_store() -> SharedStore {
    Arc::new(Mutex::new(StoreModel::seeded()))
}

/// Format cents as a currency string.
pub fn money(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, (cents % 100).abs())
}
