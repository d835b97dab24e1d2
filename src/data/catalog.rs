//! Fixed product and supplier master data.

use rust_decimal::Decimal;

use crate::models::{Product, Supplier};

/// (name, category, unit price, stock)
const PRODUCTS: [(&str, &str, i64, u32); 20] = [
    ("Laptop ASUS X441", "Elektronik", 7_500_000, 45),
    ("Smartphone Samsung A32", "Elektronik", 3_200_000, 78),
    ("Monitor LG 24\"", "Elektronik", 1_800_000, 32),
    ("Keyboard Mechanical", "Aksesori", 450_000, 120),
    ("Mouse Wireless", "Aksesori", 250_000, 150),
    ("Headphone Bluetooth", "Aksesori", 600_000, 85),
    ("Printer Epson L3210", "Elektronik", 2_800_000, 25),
    ("Tablet iPad 9th", "Elektronik", 4_500_000, 40),
    ("SSD 500GB", "Komponen", 800_000, 95),
    ("RAM 8GB DDR4", "Komponen", 650_000, 110),
    ("Power Supply 650W", "Komponen", 850_000, 65),
    ("Casing PC ATX", "Komponen", 500_000, 42),
    ("Webcam 1080p", "Aksesori", 400_000, 88),
    ("Microphone USB", "Aksesori", 350_000, 76),
    ("Router Wi-Fi 6", "Jaringan", 1_200_000, 53),
    ("Hard Disk 1TB", "Komponen", 900_000, 60),
    ("Cooler CPU", "Komponen", 350_000, 92),
    ("VGA Card GTX 1660", "Komponen", 3_200_000, 28),
    ("Motherboard B450", "Komponen", 1_800_000, 35),
    ("Speaker 2.1", "Aksesori", 550_000, 67),
];

/// (name, contact)
const SUPPLIERS: [(&str, &str); 5] = [
    ("PT Elektronik Nusantara", "021-5567890"),
    ("CV Tech Solution", "021-5567891"),
    ("PT Komponen Indonesia", "021-5567892"),
    ("UD Aksesori Komputer", "021-5567893"),
    ("PT Global Technology", "021-5567894"),
];

/// Product master, ids `P001`..`P020` in catalog order.
pub fn products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, (name, category, price, stock))| Product {
            product_id: format!("P{:03}", i + 1),
            product_name: (*name).to_string(),
            category: (*category).to_string(),
            unit_price: Decimal::from(*price),
            stock: *stock,
        })
        .collect()
}

/// Supplier master, ids `SUP01`..`SUP05` in catalog order.
pub fn suppliers() -> Vec<Supplier> {
    SUPPLIERS
        .iter()
        .enumerate()
        .map(|(i, (name, contact))| Supplier {
            supplier_id: format!("SUP{:02}", i + 1),
            supplier_name: (*name).to_string(),
            contact: (*contact).to_string(),
        })
        .collect()
}
