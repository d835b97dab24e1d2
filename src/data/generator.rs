use chrono::{Days, NaiveDate};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, instrument};

use super::{catalog, Dataset};
use crate::{
    config::DataConfig,
    errors::ServiceError,
    models::{Purchase, Sale},
};

/// Sale quantities are drawn from `1..SALE_QTY_END`.
const SALE_QTY_END: u32 = 10;
/// Purchase quantities are drawn from `PURCHASE_QTY.0..PURCHASE_QTY.1`.
const PURCHASE_QTY: (u32, u32) = (10, 100);

/// Generates the synthetic dataset described by `cfg`.
///
/// Output depends only on `cfg`: equal seeds produce equal datasets.
#[instrument(skip_all, fields(seed = cfg.seed))]
pub fn generate(cfg: &DataConfig) -> Result<Dataset, ServiceError> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let products = catalog::products();
    let suppliers = catalog::suppliers();

    let mut sales = Vec::with_capacity(cfg.sales_count);
    for i in 0..cfg.sales_count {
        let product = &products[rng.gen_range(0..products.len())];
        let quantity = rng.gen_range(1..SALE_QTY_END);
        let date = random_date(&mut rng, cfg.start_date, cfg.day_span)?;
        sales.push(Sale::new(format!("S{:04}", i), product, quantity, date));
    }

    let mut purchases = Vec::with_capacity(cfg.purchase_count);
    for i in 0..cfg.purchase_count {
        let supplier = &suppliers[rng.gen_range(0..suppliers.len())];
        let product = &products[rng.gen_range(0..products.len())];
        let quantity = rng.gen_range(PURCHASE_QTY.0..PURCHASE_QTY.1);
        let date = random_date(&mut rng, cfg.start_date, cfg.day_span)?;
        purchases.push(Purchase::new(
            format!("PUR{:04}", i),
            product,
            supplier,
            quantity,
            date,
        ));
    }

    let dataset = Dataset::from_parts(products, sales, suppliers, purchases)?;
    info!(
        products = dataset.products().len(),
        sales = dataset.sales().len(),
        suppliers = dataset.suppliers().len(),
        purchases = dataset.purchases().len(),
        "Synthetic dataset generated"
    );
    Ok(dataset)
}

fn random_date(rng: &mut StdRng, start: NaiveDate, span: u32) -> Result<NaiveDate, ServiceError> {
    let offset = rng.gen_range(0..span.max(1));
    start
        .checked_add_days(Days::new(u64::from(offset)))
        .ok_or_else(|| {
            ServiceError::InternalError(format!("date {} + {} days overflows", start, offset))
        })
}
