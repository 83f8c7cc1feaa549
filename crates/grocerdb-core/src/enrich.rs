use crate::products::Product;
use crate::sale_index::SaleIndex;

/// Attaches at most one sale to each product by substring match on its name.
///
/// For every product without a sale, the lower-cased product name is checked
/// against the index keys in index order and the first key it contains wins.
/// Products that already carry a sale are left untouched. Returns the number
/// of products that received a sale.
pub fn enrich_products(products: &mut [Product], index: &SaleIndex) -> usize {
    if index.is_empty() {
        return 0;
    }

    let mut attached = 0;
    for product in products.iter_mut().filter(|p| p.sale.is_none()) {
        let name = product.name.to_lowercase();
        if let Some((_, sale)) = index.first_match(&name) {
            product.sale = Some(sale.clone());
            attached += 1;
        }
    }
    attached
}
