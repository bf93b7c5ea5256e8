//! Catalog browsing.

use kangaroo_storefront::CartSession;

/// List every product with its options.
#[allow(clippy::print_stdout)]
pub fn list(session: &CartSession) {
    for product in session.catalog().products() {
        println!("{} - {} ({})", product.id, product.name, product.price);
        println!("    coleção: {}", product.collection);
        println!("    cores: {}", product.colors.join(", "));
        println!("    tamanhos: {}", product.sizes.join(", "));
    }
}
