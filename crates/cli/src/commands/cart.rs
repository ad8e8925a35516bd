//! Cart commands.
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Catalog API base URL
//! - `CART_STORAGE_DIR` - Directory holding the persisted cart
//! - `CART_STORAGE_KEY` - Key of the persisted cart slot

use std::fmt::Write as _;

use rocketshoes_cart::{
    CartConfig, CartStore, Catalog, FileStore, HttpCatalog, KeyValueStore, Notifier,
    TracingNotifier, UpdateProductAmount,
};
use rocketshoes_core::{Cart, ProductId};
use tracing::info;

use super::CliError;

/// Store used by the CLI.
pub type CliStore = CartStore<HttpCatalog, FileStore, TracingNotifier>;

/// Open the cart persisted under the configured storage directory.
///
/// # Errors
///
/// Returns an error if the catalog client cannot be built.
pub fn open_store(config: &CartConfig) -> Result<CliStore, CliError> {
    let catalog = HttpCatalog::new(&config.catalog)?;
    let storage = FileStore::new(&config.storage.dir);

    info!(
        catalog = %config.catalog.base_url,
        storage = %storage.dir().display(),
        "opening cart"
    );

    Ok(CartStore::open(
        catalog,
        storage,
        TracingNotifier,
        config.store_options(),
    ))
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be encoded as JSON.
pub fn show<C, S, N>(store: &CartStore<C, S, N>, json: bool) -> Result<(), CliError>
where
    C: Catalog,
    S: KeyValueStore,
    N: Notifier,
{
    let output = if json {
        serde_json::to_string_pretty(store.cart())?
    } else {
        render(store.cart())
    };
    print(&output);
    Ok(())
}

/// Add one unit of a product and print the cart.
///
/// # Errors
///
/// Returns an error if the cart rejects the change.
pub async fn add<C, S, N>(
    store: &mut CartStore<C, S, N>,
    product_id: ProductId,
) -> Result<(), CliError>
where
    C: Catalog,
    S: KeyValueStore,
    N: Notifier,
{
    let cart = store.add_product(product_id).await?;
    print(&render(cart));
    Ok(())
}

/// Remove a product and print the cart.
///
/// # Errors
///
/// Returns an error if the cart rejects the change.
pub fn remove<C, S, N>(
    store: &mut CartStore<C, S, N>,
    product_id: ProductId,
) -> Result<(), CliError>
where
    C: Catalog,
    S: KeyValueStore,
    N: Notifier,
{
    let cart = store.remove_product(product_id)?;
    print(&render(cart));
    Ok(())
}

/// Set a product's quantity and print the cart.
///
/// # Errors
///
/// Returns an error if the cart rejects the change.
pub async fn set<C, S, N>(
    store: &mut CartStore<C, S, N>,
    product_id: ProductId,
    amount: i64,
) -> Result<(), CliError>
where
    C: Catalog,
    S: KeyValueStore,
    N: Notifier,
{
    let cart = store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await?;
    print(&render(cart));
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print(output: &str) {
    println!("{output}");
}

/// Render the cart as a plain-text table with a subtotal line.
fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<40} {:>5} {:>12} {:>12}",
        "ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"
    );
    for line in cart {
        let _ = writeln!(
            out,
            "{:>6}  {:<40} {:>5} {:>12} {:>12}",
            line.id.as_i64(),
            truncate(&line.title, 40),
            line.amount,
            line.price.display(),
            line.subtotal().display(),
        );
    }

    let summary = cart.summary();
    let _ = write!(
        out,
        "{} product(s), {} unit(s), total {}",
        summary.item_count,
        summary.total_quantity,
        summary.subtotal.display()
    );
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use rocketshoes_core::{CartLine, Price};

    use super::*;

    fn line(id: i64, title: &str, cents: i64, amount: u32) -> CartLine {
        CartLine {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(cents),
            image: String::new(),
            amount,
        }
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&Cart::new()), "Cart is empty");
    }

    #[test]
    fn test_render_lines_and_total() {
        let cart = Cart::from(vec![
            line(1, "Tênis de Caminhada", 17990, 2),
            line(2, "Tênis VR Caminhada", 13990, 1),
        ]);
        let out = render(&cart);
        assert!(out.contains("Tênis de Caminhada"));
        assert!(out.contains("$359.80"));
        assert!(out.ends_with("2 product(s), 3 unit(s), total $499.70"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
