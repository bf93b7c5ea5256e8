//! The cart session: one owned context per browsing context (tab).
//!
//! [`CartSession`] holds the cart together with everything needed to price
//! and persist it. Every mutation is followed by a save, so the stored cart
//! always mirrors memory (unless storage is degraded).

use core::fmt;
use std::sync::Arc;

use kangaroo_core::{LineItemId, ProductId, Quantity, QuantityError};
use tracing::instrument;
use url::Url;

use crate::cart::{AddOutcome, Cart, CustomItemSpec, QuantityOutcome, RemoveOutcome};
use crate::catalog::Catalog;
use crate::checkout::{self, CheckoutError, OrderContact};
use crate::coupons::{self, CouponError, CouponOutcome, CouponRegistry};
use crate::custom_item::{CustomItemError, CustomShirtOrder};
use crate::pricing::{self, PricingConfig, Totals};
use crate::share::{self, ExportError, ImportError};
use crate::storage::{CartStorage, StorageMode, keys};

/// Callback invoked with the freshly reloaded cart after an external change.
pub type ChangeHandler = Box<dyn FnMut(&Cart) + Send>;

pub struct CartSession {
    cart: Cart,
    catalog: Arc<Catalog>,
    coupons: Arc<CouponRegistry>,
    pricing: PricingConfig,
    storage: CartStorage,
    handlers: Vec<ChangeHandler>,
}

impl fmt::Debug for CartSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartSession")
            .field("cart", &self.cart)
            .field("pricing", &self.pricing)
            .field("storage", &self.storage)
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

impl CartSession {
    /// Open a session, hydrating the cart from storage.
    ///
    /// An unreadable store yields an empty cart in degraded mode.
    #[must_use]
    pub fn open(
        catalog: Arc<Catalog>,
        coupons: Arc<CouponRegistry>,
        pricing: PricingConfig,
        mut storage: CartStorage,
    ) -> Self {
        let cart = load_resolved(&mut storage, &coupons).unwrap_or_default();
        tracing::debug!(
            lines = cart.items().len(),
            mode = ?storage.mode(),
            "Cart session opened"
        );
        Self {
            cart,
            catalog,
            coupons,
            pricing,
            storage,
            handlers: Vec::new(),
        }
    }

    /// Open a session for a page URL that may carry a shared cart.
    ///
    /// When the URL has a `cart` parameter, the shared cart is imported (if
    /// valid) and the URL to display instead, without the parameter, is
    /// returned alongside the session.
    #[must_use]
    pub fn open_with_url(
        catalog: Arc<Catalog>,
        coupons: Arc<CouponRegistry>,
        pricing: PricingConfig,
        storage: CartStorage,
        page_url: &Url,
    ) -> (Self, Option<Url>) {
        let mut session = Self::open(catalog, coupons, pricing, storage);
        let Some((blob, stripped)) = share::take_shared_cart(page_url) else {
            return (session, None);
        };
        if let Err(e) = session.import_shared(&blob) {
            tracing::debug!(error = %e, "Shared cart rejected; keeping stored cart");
        }
        (session, Some(stripped))
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn coupons(&self) -> &CouponRegistry {
        &self.coupons
    }

    #[must_use]
    pub const fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    #[must_use]
    pub const fn storage_mode(&self) -> StorageMode {
        self.storage.mode()
    }

    /// Add a catalog product. Unknown products change nothing.
    #[instrument(skip(self))]
    pub fn add_item(
        &mut self,
        product_id: &ProductId,
        color: &str,
        size: &str,
        quantity: Quantity,
    ) -> AddOutcome {
        let outcome = self
            .cart
            .add_catalog_item(&self.catalog, product_id, color, size, quantity);
        match &outcome {
            AddOutcome::ProductNotFound(_) => {
                tracing::warn!("Product not in catalog; cart unchanged");
            }
            AddOutcome::Added(_) | AddOutcome::Merged { .. } => {
                tracing::info!(?outcome, "Added to cart");
                self.persist();
            }
        }
        outcome
    }

    #[instrument(skip(self, spec), fields(price = %spec.price, size = %spec.size))]
    pub fn add_custom_item(&mut self, spec: CustomItemSpec) -> LineItemId {
        let identifier = self.cart.add_custom_item(spec);
        tracing::info!(%identifier, "Custom item added to cart");
        self.persist();
        identifier
    }

    /// Price and add a configurator order.
    ///
    /// # Errors
    ///
    /// Returns [`CustomItemError::EmptyDescription`] when the order has no description.
    pub fn add_custom_order(&mut self, order: CustomShirtOrder) -> Result<LineItemId, CustomItemError> {
        let spec = order.into_item_spec()?;
        Ok(self.add_custom_item(spec))
    }

    #[instrument(skip(self))]
    pub fn remove_item(&mut self, identifier: &LineItemId) -> RemoveOutcome {
        let outcome = self.cart.remove_item(identifier);
        if outcome == RemoveOutcome::Removed {
            tracing::info!("Removed from cart");
            self.persist();
        }
        outcome
    }

    /// Set a line's quantity; zero or less removes the line.
    #[instrument(skip(self))]
    pub fn set_quantity(&mut self, identifier: &LineItemId, quantity: i64) -> QuantityOutcome {
        let outcome = self
            .cart
            .set_quantity(identifier, Quantity::from_signed(quantity));
        if outcome != QuantityOutcome::NotInCart {
            tracing::info!(?outcome, "Quantity changed");
            self.persist();
        }
        outcome
    }

    /// Set a line's quantity from raw form text.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotANumber`] when the text is not an integer;
    /// the cart is left unchanged.
    pub fn set_quantity_input(
        &mut self,
        identifier: &LineItemId,
        raw: &str,
    ) -> Result<QuantityOutcome, QuantityError> {
        let input = Quantity::parse_input(raw)?;
        let outcome = self.cart.set_quantity(identifier, input);
        if outcome != QuantityOutcome::NotInCart {
            tracing::info!(%identifier, ?outcome, "Quantity changed");
            self.persist();
        }
        Ok(outcome)
    }

    /// Empty the cart and drop the coupon.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.cart.clear();
        tracing::info!("Cart cleared");
        self.persist();
    }

    /// Apply a coupon code typed by the customer; an empty code removes the coupon.
    ///
    /// The result is persisted whether or not the code was accepted, since a
    /// rejected code still clears the previous coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponError`] describing why the code was refused.
    #[instrument(skip(self))]
    pub fn apply_coupon(&mut self, raw_code: &str) -> Result<CouponOutcome, CouponError> {
        let result = coupons::apply_coupon(raw_code, &mut self.cart, &self.catalog, &self.coupons);
        match &result {
            Ok(outcome) => tracing::info!(?outcome, "Coupon updated"),
            Err(e) => tracing::info!(error = %e, "Coupon refused"),
        }
        self.persist();
        result
    }

    /// Current totals, computed fresh.
    #[must_use]
    pub fn totals(&self) -> Totals {
        pricing::compute_totals(&self.cart, &self.catalog, &self.coupons, &self.pricing)
    }

    /// Encode the items (not the coupon) for sharing.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] when the cart is empty or cannot be serialized.
    pub fn export_shared(&self) -> Result<String, ExportError> {
        share::encode_items(self.cart.items())
    }

    /// A link to `base` that carries this cart.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] when the cart is empty or cannot be serialized.
    pub fn share_url(&self, base: &Url) -> Result<Url, ExportError> {
        share::share_url(base, self.cart.items())
    }

    /// Replace the cart with a shared one.
    ///
    /// On success every line is replaced, the coupon is dropped and the cart
    /// is persisted. On failure nothing changes. Returns the number of lines
    /// imported.
    ///
    /// # Errors
    ///
    /// Returns the [`ImportError`] that caused the blob to be rejected.
    #[instrument(skip(self, blob), fields(blob_len = blob.len()))]
    pub fn import_shared(&mut self, blob: &str) -> Result<usize, ImportError> {
        let items = share::decode_items(blob)?;
        self.cart.replace_all(items);
        self.cart.set_applied_coupon(None);
        let lines = self.cart.items().len();
        tracing::info!(lines, "Shared cart imported");
        self.persist();
        Ok(lines)
    }

    /// Register a handler called after each reload triggered by another context.
    pub fn on_external_change(&mut self, handler: impl FnMut(&Cart) + Send + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Notify the session that another context wrote storage.
    ///
    /// `key` is the key that changed, or `None` when the whole store was
    /// cleared. Returns whether the cart was reloaded.
    pub fn storage_changed(&mut self, key: Option<&str>) -> bool {
        if key.is_some_and(|key| !keys::is_cart_key(key)) {
            return false;
        }
        tracing::debug!(?key, "External cart change");
        self.reload();
        true
    }

    /// Reload from storage and notify change handlers.
    ///
    /// If storage cannot be read the in-memory cart is kept.
    pub fn reload(&mut self) {
        if let Some(cart) = load_resolved(&mut self.storage, &self.coupons) {
            self.cart = cart;
        }
        for handler in &mut self.handlers {
            handler(&self.cart);
        }
    }

    /// Order text for the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NothingToOrder`] when the total is zero.
    pub fn order_message(&self, contact: &OrderContact) -> Result<String, CheckoutError> {
        let totals = self.totals();
        checkout::ensure_orderable(&totals)?;
        Ok(checkout::order_message(&self.cart, &totals, contact))
    }

    /// WhatsApp deep link with the order text for the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NothingToOrder`] when the total is zero.
    pub fn whatsapp_link(&self, number: &str, contact: &OrderContact) -> Result<String, CheckoutError> {
        Ok(checkout::whatsapp_link(number, &self.order_message(contact)?))
    }

    fn persist(&mut self) {
        self.storage.save(&self.cart);
    }
}

/// Load the stored cart, dropping a coupon code the registry no longer has.
///
/// The dropped code is also removed from storage.
fn load_resolved(storage: &mut CartStorage, coupons: &CouponRegistry) -> Option<Cart> {
    let mut cart = storage.load()?;
    let withdrawn = cart
        .applied_coupon()
        .filter(|code| coupons.find(code).is_none())
        .cloned();
    if let Some(code) = withdrawn {
        tracing::info!(%code, "Stored coupon no longer published; dropping it");
        cart.set_applied_coupon(None);
        storage.save(&cart);
    }
    Some(cart)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use kangaroo_core::Price;

    use super::*;
    use crate::custom_item::{Material, ShirtColor, ShirtSize};
    use crate::pricing::CouponEffect;
    use crate::storage::{KeyValueStore, MemoryStore, UnavailableStore};

    fn session_on(store: MemoryStore) -> CartSession {
        CartSession::open(
            Arc::new(Catalog::bundled().unwrap()),
            Arc::new(CouponRegistry::bundled().unwrap()),
            PricingConfig::default(),
            CartStorage::new(store),
        )
    }

    fn naruto() -> ProductId {
        ProductId::new("camisa-naruto")
    }

    #[test]
    fn test_mutations_are_persisted() {
        let store = MemoryStore::new();
        let mut session = session_on(store.clone());
        session.add_item(&naruto(), "Preto", "M", Quantity::ONE);
        session.apply_coupon("naruto12").unwrap();

        let reopened = session_on(store);
        assert_eq!(reopened.cart(), session.cart());
        assert_eq!(reopened.cart().applied_coupon().unwrap().as_str(), "NARUTO12");
    }

    #[test]
    fn test_unknown_product_not_persisted() {
        let store = MemoryStore::new();
        let mut session = session_on(store.clone());
        let outcome = session.add_item(&ProductId::new("nope"), "Preto", "M", Quantity::ONE);
        assert!(matches!(outcome, AddOutcome::ProductNotFound(_)));
        assert!(store.get(keys::CART).unwrap().is_none());
    }

    #[test]
    fn test_rejected_coupon_clears_stored_coupon() {
        let store = MemoryStore::new();
        let mut session = session_on(store.clone());
        session.add_item(&naruto(), "Preto", "M", Quantity::ONE);
        session.apply_coupon("KANGAR10").unwrap();

        assert!(session.apply_coupon("FAKE").is_err());
        assert!(store.get(keys::COUPON).unwrap().is_none());
    }

    #[test]
    fn test_withdrawn_coupon_dropped_on_open() {
        let store = MemoryStore::new();
        store.set(keys::CART, "[]").unwrap();
        store.set(keys::COUPON, "RETIRADO").unwrap();

        let session = session_on(store.clone());
        assert!(session.cart().applied_coupon().is_none());
        assert!(store.get(keys::COUPON).unwrap().is_none());
    }

    #[test]
    fn test_empty_cart_cannot_be_shared_or_ordered() {
        let mut session = session_on(MemoryStore::new());
        let base = Url::parse("https://kangaroowear.com.br/carrinho.html").unwrap();
        let contact = OrderContact::default();

        assert!(matches!(session.export_shared(), Err(ExportError::EmptyCart)));
        assert!(matches!(session.share_url(&base), Err(ExportError::EmptyCart)));
        assert_eq!(session.order_message(&contact), Err(CheckoutError::NothingToOrder));
        assert_eq!(
            session.whatsapp_link("5592999999999", &contact),
            Err(CheckoutError::NothingToOrder)
        );

        session.add_item(&naruto(), "Preto", "M", Quantity::ONE);
        assert!(session.share_url(&base).is_ok());
        assert!(session.order_message(&contact).is_ok());
    }

    #[test]
    fn test_quantity_input() {
        let mut session = session_on(MemoryStore::new());
        let AddOutcome::Added(line) = session.add_item(&naruto(), "Preto", "M", Quantity::ONE)
        else {
            panic!("expected a new line");
        };

        assert!(session.set_quantity_input(&line, "abc").is_err());
        assert_eq!(
            session.set_quantity_input(&line, " 4 ").unwrap(),
            QuantityOutcome::Updated(Quantity::new(4).unwrap())
        );
        assert_eq!(session.set_quantity(&line, -1), QuantityOutcome::Removed);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_custom_order() {
        let mut session = session_on(MemoryStore::new());
        let order = CustomShirtOrder {
            description: "Canguru ninja".to_owned(),
            has_reference: true,
            material: Material::Standard,
            size: ShirtSize::G,
            color: ShirtColor::Cinza,
        };
        let id = session.add_custom_order(order).unwrap();
        assert_eq!(session.cart().get(&id).unwrap().unit_price, Price::from_cents(21_000));
        assert_eq!(session.totals().shipping, Price::from_cents(2_500));
    }

    #[test]
    fn test_import_replaces_and_drops_coupon() {
        let mut sender = session_on(MemoryStore::new());
        sender.add_item(&ProductId::new("moletom-outback"), "Cinza", "G", Quantity::ONE);
        let blob = sender.export_shared().unwrap();

        let store = MemoryStore::new();
        let mut receiver = session_on(store.clone());
        receiver.add_item(&naruto(), "Preto", "M", Quantity::ONE);
        receiver.apply_coupon("NARUTO12").unwrap();

        assert_eq!(receiver.import_shared(&blob).unwrap(), 1);
        assert_eq!(receiver.cart().items(), sender.cart().items());
        assert!(receiver.cart().applied_coupon().is_none());
        assert!(store.get(keys::COUPON).unwrap().is_none());
    }

    #[test]
    fn test_malformed_import_keeps_cart() {
        let mut session = session_on(MemoryStore::new());
        session.add_item(&naruto(), "Preto", "M", Quantity::ONE);
        let before = session.cart().clone();

        assert!(session.import_shared("not-valid-base64!!").is_err());
        assert_eq!(session.cart(), &before);
    }

    #[test]
    fn test_external_change_reloads_and_notifies() {
        let store = MemoryStore::new();
        let mut tab_a = session_on(store.clone());
        let mut tab_b = session_on(store);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tab_b.on_external_change(move |cart| sink.lock().unwrap().push(cart.items().len()));

        tab_a.add_item(&naruto(), "Preto", "M", Quantity::ONE);
        assert!(tab_b.cart().is_empty());

        assert!(!tab_b.storage_changed(Some("unrelated")));
        assert!(tab_b.storage_changed(Some(keys::CART)));
        assert_eq!(tab_b.cart(), tab_a.cart());
        assert_eq!(*seen.lock().unwrap(), vec![1]);

        tab_a.clear();
        assert!(tab_b.storage_changed(None));
        assert!(tab_b.cart().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_degraded_storage_keeps_working() {
        let mut session = CartSession::open(
            Arc::new(Catalog::bundled().unwrap()),
            Arc::new(CouponRegistry::bundled().unwrap()),
            PricingConfig::default(),
            CartStorage::new(UnavailableStore),
        );
        assert_eq!(session.storage_mode(), StorageMode::Degraded);

        session.add_item(&naruto(), "Preto", "M", Quantity::ONE);
        session.apply_coupon("NARUTO12").unwrap();
        assert_eq!(session.cart().items().len(), 1);
        assert!(matches!(session.totals().coupon, CouponEffect::Active(_)));

        // A reload from unreadable storage keeps the in-memory cart.
        assert!(session.storage_changed(Some(keys::COUPON)));
        assert_eq!(session.cart().items().len(), 1);
    }
}
