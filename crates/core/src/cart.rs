//! The cart ledger: selected trees, their quantities, and the running total.
//!
//! # Invariants
//!
//! - No line is ever stored with quantity 0; reaching 0 removes the line.
//! - Line ids are unique within a ledger.
//! - [`CartLedger::total`] is recomputed on every read, never cached.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::form::{FormError, FormKind, RequestForm};
use crate::request_id::{RequestIdGenerator, SubmissionResult};
use crate::types::{ItemId, Price};

/// One purchasable item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ItemId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub image_ref: String,
}

impl CartLine {
    #[must_use]
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        unit_price: Price,
        quantity: u32,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity,
            image_ref: image_ref.into(),
        }
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// What a successful checkout hands back for the confirmation notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub submission: SubmissionResult,
    pub total: Price,
    pub lines: Vec<CartLine>,
}

/// Items selected during one page session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLedger {
    lines: Vec<CartLine>,
}

impl CartLedger {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a ledger from lines, dropping zero-quantity lines and merging
    /// duplicate ids.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut ledger = Self::new();
        for line in lines {
            ledger.add_line(line);
        }
        ledger
    }

    /// The cart the page starts with: two Neem trees and one Mango tree.
    #[must_use]
    pub fn demo() -> Self {
        Self::from_lines([
            CartLine::new(
                ItemId::new(1),
                "Neem Tree",
                Price::rupees(150),
                2,
                "https://images.unsplash.com/photo-1509316975850-ff9c5deb0cd9?auto=format&fit=crop&w=200&h=150",
            ),
            CartLine::new(
                ItemId::new(3),
                "Mango Tree",
                Price::rupees(180),
                1,
                "https://images.unsplash.com/photo-1518495973542-4542c06a5843?auto=format&fit=crop&w=200&h=150",
            ),
        ])
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Total for one line, if present.
    #[must_use]
    pub fn line_total(&self, id: ItemId) -> Option<Price> {
        self.get(id).map(CartLine::line_total)
    }

    /// Sum of `unit_price × quantity` over every line.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Change a line's quantity by `delta`, clamping at zero.
    ///
    /// A line that reaches zero is removed. Unknown ids are ignored.
    pub fn adjust_quantity(&mut self, id: ItemId, delta: i64) {
        let Some(pos) = self.lines.iter().position(|line| line.id == id) else {
            debug!(%id, "adjust_quantity on absent line");
            return;
        };
        let Some(line) = self.lines.get_mut(pos) else {
            return;
        };

        let next = i64::from(line.quantity)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));
        if next == 0 {
            self.lines.remove(pos);
            debug!(%id, "line removed at zero quantity");
        } else {
            // Clamped into u32 range above.
            line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
    }

    /// Remove the line with `id`, if present. Returns the removed line.
    pub fn remove_line(&mut self, id: ItemId) -> Option<CartLine> {
        let pos = self.lines.iter().position(|line| line.id == id)?;
        Some(self.lines.remove(pos))
    }

    /// Add a line. An existing line with the same id absorbs the quantity
    /// instead; zero-quantity lines are ignored.
    pub fn add_line(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }
        if let Some(existing) = self.lines.iter_mut().find(|l| l.id == line.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
    }

    /// Empty the ledger.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Place the order described by `form`.
    ///
    /// On success the ledger and the form are both cleared. On failure
    /// neither is touched.
    ///
    /// # Errors
    ///
    /// - [`FormError::EmptyCart`] if there is nothing to order.
    /// - [`FormError::MissingRequiredField`] if name, mobile, address or
    ///   pincode is empty.
    /// - [`FormError::MissingRequiredField`] listing every checkout field if
    ///   `form` is not a checkout form.
    #[instrument(skip_all, fields(lines = self.lines.len()))]
    pub fn checkout(
        &mut self,
        form: &mut RequestForm,
        ids: &dyn RequestIdGenerator,
    ) -> Result<OrderConfirmation, FormError> {
        if self.is_empty() {
            return Err(FormError::EmptyCart);
        }
        if form.kind() != FormKind::Checkout {
            return Err(FormError::MissingRequiredField(
                FormKind::Checkout
                    .required_fields()
                    .map(str::to_string)
                    .collect(),
            ));
        }
        form.validate()?;

        let submission = ids.generate(FormKind::Checkout.request_prefix());
        let total = self.total();
        let lines = std::mem::take(&mut self.lines);
        form.clear();

        info!(
            request_id = %submission.request_id,
            total = %total,
            items = lines.len(),
            "order placed"
        );

        Ok(OrderConfirmation {
            submission,
            total,
            lines,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::request_id::SequentialRequestIds;

    fn line(id: i32, price: u32, quantity: u32) -> CartLine {
        CartLine::new(ItemId::new(id), format!("Tree {id}"), Price::rupees(price), quantity, "")
    }

    fn example_ledger() -> CartLedger {
        CartLedger::from_lines([line(1, 150, 2), line(2, 180, 1)])
    }

    fn filled_checkout() -> RequestForm {
        RequestForm::new(FormKind::Checkout)
            .with_field("name", "Asha")
            .and_then(|f| f.with_field("mobile", "9876543210"))
            .and_then(|f| f.with_field("address", "Village Road 4"))
            .and_then(|f| f.with_field("pincode", "110001"))
            .unwrap()
    }

    #[test]
    fn test_total() {
        assert_eq!(example_ledger().total(), Price::rupees(480));
    }

    #[test]
    fn test_adjust_to_zero_removes_line() {
        let mut ledger = example_ledger();
        ledger.adjust_quantity(ItemId::new(1), -2);
        assert!(ledger.get(ItemId::new(1)).is_none());
        assert_eq!(ledger.total(), Price::rupees(180));
    }

    #[test]
    fn test_adjust_below_zero_clamps_and_removes() {
        let mut ledger = example_ledger();
        ledger.adjust_quantity(ItemId::new(2), -10);
        assert!(ledger.get(ItemId::new(2)).is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_adjust_increments_in_place() {
        let mut ledger = example_ledger();
        ledger.adjust_quantity(ItemId::new(2), 3);
        assert_eq!(ledger.get(ItemId::new(2)).unwrap().quantity, 4);
        assert_eq!(ledger.lines().get(1).unwrap().id, ItemId::new(2));
        assert_eq!(ledger.total(), Price::rupees(300 + 720));
    }

    #[test]
    fn test_adjust_absent_id_is_noop() {
        let mut ledger = example_ledger();
        ledger.adjust_quantity(ItemId::new(9), 1);
        assert_eq!(ledger, example_ledger());
    }

    #[test]
    fn test_remove_line() {
        let mut ledger = example_ledger();
        let removed = ledger.remove_line(ItemId::new(1)).unwrap();
        assert_eq!(removed.quantity, 2);
        assert!(ledger.remove_line(ItemId::new(1)).is_none());
        assert_eq!(ledger.total(), Price::rupees(180));
    }

    #[test]
    fn test_add_line_merges_existing_id() {
        let mut ledger = example_ledger();
        ledger.add_line(line(1, 150, 1));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(ItemId::new(1)).unwrap().quantity, 3);
        ledger.add_line(line(5, 250, 1));
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.item_count(), 5);
    }

    #[test]
    fn test_add_zero_quantity_line_ignored() {
        let mut ledger = CartLedger::new();
        ledger.add_line(line(1, 150, 0));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_line_total() {
        let ledger = example_ledger();
        assert_eq!(ledger.line_total(ItemId::new(1)), Some(Price::rupees(300)));
        assert_eq!(ledger.line_total(ItemId::new(7)), None);
    }

    #[test]
    fn test_demo_seed() {
        let ledger = CartLedger::demo();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.item_count(), 3);
        assert_eq!(ledger.total(), Price::rupees(480));
    }

    #[test]
    fn test_checkout_success_clears_ledger_and_form() {
        let mut ledger = example_ledger();
        let mut form = filled_checkout();
        let ids = SequentialRequestIds::new();

        let confirmation = ledger.checkout(&mut form, &ids).unwrap();
        assert_eq!(confirmation.submission.request_id, "TR000001");
        assert_eq!(confirmation.total, Price::rupees(480));
        assert_eq!(confirmation.lines.len(), 2);
        assert!(ledger.is_empty());
        assert!(form.is_blank());
    }

    #[test]
    fn test_checkout_missing_mobile_leaves_state() {
        let mut ledger = example_ledger();
        let mut form = filled_checkout().with_field("mobile", "").unwrap();
        let before = form.clone();

        let err = ledger
            .checkout(&mut form, &SequentialRequestIds::new())
            .unwrap_err();
        assert_eq!(err, FormError::MissingRequiredField(vec!["mobile".into()]));
        assert_eq!(ledger, example_ledger());
        assert_eq!(form, before);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut ledger = CartLedger::new();
        let mut form = filled_checkout();
        let err = ledger
            .checkout(&mut form, &SequentialRequestIds::new())
            .unwrap_err();
        assert_eq!(err, FormError::EmptyCart);
        assert_eq!(form, filled_checkout());
    }

    #[test]
    fn test_checkout_rejects_other_form_kinds() {
        let mut ledger = example_ledger();
        let mut form = RequestForm::new(FormKind::Contact);
        let err = ledger
            .checkout(&mut form, &SequentialRequestIds::new())
            .unwrap_err();
        assert_eq!(err.missing_fields(), ["name", "mobile", "address", "pincode"]);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_adjust_quantity_extreme_deltas() {
        let mut ledger = example_ledger();
        ledger.adjust_quantity(ItemId::new(1), i64::MAX);
        assert_eq!(ledger.get(ItemId::new(1)).unwrap().quantity, u32::MAX);

        ledger.adjust_quantity(ItemId::new(1), i64::MIN);
        assert!(ledger.get(ItemId::new(1)).is_none());

        ledger.adjust_quantity(ItemId::new(2), i64::MIN);
        assert!(ledger.is_empty());
    }
}
