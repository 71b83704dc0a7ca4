//! Cart page operations and checkout.

use core::fmt;
use core::str::FromStr;

use himsols_core::{
    CartLedger, FormKind, ItemId, Notice, RequestForm, RequestIdGenerator, TreeCatalog,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::output::Output;
use crate::render;

/// One user action on the cart, written `inc:<id>`, `dec:<id>`, `rm:<id>`
/// or `add:<tree-id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOp {
    Increment(ItemId),
    Decrement(ItemId),
    Remove(ItemId),
    Add(ItemId),
}

impl FromStr for CartOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (verb, id) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid cart operation: {s} (expected verb:id)"))?;
        let id: ItemId = id
            .parse()
            .map_err(|e| format!("invalid id in cart operation {s}: {e}"))?;
        match verb {
            "inc" => Ok(Self::Increment(id)),
            "dec" => Ok(Self::Decrement(id)),
            "rm" => Ok(Self::Remove(id)),
            "add" => Ok(Self::Add(id)),
            _ => Err(format!("invalid cart operation: {verb} (expected inc, dec, rm, add)")),
        }
    }
}

impl fmt::Display for CartOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increment(id) => write!(f, "inc:{id}"),
            Self::Decrement(id) => write!(f, "dec:{id}"),
            Self::Remove(id) => write!(f, "rm:{id}"),
            Self::Add(id) => write!(f, "add:{id}"),
        }
    }
}

/// Apply one operation. Returns the notice to show, if the page shows one.
///
/// # Errors
///
/// Returns an error if `add` names a tree that is not in the catalog.
pub fn apply(
    ledger: &mut CartLedger,
    catalog: &TreeCatalog,
    op: CartOp,
) -> Result<Option<Notice>, String> {
    match op {
        CartOp::Increment(id) => {
            ledger.adjust_quantity(id, 1);
            Ok(None)
        }
        CartOp::Decrement(id) => {
            ledger.adjust_quantity(id, -1);
            Ok(None)
        }
        CartOp::Remove(id) => {
            ledger.remove_line(id);
            Ok(Some(Notice::removed_from_cart()))
        }
        CartOp::Add(id) => {
            let tree = catalog
                .get(id)
                .ok_or_else(|| format!("no tree with id {id}"))?;
            ledger.add_line(tree.to_cart_line());
            Ok(Some(Notice::added_to_cart(tree.name)))
        }
    }
}

/// Seed the demo cart and apply `ops` in order.
///
/// # Errors
///
/// Returns an error if an operation is invalid.
pub fn load(ops: &[CartOp]) -> Result<(CartLedger, Vec<Notice>), String> {
    let catalog = TreeCatalog::standard();
    let mut ledger = CartLedger::demo();
    let mut notices = Vec::new();
    for op in ops {
        if let Some(notice) = apply(&mut ledger, &catalog, *op)? {
            notices.push(notice);
        }
    }
    Ok((ledger, notices))
}

#[derive(Serialize)]
struct CartView<'a> {
    notices: &'a [Notice],
    #[serde(flatten)]
    ledger: &'a CartLedger,
    total: String,
    item_count: u32,
}

/// Show the demo cart after applying `ops`.
///
/// # Errors
///
/// Returns an error if an operation is invalid or output fails.
pub fn show(ops: &[CartOp], output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let (ledger, notices) = load(ops)?;

    let mut lines: Vec<String> = notices.iter().map(render::notice).collect();
    lines.extend(render::cart(&ledger));

    let view = CartView {
        notices: &notices,
        ledger: &ledger,
        total: ledger.total().display(),
        item_count: ledger.item_count(),
    };
    output.emit(&lines, &view)?;
    Ok(())
}

/// Check out the demo cart with the given form fields.
///
/// # Errors
///
/// Returns an error if an operation is invalid, the form is incomplete, the
/// cart is empty, or output fails.
pub fn checkout(
    ops: &[CartOp],
    fields: &[(&str, String)],
    ids: &dyn RequestIdGenerator,
    output: Output,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut ledger, _) = load(ops)?;
    let mut form = RequestForm::new(FormKind::Checkout);
    for (name, value) in fields {
        form.set(name, value.as_str())?;
    }

    match ledger.checkout(&mut form, ids) {
        Ok(confirmation) => {
            info!(request_id = %confirmation.submission, "checkout complete");
            output.emit(&render::order(&confirmation), &confirmation)?;
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "checkout rejected");
            let notice = Notice::for_error(FormKind::Checkout, &err);
            output.emit(&[render::notice(&notice)], &notice)?;
            Err(err.into())
        }
    }
}
