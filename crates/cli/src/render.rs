//! Plain-text rendering of page state.
//!
//! Every function returns lines rather than printing so the same text serves
//! one-shot commands, the interactive session, and tests.

use himsols_core::catalog::{SERVICES, ServiceInfo};
use himsols_core::{
    CartLedger, FlowState, FormFlow, Notice, NoticeVariant, OrderConfirmation, ServiceType, Tree,
    Urgency,
};

pub fn notice(notice: &Notice) -> String {
    let marker = match notice.variant {
        NoticeVariant::Default => "✔",
        NoticeVariant::Destructive => "✘",
    };
    format!("{marker} {}: {}", notice.title, notice.description)
}

pub fn cart(ledger: &CartLedger) -> Vec<String> {
    if ledger.is_empty() {
        return vec![
            "Your Cart is Empty".to_string(),
            "Start adding some trees to your cart to make a difference!".to_string(),
        ];
    }

    let mut out: Vec<String> = ledger
        .lines()
        .iter()
        .map(|line| {
            format!(
                "[{}] {} x{} @ {} = {}",
                line.id,
                line.name,
                line.quantity,
                line.unit_price,
                line.line_total()
            )
        })
        .collect();
    out.push(format!(
        "Total: {} ({} items)",
        ledger.total(),
        ledger.item_count()
    ));
    out
}

pub fn order(confirmation: &OrderConfirmation) -> Vec<String> {
    let mut out = vec![self::notice(&Notice::order_placed(confirmation))];
    out.extend(
        confirmation
            .lines
            .iter()
            .map(|line| format!("  {} x{}  {}", line.name, line.quantity, line.line_total())),
    );
    out.push(format!("  Total: {}", confirmation.total));
    out
}

pub fn tree(tree: &Tree) -> Vec<String> {
    vec![
        format!(
            "[{}] {} ({}) - {} [{}]",
            tree.id, tree.name, tree.scientific_name, tree.price, tree.category
        ),
        format!("    {}", tree.description),
        format!(
            "    Growth: {}  Height: {}  Benefits: {}",
            tree.growth_time,
            tree.height,
            tree.benefits.join(", ")
        ),
    ]
}

pub fn services() -> Vec<String> {
    let mut out = Vec::new();
    for service in SERVICES {
        out.push(format!("{} ({})", service.title, service.price_label));
        out.push(format!("    {}", service.description));
        out.push(format!("    {}", service.features.join(" · ")));
        out.push(format!("    {}", service.link));
    }
    out.push("Service request types:".to_string());
    for service in ServiceType::ALL {
        out.push(format!("    {}  {}", service.slug(), header(&service.info())));
    }
    out.push("Urgency levels:".to_string());
    for urgency in Urgency::ALL {
        out.push(format!("    {}  {}", urgency.as_str(), urgency.label()));
    }
    out
}

pub fn header(info: &ServiceInfo) -> String {
    format!("{} {} - {}", info.icon, info.title, info.description)
}

pub fn flow(flow: &FormFlow) -> Vec<String> {
    let mut out = vec![format!("{} form", flow.kind())];
    match flow.state() {
        FlowState::Idle => {
            for (name, value) in flow.form().iter() {
                let spec = flow.kind().field(name);
                let required = if spec.is_some_and(|s| s.required) { "*" } else { "" };
                let shown = if spec.is_some_and(|s| s.sensitive) && !value.is_empty() {
                    "********"
                } else {
                    value
                };
                out.push(format!("  {name}{required}: {shown}"));
            }
        }
        FlowState::Submitted { result } => {
            out.push(format!("  Submitted. Request ID: {result}"));
            if flow.pending_reset().is_some() {
                out.push(format!(
                    "  Returning to an empty form in {}s",
                    flow.reset_delay().as_secs()
                ));
            }
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use himsols_core::{FormKind, ItemId, ManualResetScheduler, SequentialRequestIds};

    use super::*;

    #[test]
    fn test_cart_lines_and_total() {
        let lines = cart(&CartLedger::demo());
        assert_eq!(lines.len(), 3);
        assert!(lines.first().unwrap().contains("Neem Tree x2 @ ₹150 = ₹300"));
        assert_eq!(lines.last().unwrap(), "Total: ₹480 (3 items)");
    }

    #[test]
    fn test_empty_cart() {
        let mut ledger = CartLedger::demo();
        ledger.remove_line(ItemId::new(1));
        ledger.remove_line(ItemId::new(3));
        assert_eq!(cart(&ledger).first().unwrap(), "Your Cart is Empty");
    }

    #[test]
    fn test_flow_masks_passwords() {
        let mut flow = FormFlow::new(FormKind::Login);
        flow.update_field("password", "hunter2").unwrap();
        let text = self::flow(&flow).join("\n");
        assert!(text.contains("password*: ********"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn test_flow_submitted_mentions_reset() {
        let mut flow = FormFlow::new(FormKind::Contact);
        for (name, value) in [("name", "A"), ("mobile", "1"), ("message", "hi")] {
            flow.update_field(name, value).unwrap();
        }
        flow.submit(&SequentialRequestIds::new(), &mut ManualResetScheduler::new())
            .unwrap();
        let text = self::flow(&flow).join("\n");
        assert!(text.contains("Request ID: CM000001"));
        assert!(text.contains("Returning to an empty form in 3s"));
    }

    #[test]
    fn test_notice_markers() {
        assert!(notice(&Notice::removed_from_cart()).starts_with('✔'));
    }
}
