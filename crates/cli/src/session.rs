//! Interactive storefront session.
//!
//! One page is open at a time, and each page owns its own state. Leaving a
//! page drops that state and cancels any pending form reset, so a timer from
//! an old page never touches the new one.

use std::time::Duration;

use himsols_core::catalog::ALL_CATEGORIES;
use himsols_core::{
    CartLedger, FormFlow, FormKind, Notice, RequestForm, RequestIdGenerator,
    ResetScheduler, ResetTicket, TreeCatalog,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::commands::cart::{self, CartOp};
use crate::config::CliConfig;
use crate::output;
use crate::render;
use crate::scheduler::TokioResetScheduler;

const HELP: &[&str] = &[
    "Pages:",
    "  page catalog [category]     Browse trees",
    "  page cart                   Review the cart and check out",
    "  page contact|login|signup   Open a form",
    "  page service-request <type> Request a service (waste-management, conservation, events)",
    "Page commands:",
    "  show                        Show the current page",
    "  set <field> <value>         Fill in a form field",
    "  submit                      Submit the form or place the order",
    "  add <tree-id>               Add a tree (catalog and cart)",
    "  inc|dec|rm <id>             Change a cart line",
    "  cancel-reset                Keep the contact confirmation on screen",
    "  help | quit",
];

/// The page currently on screen.
#[derive(Debug)]
pub enum Page {
    Catalog {
        category: String,
        selection: CartLedger,
    },
    Cart {
        ledger: CartLedger,
        checkout: RequestForm,
    },
    Form(FormFlow),
}

/// What the caller should do after a line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Continue(Vec<String>),
    Quit,
}

pub struct Session {
    catalog: TreeCatalog,
    ids: Box<dyn RequestIdGenerator>,
    reset_delay: Duration,
    page: Page,
}

impl Session {
    /// Start on the full catalog.
    #[must_use]
    pub fn new(ids: Box<dyn RequestIdGenerator>, reset_delay: Duration) -> Self {
        Self {
            catalog: TreeCatalog::standard(),
            ids,
            reset_delay,
            page: Page::Catalog {
                category: ALL_CATEGORIES.to_string(),
                selection: CartLedger::new(),
            },
        }
    }

    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Handle one line of input.
    pub fn handle(&mut self, line: &str, scheduler: &mut dyn ResetScheduler) -> Step {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Step::Continue(Vec::new());
        };
        let args: Vec<&str> = words.collect();

        let result = match command {
            "quit" | "exit" => {
                self.leave(scheduler);
                return Step::Quit;
            }
            "help" => Ok(HELP.iter().map(ToString::to_string).collect()),
            "show" => Ok(self.show()),
            "page" => self.open(&args, scheduler),
            "set" => self.set(&args),
            "submit" => Ok(self.submit(scheduler)),
            "add" | "inc" | "dec" | "rm" => self.cart_op(command, &args),
            "cancel-reset" => self.cancel_reset(scheduler),
            other => Err(format!("Unknown command: {other}. Type `help` for a list.")),
        };

        Step::Continue(result.unwrap_or_else(|message| vec![format!("✘ {message}")]))
    }

    /// Apply a reset timer that has fired. Returns the lines to show, if the
    /// reset still applied to the open page.
    pub fn on_reset(&mut self, ticket: ResetTicket) -> Vec<String> {
        match &mut self.page {
            Page::Form(flow) => {
                if flow.fire_reset(ticket) {
                    render::flow(flow)
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn leave(&mut self, scheduler: &mut dyn ResetScheduler) {
        if let Page::Form(flow) = &mut self.page {
            flow.reset(scheduler);
        }
    }

    fn open(
        &mut self,
        args: &[&str],
        scheduler: &mut dyn ResetScheduler,
    ) -> Result<Vec<String>, String> {
        let page = match args {
            ["catalog"] => self.catalog_page(ALL_CATEGORIES),
            ["catalog", category] => {
                if !self.catalog.categories().contains(category) {
                    return Err(format!("Unknown category: {category}"));
                }
                self.catalog_page(category)
            }
            ["cart"] => Page::Cart {
                ledger: CartLedger::demo(),
                checkout: RequestForm::new(FormKind::Checkout),
            },
            ["service-request", service] => self.form_page(RequestForm::service_request(service)),
            ["service-request"] => {
                return Err("Usage: page service-request <type>".to_string());
            }
            [kind] => {
                let kind: FormKind = kind.parse()?;
                if kind == FormKind::Checkout {
                    return Err("Checkout lives on the cart page: page cart".to_string());
                }
                self.form_page(RequestForm::new(kind))
            }
            _ => return Err("Usage: page <name> [argument]".to_string()),
        };

        self.leave(scheduler);
        self.page = page;
        debug!(page = ?args, "page opened");
        Ok(self.show())
    }

    /// Switching category on the catalog page keeps the trees already added.
    fn catalog_page(&mut self, category: &str) -> Page {
        let selection = match &mut self.page {
            Page::Catalog { selection, .. } => std::mem::take(selection),
            _ => CartLedger::new(),
        };
        Page::Catalog {
            category: category.to_string(),
            selection,
        }
    }

    fn form_page(&self, form: RequestForm) -> Page {
        Page::Form(FormFlow::with_form(form).with_reset_delay(self.reset_delay))
    }

    fn show(&self) -> Vec<String> {
        match &self.page {
            Page::Catalog {
                category,
                selection,
            } => {
                let mut out = vec![format!(
                    "Categories: {}  (showing {category})",
                    self.catalog.categories().join(", ")
                )];
                out.extend(self.catalog.filter(category).flat_map(render::tree));
                if !selection.is_empty() {
                    out.push(format!("Items in cart: {}", selection.item_count()));
                }
                out
            }
            Page::Cart { ledger, checkout } => {
                let mut out = render::cart(ledger);
                if !ledger.is_empty() {
                    out.push("Checkout details:".to_string());
                    out.extend(
                        checkout
                            .iter()
                            .map(|(name, value)| format!("  {name}: {value}")),
                    );
                }
                out
            }
            Page::Form(flow) => render::flow(flow),
        }
    }

    fn set(&mut self, args: &[&str]) -> Result<Vec<String>, String> {
        let [name, value @ ..] = args else {
            return Err("Usage: set <field> <value>".to_string());
        };
        let value = value.join(" ");
        let updated = match &mut self.page {
            Page::Cart { checkout, .. } => checkout.set(name, value),
            Page::Form(flow) => flow.update_field(name, value),
            Page::Catalog { .. } => return Err("There is no form on this page.".to_string()),
        };
        updated.map_err(|e| e.to_string())?;
        Ok(Vec::new())
    }

    fn submit(&mut self, scheduler: &mut dyn ResetScheduler) -> Vec<String> {
        match &mut self.page {
            Page::Cart { ledger, checkout } => match ledger.checkout(checkout, self.ids.as_ref()) {
                Ok(confirmation) => render::order(&confirmation),
                Err(err) => vec![render::notice(&Notice::for_error(FormKind::Checkout, &err))],
            },
            Page::Form(flow) => {
                let kind = flow.kind();
                match flow.submit(self.ids.as_ref(), scheduler) {
                    Ok(result) => {
                        let mut out = vec![render::notice(&Notice::submitted(kind, &result))];
                        out.extend(render::flow(flow));
                        out
                    }
                    Err(err) => vec![render::notice(&Notice::for_error(kind, &err))],
                }
            }
            Page::Catalog { .. } => vec!["✘ There is nothing to submit on this page.".to_string()],
        }
    }

    fn cart_op(&mut self, command: &str, args: &[&str]) -> Result<Vec<String>, String> {
        let [id] = args else {
            return Err(format!("Usage: {command} <id>"));
        };
        let op: CartOp = format!("{command}:{id}").parse()?;

        let ledger = match &mut self.page {
            Page::Cart { ledger, .. } => ledger,
            Page::Catalog { selection, .. } if matches!(op, CartOp::Add(_)) => selection,
            _ => return Err(format!("`{command}` is not available on this page.")),
        };
        let notice = cart::apply(ledger, &self.catalog, op)?;

        let mut out: Vec<String> = notice.iter().map(render::notice).collect();
        match &self.page {
            Page::Cart { ledger, .. } => out.extend(render::cart(ledger)),
            Page::Catalog { selection, .. } => {
                out.push(format!("Items in cart: {}", selection.item_count()));
            }
            Page::Form(_) => {}
        }
        Ok(out)
    }

    fn cancel_reset(&mut self, scheduler: &mut dyn ResetScheduler) -> Result<Vec<String>, String> {
        let Page::Form(flow) = &mut self.page else {
            return Err("There is no form on this page.".to_string());
        };
        match flow.cancel_pending_reset(scheduler) {
            Some(ticket) => Ok(vec![format!("Automatic reset cancelled ({ticket}).")]),
            None => Err("No reset is pending.".to_string()),
        }
    }
}

/// Run the session on stdin until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub async fn run(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(config.request_ids.build(), config.contact_reset_delay);
    let (mut scheduler, mut resets) = TokioResetScheduler::new();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    info!("session started");
    output::print_line("Welcome to Himsols. Type `help` for commands.");
    output::print_lines(&session.show());

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(line) = line? else { break };
                match session.handle(&line, &mut scheduler) {
                    Step::Continue(lines) => output::print_lines(&lines),
                    Step::Quit => break,
                }
            }
            Some(ticket) = resets.recv() => {
                output::print_lines(&session.on_reset(ticket));
            }
        }
    }

    info!("session ended");
    Ok(())
}
