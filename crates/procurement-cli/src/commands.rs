//! Command parsing and execution.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use procurement_core::models::{
    Credentials, ItemInput, NewPurchase, Purchase, PurchaseLine, SupplierInput,
};
use procurement_core::utils::{format_currency, truncate_string};
use procurement_core::{ApiClient, Config};
use tracing::warn;

/// Column width for names in list output
const NAME_WIDTH: usize = 28;

pub const USAGE: &str = "\
Usage: procurement <command> [args]

Commands:
  login [username]                      Log in and remember the session
  logout                                Forget the stored session
  whoami                                Show the logged-in user
  items                                 List items
  item <id>                             Show one item
  item-add <name> <stock> <price>       Create an item
  item-rm <id>                          Delete an item
  suppliers                             List suppliers
  supplier-add <name> [email] [address] Create a supplier
  purchases                             List purchases
  purchase <id>                         Show one purchase with its lines
  purchase-add <supplier_id> <item_id:qty>...
                                        Record a purchase
  help                                  Show this message

Set API_BASE_URL to point at the backend (default http://localhost:8080/api).";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Login { username: Option<String> },
    Logout,
    WhoAmI,
    Items,
    Item { id: u64 },
    ItemAdd(ItemInput),
    ItemRemove { id: u64 },
    Suppliers,
    SupplierAdd(SupplierInput),
    Purchases,
    Purchase { id: u64 },
    PurchaseAdd(NewPurchase),
}

fn parse_id(value: Option<&String>, what: &str) -> Result<u64> {
    let value = value.ok_or_else(|| anyhow!("Missing {}", what))?;
    value
        .parse()
        .with_context(|| format!("Invalid {}: {}", what, value))
}

fn parse_line(arg: &str) -> Result<PurchaseLine> {
    let (item, qty) = arg
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected item_id:qty, got {}", arg))?;
    Ok(PurchaseLine {
        item_id: item
            .parse()
            .with_context(|| format!("Invalid item id in {}", arg))?,
        qty: qty
            .parse()
            .with_context(|| format!("Invalid quantity in {}", arg))?,
    })
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some(name) = args.first() else {
            return Ok(Command::Help);
        };
        let rest = &args[1..];

        let command = match name.as_str() {
            "help" | "--help" | "-h" => Command::Help,
            "login" => Command::Login {
                username: rest.first().cloned(),
            },
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "items" => Command::Items,
            "item" => Command::Item {
                id: parse_id(rest.first(), "item id")?,
            },
            "item-add" => {
                let [name, stock, price] = rest else {
                    bail!("item-add takes <name> <stock> <price>");
                };
                Command::ItemAdd(ItemInput {
                    name: name.clone(),
                    stock: stock
                        .parse()
                        .with_context(|| format!("Invalid stock: {}", stock))?,
                    price: price
                        .parse()
                        .with_context(|| format!("Invalid price: {}", price))?,
                })
            }
            "item-rm" => Command::ItemRemove {
                id: parse_id(rest.first(), "item id")?,
            },
            "suppliers" => Command::Suppliers,
            "supplier-add" => {
                let name = rest
                    .first()
                    .ok_or_else(|| anyhow!("supplier-add takes <name> [email] [address]"))?;
                Command::SupplierAdd(SupplierInput {
                    name: name.clone(),
                    email: rest.get(1).cloned().unwrap_or_default(),
                    address: rest.get(2..).map(|words| words.join(" ")).unwrap_or_default(),
                })
            }
            "purchases" => Command::Purchases,
            "purchase" => Command::Purchase {
                id: parse_id(rest.first(), "purchase id")?,
            },
            "purchase-add" => {
                let supplier_id = parse_id(rest.first(), "supplier id")?;
                let items = rest
                    .iter()
                    .skip(1)
                    .map(|arg| parse_line(arg))
                    .collect::<Result<Vec<_>>>()?;
                Command::PurchaseAdd(NewPurchase { supplier_id, items })
            }
            other => bail!("Unknown command: {}", other),
        };
        Ok(command)
    }

    /// Everything except help, login, and logout needs a stored token
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Command::Help | Command::Login { .. } | Command::Logout)
    }
}

pub async fn execute(client: &ApiClient, config: &mut Config, command: Command) -> Result<()> {
    match command {
        Command::Help => println!("{}", USAGE),
        Command::Login { username } => login(client, config, username).await?,
        Command::Logout => {
            println!("Logged out.");
            client.session().logout()?;
        }
        Command::WhoAmI => {
            if let Some(user) = client.session().current_user()? {
                println!("Stored session: {}", user.display());
            }
            let user = client.profile().await?;
            println!("Server profile: {}", user.display());
        }
        Command::Items => {
            let items = client.list_items().await?;
            println!("{:>5}  {:<NAME_WIDTH$}  {:>7}  {:>16}", "ID", "NAME", "STOCK", "PRICE");
            for item in &items {
                println!(
                    "{:>5}  {:<NAME_WIDTH$}  {:>7}  {:>16}",
                    item.id,
                    truncate_string(&item.name, NAME_WIDTH),
                    item.stock,
                    item.price_display()
                );
            }
            let total: f64 = items.iter().map(|i| i.stock_value()).sum();
            println!("\n{} items, stock value {}", items.len(), format_currency(total));
        }
        Command::Item { id } => {
            let item = client.get_item(id).await?;
            println!("#{} {}", item.id, item.name);
            println!("  Stock: {}", item.stock);
            println!("  Price: {}", item.price_display());
        }
        Command::ItemAdd(input) => {
            let item = client.create_item(&input).await?;
            println!("Created item #{} {} ({})", item.id, item.name, item.price_display());
        }
        Command::ItemRemove { id } => {
            let message = client.delete_item(id).await?;
            println!("{}", message.unwrap_or_else(|| format!("Deleted item #{}", id)));
        }
        Command::Suppliers => {
            let suppliers = client.list_suppliers().await?;
            println!("{:>5}  {:<NAME_WIDTH$}  {}", "ID", "NAME", "EMAIL");
            for supplier in &suppliers {
                println!(
                    "{:>5}  {:<NAME_WIDTH$}  {}",
                    supplier.id,
                    truncate_string(&supplier.name, NAME_WIDTH),
                    supplier.email_display()
                );
            }
        }
        Command::SupplierAdd(input) => {
            let supplier = client.create_supplier(&input).await?;
            println!("Created supplier #{} {}", supplier.id, supplier.name);
        }
        Command::Purchases => {
            let purchases = client.list_purchases().await?;
            println!(
                "{:>5}  {:<18}  {:<NAME_WIDTH$}  {:>16}",
                "ID", "DATE", "SUPPLIER", "TOTAL"
            );
            for purchase in &purchases {
                println!(
                    "{:>5}  {:<18}  {:<NAME_WIDTH$}  {:>16}",
                    purchase.id,
                    purchase.date_display(),
                    truncate_string(purchase.supplier_name(), NAME_WIDTH),
                    purchase.total_display()
                );
            }
        }
        Command::Purchase { id } => {
            let purchase = client.get_purchase(id).await?;
            print_purchase(&purchase);
        }
        Command::PurchaseAdd(new_purchase) => {
            let purchase = client.create_purchase(&new_purchase).await?;
            print_purchase(&purchase);
        }
    }
    Ok(())
}

async fn login(client: &ApiClient, config: &mut Config, username: Option<String>) -> Result<()> {
    let username = match username.or_else(|| config.last_username.clone()) {
        Some(username) => username,
        None => prompt("Username: ")?,
    };
    let password = rpassword::prompt_password(format!("Password for {}: ", username))
        .context("Failed to read password")?;

    let data = client.login(&Credentials::new(username.clone(), password)).await?;
    println!("Logged in as {}", data.user.display());

    config.last_username = Some(username);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_purchase(purchase: &Purchase) {
    println!(
        "Purchase #{} - {} - {}",
        purchase.id,
        purchase.date_display(),
        purchase.supplier_name()
    );
    if let Some(ref user) = purchase.user {
        println!("  Recorded by {}", user.username);
    }
    for detail in &purchase.details {
        println!(
            "  {:<NAME_WIDTH$}  x{:<5}  {:>16}",
            truncate_string(&detail.item_name(), NAME_WIDTH),
            detail.qty,
            detail.sub_total_display()
        );
    }
    println!("  Total: {}", purchase.total_display());
}
