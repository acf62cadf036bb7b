use checkstore::{CheckItem, CheckList, Checkable, Config, ItemId, load_items, warn_duplicate_ids};
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

type Entry = CheckItem<ItemId, Map<String, Value>>;

#[derive(Parser)]
#[command(name = "checkstore")]
#[command(about = "Apply checklist operations to a list of items and print the result")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file (default: user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the resulting list (or checked ids) as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Numeric item field to total over the checked items
    #[arg(long, value_name = "FIELD")]
    sum: Option<String>,

    /// Items file (.json, .jsonl, .ndjson, .yaml, .yml)
    items: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the list unchanged
    Show,

    /// Flip the checked flag of each id
    Toggle {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Check each id
    Check {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Uncheck each id
    Uncheck {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Check everything, or uncheck everything if all are checked
    ToggleAll,

    /// Check every item
    CheckAll,

    /// Uncheck every item
    UncheckAll,

    /// Print the ids of checked items in list order
    Checked,
}

fn main() -> Result<()> {
    // Setup tracing; stdout is reserved for command output
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    if !config.color {
        colored::control::set_override(false);
    }

    let items: Vec<Entry> = load_items(&cli.items)?;
    warn_duplicate_ids(&items);

    let mut store = CheckList::new(items);
    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notifications);
    store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    match cli.command {
        Commands::Show => {}
        Commands::Toggle { ids } => apply_each(&mut store, &ids, CheckList::toggle),
        Commands::Check { ids } => apply_each(&mut store, &ids, CheckList::check),
        Commands::Uncheck { ids } => apply_each(&mut store, &ids, CheckList::uncheck),
        Commands::ToggleAll => {
            store.toggle_all();
        }
        Commands::CheckAll => {
            store.check_all();
        }
        Commands::UncheckAll => {
            store.uncheck_all();
        }
        Commands::Checked => {
            let ids = store.checked_ids();
            if cli.json {
                let json = serde_json::to_string(&ids).context("Failed to serialize ids")?;
                println!("{}", json);
            } else {
                for id in ids {
                    println!("{}", id);
                }
            }
            return Ok(());
        }
    }

    if cli.json {
        let list: Vec<&Entry> = store.items().iter().map(|item| &**item).collect();
        let json = serde_json::to_string_pretty(&list).context("Failed to serialize items")?;
        println!("{}", json);
    } else {
        for item in store.items() {
            println!("{}", render_line(item, &config.label_field));
        }
    }

    let fired = notifications.load(Ordering::SeqCst);
    info!(notifications = fired, "Applied command");

    let mut summary = format!(
        "{}/{} checked, {} change notification(s)",
        store.checked_count(),
        store.len(),
        fired
    );
    if let Some(field) = &cli.sum {
        summary.push_str(&format!(", total {}: {}", field, sum_checked(&store, field)));
    }

    // Keep stdout parseable in JSON mode
    if cli.json {
        eprintln!("{}", summary);
    } else {
        println!("{}", summary);
    }

    Ok(())
}

type ItemOp = fn(&mut CheckList<Entry>, &ItemId) -> bool;

fn apply_each(store: &mut CheckList<Entry>, tokens: &[String], op: ItemOp) {
    for token in tokens {
        match resolve_id(store, token) {
            Some(id) => {
                op(store, &id);
            }
            None => eprintln!("{} no item with id {}", "warning:".yellow(), token),
        }
    }
}

/// Match a command-line token against the list: a string id wins over an integer id
fn resolve_id(store: &CheckList<Entry>, token: &str) -> Option<ItemId> {
    ItemId::candidates(token)
        .into_iter()
        .find(|id| store.find_index(id).is_some())
}

/// Total of a numeric field over the checked items; non-numeric values are skipped
fn sum_checked(store: &CheckList<Entry>, field: &str) -> Value {
    let values: Vec<&Value> = store
        .items()
        .iter()
        .filter(|item| item.is_checked())
        .filter_map(|item| item.data.get(field))
        .filter(|value| value.is_number())
        .collect();

    if values.iter().all(|value| value.is_i64()) {
        Value::from(values.iter().filter_map(|value| value.as_i64()).sum::<i64>())
    } else {
        Value::from(values.iter().filter_map(|value| value.as_f64()).sum::<f64>())
    }
}

fn render_line(item: &Entry, label_field: &str) -> String {
    let mark = if item.is_checked() {
        "[x]".green().to_string()
    } else {
        "[ ]".dimmed().to_string()
    };

    let label = match item.data.get(label_field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    if label.is_empty() {
        format!("{} {}", mark, item.id.to_string().bold())
    } else {
        format!("{} {} {}", mark, item.id.to_string().bold(), label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: Value) -> Entry {
        serde_json::from_value(value).unwrap()
    }

    fn store() -> CheckList<Entry> {
        CheckList::new(vec![
            entry(json!({"id": "1", "text": "string one", "price": 10, "checked": true})),
            entry(json!({"id": 1, "text": "int one", "price": 5, "checked": true})),
            entry(json!({"id": 2, "text": null, "price": 2.5, "checked": false})),
        ])
    }

    #[test]
    fn test_resolve_id_prefers_string_match() {
        let store = store();
        assert_eq!(resolve_id(&store, "1"), Some(ItemId::from("1")));
        assert_eq!(resolve_id(&store, "2"), Some(ItemId::Int(2)));
        assert_eq!(resolve_id(&store, "002"), Some(ItemId::Int(2)));
        assert_eq!(resolve_id(&store, "x"), None);
    }

    #[test]
    fn test_sum_checked_integers_and_floats() {
        let mut store = store();
        assert_eq!(sum_checked(&store, "price"), json!(15));
        assert_eq!(sum_checked(&store, "missing"), json!(0));

        store.check_all();
        assert_eq!(sum_checked(&store, "price"), json!(17.5));
    }

    #[test]
    fn test_render_line_null_label_is_omitted() {
        colored::control::set_override(false);
        let store = store();
        assert_eq!(render_line(&store.items()[2], "text"), "[ ] 2");
        assert_eq!(render_line(&store.items()[0], "text"), "[x] 1 string one");
        assert_eq!(render_line(&store.items()[1], "price"), "[x] 1 5");
    }
}
