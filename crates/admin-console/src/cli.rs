//! Command-line front door: list, delete and toggle records.

use crate::error::ConsoleError;
use crate::lifecycle::ConsoleSystem;
use crate::resources::{Classes, Enterprises, Packages, PromoCodes, Reports, Roles};
use clap::{Parser, Subcommand, ValueEnum};
use sync_framework::{
    FilterState, FilterValue, MutableResourceClient, RecordId, Resource, ResourceClient, Selection,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "admin-console", version, about = "Manage education console resources")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one page of a resource and print it as JSON lines
    List {
        resource: ResourceKind,
        /// Case-insensitive text matched against the resource's search fields
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// `key=value`; comma-separated values match any of them
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, FilterValue)>,
    },
    /// Delete a record
    Delete { resource: ResourceKind, id: String },
    /// Flip a promo code's `isActive` flag
    Toggle { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Enterprises,
    Classes,
    Packages,
    PromoCodes,
    Roles,
    Reports,
}

fn parse_filter(raw: &str) -> Result<(String, FilterValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("filter key is empty in {raw:?}"));
    }
    let value = if value.contains(',') {
        FilterValue::any_of(value.split(',').map(|v| v.trim().to_string()))
    } else {
        FilterValue::exact(value.trim())
    };
    Ok((key.to_string(), value))
}

/// Executes `command` against `system` and returns the lines to print.
pub async fn run(system: &ConsoleSystem, command: Command) -> Result<Vec<String>, ConsoleError> {
    match command {
        Command::List {
            resource,
            search,
            page,
            filters,
        } => {
            let state = filters.into_iter().fold(
                FilterState::new().with_search_term(search),
                |state, (key, value)| state.with_filter(key, value),
            );
            let state = state.with_page(page);
            let page_size = system.settings.page_size;
            let selection = match resource {
                ResourceKind::Enterprises => {
                    list::<Enterprises, _>(&system.enterprises, &state, page_size).await?
                }
                ResourceKind::Classes => {
                    list::<Classes, _>(&system.classes, &state, page_size).await?
                }
                ResourceKind::Packages => {
                    list::<Packages, _>(&system.packages, &state, page_size).await?
                }
                ResourceKind::PromoCodes => {
                    list::<PromoCodes, _>(&system.promo_codes, &state, page_size).await?
                }
                ResourceKind::Roles => {
                    list::<Roles, _>(&system.roles, &state, page_size).await?
                }
                ResourceKind::Reports => {
                    list::<Reports, _>(&system.reports, &state, page_size).await?
                }
            };
            info!(
                ?resource,
                page = state.page(),
                total_pages = selection.total_pages,
                shown = selection.visible_items.len(),
                "Listed"
            );
            selection
                .visible_items
                .iter()
                .map(|record| {
                    serde_json::to_string(record).map_err(|e| {
                        ConsoleError::Communication(format!("cannot render record: {e}"))
                    })
                })
                .collect()
        }
        Command::Delete { resource, id } => {
            let id = RecordId::new(id);
            match resource {
                ResourceKind::Enterprises => system.enterprises.remove(id.clone()).await?,
                ResourceKind::Classes => system.classes.remove(id.clone()).await?,
                ResourceKind::Packages => system.packages.remove(id.clone()).await?,
                ResourceKind::PromoCodes => system.promo_codes.remove(id.clone()).await?,
                ResourceKind::Roles => system.roles.remove(id.clone()).await?,
                ResourceKind::Reports => {
                    return Err(ConsoleError::Communication(format!(
                        "{} are read-only",
                        Reports::NAME
                    )))
                }
            }
            Ok(vec![format!("deleted {id}")])
        }
        Command::Toggle { id } => {
            let record = system
                .promo_codes
                .toggle_active(RecordId::new(id.clone()))
                .await?;
            let line = match record {
                Some(record) => serde_json::to_string(&record).map_err(|e| {
                    ConsoleError::Communication(format!("cannot render record: {e}"))
                })?,
                None => format!("toggled {id}"),
            };
            Ok(vec![line])
        }
    }
}

async fn list<R, C>(
    client: &C,
    filters: &FilterState,
    page_size: usize,
) -> Result<Selection, ConsoleError>
where
    R: Resource,
    C: ResourceClient<R, Error = ConsoleError>,
{
    client.fetch(filters).await?;
    client.select(filters, page_size).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_parse_single_and_multiple_values() {
        assert_eq!(
            parse_filter("status=active").unwrap(),
            ("status".to_string(), FilterValue::exact("active"))
        );
        assert_eq!(
            parse_filter("grade=7,8").unwrap(),
            ("grade".to_string(), FilterValue::AnyOf(vec![json!("7"), json!("8")]))
        );
        assert!(parse_filter("status").is_err());
        assert!(parse_filter("=x").is_err());
    }

    #[test]
    fn list_arguments() {
        let cli = Cli::try_parse_from([
            "admin-console",
            "list",
            "promo-codes",
            "--search",
            "spring",
            "--filter",
            "isActive=true",
        ])
        .unwrap();
        match cli.command {
            Command::List {
                resource,
                search,
                page,
                filters,
            } => {
                assert_eq!(resource, ResourceKind::PromoCodes);
                assert_eq!(search, "spring");
                assert_eq!(page, 1);
                assert_eq!(filters.len(), 1);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
