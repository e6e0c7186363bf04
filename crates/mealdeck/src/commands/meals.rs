//! Meal command handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tabled::Tabled;

use mealdeck_core::{ActionError, FoodItem, MealForm, QueryOutcome, Storefront};

use crate::cli::{MealsArgs, MealsCommand};
use crate::error::CliError;
use crate::output::{self, RenderOpts};

use super::util;

const DELETE_PROMPT: &str = "Are you sure you want to delete this meal? Actions cannot be reversed.";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MealRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl MealRow {
    fn new(item: &FoodItem, color: bool) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            rating: item.rating.clone(),
            price: item.price.clone(),
            status: output::status_badge(item.open, color),
            created: format_created(&item.created_at),
        }
    }
}

/// Local date and time for an RFC 3339 timestamp; unparseable values are
/// shown as they came.
fn format_created(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_owned(),
        |ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

fn detail(item: &FoodItem, color: bool) -> String {
    let mut out = String::new();
    let rows = [
        ("ID", item.id.clone()),
        ("Name", item.name.clone()),
        ("Rating", item.rating.clone()),
        ("Price", item.price.clone()),
        ("Status", output::status_badge(item.open, color)),
        ("Image", item.avatar.clone()),
        ("Logo", item.logo.clone()),
        ("Created", format_created(&item.created_at)),
    ];
    for (label, value) in rows {
        if !value.is_empty() {
            let _ = writeln!(out, "{label:<8} {value}");
        }
    }
    out.trim_end().to_owned()
}

fn print_list(items: &[FoodItem], opts: &RenderOpts) {
    let out = output::render_list(
        opts.format,
        items,
        |i| MealRow::new(i, opts.color),
        |i| i.id.clone(),
    );
    output::print_output(&out, opts.quiet);
}

fn print_meal(item: &FoodItem, opts: &RenderOpts) {
    let out = output::render_single(opts.format, item, |i| detail(i, opts.color), |i| i.id.clone());
    output::print_output(&out, opts.quiet);
}

/// Show the failure notice, then hand back the error for exit-code mapping.
fn report(err: ActionError, opts: &RenderOpts) -> CliError {
    if let Some(notice) = &err.notice {
        output::print_notice(notice, opts);
    }
    err.source.into()
}

/// Fetch one meal, turning a 404 into a not-found error for `id`.
async fn fetch_meal(storefront: &Storefront, id: &str) -> Result<Arc<FoodItem>, CliError> {
    match storefront.get_meal(Some(id)).await {
        Ok(QueryOutcome::Ready(item)) => Ok(item),
        Ok(QueryOutcome::Dormant) => Err(CliError::Validation {
            field: "id".into(),
            reason: "meal ID cannot be empty".into(),
        }),
        Err(e) if e.is_not_found() => Err(CliError::meal_not_found(id)),
        Err(e) => Err(e.into()),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    storefront: &Storefront,
    args: MealsArgs,
    opts: &RenderOpts,
) -> Result<(), CliError> {
    match args.command {
        MealsCommand::List => {
            let items = storefront.show_all().await.map_err(|e| report(e, opts))?;
            print_list(&items, opts);
            Ok(())
        }

        MealsCommand::Get { id } => {
            let item = fetch_meal(storefront, &id).await?;
            print_meal(&item, opts);
            Ok(())
        }

        MealsCommand::Search { term } => {
            let items = storefront.search(&term).await.map_err(|e| report(e, opts))?;
            print_list(&items, opts);
            Ok(())
        }

        MealsCommand::Filter(filter) => {
            let advanced = filter.advanced;
            let filters = util::filters_from_args(filter);
            let queries = storefront.queries();

            let items = if advanced {
                match queries.advanced_search(&filters).await? {
                    QueryOutcome::Ready(items) => items,
                    QueryOutcome::Dormant => {
                        if !opts.quiet {
                            eprintln!("No filters given; nothing to search for.");
                        }
                        return Ok(());
                    }
                }
            } else {
                queries.filtered(&filters).await?
            };
            print_list(&items, opts);
            Ok(())
        }

        MealsCommand::Add(form_args) => {
            let form = util::apply_form_args(MealForm::default(), form_args);
            let action = storefront.add_meal(&form).await.map_err(|e| report(e, opts))?;
            output::print_notice(&action.notice, opts);
            print_meal(&action.value, opts);
            Ok(())
        }

        MealsCommand::Edit { id, form } => {
            let existing = fetch_meal(storefront, &id).await?;
            let form = util::apply_form_args(MealForm::from_item(&existing), form);
            let action = storefront
                .edit_meal(&existing, &form)
                .await
                .map_err(|e| report(e, opts))?;
            output::print_notice(&action.notice, opts);
            print_meal(&action.value, opts);
            Ok(())
        }

        MealsCommand::Delete { id } => {
            let meal = fetch_meal(storefront, &id).await?;
            if !util::confirm(DELETE_PROMPT, "meals delete", opts.yes)? {
                return Ok(());
            }
            let action = storefront
                .delete_meal(&meal)
                .await
                .map_err(|e| report(e, opts))?;
            output::print_notice(&action.notice, opts);
            Ok(())
        }
    }
}
