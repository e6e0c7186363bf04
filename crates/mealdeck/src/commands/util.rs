//! Shared helpers for command handlers.

use std::io::IsTerminal;

use mealdeck_core::{FoodFilters, MealForm};

use crate::cli::{FilterArgs, MealFormArgs};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal on stdin there is nobody to ask, so the action is
/// refused instead of hanging.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Translate filter flags into query filters.
pub fn filters_from_args(args: FilterArgs) -> FoodFilters {
    let mut filters = FoodFilters::new();
    if let Some(name) = args.name {
        filters = filters.name(name);
    }
    if let Some(rating) = args.rating {
        filters = filters.rating(rating);
    }
    if let Some(open) = args.open {
        filters = filters.open(open);
    }
    if let Some(price) = args.price {
        filters = filters.price(price);
    }
    args.params
        .into_iter()
        .fold(filters, |f, (key, value)| f.param(key, value))
}

/// Overlay the flags that were given onto `base`.
pub fn apply_form_args(mut base: MealForm, args: MealFormArgs) -> MealForm {
    let MealFormArgs {
        name,
        rating,
        avatar,
        restaurant_name,
        logo,
        status,
    } = args;

    if let Some(v) = name {
        base.name = v;
    }
    if let Some(v) = rating {
        base.rating = v;
    }
    if let Some(v) = avatar {
        base.avatar = v;
    }
    if let Some(v) = restaurant_name {
        base.restaurant_name = v;
    }
    if let Some(v) = logo {
        base.logo = v;
    }
    if let Some(v) = status {
        base.status = v.trim().to_ascii_lowercase();
    }
    base
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form_args() -> MealFormArgs {
        MealFormArgs {
            name: None,
            rating: None,
            avatar: None,
            restaurant_name: None,
            logo: None,
            status: None,
        }
    }

    #[test]
    fn unset_flags_keep_existing_values() {
        let base = MealForm {
            name: "Pizza".into(),
            rating: "4.5".into(),
            ..MealForm::default()
        };
        let args = MealFormArgs {
            rating: Some("5".into()),
            status: Some(" Open ".into()),
            ..form_args()
        };

        let form = apply_form_args(base, args);
        assert_eq!(form.name, "Pizza");
        assert_eq!(form.rating, "5");
        assert_eq!(form.status, "open");
    }

    #[test]
    fn filter_flags_become_query_params() {
        let args = FilterArgs {
            name: Some("pizza".into()),
            rating: None,
            open: Some(true),
            price: None,
            params: vec![("category".into(), "vegan".into())],
            advanced: false,
        };

        let params = filters_from_args(args).to_params();
        assert_eq!(
            params,
            vec![
                ("name".to_owned(), "pizza".to_owned()),
                ("open".to_owned(), "true".to_owned()),
                ("category".to_owned(), "vegan".to_owned()),
            ]
        );
    }

    #[test]
    fn yes_flag_skips_the_prompt() {
        assert!(confirm("Really?", "delete", true).unwrap());
    }
}
