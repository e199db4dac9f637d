//! Category command handlers

use super::utils::{accept, expect_data, with_spinner};
use super::Session;
use crate::cli::{CategoriesAction, CategoriesArgs};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use ojclient_core::{CategoryForm, CategoryListQuery, IdentityQuery};

/// Handle the categories command
pub async fn handle_categories(
    args: CategoriesArgs,
    session: &Session,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        CategoriesAction::List { page, keyword } => {
            let query = CategoryListQuery {
                page: page.page,
                size: page.size,
                keyword,
            };
            let response =
                with_spinner(output, "Fetching categories...", session.api.category_list(&query)).await?;
            output.page(&expect_data(response, "category list")?)
        }
        CategoriesAction::Create { name, parent_id } => {
            let form = CategoryForm {
                identity: None,
                name: non_empty_name(name)?,
                parent_id,
            };
            let response =
                with_spinner(output, "Creating category...", session.api.create_category(&form)).await?;
            accept(response, output, &format!("Created category '{}'", form.name))
        }
        CategoriesAction::Modify {
            identity,
            name,
            parent_id,
        } => {
            let form = CategoryForm {
                identity: Some(identity),
                name: non_empty_name(name)?,
                parent_id,
            };
            let response =
                with_spinner(output, "Modifying category...", session.api.modify_category(&form)).await?;
            accept(response, output, &format!("Modified category '{}'", form.name))
        }
        CategoriesAction::Delete(args) => {
            let query = IdentityQuery::new(args.identity);
            let response =
                with_spinner(output, "Deleting category...", session.api.delete_category(&query)).await?;
            accept(response, output, &format!("Deleted category {}", query.identity))
        }
    }
}

fn non_empty_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        Err(Error::invalid_args("category name must not be empty"))
    } else {
        Ok(name)
    }
}
